//! Model inference from sampled rows
//!
//! Classifies every field of the sampled row(s) into a typed
//! [`PropertyDefinition`](crate::model::PropertyDefinition):
//!
//! - **Nested shapes** - objects and arrays of objects get their own model
//! - **Text recognition** - dates in any encoding; numbers and booleans when
//!   the source carries scalars as text (CSV)
//! - **Required-ness** - taken from the first row, optionally refined across
//!   later sampled rows
//!
//! ## Example
//!
//! ```rust,ignore
//! use fixturegen_core::inference::{InferenceConfig, ModelInferrer};
//! use fixturegen_core::source::ValueEncoding;
//!
//! let inferrer = ModelInferrer::with_config(InferenceConfig::default(), ValueEncoding::Structured);
//! let model = inferrer.infer(&rows);
//! println!("{}", serde_json::to_string_pretty(&model)?);
//! ```

mod config;
mod formats;
mod inferrer;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use formats::{DateFormat, detect_date_format, parse_boolean, parse_date, parse_number};
pub use inferrer::{InferenceStats, ModelInferrer};
