//! Configuration for model inference

use serde::{Deserialize, Serialize};

/// Configuration for model inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Number of leading rows to sample when refining (0 = all rows).
    /// Only the first row is sampled unless `refine_required` is set.
    pub sample_size: usize,

    /// Downgrade required fields that are null or missing in later sampled rows
    pub refine_required: bool,

    /// Classify recognised date strings as date-time properties
    pub detect_dates: bool,

    /// Maximum nesting depth for object models
    pub max_depth: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 1,
            refine_required: false,
            detect_dates: true,
            max_depth: 10,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Number of rows the inferrer actually consumes
    pub fn effective_sample_size(&self) -> usize {
        match (self.refine_required, self.sample_size) {
            (false, _) => 1,
            (true, 0) => usize::MAX,
            (true, size) => size,
        }
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the sample size (0 = all records)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Enable or disable multi-row required refinement
    pub fn refine_required(mut self, refine: bool) -> Self {
        self.config.refine_required = refine;
        self
    }

    /// Enable or disable date detection
    pub fn detect_dates(mut self, detect: bool) -> Self {
        self.config.detect_dates = detect;
        self
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
