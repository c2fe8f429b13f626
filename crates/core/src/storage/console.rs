//! Console sink

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, stdout};

use super::{EmitMode, PersistenceSink, StorageError};

/// Echoes every artifact to stdout, preceded by a name banner.
///
/// The emit mode is irrelevant for a stream and is ignored.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    banner: bool,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { banner: true }
    }

    /// Print artifact text only, without `// <name>` banners
    pub fn without_banner() -> Self {
        Self { banner: false }
    }
}

#[async_trait(?Send)]
impl PersistenceSink for ConsoleSink {
    async fn persist(&self, name: &str, text: &str, _mode: EmitMode) -> Result<(), StorageError> {
        let mut out = stdout();
        let mut buffer = String::with_capacity(text.len() + name.len() + 8);
        if self.banner {
            buffer.push_str(&format!("// {}\n", name));
        }
        buffer.push_str(text);

        out.write_all(buffer.as_bytes())
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write {} to stdout: {}", name, e)))?;
        out.flush()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to flush stdout: {}", e)))
    }
}
