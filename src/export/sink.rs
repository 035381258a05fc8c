// Delivery of rendered export documents

use crate::export::ExportError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for a finished export document
pub trait ExportSink {
    /// Deliver `contents` under `file_name`, returning where it ended up
    fn deliver(&mut self, file_name: &str, contents: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory, like a browser's downloads folder
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, contents: &[u8]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(file_name);
        std::fs::write(&path, contents)?;
        info!("Exported {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}
