//! Filesystem access for template import and export

use std::path::Path;

use promptcore::{PromptError, PromptResult};
use tracing::debug;

pub trait FileSystem {
    fn read_file(&self, path: &Path) -> PromptResult<Vec<u8>>;
    fn write_file(&self, path: &Path, bytes: &[u8]) -> PromptResult<()>;
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_file(&self, path: &Path) -> PromptResult<Vec<u8>> {
        debug!(?path, "LocalFileSystem::read_file: called");
        std::fs::read(path).map_err(|e| PromptError::io(path, e))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> PromptResult<()> {
        debug!(?path, len = bytes.len(), "LocalFileSystem::write_file: called");
        std::fs::write(path, bytes).map_err(|e| PromptError::io(path, e))
    }
}
