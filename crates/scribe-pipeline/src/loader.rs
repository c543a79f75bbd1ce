//! Subject content loading

use async_trait::async_trait;
use scribe_core::{Error, Result, SubjectSource};
use std::io::ErrorKind;

/// Resolves a [`SubjectSource`] into text.
///
/// Every error returned here is treated as an invalid input for that item.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    async fn load(&self, source: &SubjectSource) -> Result<String>;
}

/// Loader backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

#[async_trait]
impl ContentLoader for FsLoader {
    async fn load(&self, source: &SubjectSource) -> Result<String> {
        match source {
            SubjectSource::Inline(text) => Ok(text.clone()),
            SubjectSource::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(content) => Ok(content),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(Error::Validation(format!("File not found: {}", path.display())))
                }
                Err(e) if e.kind() == ErrorKind::InvalidData => Err(Error::Validation(format!(
                    "File is not valid UTF-8 text: {}",
                    path.display()
                ))),
                Err(e) => Err(Error::Validation(format!(
                    "Could not read {}: {e}",
                    path.display()
                ))),
            },
        }
    }
}
