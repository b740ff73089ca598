use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::document::DocumentError;

/// Resolves a document reference from step details to its bytes.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, DocumentError>;
}

/// Documents stored under a root directory. References are relative paths;
/// absolute paths and `..` are rejected.
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, DocumentError> {
        let relative = Path::new(reference);
        let contained = !reference.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(DocumentError::InvalidReference(reference.to_string()));
        }

        match tokio::fs::read(self.root.join(relative)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::NotFound(reference.to_string()))
            }
            Err(e) => Err(DocumentError::Io {
                reference: reference.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSource {
    documents: HashMap<String, Vec<u8>>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reference: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(reference.into(), bytes.into());
        self
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, DocumentError> {
        self.documents
            .get(reference)
            .cloned()
            .ok_or_else(|| DocumentError::NotFound(reference.to_string()))
    }
}
