//! Document text extraction steps.

mod executor;
mod extract;
mod pdf;
mod source;

pub use executor::{DocumentDetails, DocumentExecutor};
pub use extract::{DocumentBackend, PlainTextExtractor};
pub use pdf::{AutoExtractor, PdfExtractor};
pub use source::{DocumentSource, FsDocumentSource, MemoryDocumentSource};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("invalid document reference `{0}`")]
    InvalidReference(String),
    #[error("failed to read document `{reference}`: {message}")]
    Io { reference: String, message: String },
    #[error("unreadable document: {0}")]
    Unreadable(String),
}
