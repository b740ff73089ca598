use async_trait::async_trait;

use crate::document::extract::{DocumentBackend, PlainTextExtractor};
use crate::document::DocumentError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Text layer of a PDF, in content-stream order. Scanned pages without a text
/// layer come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl DocumentBackend for PdfExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(DocumentError::Unreadable("missing %PDF- header".to_string()));
        }
        let bytes = bytes.to_vec();
        // Parsing is CPU bound and panics on some malformed inputs.
        let extracted =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| DocumentError::Unreadable(format!("PDF parser aborted: {e}")))?;
        extracted.map_err(|e| DocumentError::Unreadable(format!("invalid PDF: {e}")))
    }
}

/// Chooses the extractor from the content's magic bytes: PDFs go to
/// [`PdfExtractor`], everything else to [`PlainTextExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoExtractor;

#[async_trait]
impl DocumentBackend for AutoExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        if bytes.starts_with(PDF_MAGIC) {
            PdfExtractor.extract_text(bytes).await
        } else {
            PlainTextExtractor.extract_text(bytes).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_is_routed_to_plain_extractor() {
        let text = AutoExtractor.extract_text(b"Order 7").await.unwrap();
        assert_eq!(text, "Order 7");
    }

    #[tokio::test]
    async fn pdf_extractor_rejects_non_pdf() {
        let err = PdfExtractor.extract_text(b"hello").await.unwrap_err();
        assert_eq!(err, DocumentError::Unreadable("missing %PDF- header".to_string()));
    }
}
