use async_trait::async_trait;

use crate::document::DocumentError;

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Extract the full text of a document. Never returns partial text.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Extractor for plain-text documents.
///
/// The input must be valid UTF-8 (a leading byte-order mark is dropped) and
/// must not contain control characters other than whitespace and form feeds.
/// Binary formats are reported as unreadable rather than decoded lossily; PDFs
/// are handled by [`PdfExtractor`](crate::document::PdfExtractor).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[async_trait]
impl DocumentBackend for PlainTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        if bytes.starts_with(b"%PDF-") {
            return Err(DocumentError::Unreadable(
                "binary PDF content is not supported by the plain-text extractor".to_string(),
            ));
        }
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).map_err(|e| {
            DocumentError::Unreadable(format!("invalid UTF-8 at byte {}", e.valid_up_to()))
        })?;
        if let Some((pos, ch)) = text
            .char_indices()
            .find(|(_, c)| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\u{0C}'))
        {
            return Err(DocumentError::Unreadable(format!(
                "control character U+{:04X} at byte {pos}",
                ch as u32
            )));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn strips_bom() {
        let text = PlainTextExtractor.extract_text(b"\xEF\xBB\xBFhello").await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn rejects_invalid_utf8() {
        let err = PlainTextExtractor.extract_text(b"ab\xFFcd").await.unwrap_err();
        assert_eq!(err, DocumentError::Unreadable("invalid UTF-8 at byte 2".to_string()));
    }

    #[tokio::test]
    async fn rejects_nul_bytes() {
        assert!(PlainTextExtractor.extract_text(b"a\0b").await.is_err());
    }
}
