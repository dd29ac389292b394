//! PDF bulletin decoding
//!
//! Turns raw bulletin bytes into ordered page texts for the scan engine.
//! pdf-extract does not expose page boundaries directly, so pages are
//! split on the form feed characters it emits between pages, with the
//! whole text treated as a single page when none are present.

use bulletin_engine::{DecodeError, PageDecoder};
use pdf_extract::extract_text_from_mem;

/// Minimum non-whitespace characters for a bulletin to count as text.
/// Below this the PDF is almost certainly scanned imagery.
const MIN_TEXT_CHARS: usize = 20;

/// `PageDecoder` over PDF bytes.
#[derive(Debug, Default)]
pub struct PdfDecoder;

impl PdfDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PageDecoder for PdfDecoder {
    fn pages_of(&self, bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
        let raw_text = extract_text_from_mem(bytes)
            .map_err(|e| DecodeError::Unreadable(e.to_string()))?;

        let non_whitespace = raw_text.chars().filter(|c| !c.is_whitespace()).count();
        if non_whitespace < MIN_TEXT_CHARS {
            tracing::debug!(chars = non_whitespace, "bulletin has no usable text layer");
            return Err(DecodeError::NoText);
        }

        let pages: Vec<String> = raw_text
            .split('\x0C')
            .filter(|page| !page.trim().is_empty())
            .map(str::to_string)
            .collect();

        if pages.is_empty() {
            return Err(DecodeError::NoText);
        }

        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let decoder = PdfDecoder::new();
        assert!(decoder.pages_of(b"not a pdf at all").is_err());
    }

    #[test]
    fn test_empty_input_is_unreadable() {
        let decoder = PdfDecoder::new();
        assert!(decoder.pages_of(&[]).is_err());
    }
}
