//! Collaborator seams for the range orchestrator.
//!
//! The engine stays agnostic of how bulletin bytes are obtained and how
//! they turn into page text; implementations live in `bulletin-fetch`
//! and `bulletin-pdf`.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// A date's document could not be read as pages. The orchestrator treats
/// this the same as the document being absent.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("document decode failed: {0}")]
    Unreadable(String),

    #[error("document contains no extractable text")]
    NoText,
}

/// Supplies bulletin bytes keyed by date.
///
/// `None` covers not-published, fetch failure, and timeout alike; the
/// caller skips the date either way. Implementations must be idempotent:
/// a second call for an already-obtained date returns the same bytes
/// without a new network operation.
#[async_trait]
pub trait BulletinSource: Send + Sync {
    async fn fetch_or_cached(&self, date: NaiveDate) -> Option<Vec<u8>>;
}

/// Turns raw document bytes into ordered page texts.
pub trait PageDecoder: Send + Sync {
    fn pages_of(&self, bytes: &[u8]) -> Result<Vec<String>, DecodeError>;
}
