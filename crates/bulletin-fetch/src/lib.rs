//! Bulletin download and on-disk cache
//!
//! Bulletins are published as `AQI_Bulletin_<YYYYMMDD>.pdf` under a fixed
//! downloads path. Successfully fetched bytes are persisted keyed by date
//! so repeat runs never re-download, and a failed transfer leaves no
//! truncated artifact behind.

use std::path::PathBuf;

use async_trait::async_trait;
use bulletin_engine::BulletinSource;
use chrono::NaiveDate;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// CPCB downloads path the daily bulletins are published under.
pub const DEFAULT_BASE_URL: &str = "https://cpcb.nic.in/upload/Downloads";

/// Content types the portal serves bulletins with.
const PDF_CONTENT_TYPES: &[&str] = &["application/pdf", "binary/octet-stream"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no bulletin published for {date}")]
    NotPublished { date: NaiveDate },

    #[error("unexpected content type {content_type:?} for {date}")]
    NotAPdf { date: NaiveDate, content_type: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cache io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Canonical resource name for a date's bulletin.
pub fn bulletin_filename(date: NaiveDate) -> String {
    format!("AQI_Bulletin_{}.pdf", date.format("%Y%m%d"))
}

/// Outcome counters for a range download, cache hits counted as fetched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RangeSummary {
    pub fetched: usize,
    pub skipped: usize,
}

/// Downloads bulletins and caches them on disk keyed by date.
pub struct BulletinFetcher {
    client: reqwest::Client,
    base_url: String,
    cache_dir: PathBuf,
}

impl BulletinFetcher {
    /// Create a fetcher caching into `cache_dir`, creating it if needed.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Where a date's bulletin lives (or would live) in the cache.
    pub fn cached_path(&self, date: NaiveDate) -> PathBuf {
        self.cache_dir.join(bulletin_filename(date))
    }

    /// Return a date's bulletin bytes, downloading only on a cache miss.
    pub async fn download(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError> {
        let path = self.cached_path(date);
        if path.exists() {
            tracing::debug!(%date, "bulletin already cached");
            return Ok(tokio::fs::read(&path).await?);
        }

        let url = format!("{}/{}", self.base_url, bulletin_filename(date));
        let mut response = self.client.get(&url).send().await?;

        // The portal intermittently 404s bulletins that exist; give the
        // canonical name one more try before declaring the date absent.
        if !response.status().is_success() {
            response = self.client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(FetchError::NotPublished { date });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if !PDF_CONTENT_TYPES.iter().any(|t| content_type.contains(t)) {
            return Err(FetchError::NotAPdf { date, content_type });
        }

        let bytes = response.bytes().await?;
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            // No truncated artifact may remain cached.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e.into());
        }

        tracing::info!(%date, bytes = bytes.len(), "downloaded bulletin");
        Ok(bytes.to_vec())
    }

    /// Download every date in `start..=end`, returning summary counters.
    /// Individual failures are logged and counted, never fatal.
    pub async fn download_range(&self, start: NaiveDate, end: NaiveDate) -> RangeSummary {
        let mut summary = RangeSummary::default();
        let mut date = start;

        while date <= end {
            match self.download(date).await {
                Ok(_) => summary.fetched += 1,
                Err(e) => {
                    tracing::warn!(%date, error = %e, "bulletin unavailable");
                    summary.skipped += 1;
                }
            }
            let Some(next) = date.succ_opt() else { break };
            date = next;
        }

        summary
    }
}

#[async_trait]
impl BulletinSource for BulletinFetcher {
    async fn fetch_or_cached(&self, date: NaiveDate) -> Option<Vec<u8>> {
        match self.download(date).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(%date, error = %e, "fetch failed, treating as absent");
                None
            }
        }
    }
}

/// Read-only source over a directory of already-downloaded bulletins.
/// Never touches the network; missing files are plain absences.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BulletinSource for DirSource {
    async fn fetch_or_cached(&self, date: NaiveDate) -> Option<Vec<u8>> {
        tokio::fs::read(self.dir.join(bulletin_filename(date))).await.ok()
    }
}
