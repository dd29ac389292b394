//! Application state for the AQI API

use anyhow::Result;
use bulletin_fetch::BulletinFetcher;
use bulletin_pdf::PdfDecoder;

pub struct AppState {
    pub fetcher: BulletinFetcher,
    pub decoder: PdfDecoder,
}

impl AppState {
    pub fn from_env() -> Result<Self> {
        let cache_dir =
            std::env::var("AQI_CACHE_DIR").unwrap_or_else(|_| "aqi_bulletins".to_string());
        tracing::info!("Caching bulletins in: {}", cache_dir);

        let mut fetcher = BulletinFetcher::new(&cache_dir)?;
        if let Ok(base_url) = std::env::var("AQI_BASE_URL") {
            fetcher = fetcher.with_base_url(base_url);
        }

        Ok(Self {
            fetcher,
            decoder: PdfDecoder::new(),
        })
    }
}
