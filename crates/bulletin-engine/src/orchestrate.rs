//! Drives the extraction scan across a date range.

use chrono::NaiveDate;
use shared_types::AqiRecord;

use crate::extract::{self, CityReading};
use crate::source::{BulletinSource, PageDecoder};

/// Scan every date in `start..=end` (ascending) and accumulate one record
/// per date that yields a complete reading.
///
/// Per-date failures — absent document, undecodable bytes, no match on
/// any page — are absorbed as skips; dates with no reading are simply
/// missing from the output, never represented as placeholders. The
/// result is strictly ascending by date.
pub async fn collect<S, D>(
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
    source: &S,
    decoder: &D,
) -> Vec<AqiRecord>
where
    S: BulletinSource + ?Sized,
    D: PageDecoder + ?Sized,
{
    let mut records = Vec::new();
    let mut date = start;

    while date <= end {
        if let Some(reading) = scan_date(city, date, source, decoder).await {
            tracing::debug!(%date, index = reading.index_value, "extracted reading");
            records.push(AqiRecord {
                date,
                city: city.to_string(),
                severity: reading.severity,
                index_value: reading.index_value,
                pollutants: reading.pollutants,
            });
        }

        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    records
}

/// One date: fetch, decode, scan pages in order, stop at the first page
/// that completes.
async fn scan_date<S, D>(
    city: &str,
    date: NaiveDate,
    source: &S,
    decoder: &D,
) -> Option<CityReading>
where
    S: BulletinSource + ?Sized,
    D: PageDecoder + ?Sized,
{
    let Some(bytes) = source.fetch_or_cached(date).await else {
        tracing::debug!(%date, "no bulletin available, skipping");
        return None;
    };

    let pages = match decoder.pages_of(&bytes) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!(%date, error = %e, "bulletin unreadable, skipping");
            return None;
        }
    };

    pages.iter().find_map(|page| extract::extract(page, city))
}
