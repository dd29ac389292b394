//! HTTP handlers for the AQI API

use axum::{extract::State, Json};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{AqiQueryRequest, AqiQueryResponse};
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Fetch and scan a city's readings over a date range.
///
/// Validation failures are rejected before any fetch work; a range that
/// scans clean returns 404 rather than an empty list.
pub async fn query_aqi(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AqiQueryRequest>,
) -> Result<Json<AqiQueryResponse>, ApiError> {
    let (city, start, end) = validate_query(&req)?;

    // Make sure the range is cached, then scan it. Per-date failures are
    // skips, not errors.
    let summary = state.fetcher.download_range(start, end).await;
    tracing::info!(
        fetched = summary.fetched,
        skipped = summary.skipped,
        "bulletin range ready"
    );

    let records =
        bulletin_engine::collect(&city, start, end, &state.fetcher, &state.decoder).await;

    if records.is_empty() {
        return Err(ApiError::NoData { city });
    }

    tracing::info!(%city, count = records.len(), "scan complete");

    Ok(Json(AqiQueryResponse {
        city,
        start_date: start,
        end_date: end,
        records,
    }))
}

/// Reject malformed requests before any fetch or scan work starts.
fn validate_query(req: &AqiQueryRequest) -> Result<(String, NaiveDate, NaiveDate), ApiError> {
    let city = req.city.trim();
    if city.is_empty() {
        return Err(ApiError::InvalidRequest("city is required".to_string()));
    }

    let start = parse_date(&req.start_date)?;
    let end = parse_date(&req.end_date)?;
    if end < start {
        return Err(ApiError::InvalidRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }

    Ok((city.to_string(), start, end))
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::InvalidRequest(format!("invalid date {:?}, expected YYYY-MM-DD", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(city: &str, start: &str, end: &str) -> AqiQueryRequest {
        AqiQueryRequest {
            city: city.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn test_valid_query_passes() {
        let (city, start, end) =
            validate_query(&request("Delhi", "2024-01-01", "2024-01-03")).unwrap();
        assert_eq!(city, "Delhi");
        assert!(start < end);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = validate_query(&request("Delhi", "2024-02-10", "2024-02-01"));
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let result = validate_query(&request("Delhi", "01-01-2024", "2024-01-03"));
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_blank_city_is_rejected() {
        let result = validate_query(&request("   ", "2024-01-01", "2024-01-03"));
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_city_is_trimmed() {
        let (city, _, _) =
            validate_query(&request("  Delhi ", "2024-01-01", "2024-01-03")).unwrap();
        assert_eq!(city, "Delhi");
    }
}
