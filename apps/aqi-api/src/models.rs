//! Request and response types for the AQI API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::AqiRecord;

/// Query for one city's readings over an inclusive date range.
/// Dates are `YYYY-MM-DD` strings, validated before any fetch work.
#[derive(Debug, Clone, Deserialize)]
pub struct AqiQueryRequest {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AqiQueryResponse {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub records: Vec<AqiRecord>,
}
