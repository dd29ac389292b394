use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Air-quality severity band as printed in the daily bulletins.
///
/// `SCAN_ORDER` is the order the extraction engine tries the labels in,
/// first literal match wins. The order is load-bearing: "Poor" precedes
/// "Very Poor" and matches inside it, so a bulletin line reading
/// "Very Poor" classifies as `Poor`. That mirrors the published
/// bulletins' own precedence and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    VeryPoor,
    Severe,
}

impl SeverityBand {
    pub const SCAN_ORDER: [SeverityBand; 6] = [
        SeverityBand::Good,
        SeverityBand::Satisfactory,
        SeverityBand::Moderate,
        SeverityBand::Poor,
        SeverityBand::VeryPoor,
        SeverityBand::Severe,
    ];

    /// Display label, exactly as it appears in bulletin text.
    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Good => "Good",
            SeverityBand::Satisfactory => "Satisfactory",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::Poor => "Poor",
            SeverityBand::VeryPoor => "Very Poor",
            SeverityBand::Severe => "Severe",
        }
    }

    /// Fixed RGB fill color used in the rendered report.
    pub fn color(&self) -> u32 {
        match self {
            SeverityBand::Good => 0x00FF00,
            SeverityBand::Satisfactory => 0x90EE90,
            SeverityBand::Moderate => 0xFFFF00,
            SeverityBand::Poor => 0xFFA500,
            SeverityBand::VeryPoor => 0xFF0000,
            SeverityBand::Severe => 0x800080,
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Prominent pollutant flagged in a bulletin entry.
///
/// `token()` is the literal searched for in de-whitespaced bulletin text;
/// `symbol()` is the subscripted display form used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollutantTag {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl PollutantTag {
    pub const SCAN_ORDER: [PollutantTag; 6] = [
        PollutantTag::Pm25,
        PollutantTag::Pm10,
        PollutantTag::O3,
        PollutantTag::No2,
        PollutantTag::So2,
        PollutantTag::Co,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            PollutantTag::Pm25 => "PM2.5",
            PollutantTag::Pm10 => "PM10",
            PollutantTag::O3 => "O3",
            PollutantTag::No2 => "NO2",
            PollutantTag::So2 => "SO2",
            PollutantTag::Co => "CO",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            PollutantTag::Pm25 => "PM₂.₅",
            PollutantTag::Pm10 => "PM₁₀",
            PollutantTag::O3 => "O₃",
            PollutantTag::No2 => "NO₂",
            PollutantTag::So2 => "SO₂",
            PollutantTag::Co => "CO",
        }
    }
}

impl std::fmt::Display for PollutantTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One extracted observation: a city's reading for one bulletin date.
///
/// Only materialized when both the severity band and the index value were
/// found in the same search window; pollutants may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiRecord {
    pub date: NaiveDate,
    pub city: String,
    pub severity: SeverityBand,
    /// Air-quality index, always within [50, 500].
    pub index_value: u16,
    pub pollutants: Vec<PollutantTag>,
}

impl AqiRecord {
    /// Comma-joined pollutant symbols for display, e.g. "PM₂.₅, NO₂".
    pub fn pollutant_summary(&self) -> String {
        self.pollutants
            .iter()
            .map(|p| p.symbol())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
