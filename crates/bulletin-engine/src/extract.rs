//! Best-effort pattern extraction of a city's reading from bulletin text
//!
//! Bulletin PDFs render their city tables as loosely formatted text, so
//! this is keyword scanning over short windows of lines, not parsing. A
//! window is the line mentioning the city plus up to three lines after
//! it; the first window that yields both a severity band and an index
//! value wins.

use regex::Regex;
use shared_types::{PollutantTag, SeverityBand};

/// Lines after the city mention included in a search window.
const WINDOW_FOLLOW_LINES: usize = 3;

/// Values outside this range are never AQI readings (stray years, serial
/// numbers, station counts).
const INDEX_RANGE: std::ops::RangeInclusive<u16> = 50..=500;

/// A city's reading found in one search window, not yet date-stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityReading {
    pub severity: SeverityBand,
    pub index_value: u16,
    pub pollutants: Vec<PollutantTag>,
}

/// Scan one page of bulletin text for `city`'s reading.
///
/// City matching is case-insensitive; a city whose name is a substring of
/// another ("Delhi" in "New Delhi") can match the wrong row, which is
/// accepted best-effort behavior. Returns `None` when no window on the
/// page completes.
pub fn extract(page_text: &str, city: &str) -> Option<CityReading> {
    let city_lower = city.to_lowercase();
    let lines: Vec<&str> = page_text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains(&city_lower) {
            continue;
        }

        let window = build_window(&lines, i);
        tracing::debug!(line = i, window = %window, "analyzing city mention");

        let severity = find_severity(&window);
        let index_value = find_index_value(&window);

        if let (Some(severity), Some(index_value)) = (severity, index_value) {
            return Some(CityReading {
                severity,
                index_value,
                pollutants: find_pollutants(&window),
            });
        }
        // Incomplete window; a later mention may still complete.
    }

    None
}

/// Join the mention line with up to `WINDOW_FOLLOW_LINES` lines after it,
/// trimmed and single-space separated.
fn build_window(lines: &[&str], start: usize) -> String {
    let end = (start + WINDOW_FOLLOW_LINES + 1).min(lines.len());
    lines[start..end]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First band label found in scan order. The order is first-match-wins:
/// "Poor" precedes and matches inside "Very Poor".
fn find_severity(window: &str) -> Option<SeverityBand> {
    SeverityBand::SCAN_ORDER
        .into_iter()
        .find(|band| window.contains(band.label()))
}

/// First maximal 2-3 digit run whose value lies in `INDEX_RANGE`.
/// Out-of-range runs are skipped without affecting later candidates.
fn find_index_value(window: &str) -> Option<u16> {
    let re = Regex::new(r"\b(\d{2,3})\b").unwrap();
    let result = re
        .captures_iter(window)
        .filter_map(|cap| cap[1].parse::<u16>().ok())
        .find(|value| INDEX_RANGE.contains(value));
    result
}

/// Collect every pollutant token present in the window, in scan order.
/// Whitespace is stripped first so split tokens like "PM 2.5" still hit.
fn find_pollutants(window: &str) -> Vec<PollutantTag> {
    let compact: String = window.chars().filter(|c| !c.is_whitespace()).collect();

    PollutantTag::SCAN_ORDER
        .into_iter()
        .filter(|tag| match tag {
            PollutantTag::Co => contains_bare_co(&compact),
            _ => compact.contains(tag.token()),
        })
        .collect()
}

/// "CO" counts only when not embedded in a longer alphabetic run, so hits
/// inside words like "CONDITION" are rejected while "NO2 CO" (compacted
/// to "NO2CO") still matches.
fn contains_bare_co(compact: &str) -> bool {
    let bytes = compact.as_bytes();
    compact.match_indices("CO").any(|(pos, _)| {
        let letter_before = pos
            .checked_sub(1)
            .is_some_and(|p| bytes[p].is_ascii_alphabetic());
        let letter_after = bytes
            .get(pos + 2)
            .is_some_and(|b| b.is_ascii_alphabetic());
        !letter_before && !letter_after
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_band_and_index_from_single_window() {
        let text = "Delhi Moderate 180 PM2.5";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Moderate);
        assert_eq!(reading.index_value, 180);
        assert_eq!(reading.pollutants, vec![PollutantTag::Pm25]);
    }

    #[test]
    fn test_city_match_is_case_insensitive() {
        let text = "DELHI Satisfactory 95";
        let reading = extract(text, "delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Satisfactory);
    }

    #[test]
    fn test_window_spans_following_lines() {
        let text = "Delhi\n42 stations\nModerate\n165";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Moderate);
        assert_eq!(reading.index_value, 165);
    }

    #[test]
    fn test_window_stops_after_three_following_lines() {
        // Band and value sit on the 4th line after the mention, outside
        // the window.
        let text = "Delhi\n-\n-\n-\nModerate 165";
        assert_eq!(extract(text, "Delhi"), None);
    }

    #[test]
    fn test_out_of_range_number_is_skipped_for_in_range_one() {
        let text = "Delhi Poor 42 310";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.index_value, 310);

        let text = "Delhi Poor 999 88";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.index_value, 88);
    }

    #[test]
    fn test_four_digit_runs_are_not_index_candidates() {
        // "2024" is a maximal 4-digit run, not a 2-3 digit candidate.
        let text = "Delhi 2024 Severe 450";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.index_value, 450);
    }

    #[test]
    fn test_first_band_in_scan_order_wins() {
        // Both "Moderate" and "Poor" present; declared order picks Moderate.
        let text = "Delhi Moderate to Poor 210";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Moderate);
    }

    #[test]
    fn test_very_poor_classifies_as_poor_by_scan_order() {
        // "Poor" matches as a substring of "Very Poor" first. Deliberate.
        let text = "Delhi Very Poor 330";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Poor);
    }

    #[test]
    fn test_band_match_is_case_sensitive() {
        let text = "Delhi MODERATE 180";
        assert_eq!(extract(text, "Delhi"), None);
    }

    #[test]
    fn test_no_city_mention_returns_none() {
        let text = "Mumbai Moderate 180\nKolkata Poor 250";
        assert_eq!(extract(text, "Delhi"), None);
    }

    #[test]
    fn test_incomplete_first_mention_falls_through_to_second() {
        // First mention has a band but no in-range value; second window
        // must supply the whole reading, not merge with the first.
        let text = "Delhi Moderate\n\n\n\nDelhi Satisfactory 95 PM10";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Satisfactory);
        assert_eq!(reading.index_value, 95);
        assert_eq!(reading.pollutants, vec![PollutantTag::Pm10]);
    }

    #[test]
    fn test_all_present_pollutants_collected_in_order() {
        let text = "Delhi Poor 280 SO2 PM2.5 O3";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(
            reading.pollutants,
            vec![PollutantTag::Pm25, PollutantTag::O3, PollutantTag::So2]
        );
    }

    #[test]
    fn test_split_pollutant_tokens_still_detected() {
        let text = "Delhi Poor 280 PM 2.5 and PM 10";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(
            reading.pollutants,
            vec![PollutantTag::Pm25, PollutantTag::Pm10]
        );
    }

    #[test]
    fn test_so2_and_no2_do_not_leak_into_co() {
        let text = "Delhi Moderate 160 SO2 NO2";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(
            reading.pollutants,
            vec![PollutantTag::No2, PollutantTag::So2]
        );
        assert!(!reading.pollutants.contains(&PollutantTag::Co));
    }

    #[test]
    fn test_co_not_detected_inside_words() {
        let text = "Delhi Moderate 160 CONDITION RECORD";
        let reading = extract(text, "Delhi").unwrap();
        assert!(reading.pollutants.is_empty());
    }

    #[test]
    fn test_bare_co_next_to_other_tokens_detected() {
        let text = "Delhi Moderate 160 NO2 CO";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(
            reading.pollutants,
            vec![PollutantTag::No2, PollutantTag::Co]
        );
    }

    #[test]
    fn test_pollutants_may_be_empty() {
        let text = "Delhi Good 55";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Good);
        assert!(reading.pollutants.is_empty());
    }

    #[test]
    fn test_band_without_value_is_no_match() {
        let text = "Delhi Moderate";
        assert_eq!(extract(text, "Delhi"), None);
    }

    #[test]
    fn test_value_without_band_is_no_match() {
        let text = "Delhi 180";
        assert_eq!(extract(text, "Delhi"), None);
    }

    #[test]
    fn test_substring_city_matches_containing_name() {
        // Accepted false positive: "Delhi" matches inside "New Delhi".
        let text = "New Delhi Severe 460 PM2.5";
        let reading = extract(text, "Delhi").unwrap();
        assert_eq!(reading.severity, SeverityBand::Severe);
    }
}
