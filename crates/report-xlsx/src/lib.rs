//! Styled spreadsheet rendering of extracted readings
//!
//! Fixed four-column layout: Date, Air Quality, Index Value, Prominent
//! Pollutant. The Air Quality cell is filled with the band color and the
//! text color is picked by luminance so dark fills get white text.

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, XlsxError};
use shared_types::AqiRecord;
use std::path::Path;
use thiserror::Error;

const COLUMNS: [&str; 4] = ["Date", "Air Quality", "Index Value", "Prominent Pollutant"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no records to report")]
    NoRecords,

    #[error("workbook error: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Render the report workbook to bytes.
pub fn render(
    records: &[AqiRecord],
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(records, city, start, end)?;
    Ok(workbook.save_to_buffer()?)
}

/// Render the report workbook straight to a file.
pub fn write_report(
    path: impl AsRef<Path>,
    records: &[AqiRecord],
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ReportError> {
    let mut workbook = build_workbook(records, city, start, end)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

fn build_workbook(
    records: &[AqiRecord],
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Workbook, ReportError> {
    if records.is_empty() {
        return Err(ReportError::NoRecords);
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Title across the four columns, blank row, then headers.
    let title = format!("{} AQI Information from {} to {}", city, start, end);
    let title_format = Format::new()
        .set_bold()
        .set_font_size(12)
        .set_align(FormatAlign::Center);
    worksheet.merge_range(0, 0, 0, 3, &title, &title_format)?;

    let header_format = Format::new().set_bold();
    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(2, col as u16, *header, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = 3 + i as u32;
        let fill = record.severity.color();
        let band_format = Format::new()
            .set_background_color(Color::RGB(fill))
            .set_font_color(foreground_for(fill));

        worksheet.write_string(row, 0, record.date.to_string())?;
        worksheet.write_string_with_format(row, 1, record.severity.label(), &band_format)?;
        worksheet.write_number(row, 2, f64::from(record.index_value))?;
        worksheet.write_string(row, 3, record.pollutant_summary())?;
    }

    for (col, width) in column_widths(records).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(workbook)
}

/// Black text on bright fills, white on dark, by the standard luminance
/// weighting (299R + 587G + 114B) / 1000 against a midpoint of 128.
fn foreground_for(rgb: u32) -> Color {
    let r = (rgb >> 16) & 0xFF;
    let g = (rgb >> 8) & 0xFF;
    let b = rgb & 0xFF;
    let brightness = (299 * r + 587 * g + 114 * b) / 1000;
    if brightness > 128 {
        Color::Black
    } else {
        Color::White
    }
}

/// Longest cell content per column, headers included, plus padding.
fn column_widths(records: &[AqiRecord]) -> [usize; 4] {
    let mut widths = [0usize; 4];
    for (col, header) in COLUMNS.iter().enumerate() {
        widths[col] = header.chars().count();
    }
    for record in records {
        let cells = [
            record.date.to_string(),
            record.severity.label().to_string(),
            record.index_value.to_string(),
            record.pollutant_summary(),
        ];
        for (col, cell) in cells.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }
    widths.map(|w| w + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{PollutantTag, SeverityBand};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_records() -> Vec<AqiRecord> {
        vec![
            AqiRecord {
                date: date(2024, 1, 1),
                city: "Delhi".to_string(),
                severity: SeverityBand::Moderate,
                index_value: 180,
                pollutants: vec![PollutantTag::Pm25],
            },
            AqiRecord {
                date: date(2024, 1, 2),
                city: "Delhi".to_string(),
                severity: SeverityBand::Severe,
                index_value: 455,
                pollutants: vec![PollutantTag::Pm25, PollutantTag::Co],
            },
        ]
    }

    #[test]
    fn test_render_produces_a_workbook() {
        let bytes = render(&sample_records(), "Delhi", date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        // xlsx is a zip container.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_records_are_rejected() {
        let result = render(&[], "Delhi", date(2024, 1, 1), date(2024, 1, 2));
        assert!(matches!(result, Err(ReportError::NoRecords)));
    }

    #[test]
    fn test_write_report_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Delhi_AQI.xlsx");
        write_report(&path, &sample_records(), "Delhi", date(2024, 1, 1), date(2024, 1, 2))
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_bright_fills_get_black_text() {
        assert_eq!(foreground_for(SeverityBand::Good.color()), Color::Black);
        assert_eq!(foreground_for(SeverityBand::Moderate.color()), Color::Black);
        assert_eq!(foreground_for(SeverityBand::Poor.color()), Color::Black);
    }

    #[test]
    fn test_dark_fills_get_white_text() {
        assert_eq!(foreground_for(SeverityBand::VeryPoor.color()), Color::White);
        assert_eq!(foreground_for(SeverityBand::Severe.color()), Color::White);
    }

    #[test]
    fn test_column_widths_cover_longest_content() {
        let widths = column_widths(&sample_records());
        // "Prominent Pollutant" header is 19 chars, longer than any cell.
        assert_eq!(widths[3], 21);
        // Dates are always 10 chars.
        assert_eq!(widths[0], 12);
    }
}
