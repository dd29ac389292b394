//! Scans bulletin page text for a city's air-quality reading and drives
//! that scan across a date range.

pub mod extract;
pub mod orchestrate;
pub mod source;

pub use extract::{extract, CityReading};
pub use orchestrate::collect;
pub use source::{BulletinSource, DecodeError, PageDecoder};
