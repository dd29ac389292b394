pub mod types;

pub use types::{AqiRecord, PollutantTag, SeverityBand};
