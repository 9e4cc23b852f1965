pub mod csv_line;
pub mod models;
pub mod normalizer;
pub mod odds;
pub mod sport;

pub use csv_line::tokenize_line;
pub use models::{MatchRecord, Sport};
pub use normalizer::{normalize, normalize_with_policy, normalize_with_report, ParseReport, SkipReason};
pub use odds::OddsPolicy;
pub use sport::classify_sport;
