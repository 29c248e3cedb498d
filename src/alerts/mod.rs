//! Upstream alert records and the sources that fetch them

pub mod model;
pub mod source;

pub use model::{decode_alerts, AlertRecord, AlertStatus, LabelKey, UNKNOWN_LABEL};
pub use source::{AlertSource, FetchError, HttpAlertSource};
