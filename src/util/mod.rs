//! Small shared helpers used by the page controllers and the CLI.

pub mod format;
pub mod query;
pub mod timing;

pub use format::{format_date, format_number, parse_timestamp, DEFAULT_DATE_FORMAT};
pub use query::{build_query, parse_query};
pub use timing::{Debouncer, Gate, Throttle};
