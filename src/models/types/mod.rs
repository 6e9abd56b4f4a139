mod trimmed_string;
mod utc_datetime;

pub use trimmed_string::TrimmedString;
pub use utc_datetime::UtcDateTime;
