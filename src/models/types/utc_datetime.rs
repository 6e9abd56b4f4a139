use std::fmt::Display;

use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcDateTime(PrimitiveDateTime);

impl UtcDateTime {
    pub fn now() -> UtcDateTime {
        UtcDateTime::from(OffsetDateTime::now_utc())
    }

    pub fn assume_utc(datetime: PrimitiveDateTime) -> UtcDateTime {
        UtcDateTime(datetime)
    }
}

impl From<OffsetDateTime> for UtcDateTime {
    fn from(value: OffsetDateTime) -> Self {
        let value_utc = value.to_offset(UtcOffset::UTC);
        UtcDateTime(PrimitiveDateTime::new(value_utc.date(), value_utc.time()))
    }
}

impl From<UtcDateTime> for OffsetDateTime {
    fn from(value: UtcDateTime) -> Self {
        value.0.assume_utc()
    }
}

/// Formats as RFC 3339, e.g. `2024-10-15T12:00:00.5Z`.
impl Display for UtcDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted = OffsetDateTime::from(*self)
            .format(&Rfc3339)
            .map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}
