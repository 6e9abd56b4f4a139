use thiserror::Error;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::models::{types::UtcDateTime, FeedbackId};

pub trait DBConvertible: Sized {
    type DBType;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError>;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Failed to parse datetime: {0}")]
    DateTime(#[from] time::error::Parse),
    #[error("Invalid number: {0}")]
    InvalidNumber(i64),
}

#[derive(Debug, Error)]
pub enum DBToConversionError {
    #[error("Failed to format datetime")]
    DateTime(#[from] time::error::Format),
}

impl DBConvertible for UtcDateTime {
    type DBType = String;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        let string = OffsetDateTime::from(*self).format(&Iso8601::DEFAULT)?;
        Ok(string)
    }

    fn from_db(db_value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let datetime = OffsetDateTime::parse(db_value, &Iso8601::DEFAULT)?;
        Ok(UtcDateTime::from(datetime))
    }
}

impl DBConvertible for FeedbackId {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.0 as _)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u64::try_from(*value)
            .map(FeedbackId)
            .map_err(|_| DBFromConversionError::InvalidNumber(*value))
    }
}

impl DBConvertible for u8 {
    type DBType = i64;

    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(*self as _)
    }

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u8::try_from(*value).map_err(|_| DBFromConversionError::InvalidNumber(*value))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{DBConvertible, DBFromConversionError};
    use crate::models::{types::UtcDateTime, FeedbackId};

    #[test]
    fn datetime_survives_database_text() {
        let created_at = UtcDateTime::assume_utc(datetime!(2024-10-15 12:34:56.789));
        let stored = created_at.to_db().unwrap();

        assert_eq!(UtcDateTime::from_db(&stored).unwrap(), created_at);
    }

    #[test]
    fn negative_id_is_rejected() {
        assert!(matches!(
            FeedbackId::from_db(&-1),
            Err(DBFromConversionError::InvalidNumber(-1))
        ));
    }

    #[test]
    fn oversized_rating_is_rejected() {
        assert!(matches!(
            u8::from_db(&300),
            Err(DBFromConversionError::InvalidNumber(300))
        ));
    }
}
