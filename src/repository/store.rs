use async_trait::async_trait;
use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::models::{Feedback, NewFeedback};

use super::conversion::{DBFromConversionError, DBToConversionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
pub enum StoreStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store is not connected")]
    Unavailable,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Could not convert a value for the database: {0}")]
    ToConversion(#[from] DBToConversionError),
    #[error("Could not read a value from the database: {0}")]
    FromConversion(#[from] DBFromConversionError),
}

/// Persistence collaborator of the submission handler.
///
/// `status` reports whether the backing database is reachable; handlers use
/// it to pick the log-only path without attempting a write.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn status(&self) -> StoreStatus;

    async fn save(&self, feedback: &NewFeedback) -> Result<Feedback, StoreError>;
}
