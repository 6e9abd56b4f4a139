use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    models::{types::UtcDateTime, Submission, ValidationErrors},
    repository::{FeedbackStore, StoreError, StoreStatus},
    validation::validated_feedback,
};

pub const SAVED_MESSAGE: &str = "Feedback submitted successfully!";
pub const PENDING_MESSAGE: &str = "Feedback received! (Database connection pending)";
pub const LOGGED_MESSAGE: &str = "Feedback received! (Saved to logs)";

/// JSON envelope returned by `POST /submit`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Submission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitResponse {
    fn rejected(errors: ValidationErrors, data: Submission) -> SubmitResponse {
        SubmitResponse {
            success: false,
            errors: Some(errors),
            data: Some(data),
            message: None,
        }
    }

    fn accepted(message: &str) -> SubmitResponse {
        SubmitResponse {
            success: true,
            errors: None,
            data: None,
            message: Some(message.to_owned()),
        }
    }
}

/// Validates a submission and persists it.
///
/// Invalid submissions never reach the store. A valid submission is always
/// acknowledged: when the store is disconnected or the write fails, the
/// record is written to the logs instead and the message says so.
#[tracing::instrument(skip_all)]
pub async fn handle_submit(store: &dyn FeedbackStore, submission: Submission) -> SubmitResponse {
    let feedback = match validated_feedback(&submission, UtcDateTime::now()) {
        Ok(feedback) => feedback,
        Err(errors) => {
            debug!(?errors, "Submission failed validation");
            return SubmitResponse::rejected(errors, submission);
        }
    };

    if store.status().await == StoreStatus::Disconnected {
        warn!(?feedback, "Feedback received while the store is disconnected");
        return SubmitResponse::accepted(PENDING_MESSAGE);
    }

    match store.save(&feedback).await {
        Ok(saved) => {
            info!("Saved feedback {:?}", saved.id);
            SubmitResponse::accepted(SAVED_MESSAGE)
        }
        Err(StoreError::Unavailable) => {
            warn!(?feedback, "Store disconnected before the feedback was saved");
            SubmitResponse::accepted(PENDING_MESSAGE)
        }
        Err(err) => {
            error!(?feedback, "Could not save feedback: {err}");
            SubmitResponse::accepted(LOGGED_MESSAGE)
        }
    }
}
