mod feedback;
mod submission;

pub mod types;

pub use feedback::{Feedback, FeedbackId, NewFeedback};
pub use submission::{Field, Submission, ValidationErrors};
