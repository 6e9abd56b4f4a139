use super::types::UtcDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeedbackId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub roll_no: String,
    pub branch: String,
    pub useful: String,
    pub rating: u8,
    pub suggestions: String,
    pub created_at: UtcDateTime,
}

/// A submission that passed validation, ready to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFeedback {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub roll_no: String,
    pub branch: String,
    pub useful: String,
    pub rating: u8,
    pub suggestions: String,
    pub created_at: UtcDateTime,
}
