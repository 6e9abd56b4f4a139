use lazy_regex::{regex_captures, regex_is_match};

use crate::models::{
    types::{TrimmedString, UtcDateTime},
    Field, NewFeedback, Submission, ValidationErrors,
};

pub const FULL_NAME_REQUIRED: &str = "Full Name is required";
pub const FULL_NAME_INVALID: &str = "Full Name must contain only alphabets and spaces";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PHONE_REQUIRED: &str = "Contact Number is required";
pub const PHONE_INVALID: &str = "Contact Number must be exactly 10 digits";
pub const ROLL_NO_REQUIRED: &str = "Roll Number is required";
pub const BRANCH_REQUIRED: &str = "Branch is required";
pub const USEFUL_REQUIRED: &str = "Please select if the course was useful";
pub const RATING_REQUIRED: &str = "Rating is required";
pub const RATING_INVALID: &str = "Rating must be between 1 and 5";

/// Checks every field of the submission independently.
///
/// Returns one message per failing field. An empty result means the
/// submission may be persisted.
pub fn validate(submission: &Submission) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let full_name = TrimmedString::from_optional(submission.full_name.as_deref());
    if full_name.is_empty() {
        errors.insert(Field::FullName, FULL_NAME_REQUIRED);
    } else if !regex_is_match!(r"^[a-zA-Z\s]+$", full_name.as_ref()) {
        errors.insert(Field::FullName, FULL_NAME_INVALID);
    }

    let email = TrimmedString::from_optional(submission.email.as_deref());
    if email.is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", email.as_ref()) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }

    let phone = TrimmedString::from_optional(submission.phone.as_deref());
    if phone.is_empty() {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    } else if !regex_is_match!(r"^[0-9]{10}$", phone.as_ref()) {
        errors.insert(Field::Phone, PHONE_INVALID);
    }

    if TrimmedString::from_optional(submission.roll_no.as_deref()).is_empty() {
        errors.insert(Field::RollNo, ROLL_NO_REQUIRED);
    }

    if !is_present(&submission.branch) {
        errors.insert(Field::Branch, BRANCH_REQUIRED);
    }

    if !is_present(&submission.useful) {
        errors.insert(Field::Useful, USEFUL_REQUIRED);
    }

    match submission.rating.as_deref() {
        None | Some("") => errors.insert(Field::Rating, RATING_REQUIRED),
        Some(rating) if parse_rating(rating).is_none() => {
            errors.insert(Field::Rating, RATING_INVALID)
        }
        Some(_) => (),
    }

    errors
}

/// Validates the submission and converts it into a record stamped with
/// `created_at`. Text values are stored trimmed.
pub fn validated_feedback(
    submission: &Submission,
    created_at: UtcDateTime,
) -> Result<NewFeedback, ValidationErrors> {
    let errors = validate(submission);
    if !errors.is_empty() {
        return Err(errors);
    }

    let rating = submission
        .rating
        .as_deref()
        .and_then(parse_rating)
        .ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.insert(Field::Rating, RATING_INVALID);
            errors
        })?;

    let trimmed =
        |value: &Option<String>| String::from(TrimmedString::from_optional(value.as_deref()));

    Ok(NewFeedback {
        full_name: trimmed(&submission.full_name),
        email: trimmed(&submission.email),
        phone: trimmed(&submission.phone),
        roll_no: trimmed(&submission.roll_no),
        branch: trimmed(&submission.branch),
        useful: trimmed(&submission.useful),
        rating,
        suggestions: trimmed(&submission.suggestions),
        created_at,
    })
}

/// Branch and usefulness are select inputs: any non-empty value counts.
fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|value| !value.is_empty())
}

/// A rating is a single digit from 1 to 5, without surrounding whitespace.
fn parse_rating(rating: &str) -> Option<u8> {
    let (_whole, digit) = regex_captures!(r"^([1-5])$", rating)?;
    digit.parse().ok()
}
