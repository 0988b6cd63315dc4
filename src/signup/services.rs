use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use time::OffsetDateTime;

use crate::signup::dto::SignupForm;
use crate::signup::record::{SignupRecord, DEGREE_OPTIONS, OTHER_DEGREE};

/// A problem with one submitted field. `Display` is the message shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Missing Full Name.")]
    MissingName,
    #[error("Student Number must be 8 digits.")]
    InvalidStudentNumber,
    #[error("Missing Facebook handle.")]
    MissingHandle,
    #[error("Please select a degree from the list.")]
    InvalidDegree,
    #[error("Please specify the 'Other' degree.")]
    MissingOtherDegree,
}

impl FieldError {
    pub fn code(self) -> &'static str {
        match self {
            FieldError::MissingName => "missing_name",
            FieldError::InvalidStudentNumber => "invalid_student_number",
            FieldError::MissingHandle => "missing_handle",
            FieldError::InvalidDegree => "invalid_degree",
            FieldError::MissingOtherDegree => "missing_other_degree",
        }
    }
}

pub(crate) fn is_valid_student_number(s: &str) -> bool {
    lazy_static! {
        static ref STUDENT_NUMBER_RE: Regex = Regex::new(r"^[0-9]{8}$").unwrap();
    }
    STUDENT_NUMBER_RE.is_match(s)
}

/// Check every field and either build a record stamped with `now` or return
/// all problems found, in field order.
pub fn validate(form: &SignupForm, now: OffsetDateTime) -> Result<SignupRecord, Vec<FieldError>> {
    let mut errors = Vec::new();

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        errors.push(FieldError::MissingName);
    }

    let student_number = form.student_number.trim();
    if !is_valid_student_number(student_number) {
        errors.push(FieldError::InvalidStudentNumber);
    }

    let social_handle = form.social_handle.trim();
    if social_handle.is_empty() {
        errors.push(FieldError::MissingHandle);
    }

    let degree = if form.degree_choice == OTHER_DEGREE {
        let other = form.other_degree_text.trim();
        if other.is_empty() {
            errors.push(FieldError::MissingOtherDegree);
        }
        other
    } else {
        if !DEGREE_OPTIONS.contains(&form.degree_choice.as_str()) {
            errors.push(FieldError::InvalidDegree);
        }
        form.degree_choice.as_str()
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SignupRecord::new(
        full_name.to_string(),
        student_number.to_string(),
        social_handle.to_string(),
        degree.to_string(),
        now,
    ))
}

pub fn success_message(record: &SignupRecord) -> String {
    format!("Success! {} has been added to the database.", record.full_name())
}
