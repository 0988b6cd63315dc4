use serde::{Deserialize, Serialize};

use crate::signup::record::SignupRecord;
use crate::sink::SinkErrorKind;

/// Raw form submission, exactly as typed by the visitor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub student_number: String,
    #[serde(default)]
    pub social_handle: String,
    #[serde(default)]
    pub degree_choice: String,
    #[serde(default)]
    pub other_degree_text: String,
}

#[derive(Debug, Serialize)]
pub struct FieldErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct SignupCreatedResponse {
    pub message: String,
    pub record: SignupRecord,
}

#[derive(Debug, Serialize)]
pub struct SinkFailureResponse {
    pub message: &'static str,
    pub detail: String,
    pub kind: SinkErrorKind,
}
