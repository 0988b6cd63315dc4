use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    signup::{
        dto::{
            FieldErrorBody, SignupCreatedResponse, SignupForm, SinkFailureResponse,
            ValidationErrorResponse,
        },
        page::{self, Notice},
        record::{now_local, SignupRecord, DEGREE_OPTIONS},
        services::{success_message, validate, FieldError},
    },
    sink::SinkError,
    state::AppState,
};

pub const FAILURE_MESSAGE: &str = "Your application could not be saved. Please try again.";

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(show_form).post(submit_form))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/signups", axum::routing::post(create_signup))
        .route("/degrees", get(list_degrees))
}

/// Outcome of one submission, before it is rendered.
enum Submission {
    Invalid(Vec<FieldError>),
    Saved(SignupRecord),
    Failed(SinkError),
}

async fn process(state: &AppState, form: &SignupForm) -> Submission {
    let record = match validate(form, now_local()) {
        Ok(r) => r,
        Err(errors) => {
            let codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
            warn!(?codes, "signup rejected");
            return Submission::Invalid(errors);
        }
    };

    match state.sink.append(&record).await {
        Ok(()) => {
            info!(
                student_number = %record.student_number(),
                degree = %record.degree(),
                submitted_at = %record.submitted_at(),
                "signup saved"
            );
            Submission::Saved(record)
        }
        Err(e) => {
            error!(kind = ?e.kind(), error = %e, "signup write failed");
            Submission::Failed(e)
        }
    }
}

#[instrument(skip(state))]
pub async fn show_form(State(state): State<AppState>) -> Html<String> {
    Html(page::render(state.config.theme, &SignupForm::default(), &[]))
}

#[instrument(skip(state, form))]
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    let theme = state.config.theme;
    match process(&state, &form).await {
        Submission::Invalid(errors) => {
            let notices: Vec<Notice> = errors.iter().map(|e| Notice::Error(e.to_string())).collect();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(page::render(theme, &form, &notices)),
            )
                .into_response()
        }
        Submission::Saved(record) => {
            let notices = [Notice::Success(success_message(&record))];
            Html(page::render(theme, &SignupForm::default(), &notices)).into_response()
        }
        Submission::Failed(e) => {
            let notices = [
                Notice::Info(format!("{}: {}", state.sink.label(), e)),
                Notice::Error(FAILURE_MESSAGE.into()),
            ];
            (StatusCode::BAD_GATEWAY, Html(page::render(theme, &form, &notices))).into_response()
        }
    }
}

#[instrument(skip(state, form))]
pub async fn create_signup(State(state): State<AppState>, Json(form): Json<SignupForm>) -> Response {
    match process(&state, &form).await {
        Submission::Invalid(errors) => {
            let errors = errors
                .into_iter()
                .map(|e| FieldErrorBody {
                    code: e.code(),
                    message: e.to_string(),
                })
                .collect();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { errors }),
            )
                .into_response()
        }
        Submission::Saved(record) => (
            StatusCode::CREATED,
            Json(SignupCreatedResponse {
                message: success_message(&record),
                record,
            }),
        )
            .into_response(),
        Submission::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            Json(SinkFailureResponse {
                message: FAILURE_MESSAGE,
                detail: format!("{}: {}", state.sink.label(), e),
                kind: e.kind(),
            }),
        )
            .into_response(),
    }
}

pub async fn list_degrees() -> Json<Vec<&'static str>> {
    Json(DEGREE_OPTIONS.to_vec())
}
