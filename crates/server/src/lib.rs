use api_types::error::{ErrorMessage, FieldError, ValidationErrors};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{app, run_with_listener};

mod health;
mod loans;
mod server;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Overflow(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Overflow(message) => {
            tracing::error!("arithmetic overflow: {message}");
            message
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(EngineError::Validation(issues)) => {
                let errors = issues
                    .into_iter()
                    .map(|issue| FieldError {
                        field: issue.field,
                        message: issue.message,
                    })
                    .collect();
                (StatusCode::BAD_REQUEST, Json(ValidationErrors { errors })).into_response()
            }
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let error = message_for_engine_error(err);
                (status, Json(ErrorMessage { error })).into_response()
            }
            ServerError::Generic(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorMessage { error })).into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
