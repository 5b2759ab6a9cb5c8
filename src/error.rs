use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

use crate::core::schema::Issue;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("validation error: {}", summarize(.0))]
    Validation(Vec<Issue>),

    #[error("record not found(id: {0})")]
    NotFound(String),

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("store error: {0}")]
    StoreError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            Error::Validation(issues) => Some(issues),
            _ => None,
        }
    }
}

fn summarize(issues: &[Issue]) -> String {
    issues.iter().map(|i| format!("{}: {}", i.path.join("."), i.message)).collect::<Vec<_>>().join(", ")
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Validation(issues) => HttpResponse::build(self.status_code()).json(json!({ "error": issues })),
            other => HttpResponse::build(self.status_code()).json(json!({ "error": other.to_string() })),
        }
    }
}
