use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::response::ApiResponse;

/// Failures raised below the service layer that come from the datastore or
/// the machinery around it.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("stored price {value:?} is not an integer")]
    MalformedPrice {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("migration failed: {0}")]
    Migration(String),
}

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The store cannot tell "no such row" from "not yours" when both are
    /// part of the same `WHERE id = ? AND user_id = ?`.
    #[error("{0} not found or not owned by caller")]
    NotFoundOrForbidden(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<diesel::result::Error> for ShopError {
    fn from(err: diesel::result::Error) -> Self {
        ShopError::Persistence(PersistenceError::Query(err))
    }
}

impl From<r2d2::Error> for ShopError {
    fn from(err: r2d2::Error) -> Self {
        ShopError::Persistence(PersistenceError::Pool(err))
    }
}

impl From<tokio::task::JoinError> for ShopError {
    fn from(err: tokio::task::JoinError) -> Self {
        ShopError::Persistence(PersistenceError::Task(err))
    }
}

impl ResponseError for ShopError {
    fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShopError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ShopError::NotFound(_) | ShopError::NotFoundOrForbidden(_) => StatusCode::NOT_FOUND,
            ShopError::Forbidden(_) => StatusCode::FORBIDDEN,
            ShopError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ShopError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ShopError::Persistence(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(message))
    }
}

/// Parses a raw identifier coming straight from the transport layer.
pub fn parse_id(raw: &str) -> Result<uuid::Uuid, ShopError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ShopError::InvalidArgument("id cannot be empty".to_string()));
    }
    uuid::Uuid::parse_str(raw)
        .map_err(|_| ShopError::InvalidArgument(format!("id {raw:?} is not a valid uuid")))
}
