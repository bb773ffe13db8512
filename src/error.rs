//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every request either succeeds or fails with exactly one of these variants, and each
//! variant maps to one fixed HTTP status and a `{"detail": ...}` JSON body.
//!
//! Authentication failures are deliberately coarse: a bad signature, an expired token,
//! a malformed token and an unknown subject all surface as `InvalidCredentials`, so the
//! response never reveals which check failed.
//!
//! `From` implementations cover `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and `tokio::task::JoinError`,
//! allowing handlers to use the `?` operator.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every rejected bearer token.
pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";
/// Message returned when a protected route is called without a bearer token.
pub const NOT_AUTHENTICATED: &str = "Not authenticated";
/// Message returned when an authenticated user targets someone else's account.
pub const NOT_ENOUGH_PERMISSIONS: &str = "Not enough permissions";
/// Message returned when a write collides with the unique username/email constraints.
pub const ACCOUNT_CONFLICT: &str = "Username or Email already exists";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A protected route was called without a bearer token (HTTP 401).
    NotAuthenticated,
    /// A bearer token was presented but could not be accepted (HTTP 401).
    /// Covers bad signatures, expiry, malformed tokens and unknown subjects alike.
    InvalidCredentials,
    /// Login failed, or another authentication step rejected the caller (HTTP 401).
    Unauthorized(String),
    /// The caller is authenticated but may not act on the target (HTTP 403).
    InsufficientPermissions,
    /// Malformed or otherwise unacceptable request (HTTP 400).
    BadRequest(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// A write violated a uniqueness constraint (HTTP 409).
    Conflict(String),
    /// Input failed field validation (HTTP 422).
    ValidationError(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the database driver (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// The user-visible message carried in the `detail` field of the response body.
    pub fn detail(&self) -> &str {
        match self {
            AppError::NotAuthenticated => NOT_AUTHENTICATED,
            AppError::InvalidCredentials => INVALID_CREDENTIALS,
            AppError::InsufficientPermissions => NOT_ENOUGH_PERMISSIONS,
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ValidationError(msg) => msg,
            // Server-side details stay in the log.
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                "Internal server error"
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::NotAuthenticated => write!(f, "Unauthorized: {}", NOT_AUTHENTICATED),
            AppError::InvalidCredentials => write!(f, "Unauthorized: {}", INVALID_CREDENTIALS),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InsufficientPermissions => {
                write!(f, "Forbidden: {}", NOT_ENOUGH_PERMISSIONS)
            }
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Every 401 response advertises the bearer scheme through `WWW-Authenticate`.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated
            | AppError::InvalidCredentials
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        let mut builder = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(json!({ "detail": self.detail() }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `Conflict`, `RowNotFound` becomes `NotFound`,
/// everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                AppError::Conflict(ACCOUNT_CONFLICT.into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::InvalidCredentials`.
///
/// The underlying reason is dropped on purpose.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidCredentials
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// A digest bcrypt cannot parse means the stored data is corrupt, not that the
/// caller typed the wrong password.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}
