//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use redator_core::DomainError;
use redator_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Forbidden,
    Conflict(String),
    TooManyRequests { retry_after: u64 },
    BadGateway(String),
    GatewayTimeout(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::TooManyRequests { retry_after } => {
                write!(f, "Too many requests, retry after {}s", retry_after)
            }
            AppError::BadGateway(msg) => write!(f, "Bad gateway: {}", msg),
            AppError::GatewayTimeout(msg) => write!(f, "Gateway timeout: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Forbidden => ErrorResponse::forbidden()
                .with_detail("You do not have permission to modify this resource."),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::TooManyRequests { retry_after } => {
                let error = ErrorResponse::too_many_requests().with_detail(format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    retry_after
                ));
                return HttpResponse::TooManyRequests()
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .insert_header(("Retry-After", retry_after.to_string()))
                    .json(error);
            }
            AppError::BadGateway(detail) => ErrorResponse::bad_gateway(detail),
            AppError::GatewayTimeout(detail) => ErrorResponse::gateway_timeout(detail),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::GenerationFailed(msg) => {
                tracing::warn!(error = %msg, "Text generation failed");
                AppError::BadGateway("The text generation service failed. Try again.".to_string())
            }
            DomainError::Timeout { seconds } => AppError::GatewayTimeout(format!(
                "The text generation service did not answer within {seconds}s."
            )),
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} '{}' not found", entity_type, key))
            }
            DomainError::Persistence(msg) => AppError::Conflict(msg),
            DomainError::Authorization => AppError::Forbidden,
            DomainError::Busy => {
                AppError::Conflict("A request is already in progress for this session.".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
