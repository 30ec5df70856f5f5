//! HTTP status code mapping for error codes

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::RestaurantNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::SlugTaken => StatusCode::CONFLICT,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            _ => match self.category() {
                ErrorCategory::Auth => StatusCode::UNAUTHORIZED,
                ErrorCategory::Permission => StatusCode::FORBIDDEN,
                ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
                // 400 Bad Request (validation and business errors)
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}
