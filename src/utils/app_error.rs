use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::StatusCode;
use serde_json::json;

/// Error returned to the client. Internal detail goes to the log at the
/// place the error is converted, never into the response body.
#[derive(Debug, PartialEq, Eq)]
pub struct AppError {
    status: StatusCode,
    message: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: Option<impl Into<String>>) -> Self {
        Self {
            status,
            message: message.map(Into::into),
        }
    }

    pub fn auth_invalid() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            Some("Invalid authentication data."),
        )
    }

    pub fn auth_malformed() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            Some("Malformed authentication data."),
        )
    }

    pub fn authentication_required() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, Some("Authentication required."))
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, Some(format!("{what} not found.")))
    }

    pub fn validation(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(message))
    }

    pub fn invalid_operation(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(message))
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None::<String>)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.message {
            Some(message) => (self.status, Json(json!({ "error": message }))).into_response(),
            None => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_codes_match_the_taxonomy() {
        assert_eq!(AppError::auth_invalid().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::auth_malformed().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::authentication_required().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::not_found("Post").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::validation("too long").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::invalid_operation("no").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal_server_error().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_server_error_has_no_public_message() {
        let error = AppError::internal_server_error();
        assert_eq!(error.message, None);
    }
}
