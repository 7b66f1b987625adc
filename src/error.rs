/*
 * Responsibility
 * - Authentication failure taxonomy (AuthErrorKind) and the error value (AuthError)
 * - IntoResponse: every kind becomes 401 with a JSON error body
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Why a request was turned away by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// No `Authorization` header, or an empty credential segment.
    NoAuthHeader,
    /// Header present but not exactly `<scheme> <credential>`.
    InvalidAuthHeader,
    /// The verifier reported an expired token.
    TokenExpired,
    /// Any other verification failure.
    TokenInvalid,
}

impl AuthErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::NoAuthHeader => "NO_AUTH_HEADER",
            Self::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
        }
    }

    /// Message used when no override is configured for this kind.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::NoAuthHeader => "no authorization included in request",
            Self::InvalidAuthHeader => "invalid credentials structure",
            Self::TokenExpired => "authentication token expire",
            Self::TokenInvalid => "token verification failure",
        }
    }
}

/// A rejected request. The status is always `401 Unauthorized`; callers tell
/// the kinds apart through [`AuthError::kind`] or the response body code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    kind: AuthErrorKind,
    message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.kind.code(),
                message: self.message,
            },
        };

        (status, Json(body)).into_response()
    }
}
