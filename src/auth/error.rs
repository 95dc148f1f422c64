// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Verification failures are distinguished internally (for logs) but all of
//! them render to the same `unauthenticated` body on the wire.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer header and no session cookie present
    MissingCredentials,
    /// Authorization header present but not `Bearer <token>`
    InvalidAuthHeader,
    /// Token structure, encoding or claims cannot be parsed
    MalformedToken,
    /// Signature check failed, or the token is of the wrong kind
    InvalidSignature,
    /// Token expiry is at or before the current time
    TokenExpired,
    /// Token could not be signed
    Signing(String),
    /// Authenticated, but the role is not sufficient
    InsufficientPermissions,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Diagnostic code for this error. Never sent to clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::Signing(_) => "signing_error",
            AuthError::InsufficientPermissions => "insufficient_permissions",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The only detail a caller ever sees.
    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "unauthenticated",
            StatusCode::FORBIDDEN => "forbidden",
            _ => "internal_error",
        }
    }

    /// True for failures of the token itself, as opposed to server faults.
    pub fn is_verification_failure(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "No bearer token or session cookie"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::Signing(msg) => write!(f, "Failed to sign token: {msg}"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::InvalidSignature
            }
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AuthError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn verification_failures_collapse_to_unauthenticated() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidAuthHeader,
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
        ] {
            let (status, body) = body_of(err).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, serde_json::json!({ "error": "unauthenticated" }));
        }
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let (status, body) = body_of(AuthError::InsufficientPermissions).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "forbidden");
    }

    #[tokio::test]
    async fn signing_error_hides_detail() {
        let (status, body) = body_of(AuthError::Signing("key exploded".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }

    #[test]
    fn error_codes_stay_distinct() {
        assert_eq!(AuthError::TokenExpired.error_code(), "token_expired");
        assert_eq!(AuthError::InvalidSignature.error_code(), "invalid_signature");
        assert_eq!(AuthError::MalformedToken.error_code(), "malformed_token");
    }
}
