// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verifier middleware for Axum.
//!
//! Every request passes through
//! `Unauthenticated -> Verifying -> {Authenticated, Rejected}`:
//!
//! 1. The credential is taken from `Authorization: Bearer <token>`, or from
//!    the `access_token` cookie when no Authorization header is sent
//! 2. The token is verified as an access token
//! 3. On success the [`AuthenticatedUser`] is inserted into the request
//!    extensions and the request continues
//! 4. On failure the pipeline is short-circuited with a generic 401; the
//!    specific reason is only logged
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::claims::{AuthenticatedUser, TokenKind};
use super::codec::TokenCodec;
use super::error::AuthError;
use super::policy::ACCESS_COOKIE;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &state.codec) {
        Ok(user) => {
            tracing::debug!(user_id = %user.user_id, role = %user.role, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            log_rejection(&e, request.uri().path());
            e.into_response()
        }
    }
}

/// Extract and verify the access credential carried by `headers`.
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_credential(headers, ACCESS_COOKIE)?;
    let claim = codec.verify(&token, TokenKind::Access)?;
    Ok(AuthenticatedUser::from(claim))
}

/// Take a bearer token, falling back to the named cookie.
///
/// A present but non-Bearer Authorization header is an error rather than a
/// reason to look at cookies.
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Result<String, AuthError> {
    if let Some(header) = headers.get(AUTHORIZATION) {
        let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
        let token = value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;
        return Ok(token.to_string());
    }

    cookie_value(headers, cookie_name).ok_or(AuthError::MissingCredentials)
}

/// Find a cookie by name across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub(crate) fn log_rejection(error: &AuthError, path: &str) {
    if error.is_verification_failure() {
        tracing::warn!(error_code = error.error_code(), path, "Rejected unauthenticated request");
    } else {
        tracing::error!(error_code = error.error_code(), path, error = %error, "Authentication failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityClaim, Role};
    use crate::config::Environment;
    use crate::state::test_support::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthenticatedUser>| async move { user.user_id }),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            ))
            .with_state(state)
    }

    fn claim() -> IdentityClaim {
        IdentityClaim::new("u1", "u1@x.com", Role::Admin)
    }

    async fn call(app: Router, request: HttpRequest<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get_with(header: (&str, String)) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri("/whoami")
            .header(header.0, header.1)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn bearer_token_authenticates() {
        let (state, _) = test_state(Environment::Test);
        let token = state.codec.issue(&claim(), TokenKind::Access).unwrap().token;

        let (status, body) = call(app(state), get_with(("Authorization", format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn cookie_authenticates() {
        let (state, _) = test_state(Environment::Test);
        let token = state.codec.issue(&claim(), TokenKind::Access).unwrap().token;

        let (status, body) = call(
            app(state),
            get_with(("Cookie", format!("theme=dark; access_token={token}"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn every_failure_gets_the_same_response() {
        let (state, clock) = test_state(Environment::Test);
        let expired = state.codec.issue(&claim(), TokenKind::Access).unwrap().token;
        let refresh = state.codec.issue(&claim(), TokenKind::Refresh).unwrap().token;
        clock.advance(901);

        let requests = vec![
            HttpRequest::builder().uri("/whoami").body(Body::empty()).unwrap(),
            get_with(("Authorization", "Basic dTpw".to_string())),
            get_with(("Authorization", "Bearer garbage".to_string())),
            get_with(("Authorization", format!("Bearer {expired}"))),
            get_with(("Authorization", format!("Bearer {refresh}"))),
        ];

        for request in requests {
            let (status, body) = call(app(state.clone()), request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, r#"{"error":"unauthenticated"}"#);
        }
    }

    #[test]
    fn authorization_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer from-header".parse().unwrap());
        headers.insert(COOKIE, "access_token=from-cookie".parse().unwrap());
        assert_eq!(extract_credential(&headers, ACCESS_COOKIE).unwrap(), "from-header");
    }

    #[test]
    fn non_bearer_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Token abc".parse().unwrap());
        headers.insert(COOKIE, "access_token=from-cookie".parse().unwrap());
        assert_eq!(
            extract_credential(&headers, ACCESS_COOKIE),
            Err(AuthError::InvalidAuthHeader)
        );
    }

    #[test]
    fn missing_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "access_token=".parse().unwrap());
        assert_eq!(
            extract_credential(&headers, ACCESS_COOKIE),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn cookie_lookup_spans_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, "a=1".parse().unwrap());
        headers.append(COOKIE, "b=2; refresh_token=r".parse().unwrap());
        assert_eq!(cookie_value(&headers, "refresh_token").as_deref(), Some("r"));
        assert_eq!(cookie_value(&headers, "c"), None);
    }
}
