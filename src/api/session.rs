// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session endpoints: identity, refresh and logout.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::middleware::{cookie_value, extract_credential, log_rejection};
use crate::auth::{
    AdminOnly, Auth, AuthError, AuthenticatedUser, OptionalAuth, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::state::AppState;

/// Whether the caller carries a valid access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthenticatedUser>,
}

/// Freshly minted access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Expiry, seconds since the Unix epoch
    pub expires_at: i64,
}

/// Effective session policy, for operators.
#[derive(Debug, Serialize, ToSchema)]
pub struct PolicyResponse {
    pub environment: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
    pub leeway_secs: u64,
    pub hash_cost: u32,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
    pub cookie_same_site: String,
    pub cookie_path: String,
    pub cookie_max_age_ms: u64,
}

/// Identity of the authenticated caller.
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    tag = "Session",
    responses(
        (status = 200, description = "Authenticated identity", body = AuthenticatedUser),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn me(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}

/// Session status; never rejects.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    tag = "Session",
    responses(
        (status = 200, description = "Session status", body = SessionStatus)
    )
)]
pub async fn session_status(OptionalAuth(user): OptionalAuth) -> Json<SessionStatus> {
    Json(SessionStatus {
        authenticated: user.is_some(),
        user,
    })
}

/// Exchange the refresh token for a new access token.
///
/// The `refresh_token` cookie wins over the Authorization header, which
/// browsers usually fill with the access token.
#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    tag = "Session",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let issued = cookie_value(&headers, REFRESH_COOKIE)
        .map(Ok)
        .unwrap_or_else(|| extract_credential(&headers, REFRESH_COOKIE))
        .and_then(|token| state.codec.refresh(&token))
        .inspect_err(|e| log_rejection(e, "/v1/auth/refresh"))?;

    tracing::info!(user_id = %issued.claim.subject, "Access token refreshed");

    let cookie = state
        .policy()
        .cookie_attributes(state.environment())
        .set_cookie(ACCESS_COOKIE, &issued.token);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(RefreshResponse {
            access_token: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}

/// Clear both session cookies.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Session",
    responses(
        (status = 204, description = "Cookies cleared")
    )
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let attrs = state.policy().cookie_attributes(state.environment());
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([
            (SET_COOKIE, attrs.clear_cookie(ACCESS_COOKIE)),
            (SET_COOKIE, attrs.clear_cookie(REFRESH_COOKIE)),
        ]),
    )
}

/// Effective session policy. Admin only.
#[utoipa::path(
    get,
    path = "/v1/auth/policy",
    tag = "Session",
    responses(
        (status = 200, description = "Session policy", body = PolicyResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn policy(AdminOnly(_admin): AdminOnly, State(state): State<AppState>) -> Json<PolicyResponse> {
    let policy = state.policy();
    let cookie = policy.cookie_attributes(policy.environment());
    Json(PolicyResponse {
        environment: policy.environment().to_string(),
        access_ttl_secs: policy.access_ttl().as_secs(),
        refresh_ttl_secs: policy.refresh_ttl().as_secs(),
        leeway_secs: policy.leeway().as_secs(),
        hash_cost: policy.hash_cost(),
        cookie_secure: cookie.secure,
        cookie_http_only: cookie.http_only,
        cookie_same_site: cookie.same_site.as_str().to_string(),
        cookie_path: cookie.path,
        cookie_max_age_ms: cookie.max_age_ms,
    })
}
