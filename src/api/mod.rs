// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_middleware, AuthenticatedUser, Role},
    state::AppState,
};

pub mod health;
pub mod session;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(session::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let v1_routes = Router::new()
        .merge(protected)
        .route("/auth/session", get(session::session_status))
        .route("/auth/refresh", post(session::refresh))
        .route("/auth/logout", post(session::logout))
        .route("/auth/policy", get(session::policy))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .with_state(state)
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        session::me,
        session::session_status,
        session::refresh,
        session::logout,
        session::policy
    ),
    components(
        schemas(
            AuthenticatedUser,
            Role,
            health::HealthResponse,
            session::SessionStatus,
            session::RefreshResponse,
            session::PolicyResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Session", description = "Token verification, refresh and logout")
    )
)]
struct ApiDoc;
