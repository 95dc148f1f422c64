// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session Auth Server - Token Issuance & Verification Service
//!
//! Mints short-lived access tokens and long-lived refresh tokens, verifies
//! them on inbound requests and decides how they travel as cookies.
//!
//! ## Modules
//!
//! - `auth` - Key provider, token codec, session policy, verifier middleware
//! - `api` - HTTP handlers (Axum)
//! - `config` - Environment-sourced, immutable configuration
//! - `state` - Shared application state
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
pub mod telemetry;
