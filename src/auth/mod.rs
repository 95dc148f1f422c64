// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token issuance and verification for the session service.
//!
//! ## Auth Flow
//!
//! 1. A login collaborator establishes the identity and calls
//!    [`TokenCodec::issue_pair`]
//! 2. Tokens reach the client as `access_token` / `refresh_token` cookies
//!    (attributes from [`SessionPolicy::cookie_attributes`]) or as bearer
//!    tokens
//! 3. [`auth_middleware`] verifies the access token on every protected
//!    request and attaches an [`AuthenticatedUser`]
//! 4. `POST /v1/auth/refresh` exchanges a refresh token for a new access token
//!
//! ## Security
//!
//! - Access and refresh tokens are signed with separate keys when
//!   `JWT_REFRESH_SECRET` is set, and always carry a `kind` claim
//! - Expiry is exact (`exp <= now` is expired) unless `JWT_LEEWAY_SECS` is set
//! - Clients only ever see `unauthenticated`; the reason is logged

pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod policy;
pub mod roles;

pub use claims::{AuthenticatedUser, IdentityClaim, IssuedToken, TokenKind, TokenPair};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::TokenCodec;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use keys::{KeyProvider, SigningKey};
pub use middleware::auth_middleware;
pub use policy::{CookieAttributes, SameSite, SessionPolicy, ACCESS_COOKIE, REFRESH_COOKIE};
pub use roles::Role;
