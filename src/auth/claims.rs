// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity claim, token wire claims and the authenticated user.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;

/// Identity payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Opaque subject identifier
    pub subject: String,
    pub email: String,
    pub role: Role,
}

impl IdentityClaim {
    pub fn new(subject: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            role,
        }
    }
}

/// Token kind. Each kind has its own key and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, authorizes individual requests
    Access,
    /// Long-lived, used to mint new access tokens
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims as they appear inside the signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
}

impl TokenClaims {
    pub fn new(claim: &IdentityClaim, kind: TokenKind, issued_at: i64, expires_at: i64) -> Self {
        Self {
            sub: claim.subject.clone(),
            email: claim.email.clone(),
            role: claim.role,
            kind,
            iat: issued_at,
            exp: expires_at,
            jti: Uuid::new_v4(),
        }
    }

    pub fn into_identity(self) -> IdentityClaim {
        IdentityClaim {
            subject: self.sub,
            email: self.email,
            role: self.role,
        }
    }
}

/// A freshly minted token together with its metadata.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact serialized form, including the signature
    pub token: String,
    pub kind: TokenKind,
    pub claim: IdentityClaim,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Access and refresh token minted together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Authenticated identity attached to the request by the verifier middleware.
///
/// This is the primary type handlers use to represent the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Check if the user has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<IdentityClaim> for AuthenticatedUser {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            user_id: claim.subject,
            email: claim.email,
            role: claim.role,
        }
    }
}
