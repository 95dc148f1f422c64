// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: mints and verifies signed, expiring tokens.
//!
//! ## Wire format
//!
//! Compact JWS (`HS256`) carrying `sub`, `email`, `role`, `kind`, `iat`,
//! `exp` and `jti`. Timestamps are whole seconds since the epoch, UTC.
//!
//! ## Verification order
//!
//! 1. Structure and signature, using the key for the requested kind
//! 2. `kind` claim must match the requested kind
//! 3. `exp` against the injected [`Clock`] (a token is dead at `exp <= now`)
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that the clock is
//! injectable and the boundary is exact.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Header, Validation};

use super::claims::{IdentityClaim, IssuedToken, TokenClaims, TokenKind, TokenPair};
use super::clock::{Clock, SystemClock};
use super::error::AuthError;
use super::keys::{KeyProvider, TOKEN_ALGORITHM};
use super::policy::SessionPolicy;

/// Mints and verifies access and refresh tokens.
#[derive(Clone)]
pub struct TokenCodec {
    keys: Arc<KeyProvider>,
    policy: Arc<SessionPolicy>,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(keys: Arc<KeyProvider>, policy: Arc<SessionPolicy>) -> Self {
        Self::with_clock(keys, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        keys: Arc<KeyProvider>,
        policy: Arc<SessionPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            keys,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Sign `claim` as a token of `kind`.
    pub fn issue(&self, claim: &IdentityClaim, kind: TokenKind) -> Result<IssuedToken, AuthError> {
        let issued_at = self.clock.now();
        let ttl = i64::try_from(self.policy.ttl(kind).as_secs())
            .map_err(|_| AuthError::Signing("token lifetime out of range".to_string()))?;
        let expires_at = issued_at
            .checked_add(ttl)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;

        let claims = TokenClaims::new(claim, kind, issued_at, expires_at);
        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            self.keys.key_for(kind).encoding(),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))?;

        tracing::debug!(
            subject = %claim.subject,
            kind = %kind,
            jti = %claims.jti,
            expires_at,
            "Issued token"
        );

        Ok(IssuedToken {
            token,
            kind,
            claim: claim.clone(),
            issued_at,
            expires_at,
        })
    }

    /// Mint an access token and a refresh token for the same claim.
    pub fn issue_pair(&self, claim: &IdentityClaim) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(claim, TokenKind::Access)?,
            refresh: self.issue(claim, TokenKind::Refresh)?,
        })
    }

    /// Verify `token` as a token of `kind` and return its claim unchanged.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<IdentityClaim, AuthError> {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let data = decode::<TokenClaims>(token, self.keys.key_for(kind).decoding(), &validation)
            .map_err(AuthError::from)?;
        let claims = data.claims;

        if claims.kind != kind {
            return Err(AuthError::InvalidSignature);
        }

        let leeway = i64::try_from(self.policy.leeway().as_secs()).unwrap_or(i64::MAX);
        if claims.exp.saturating_add(leeway) <= self.clock.now() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims.into_identity())
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    pub fn refresh(&self, refresh_token: &str) -> Result<IssuedToken, AuthError> {
        let claim = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue(&claim, TokenKind::Access)
    }
}
