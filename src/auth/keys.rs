// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing/verification key provider.
//!
//! Keys are derived once from [`SessionConfig`] and never change afterwards,
//! so the provider is shared behind an `Arc` without locking.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use super::claims::TokenKind;
use crate::config::{ConfigError, SessionConfig, JWT_SECRET_ENV};

/// Algorithm used for every token this service mints.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// HMAC key pair for one token kind.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Supplies the access and refresh keys.
#[derive(Debug, Clone)]
pub struct KeyProvider {
    access: SigningKey,
    refresh: SigningKey,
    distinct: bool,
}

impl KeyProvider {
    /// Build from configuration.
    ///
    /// The access secret is required. The refresh secret falls back to it
    /// when unset. Empty secrets count as unset.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        let access_secret = config
            .access_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret(JWT_SECRET_ENV))?;

        Ok(Self::new(access_secret, config.refresh_secret.as_deref()))
    }

    pub fn new(access_secret: &str, refresh_secret: Option<&str>) -> Self {
        let refresh_secret = refresh_secret
            .filter(|s| !s.is_empty())
            .unwrap_or(access_secret);
        Self {
            access: SigningKey::from_secret(access_secret.as_bytes()),
            refresh: SigningKey::from_secret(refresh_secret.as_bytes()),
            distinct: refresh_secret != access_secret,
        }
    }

    pub fn current_access_key(&self) -> &SigningKey {
        &self.access
    }

    pub fn current_refresh_key(&self) -> &SigningKey {
        &self.refresh
    }

    pub fn key_for(&self, kind: TokenKind) -> &SigningKey {
        match kind {
            TokenKind::Access => self.current_access_key(),
            TokenKind::Refresh => self.current_refresh_key(),
        }
    }

    /// Whether refresh tokens are signed with their own secret.
    pub fn has_distinct_refresh_key(&self) -> bool {
        self.distinct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_access_secret_is_config_error() {
        let mut config = SessionConfig::with_secret("x");
        config.access_secret = None;
        config.refresh_secret = Some("refresh-only".into());

        let err = KeyProvider::from_config(&config).unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret("JWT_SECRET"));
    }

    #[test]
    fn empty_access_secret_is_config_error() {
        let err = KeyProvider::from_config(&SessionConfig::with_secret("")).unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret("JWT_SECRET"));
    }

    #[test]
    fn empty_refresh_secret_falls_back_to_access_secret() {
        let mut config = SessionConfig::with_secret("access");
        config.refresh_secret = Some(String::new());
        let keys = KeyProvider::from_config(&config).unwrap();
        assert!(!keys.has_distinct_refresh_key());
    }

    #[test]
    fn refresh_falls_back_to_access_secret() {
        let keys = KeyProvider::from_config(&SessionConfig::with_secret("shared")).unwrap();
        assert!(!keys.has_distinct_refresh_key());
    }

    #[test]
    fn distinct_refresh_secret_is_used() {
        let mut config = SessionConfig::with_secret("access");
        config.refresh_secret = Some("refresh".into());
        let keys = KeyProvider::from_config(&config).unwrap();
        assert!(keys.has_distinct_refresh_key());
    }

    #[test]
    fn debug_redacts_key_material() {
        let keys = KeyProvider::new("top-secret", None);
        assert!(!format!("{keys:?}").contains("top-secret"));
    }
}
