// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session policy: token lifetimes and cookie transport attributes.

use std::time::Duration;

use super::claims::TokenKind;
use crate::config::{
    ConfigError, Environment, SessionConfig, JWT_EXPIRES_IN_ENV, JWT_REFRESH_EXPIRES_IN_ENV,
};

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Session cookie lifetime (7 days) in milliseconds.
pub const COOKIE_MAX_AGE_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// SameSite attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes for session cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_ms: u64,
}

impl CookieAttributes {
    /// Build a `Set-Cookie` header value.
    pub fn set_cookie(&self, name: &str, value: &str) -> String {
        self.render(name, value, self.max_age_ms / 1000)
    }

    /// Build a `Set-Cookie` header value that clears the cookie.
    pub fn clear_cookie(&self, name: &str) -> String {
        self.render(name, "", 0)
    }

    fn render(&self, name: &str, value: &str, max_age_secs: u64) -> String {
        let mut parts = vec![format!("{name}={value}"), format!("Path={}", self.path)];
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        parts.push(format!("Max-Age={max_age_secs}"));
        parts.join("; ")
    }
}

/// Token lifetimes and cookie policy, parsed once from [`SessionConfig`].
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    access_ttl: Duration,
    refresh_ttl: Duration,
    leeway: Duration,
    hash_cost: u32,
    environment: Environment,
}

impl SessionPolicy {
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            access_ttl: parse_duration(JWT_EXPIRES_IN_ENV, &config.access_expires_in)?,
            refresh_ttl: parse_duration(JWT_REFRESH_EXPIRES_IN_ENV, &config.refresh_expires_in)?,
            leeway: Duration::from_secs(config.leeway_secs),
            hash_cost: config.hash_cost,
            environment: config.environment,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Clock skew tolerance applied to expiry checks.
    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// bcrypt cost factor for password hashing collaborators.
    pub fn hash_cost(&self) -> u32 {
        self.hash_cost
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Cookie attributes for `environment`. Only `secure` depends on it.
    pub fn cookie_attributes(&self, environment: Environment) -> CookieAttributes {
        CookieAttributes {
            http_only: true,
            secure: environment.is_production(),
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_ms: COOKIE_MAX_AGE_MS,
        }
    }
}

/// Parse a lifetime such as `900`, `15m`, `1 hour` or `7d`.
///
/// A bare number is seconds. Sub-second precision is truncated.
pub fn parse_duration(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        var,
        value: value.to_string(),
    };

    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let amount: u64 = number.parse().map_err(|_| invalid())?;

    let millis_per_unit: u64 = match unit.trim().to_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1_000,
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60_000,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600_000,
        "d" | "day" | "days" => 86_400_000,
        "w" | "week" | "weeks" => 604_800_000,
        "y" | "yr" | "yrs" | "year" | "years" => 31_557_600_000,
        _ => return Err(invalid()),
    };

    let secs = amount.checked_mul(millis_per_unit).ok_or_else(invalid)? / 1000;
    if secs == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SessionPolicy {
        SessionPolicy::from_config(&SessionConfig::with_secret("s")).unwrap()
    }

    #[test]
    fn default_lifetimes() {
        let policy = policy();
        assert_eq!(policy.access_ttl(), Duration::from_secs(900));
        assert_eq!(policy.refresh_ttl(), Duration::from_secs(7 * 86_400));
        assert_eq!(policy.ttl(TokenKind::Access), policy.access_ttl());
        assert_eq!(policy.hash_cost(), 10);
        assert_eq!(policy.leeway(), Duration::ZERO);
    }

    #[test]
    fn parses_duration_strings() {
        let p = |s| parse_duration("X", s).unwrap().as_secs();
        assert_eq!(p("900"), 900);
        assert_eq!(p("15m"), 900);
        assert_eq!(p("1h"), 3600);
        assert_eq!(p("2 hours"), 7200);
        assert_eq!(p("7d"), 604_800);
        assert_eq!(p("1w"), 604_800);
        assert_eq!(p("1500ms"), 1);
        assert_eq!(p(" 30s "), 30);
    }

    #[test]
    fn rejects_bad_duration_strings() {
        for bad in ["", "abc", "15x", "-5m", "0", "10ms", "1.5h"] {
            assert!(
                matches!(parse_duration("X", bad), Err(ConfigError::InvalidDuration { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn unparseable_ttl_is_config_error() {
        let mut config = SessionConfig::with_secret("s");
        config.refresh_expires_in = "forever".into();
        let err = SessionPolicy::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDuration {
                var: "JWT_REFRESH_EXPIRES_IN",
                value: "forever".into()
            }
        );
    }

    #[test]
    fn secure_only_in_production() {
        let policy = policy();
        let prod = policy.cookie_attributes(Environment::Production);
        assert!(prod.secure);

        for env in [Environment::Development, Environment::Test] {
            let attrs = policy.cookie_attributes(env);
            assert!(!attrs.secure);
            assert_eq!(attrs, CookieAttributes { secure: false, ..prod.clone() });
        }
    }

    #[test]
    fn fixed_cookie_attributes() {
        let attrs = policy().cookie_attributes(Environment::Development);
        assert!(attrs.http_only);
        assert_eq!(attrs.same_site, SameSite::Lax);
        assert_eq!(attrs.path, "/");
        assert_eq!(attrs.max_age_ms, 604_800_000);
    }

    #[test]
    fn renders_set_cookie() {
        let attrs = policy().cookie_attributes(Environment::Production);
        assert_eq!(
            attrs.set_cookie(ACCESS_COOKIE, "abc"),
            "access_token=abc; Path=/; Secure; HttpOnly; SameSite=Lax; Max-Age=604800"
        );
        assert_eq!(
            attrs.clear_cookie(REFRESH_COOKIE),
            "refresh_token=; Path=/; Secure; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }
}
