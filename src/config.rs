// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! process-wide [`SessionConfig`]. Configuration is loaded from the
//! environment once at startup and is read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Access-token signing secret | Required |
//! | `JWT_REFRESH_SECRET` | Refresh-token signing secret | Falls back to `JWT_SECRET` |
//! | `JWT_EXPIRES_IN` | Access-token lifetime (`15m`, `1h`, `900`) | `15m` |
//! | `JWT_REFRESH_EXPIRES_IN` | Refresh-token lifetime | `7d` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance in seconds | `0` |
//! | `BCRYPT_ROUNDS` | Password hashing cost factor | `10` |
//! | `APP_ENV` | `production`, `development` or `test` | `development` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::str::FromStr;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_REFRESH_SECRET_ENV: &str = "JWT_REFRESH_SECRET";
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";
pub const JWT_REFRESH_EXPIRES_IN_ENV: &str = "JWT_REFRESH_EXPIRES_IN";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const BCRYPT_ROUNDS_ENV: &str = "BCRYPT_ROUNDS";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_ACCESS_EXPIRES_IN: &str = "15m";
pub const DEFAULT_REFRESH_EXPIRES_IN: &str = "7d";
pub const DEFAULT_HASH_COST: u32 = 10;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Valid bcrypt cost range.
const HASH_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required secret {0} is not set")]
    MissingSecret(&'static str),

    #[error("{var}: cannot parse duration {value:?}")]
    InvalidDuration { var: &'static str, value: String },

    #[error("APP_ENV: unknown environment {0:?}")]
    InvalidEnvironment(String),

    #[error("BCRYPT_ROUNDS: cost {0} is outside 4..=31")]
    InvalidHashCost(u32),

    #[error("{var}: expected a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Test => "test",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide session configuration.
///
/// Built once in `main` and shared by reference; nothing mutates it after
/// initialization. Duration strings are kept raw here and parsed by
/// [`crate::auth::SessionPolicy`].
#[derive(Clone)]
pub struct SessionConfig {
    pub access_secret: Option<String>,
    pub refresh_secret: Option<String>,
    pub access_expires_in: String,
    pub refresh_expires_in: String,
    pub leeway_secs: u64,
    pub hash_cost: u32,
    pub environment: Environment,
}

impl SessionConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get(APP_ENV_ENV) {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };

        let hash_cost = match get(BCRYPT_ROUNDS_ENV) {
            Some(value) => parse_number(BCRYPT_ROUNDS_ENV, &value)?,
            None => DEFAULT_HASH_COST,
        };
        if !HASH_COST_RANGE.contains(&hash_cost) {
            return Err(ConfigError::InvalidHashCost(hash_cost));
        }

        let leeway_secs = match get(JWT_LEEWAY_ENV) {
            Some(value) => parse_number(JWT_LEEWAY_ENV, &value)?,
            None => 0,
        };

        Ok(Self {
            access_secret: get(JWT_SECRET_ENV),
            refresh_secret: get(JWT_REFRESH_SECRET_ENV),
            access_expires_in: get(JWT_EXPIRES_IN_ENV)
                .unwrap_or_else(|| DEFAULT_ACCESS_EXPIRES_IN.to_string()),
            refresh_expires_in: get(JWT_REFRESH_EXPIRES_IN_ENV)
                .unwrap_or_else(|| DEFAULT_REFRESH_EXPIRES_IN.to_string()),
            leeway_secs,
            hash_cost,
            environment,
        })
    }

    /// Configuration with a single secret and all defaults.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            access_secret: Some(secret.into()),
            refresh_secret: None,
            access_expires_in: DEFAULT_ACCESS_EXPIRES_IN.to_string(),
            refresh_expires_in: DEFAULT_REFRESH_EXPIRES_IN.to_string(),
            leeway_secs: 0,
            hash_cost: DEFAULT_HASH_COST,
            environment: Environment::default(),
        }
    }
}

// Secrets must never reach logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("access_secret", &self.access_secret.as_ref().map(|_| "<redacted>"))
            .field("refresh_secret", &self.refresh_secret.as_ref().map(|_| "<redacted>"))
            .field("access_expires_in", &self.access_expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("leeway_secs", &self.leeway_secs)
            .field("hash_cost", &self.hash_cost)
            .field("environment", &self.environment)
            .finish()
    }
}

fn parse_number<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}
