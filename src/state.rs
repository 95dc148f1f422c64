// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{KeyProvider, SessionPolicy, TokenCodec};
use crate::config::{ConfigError, Environment, SessionConfig};

/// Shared application state.
///
/// Everything inside is immutable after startup, so cloning per request is
/// cheap and verification takes no locks.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    /// Build keys, policy and codec from configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        let keys = Arc::new(KeyProvider::from_config(config)?);
        let policy = Arc::new(SessionPolicy::from_config(config)?);
        Ok(Self::new(TokenCodec::new(keys, policy)))
    }

    pub fn policy(&self) -> &SessionPolicy {
        self.codec.policy()
    }

    pub fn environment(&self) -> Environment {
        self.policy().environment()
    }
}


#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::auth::ManualClock;

    pub const T0: i64 = 1_700_000_000;

    /// State with distinct secrets and a manual clock starting at [`T0`].
    pub fn test_state(environment: Environment) -> (AppState, Arc<ManualClock>) {
        let mut config = SessionConfig::with_secret("test-access-secret");
        config.refresh_secret = Some("test-refresh-secret".into());
        config.environment = environment;

        let clock = Arc::new(ManualClock::new(T0));
        let codec = TokenCodec::with_clock(
            Arc::new(KeyProvider::from_config(&config).expect("keys")),
            Arc::new(SessionPolicy::from_config(&config).expect("policy")),
            clock.clone(),
        );
        (AppState::new(codec), clock)
    }
}
