//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (rates > 0, sweep timing coherent)
//! - Check seeded accounts against the token shape rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::auth::token::is_valid_token_shape;
use crate::config::schema::GateConfig;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("rate_limit.requests_per_second must be a positive number, got {0}")]
    RequestsPerSecond(f64),

    #[error("rate_limit.burst_size must be at least 1")]
    BurstSize,

    #[error("rate_limit.sweep_interval_secs must be greater than 0")]
    SweepInterval,

    #[error("rate_limit.idle_timeout_secs ({idle}) must not be shorter than sweep_interval_secs ({sweep})")]
    IdleTimeout { idle: u64, sweep: u64 },

    #[error("timeouts.request_secs must be greater than 0")]
    RequestTimeout,

    #[error("auth.token_length must be greater than 0")]
    TokenLength,

    #[error("account id {0} is declared more than once")]
    DuplicateAccount(i64),

    #[error("account {0} has a token that is not {1} characters long")]
    AccountToken(i64, usize),
}

pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let rate_limit = &config.rate_limit;
    if !(rate_limit.requests_per_second.is_finite() && rate_limit.requests_per_second > 0.0) {
        errors.push(ValidationError::RequestsPerSecond(rate_limit.requests_per_second));
    }
    if rate_limit.burst_size == 0 {
        errors.push(ValidationError::BurstSize);
    }
    if rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::SweepInterval);
    }
    if rate_limit.idle_timeout_secs < rate_limit.sweep_interval_secs {
        errors.push(ValidationError::IdleTimeout {
            idle: rate_limit.idle_timeout_secs,
            sweep: rate_limit.sweep_interval_secs,
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    let token_length = config.auth.token_length;
    if token_length == 0 {
        errors.push(ValidationError::TokenLength);
    }

    let mut seen = HashSet::new();
    for account in &config.accounts {
        if !seen.insert(account.id) {
            errors.push(ValidationError::DuplicateAccount(account.id));
        }
        if token_length > 0 && !account.tokens.iter().all(|t| is_valid_token_shape(t, token_length)) {
            errors.push(ValidationError::AccountToken(account.id, token_length));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AccountConfig;

    fn account(id: i64, token: &str) -> AccountConfig {
        AccountConfig {
            id,
            name: "test".into(),
            email: "test@example.com".into(),
            activated: true,
            tokens: vec![token.into()],
            permissions: vec![],
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&GateConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GateConfig::default();
        config.rate_limit.requests_per_second = 0.0;
        config.rate_limit.burst_size = 0;
        config.rate_limit.idle_timeout_secs = 10;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::BurstSize));
        assert!(errors.contains(&ValidationError::IdleTimeout { idle: 10, sweep: 60 }));
    }

    #[test]
    fn test_nan_rate_rejected() {
        let mut config = GateConfig::default();
        config.rate_limit.requests_per_second = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_accounts_checked() {
        let mut config = GateConfig::default();
        config.accounts = vec![
            account(1, "Y3QMGX3PJ3WLRL2YRTQGQ6KRHU"),
            account(1, "short"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateAccount(1),
                ValidationError::AccountToken(1, 26),
            ]
        );
    }
}
