use lockout_tracker::{LockoutPolicy, DEFAULT_RESERVED_IDENTITIES};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
    #[error("{var} out of range: {reason}")]
    OutOfRange { var: &'static str, reason: &'static str },
}

/// Startup configuration for the gateway binary.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub policy: LockoutPolicy,
    /// Credentials for the first account, applied at startup if both are set.
    pub seed_username: Option<String>,
    pub seed_password: Option<String>,
}

impl GatewayConfig {
    /// Load from environment variables.
    ///
    /// - `LOCKOUT_MAX_FAILURES` (default 3)
    /// - `LOCKOUT_DURATION_SECS` (default 900)
    /// - `LOCKOUT_MAX_TRACKED` (default 50)
    /// - `LOCKOUT_RESERVED` comma-separated (default `admin,root`)
    /// - `AUTH_USERNAME` / `AUTH_PASSWORD`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_failure_count: u32 = parse_var(&lookup, "LOCKOUT_MAX_FAILURES", 3)?;
        if max_failure_count == 0 {
            return Err(ConfigError::OutOfRange {
                var: "LOCKOUT_MAX_FAILURES",
                reason: "must be at least 1",
            });
        }

        let lock_secs: u64 = parse_var(&lookup, "LOCKOUT_DURATION_SECS", 900)?;

        let max_tracked: usize = parse_var(&lookup, "LOCKOUT_MAX_TRACKED", 50)?;
        if max_tracked == 0 {
            return Err(ConfigError::OutOfRange {
                var: "LOCKOUT_MAX_TRACKED",
                reason: "must be at least 1",
            });
        }

        let reserved: Vec<String> = match lookup("LOCKOUT_RESERVED") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_RESERVED_IDENTITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let policy = LockoutPolicy::new(max_failure_count, Duration::from_secs(lock_secs), max_tracked)
            .with_reserved_identities(reserved);

        Ok(Self {
            policy,
            seed_username: lookup("AUTH_USERNAME").filter(|s| !s.is_empty()),
            seed_password: lookup("AUTH_PASSWORD").filter(|s| !s.is_empty()),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
