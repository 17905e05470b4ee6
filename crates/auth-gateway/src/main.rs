use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use auth_gateway::logging::init_tracing;
use auth_gateway::{AuthGateway, GatewayConfig, LockoutTracker, LoginError, MemoryUserStore, UserService};
use serde::Serialize;

#[derive(Serialize)]
struct LoginOutcome<'a> {
    username: &'a str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locked_until: Option<chrono::DateTime<chrono::Utc>>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = GatewayConfig::from_env().context("invalid lockout configuration")?;
    tracing::info!(
        "Lockout policy: {} failures, {}s lock, {} tracked identities max, reserved {:?}",
        config.policy.max_failure_count,
        config.policy.lock_duration.as_secs(),
        config.policy.max_tracked_identities,
        config.policy.reserved_identities
    );

    let store = Arc::new(MemoryUserStore::new());
    let users = UserService::new(store.clone());
    match (&config.seed_username, &config.seed_password) {
        (Some(username), Some(password)) => {
            users
                .update_first_user(username, password)
                .context("failed to seed first user")?;
        }
        _ => tracing::warn!("AUTH_USERNAME/AUTH_PASSWORD not set, no accounts exist"),
    }

    let tracker = Arc::new(LockoutTracker::new(config.policy));
    let gateway = AuthGateway::new(tracker, store);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let mut parts = line.split_whitespace();
        let Some(username) = parts.next() else {
            continue;
        };
        let password = parts.next().unwrap_or("");

        let outcome = match gateway.login(username, password) {
            Ok(user) => LoginOutcome {
                username,
                outcome: "ok",
                user_id: Some(user.id),
                locked_until: None,
            },
            Err(e) => LoginOutcome {
                username,
                outcome: match e {
                    LoginError::Locked => "locked",
                    LoginError::InvalidCredentials => "invalid",
                    LoginError::Store(_) => "error",
                },
                user_id: None,
                locked_until: gateway.tracker().locked_until(username),
            },
        };
        writeln!(stdout, "{}", serde_json::to_string(&outcome)?)?;
    }

    Ok(())
}
