use anyhow::{Result, bail};

use super::AppConfig;

pub const MAX_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;
pub const MAX_REFRESH_TTL_DAYS: i64 = 365;
pub const MAX_RESET_TOKEN_TTL_MINS: i64 = 7 * 24 * 60;
pub const MAX_REMINDER_OFFSET_DAYS: i64 = 3650;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if let Some(database) = cfg.database.as_ref() {
        if database.url.trim().is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if database.min_idle > database.max_connections {
            errors.push(format!(
                "database.min_idle ({}) must be <= database.max_connections ({})",
                database.min_idle, database.max_connections
            ));
        }
    }

    let auth = &cfg.auth;
    if auth.jwt_secret.trim().is_empty() {
        errors.push("auth.jwt_secret must not be empty".to_string());
    }

    if auth.admin_email.trim().is_empty() {
        errors.push("auth.admin_email must not be empty".to_string());
    }

    if auth.admin_password.len() < 8 {
        errors.push("auth.admin_password must be at least 8 characters".to_string());
    }

    if auth.access_ttl_secs <= 0 || auth.access_ttl_secs > MAX_ACCESS_TTL_SECS {
        errors.push(format!(
            "auth.access_ttl_secs must be between 1 and {MAX_ACCESS_TTL_SECS}"
        ));
    }

    if auth.refresh_ttl_days <= 0 || auth.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
        errors.push(format!(
            "auth.refresh_ttl_days must be between 1 and {MAX_REFRESH_TTL_DAYS}"
        ));
    }

    if auth.access_ttl_secs > auth.refresh_ttl_days.saturating_mul(24 * 60 * 60) {
        errors.push("auth.access_ttl_secs must not outlive auth.refresh_ttl_days".to_string());
    }

    if auth.reset_token_ttl_mins <= 0 || auth.reset_token_ttl_mins > MAX_RESET_TOKEN_TTL_MINS {
        errors.push(format!(
            "auth.reset_token_ttl_mins must be between 1 and {MAX_RESET_TOKEN_TTL_MINS}"
        ));
    }

    if !(0..=MAX_REMINDER_OFFSET_DAYS).contains(&cfg.signup.reminder_offset_days) {
        errors.push(format!(
            "signup.reminder_offset_days must be between 0 and {MAX_REMINDER_OFFSET_DAYS}"
        ));
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
