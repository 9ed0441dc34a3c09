use std::{env, sync::LazyLock};

/// HMAC secret used to sign session credentials
pub static AUTH_SERVER_SECRET: LazyLock<Option<String>> = LazyLock::new(|| {
    env::var("AUTH_SERVER_SECRET")
        .ok()
        .filter(|v| !v.is_empty())
});

/// Session credential lifetime, 30 days by default
pub static SESSION_TOKEN_LIFETIME_SECS: LazyLock<i64> = LazyLock::new(|| {
    parse_lifetime_secs(env::var("SESSION_TOKEN_LIFETIME_SECS").ok().as_deref())
});

const SESSION_TOKEN_LIFETIME_DEFAULT_SECS: i64 = 2_592_000;

/// Upper bound for a configured lifetime (365 days)
const SESSION_TOKEN_LIFETIME_MAX_SECS: i64 = 86_400 * 365;

fn parse_lifetime_secs(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|v: &i64| (1..=SESSION_TOKEN_LIFETIME_MAX_SECS).contains(v))
        .unwrap_or(SESSION_TOKEN_LIFETIME_DEFAULT_SECS)
}

/// Secrets shorter than this are refused.
pub(super) const MIN_SECRET_LEN: usize = 32;
