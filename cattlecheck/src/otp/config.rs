use std::{env, sync::LazyLock};

/// Number of digits in an issued code
pub const OTP_CODE_DIGITS: u32 = 6;

/// Lifetime of an issued code, in seconds
pub static OTP_TTL_SECS: LazyLock<u64> =
    LazyLock::new(|| parse_ttl_secs(env::var("OTP_TTL_SECS").ok().as_deref()));

const OTP_TTL_DEFAULT_SECS: u64 = 300;

/// Upper bound for a configured code lifetime (one day)
const OTP_TTL_MAX_SECS: u64 = 86_400;

/// Zero, unparsable or out-of-range values fall back to the default.
fn parse_ttl_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|v: &u64| (1..=OTP_TTL_MAX_SECS).contains(v))
        .unwrap_or(OTP_TTL_DEFAULT_SECS)
}

/// Development aid: return the code to the caller when delivery fails.
/// Must stay off in production.
pub static OTP_EXPOSE_CODE_ON_DELIVERY_FAILURE: LazyLock<bool> = LazyLock::new(|| {
    env::var("OTP_EXPOSE_CODE_ON_DELIVERY_FAILURE")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
});

/// Cache entries outlive the challenge by this much so an expired challenge
/// can still be told apart from a missing one.
pub(super) const OTP_CACHE_GRACE_SECS: u64 = 300;

pub(super) const OTP_CACHE_PREFIX: &str = "otp";

pub(super) static TWILIO_ACCOUNT_SID: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty_env("TWILIO_ACCOUNT_SID"));

pub(super) static TWILIO_AUTH_TOKEN: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty_env("TWILIO_AUTH_TOKEN"));

pub(super) static TWILIO_PHONE_NUMBER: LazyLock<Option<String>> =
    LazyLock::new(|| non_empty_env("TWILIO_PHONE_NUMBER"));

pub(super) const TWILIO_API_BASE: &str = "https://api.twilio.com";

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
