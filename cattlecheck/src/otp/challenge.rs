use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;

use crate::storage::{CacheData, SharedCacheStore};
use crate::utils::gen_numeric_code;

use super::config::{OTP_CACHE_GRACE_SECS, OTP_CACHE_PREFIX, OTP_CODE_DIGITS, OTP_TTL_SECS};
use super::errors::OtpError;
use super::types::{IssuedChallenge, StoredChallenge};

/// Pending one-time-code challenges, at most one per phone number.
#[derive(Clone)]
pub struct ChallengeStore {
    cache: SharedCacheStore,
    ttl: Duration,
}

impl ChallengeStore {
    pub fn new(cache: SharedCacheStore, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// A store using the `OTP_TTL_SECS` lifetime.
    pub fn with_default_ttl(cache: SharedCacheStore) -> Self {
        Self::new(cache, Duration::seconds(*OTP_TTL_SECS as i64))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a fresh code for `phone`, replacing any live challenge.
    pub async fn issue(&self, phone: &str) -> Result<IssuedChallenge, OtpError> {
        self.issue_at(phone, Utc::now()).await
    }

    pub(crate) async fn issue_at(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedChallenge, OtpError> {
        let challenge = StoredChallenge {
            phone: phone.to_string(),
            code: gen_numeric_code(OTP_CODE_DIGITS)?,
            created_at: now,
            expires_at: now + self.ttl,
        };
        let data = CacheData::try_from(&challenge)?;
        let cache_ttl = self.ttl.num_seconds().max(0) as u64 + OTP_CACHE_GRACE_SECS;

        self.cache
            .lock()
            .await
            .put_with_ttl(OTP_CACHE_PREFIX, phone, data, cache_ttl as usize)
            .await?;

        tracing::debug!(expires_at = %challenge.expires_at, "Issued one-time code");

        Ok(IssuedChallenge {
            code: challenge.code,
            expires_at: challenge.expires_at,
        })
    }

    /// Check `code` against the live challenge for `phone`.
    ///
    /// A matching code consumes the challenge; only one concurrent caller can
    /// succeed. A mismatch leaves the challenge in place.
    pub async fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        self.verify_at(phone, code, Utc::now()).await
    }

    pub(crate) async fn verify_at(
        &self,
        phone: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        let raw = self
            .cache
            .lock()
            .await
            .get(OTP_CACHE_PREFIX, phone)
            .await?
            .ok_or(OtpError::NotFound)?;
        let challenge = StoredChallenge::try_from(raw.clone())?;

        if now > challenge.expires_at {
            self.cache
                .lock()
                .await
                .remove_if_eq(OTP_CACHE_PREFIX, phone, &raw)
                .await?;
            return Err(OtpError::Expired);
        }

        let matches: bool = challenge.code.as_bytes().ct_eq(code.as_bytes()).into();
        if !matches {
            return Err(OtpError::Mismatch);
        }

        let consumed = self
            .cache
            .lock()
            .await
            .remove_if_eq(OTP_CACHE_PREFIX, phone, &raw)
            .await?;
        if !consumed {
            // Another verifier consumed it, or a newer code replaced it
            return Err(OtpError::NotFound);
        }

        Ok(())
    }
}
