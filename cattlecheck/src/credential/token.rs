use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use super::config::{AUTH_SERVER_SECRET, MIN_SECRET_LEN, SESSION_TOKEN_LIFETIME_SECS};
use super::errors::CredentialError;

/// Payload of a session credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Internal user id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates stateless HS256 session credentials.
#[derive(Clone)]
pub struct CredentialIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl CredentialIssuer {
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, CredentialError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(CredentialError::Config(format!(
                "Signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if lifetime <= Duration::zero() {
            return Err(CredentialError::Config(
                "Credential lifetime must be positive".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        })
    }

    /// Build from `AUTH_SERVER_SECRET` and `SESSION_TOKEN_LIFETIME_SECS`.
    pub fn from_env() -> Result<Self, CredentialError> {
        let secret = AUTH_SERVER_SECRET
            .as_deref()
            .ok_or_else(|| CredentialError::Config("AUTH_SERVER_SECRET is not set".to_string()))?;
        Self::new(
            secret.as_bytes(),
            Duration::seconds(*SESSION_TOKEN_LIFETIME_SECS),
        )
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a credential for `user_id`, valid from now for the configured lifetime.
    pub fn issue(&self, user_id: &str) -> Result<(String, DateTime<Utc>), CredentialError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), CredentialError> {
        let expires_at = now + self.lifetime;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::Signing(e.to_string()))?;

        Ok((token, expires_at))
    }

    /// Verify the signature, then the expiry, and return the subject.
    pub fn validate(&self, token: &str) -> Result<String, CredentialError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the supplied clock
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    CredentialError::BadSignature
                }
                _ => CredentialError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(CredentialError::Expired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret-0123";

    fn issuer() -> CredentialIssuer {
        CredentialIssuer::new(SECRET, Duration::days(30)).unwrap()
    }

    #[test]
    fn test_issue_then_validate_immediately() {
        let issuer = issuer();
        let now = Utc::now();

        let (token, expires_at) = issuer.issue_at("user-1", now).unwrap();

        assert_eq!(issuer.validate_at(&token, now).unwrap(), "user-1");
        assert_eq!(expires_at.timestamp() - now.timestamp(), 30 * 24 * 3600);
    }

    #[test]
    fn test_expired_after_lifetime() {
        // Given a credential issued now
        let issuer = issuer();
        let now = Utc::now();
        let (token, _) = issuer.issue_at("user-1", now).unwrap();

        // When validated just before and exactly at its lifetime
        let before = issuer.validate_at(&token, now + Duration::days(30) - Duration::seconds(1));
        let at = issuer.validate_at(&token, now + Duration::days(30));

        // Then it is accepted, then expired
        assert_eq!(before.unwrap(), "user-1");
        assert_eq!(at, Err(CredentialError::Expired));
    }

    #[test]
    fn test_foreign_secret_is_bad_signature() {
        let other =
            CredentialIssuer::new(b"another-secret-another-secret-012345", Duration::days(30))
                .unwrap();
        let (token, _) = other.issue("user-1").unwrap();

        assert_eq!(issuer().validate(&token), Err(CredentialError::BadSignature));
    }

    #[test]
    fn test_bad_signature_checked_before_expiry() {
        let other =
            CredentialIssuer::new(b"another-secret-another-secret-012345", Duration::days(30))
                .unwrap();
        let now = Utc::now();
        let (token, _) = other.issue_at("user-1", now).unwrap();

        let result = issuer().validate_at(&token, now + Duration::days(365));

        assert_eq!(result, Err(CredentialError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert_eq!(issuer().validate("not-a-token"), Err(CredentialError::Malformed));
        assert_eq!(issuer().validate(""), Err(CredentialError::Malformed));
    }

    #[test]
    fn test_rejects_short_secret() {
        let result = CredentialIssuer::new(b"short", Duration::days(1));
        assert!(matches!(result, Err(CredentialError::Config(_))));
    }
}
