use std::sync::Arc;

use crate::credential::CredentialIssuer;
use crate::otp::{ChallengeStore, MessageSender, OTP_EXPOSE_CODE_ON_DELIVERY_FAILURE, otp_message};
use crate::userdb::{User, UserStore};

use super::errors::CoordinationError;
use super::types::{AuthSession, OAuthClaims, OtpDispatch, UserView};

/// Runs the sign-in flows and turns identities into session credentials.
#[derive(Clone)]
pub struct AuthCoordinator {
    users: UserStore,
    challenges: ChallengeStore,
    issuer: CredentialIssuer,
    sender: Arc<dyn MessageSender>,
    expose_code_on_delivery_failure: bool,
}

impl AuthCoordinator {
    pub fn new(
        users: UserStore,
        challenges: ChallengeStore,
        issuer: CredentialIssuer,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            users,
            challenges,
            issuer,
            sender,
            expose_code_on_delivery_failure: *OTP_EXPOSE_CODE_ON_DELIVERY_FAILURE,
        }
    }

    /// Return the code in [`OtpDispatch`] when delivery fails. Development only.
    pub fn expose_code_on_delivery_failure(mut self, enabled: bool) -> Self {
        self.expose_code_on_delivery_failure = enabled;
        self
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Sign in with identity-provider claims.
    ///
    /// The claims are taken as asserted; the provider's ID token is not verified here.
    #[tracing::instrument(skip(self, claims), fields(oauth_subject = %claims.subject))]
    pub async fn oauth_login(&self, claims: OAuthClaims) -> Result<AuthSession, CoordinationError> {
        if claims.subject.trim().is_empty() {
            return Err(CoordinationError::InvalidInput(
                "OAuth subject is required".to_string(),
            ));
        }
        if claims.name.trim().is_empty() {
            return Err(CoordinationError::InvalidInput("Name is required".to_string()));
        }

        let user = self
            .users
            .find_or_create_by_oauth_subject(
                &claims.subject,
                &claims.name,
                claims.email.as_deref(),
                claims.picture.as_deref(),
            )
            .await?;

        self.session_for(&user)
    }

    /// Issue a code for `phone` and try to deliver it.
    ///
    /// Delivery failure is not an error: the challenge stays valid.
    #[tracing::instrument(skip(self, phone))]
    pub async fn send_otp(&self, phone: &str) -> Result<OtpDispatch, CoordinationError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(CoordinationError::InvalidInput(
                "Phone number is required".to_string(),
            ));
        }

        let issued = self.challenges.issue(phone).await?;

        let delivered = match self.sender.send(phone, &otp_message(&issued.code)).await {
            Ok(()) => {
                tracing::info!("One-time code delivered");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "One-time code delivery failed");
                false
            }
        };

        let diagnostic_code =
            (!delivered && self.expose_code_on_delivery_failure).then_some(issued.code);

        Ok(OtpDispatch {
            delivered,
            expires_at: issued.expires_at,
            diagnostic_code,
        })
    }

    /// Check a code and sign in the identity bound to `phone`.
    ///
    /// `name` is only needed the first time a phone signs in.
    #[tracing::instrument(skip(self, phone, code, name))]
    pub async fn verify_otp(
        &self,
        phone: &str,
        code: &str,
        name: Option<&str>,
    ) -> Result<AuthSession, CoordinationError> {
        let phone = phone.trim();
        let code = code.trim();
        if phone.is_empty() || code.is_empty() {
            return Err(CoordinationError::InvalidInput(
                "Phone and OTP are required".to_string(),
            ));
        }

        self.challenges.verify(phone, code).await?;

        let user = self
            .users
            .find_or_create_by_phone(phone, name.unwrap_or_default())
            .await?;

        self.session_for(&user)
    }

    /// Resolve a bearer credential to its identity.
    pub async fn authenticate(&self, token: &str) -> Result<User, CoordinationError> {
        let user_id = self.issuer.validate(token)?;
        Ok(self.users.find_by_id(&user_id).await?)
    }

    /// Public view of the identity behind a bearer credential.
    pub async fn current_user(&self, token: &str) -> Result<UserView, CoordinationError> {
        let user = self.authenticate(token).await?;
        Ok(UserView::from(&user))
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, CoordinationError> {
        let (token, expires_at) = self.issuer.issue(&user.id)?;
        tracing::info!(user_id = %user.id, "Session credential issued");
        Ok(AuthSession {
            token,
            expires_at,
            user: UserView::from(user),
        })
    }
}
