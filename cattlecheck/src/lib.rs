//! cattlecheck - phone and OAuth sign-in, session credentials and cattle disease prediction
//!
//! The crate unifies two sign-in flows behind one identity store, issues stateless
//! bearer credentials, and runs uploaded images through an external classifier,
//! persisting each outcome as a report owned by the submitting user.

mod coordination;
mod credential;
mod otp;
mod prediction;
mod storage;
mod userdb;
mod utils;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

pub use coordination::{
    AuthCoordinator, AuthSession, CoordinationError, OAuthClaims, OtpDispatch, ReportCoordinator,
    ReportSummary, UserView,
};
pub use credential::{Claims, CredentialError, CredentialIssuer};
pub use otp::{
    ChallengeStore, DeliveryError, IssuedChallenge, LogSender, MessageSender, OtpError,
    TwilioSender, sender_from_env,
};
pub use prediction::{
    Classification, Classifier, ClassifierError, HealthStatus, HttpClassifier, ImageUpload,
    PredictionError, PredictionPipeline, PredictionReport, ReportError, ReportFilter, ReportPage,
    ReportStore, StatusParseError,
};
pub use storage::{
    CacheStore, DataStore, SharedCacheStore, StorageError, cache_store_from_env,
    connect_data_store, data_store_from_env, in_memory_cache_store, redis_cache_store,
};
pub use userdb::{Role, RoleParseError, User, UserError, UserStore};

/// The two coordinators an application serves requests with
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthCoordinator>,
    pub reports: Arc<ReportCoordinator>,
}

impl Services {
    /// Wire coordinators over explicit stores and collaborators, creating tables as needed.
    pub async fn build(
        data_store: Arc<dyn DataStore>,
        cache_store: SharedCacheStore,
        issuer: CredentialIssuer,
        sender: Arc<dyn MessageSender>,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let users = UserStore::new(data_store.clone());
        users.init().await?;
        let reports = ReportStore::new(data_store);
        reports.init().await?;

        let auth = AuthCoordinator::new(
            users.clone(),
            ChallengeStore::with_default_ttl(cache_store),
            issuer,
            sender,
        );
        let pipeline = PredictionPipeline::with_default_limit(classifier, reports);

        Ok(Self {
            auth: Arc::new(auth),
            reports: Arc::new(ReportCoordinator::new(pipeline, users)),
        })
    }
}

/// Build [`Services`] entirely from environment configuration.
pub async fn init() -> Result<Services, Box<dyn std::error::Error + Send + Sync>> {
    let data_store = data_store_from_env()?;
    let cache_store = cache_store_from_env().await?;
    let issuer = CredentialIssuer::from_env()?;
    let sender = sender_from_env()?;
    let classifier: Arc<dyn Classifier> = Arc::new(HttpClassifier::from_env()?);

    Services::build(data_store, cache_store, issuer, sender, classifier).await
}
