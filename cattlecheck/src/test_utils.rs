//! Shared fixtures for unit tests: isolated in-memory stores and scripted collaborators.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::coordination::{AuthCoordinator, ReportCoordinator};
use crate::credential::CredentialIssuer;
use crate::otp::{ChallengeStore, DeliveryError, MessageSender};
use crate::prediction::{
    Classification, Classifier, ClassifierError, HealthStatus, ImageUpload, PredictionPipeline,
    ReportStore,
};
use crate::storage::{DataStore, connect_data_store, in_memory_cache_store};
use crate::userdb::UserStore;

pub(crate) const TEST_SECRET: &[u8] = b"unit-test-secret-unit-test-secret-0123456";

/// A fresh private in-memory SQLite database per call
pub(crate) fn memory_data_store() -> Arc<dyn DataStore> {
    connect_data_store("sqlite", "sqlite::memory:").expect("in-memory sqlite")
}

/// Records every message instead of sending it
#[derive(Clone)]
pub(crate) struct RecordingSender {
    accept: bool,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingSender {
    pub(crate) fn accepting() -> Self {
        Self {
            accept: true,
            sent: Arc::default(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            accept: false,
            sent: Arc::default(),
        }
    }

    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// The code from the most recent message
    pub(crate) fn last_code(&self) -> Option<String> {
        let sent = self.sent();
        let (_, body) = sent.last()?;
        let rest = body.split("OTP is: ").nth(1)?;
        Some(rest.chars().take_while(|c| c.is_ascii_digit()).collect())
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        if self.accept {
            Ok(())
        } else {
            Err(DeliveryError::Transport("connection refused".to_string()))
        }
    }
}

pub(crate) async fn auth_coordinator(sender: RecordingSender) -> AuthCoordinator {
    let users = UserStore::new(memory_data_store());
    users.init().await.unwrap();
    let challenges = ChallengeStore::new(in_memory_cache_store(), Duration::minutes(5));
    let issuer = CredentialIssuer::new(TEST_SECRET, Duration::days(30)).unwrap();

    AuthCoordinator::new(users, challenges, issuer, Arc::new(sender))
        .expose_code_on_delivery_failure(false)
}

/// Classifier returning a canned answer and counting calls
pub(crate) struct FixedClassifier {
    result: Result<Classification, ClassifierError>,
    calls: AtomicUsize,
}

impl FixedClassifier {
    pub(crate) fn new(result: Result<Classification, ClassifierError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn foot_rot() -> Arc<Self> {
        Self::new(Ok(Classification {
            status: HealthStatus::Diseased,
            disease_name: "Foot Rot".to_string(),
            stage: "Early".to_string(),
            confidence: 87.0,
            precautions: vec!["Keep hooves dry".to_string()],
            recommendations: vec!["Consult a vet".to_string()],
        }))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _image: &ImageUpload) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub(crate) fn jpeg(len: usize) -> ImageUpload {
    ImageUpload {
        bytes: vec![0xAB; len],
        mime: "image/jpeg".to_string(),
        filename: "cow.jpg".to_string(),
    }
}

/// Report coordinator and user store sharing one database
pub(crate) async fn report_coordinator(
    classifier: Arc<FixedClassifier>,
) -> (ReportCoordinator, UserStore) {
    let store = memory_data_store();
    let users = UserStore::new(store.clone());
    users.init().await.unwrap();
    let reports = ReportStore::new(store);
    reports.init().await.unwrap();

    let pipeline = PredictionPipeline::new(classifier, reports, 10 * 1024 * 1024);
    (ReportCoordinator::new(pipeline, users.clone()), users)
}
