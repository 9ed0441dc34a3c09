mod classifier;
mod config;
mod errors;
mod pipeline;
mod storage;
mod types;

pub use classifier::{Classifier, HttpClassifier};
pub use errors::{ClassifierError, PredictionError, ReportError};
pub use pipeline::PredictionPipeline;
pub use storage::ReportStore;
pub use types::{
    Classification, HealthStatus, ImageUpload, PredictionReport, ReportFilter, ReportPage,
    StatusParseError,
};
