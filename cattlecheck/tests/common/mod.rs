pub mod fixtures;
pub mod mock_classifier;

pub use fixtures::*;
pub use mock_classifier::MockClassifier;
