mod config;
mod errors;
mod token;

pub use errors::CredentialError;
pub use token::{Claims, CredentialIssuer};
