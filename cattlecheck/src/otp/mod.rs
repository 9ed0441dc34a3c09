mod challenge;
mod config;
mod delivery;
mod errors;
mod types;

pub use challenge::ChallengeStore;
pub use config::OTP_EXPOSE_CODE_ON_DELIVERY_FAILURE;
pub use delivery::{LogSender, MessageSender, TwilioSender, sender_from_env};
pub use errors::{DeliveryError, OtpError};
pub use types::IssuedChallenge;

pub(crate) use delivery::otp_message;
