use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::config::{
    OTP_TTL_SECS, TWILIO_ACCOUNT_SID, TWILIO_API_BASE, TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER,
};
use super::errors::DeliveryError;

/// Outbound text-message channel used to deliver one-time codes.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), DeliveryError>;
}

pub(crate) fn otp_message(code: &str) -> String {
    format!(
        "Your Cattle Disease Detection OTP is: {code}. Valid for {} minutes.",
        (*OTP_TTL_SECS).div_ceil(60)
    )
}

/// Sends SMS through the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioSender {
    client: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from: String,
}

impl TwilioSender {
    pub fn new(account_sid: String, auth_token: String, from: String) -> Result<Self, DeliveryError> {
        Self::with_api_base(TWILIO_API_BASE, account_sid, auth_token, from)
    }

    pub fn with_api_base(
        api_base: &str,
        account_sid: String,
        auth_token: String,
        from: String,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            account_sid,
            auth_token,
            from,
        })
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), DeliveryError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        );

        let form = [("To", to), ("From", self.from.as_str()), ("Body", body)];

        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Message accepted by Twilio");
        Ok(())
    }
}

/// Fallback when no provider is configured: nothing is sent.
#[derive(Debug, Clone, Default)]
pub struct LogSender;

#[async_trait]
impl MessageSender for LogSender {
    async fn send(&self, _to: &str, _body: &str) -> Result<(), DeliveryError> {
        tracing::warn!("No SMS provider configured; message not sent");
        Err(DeliveryError::NotConfigured)
    }
}

/// Twilio when `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` and `TWILIO_PHONE_NUMBER`
/// are all set, otherwise [`LogSender`].
pub fn sender_from_env() -> Result<Arc<dyn MessageSender>, DeliveryError> {
    match (
        TWILIO_ACCOUNT_SID.clone(),
        TWILIO_AUTH_TOKEN.clone(),
        TWILIO_PHONE_NUMBER.clone(),
    ) {
        (Some(sid), Some(token), Some(from)) => {
            tracing::info!("SMS delivery via Twilio");
            Ok(Arc::new(TwilioSender::new(sid, token, from)?))
        }
        _ => {
            tracing::warn!("Twilio not configured; one-time codes will not be delivered");
            Ok(Arc::new(LogSender))
        }
    }
}
