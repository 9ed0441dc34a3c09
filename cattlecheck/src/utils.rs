use base64::{Engine as _, engine::general_purpose::STANDARD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

const REPORT_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn fill_random(buf: &mut [u8]) -> Result<(), UtilError> {
    ring::rand::SystemRandom::new()
        .fill(buf)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))
}

pub(crate) fn base64_encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Uniformly random decimal code of exactly `digits` digits (leading zeros kept).
pub(crate) fn gen_numeric_code(digits: u32) -> Result<String, UtilError> {
    if digits == 0 || digits > 9 {
        return Err(UtilError::Format(format!(
            "Numeric code length must be between 1 and 9, got {digits}"
        )));
    }
    let modulus = 10u32.pow(digits);
    // Largest multiple of modulus representable in u32; values at or above it are rejected.
    let zone = u32::MAX - (u32::MAX % modulus);

    loop {
        let mut buf = [0u8; 4];
        fill_random(&mut buf)?;
        let candidate = u32::from_le_bytes(buf);
        if candidate < zone {
            let width = digits as usize;
            return Ok(format!("{:0width$}", candidate % modulus));
        }
    }
}

/// Human-shareable report identifier, e.g. `RPT20260101123045K7M2QX`.
pub(crate) fn gen_report_id(now: chrono::DateTime<chrono::Utc>) -> Result<String, UtilError> {
    let mut bytes = [0u8; 6];
    fill_random(&mut bytes)?;
    let suffix: String = bytes
        .iter()
        .map(|b| REPORT_ID_ALPHABET[(*b as usize) % REPORT_ID_ALPHABET.len()] as char)
        .collect();
    Ok(format!("RPT{}{}", now.format("%Y%m%d%H%M%S"), suffix))
}

pub(crate) fn gen_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
