use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

/// Authorization level of an identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Standard,
    Privileged,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Privileged => "privileged",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "standard" => Ok(Role::Standard),
            "privileged" => Ok(Role::Privileged),
            _ => Err(RoleParseError(value)),
        }
    }
}

/// Canonical identity unifying OAuth and phone sign-ins
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Opaque internal identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Subject id asserted by the OAuth identity provider
    pub oauth_subject: Option<String>,
    pub picture: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub last_authenticated_at: DateTime<Utc>,
}

impl User {
    /// A verified identity created through the OAuth flow
    pub(crate) fn from_oauth(
        id: String,
        subject: String,
        name: String,
        email: Option<String>,
        picture: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()),
            phone: None,
            oauth_subject: Some(subject),
            picture: picture.filter(|p| !p.is_empty()),
            role: Role::Standard,
            is_verified: true,
            created_at: now,
            last_authenticated_at: now,
        }
    }

    /// A verified identity created through the phone one-time-code flow
    pub(crate) fn from_phone(id: String, phone: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: None,
            phone: Some(phone),
            oauth_subject: None,
            picture: None,
            role: Role::Standard,
            is_verified: true,
            created_at: now,
            last_authenticated_at: now,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role == Role::Privileged
    }

    /// At least one external identifier must be present.
    pub fn has_identifier(&self) -> bool {
        self.email.is_some() || self.phone.is_some() || self.oauth_subject.is_some()
    }
}
