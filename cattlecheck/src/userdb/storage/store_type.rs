use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::storage::DataStore;
use crate::userdb::{
    errors::UserError,
    types::{Role, User},
};
use crate::utils::gen_user_id;

use super::postgres::*;
use super::sqlite::*;

/// Identity store. Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn DataStore>,
}

impl UserStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Initialize the user database tables
    pub async fn init(&self) -> Result<(), UserError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Resolve the identity bound to an OAuth subject, creating it on first sight.
    #[tracing::instrument(skip(self, name, email, picture), fields(oauth_subject = %subject))]
    pub async fn find_or_create_by_oauth_subject(
        &self,
        subject: &str,
        name: &str,
        email: Option<&str>,
        picture: Option<&str>,
    ) -> Result<User, UserError> {
        self.find_or_create_by_oauth_subject_at(subject, name, email, picture, Utc::now())
            .await
    }

    pub(crate) async fn find_or_create_by_oauth_subject_at(
        &self,
        subject: &str,
        name: &str,
        email: Option<&str>,
        picture: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, UserError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(UserError::InvalidData("OAuth subject is empty".to_string()));
        }
        if name.trim().is_empty() {
            return Err(UserError::NameRequired);
        }

        let candidate = User::from_oauth(
            gen_user_id(),
            subject.to_string(),
            name.to_string(),
            email.map(str::to_string),
            picture.map(str::to_string),
            now,
        );

        let result = if let Some(pool) = self.store.as_sqlite() {
            upsert_oauth_user_sqlite(pool, &candidate).await
        } else if let Some(pool) = self.store.as_postgres() {
            upsert_oauth_user_postgres(pool, &candidate).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(user) => tracing::info!(
                user_id = %user.id,
                created = user.id == candidate.id,
                "OAuth identity resolved"
            ),
            Err(e) => tracing::error!(error = %e, "OAuth identity resolution failed"),
        }

        result
    }

    /// Resolve the identity bound to a phone number.
    ///
    /// An empty `name` only matches an existing identity and fails with
    /// [`UserError::NameRequired`] when there is none.
    #[tracing::instrument(skip(self, phone, name))]
    pub async fn find_or_create_by_phone(&self, phone: &str, name: &str) -> Result<User, UserError> {
        self.find_or_create_by_phone_at(phone, name, Utc::now()).await
    }

    pub(crate) async fn find_or_create_by_phone_at(
        &self,
        phone: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<User, UserError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(UserError::InvalidData("Phone is empty".to_string()));
        }

        let result = if name.trim().is_empty() {
            let existing = if let Some(pool) = self.store.as_sqlite() {
                touch_phone_user_sqlite(pool, phone, now).await
            } else if let Some(pool) = self.store.as_postgres() {
                touch_phone_user_postgres(pool, phone, now).await
            } else {
                Err(UserError::Storage("Unsupported database type".to_string()))
            }?;
            existing.ok_or(UserError::NameRequired)
        } else {
            let candidate = User::from_phone(gen_user_id(), phone.to_string(), name.to_string(), now);
            if let Some(pool) = self.store.as_sqlite() {
                upsert_phone_user_sqlite(pool, &candidate).await
            } else if let Some(pool) = self.store.as_postgres() {
                upsert_phone_user_postgres(pool, &candidate).await
            } else {
                Err(UserError::Storage("Unsupported database type".to_string()))
            }
        };

        match &result {
            Ok(user) => tracing::info!(user_id = %user.id, "Phone identity resolved"),
            Err(UserError::NameRequired) => {
                tracing::debug!("No identity for phone and no name supplied")
            }
            Err(e) => tracing::error!(error = %e, "Phone identity resolution failed"),
        }

        result
    }

    /// Get a user by their ID
    #[tracing::instrument(skip(self), fields(user_id = %id))]
    pub async fn find_by_id(&self, id: &str) -> Result<User, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            get_user_by_id_sqlite(pool, id).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_user_by_id_postgres(pool, id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match result {
            Ok(Some(user)) => {
                tracing::debug!(found = true, "User lookup completed");
                Ok(user)
            }
            Ok(None) => {
                tracing::info!(found = false, "User lookup completed - not found");
                Err(UserError::NotFound)
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed");
                Err(e)
            }
        }
    }

    /// All identities, newest first
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        if let Some(pool) = self.store.as_sqlite() {
            get_all_users_sqlite(pool).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_all_users_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Change the role of an existing identity.
    #[tracing::instrument(skip(self), fields(user_id = %id, role = %role))]
    pub async fn set_role(&self, id: &str, role: Role) -> Result<User, UserError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            set_role_sqlite(pool, id, role).await
        } else if let Some(pool) = self.store.as_postgres() {
            set_role_postgres(pool, id, role).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }?;

        let user = result.ok_or(UserError::NotFound)?;
        tracing::info!("User role updated");
        Ok(user)
    }
}
