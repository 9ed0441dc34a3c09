use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::storage::validate_sqlite_table_schema;
use crate::userdb::{
    errors::UserError,
    types::{Role, User},
};

use super::config::DB_TABLE_USERS;

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            phone TEXT UNIQUE,
            oauth_subject TEXT UNIQUE,
            picture TEXT,
            role TEXT NOT NULL DEFAULT 'standard',
            is_verified BOOLEAN NOT NULL DEFAULT true,
            created_at TIMESTAMP NOT NULL,
            last_authenticated_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = [
        ("id", "TEXT"),
        ("name", "TEXT"),
        ("email", "TEXT"),
        ("phone", "TEXT"),
        ("oauth_subject", "TEXT"),
        ("picture", "TEXT"),
        ("role", "TEXT"),
        ("is_verified", "BOOLEAN"),
        ("created_at", "TIMESTAMP"),
        ("last_authenticated_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

/// Single conditional insert keyed on the OAuth subject.
/// A returning identity only has its authentication time bumped.
pub(super) async fn upsert_oauth_user_sqlite(
    pool: &Pool<Sqlite>,
    user: &User,
) -> Result<User, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let row = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name}
            (id, name, email, phone, oauth_subject, picture, role, is_verified, created_at, last_authenticated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (oauth_subject) DO UPDATE SET
            last_authenticated_at = excluded.last_authenticated_at
        RETURNING *
        "#
    ))
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&user.oauth_subject)
    .bind(&user.picture)
    .bind(user.role.as_str())
    .bind(user.is_verified)
    .bind(user.created_at)
    .bind(user.last_authenticated_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Single conditional insert keyed on the phone number. The existing name is kept.
pub(super) async fn upsert_phone_user_sqlite(
    pool: &Pool<Sqlite>,
    user: &User,
) -> Result<User, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let row = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO {table_name}
            (id, name, email, phone, oauth_subject, picture, role, is_verified, created_at, last_authenticated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (phone) DO UPDATE SET
            last_authenticated_at = excluded.last_authenticated_at
        RETURNING *
        "#
    ))
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(&user.oauth_subject)
    .bind(&user.picture)
    .bind(user.role.as_str())
    .bind(user.is_verified)
    .bind(user.created_at)
    .bind(user.last_authenticated_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub(super) async fn touch_phone_user_sqlite(
    pool: &Pool<Sqlite>,
    phone: &str,
    now: DateTime<Utc>,
) -> Result<Option<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    let row = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE {table_name} SET last_authenticated_at = ?
        WHERE phone = ?
        RETURNING *
        "#
    ))
    .bind(now)
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub(super) async fn get_user_by_id_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn get_all_users_sqlite(pool: &Pool<Sqlite>) -> Result<Vec<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {table_name} ORDER BY created_at DESC, id DESC
        "#
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn set_role_sqlite(
    pool: &Pool<Sqlite>,
    id: &str,
    role: Role,
) -> Result<Option<User>, UserError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE {table_name} SET role = ? WHERE id = ?
        RETURNING *
        "#
    ))
    .bind(role.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}
