//! SQLite registration repository implementation.
//!
//! Implements `RegistrationRepository` from `securehook-core` using sqlx with
//! split read/write pools. Rows hold the credential digest, never a token.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use securehook_core::repository::registration::RegistrationRepository;
use securehook_types::error::RepositoryError;
use securehook_types::registration::{CredentialHash, EndpointId, EndpointRegistration};

use super::pool::DatabasePool;

pub struct SqliteRegistrationRepository {
    pool: DatabasePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

/// Fixed-width RFC 3339 so `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Corrupt(format!("invalid datetime: {e}")))
}

fn query_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn row_to_registration(row: &SqliteRow) -> Result<EndpointRegistration, RepositoryError> {
    let endpoint_id: String = row.try_get("endpoint_id").map_err(query_error)?;
    let credential_hash: String = row.try_get("credential_hash").map_err(query_error)?;
    let title: String = row.try_get("title").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(EndpointRegistration {
        id: EndpointId::try_from(endpoint_id).map_err(RepositoryError::Corrupt)?,
        credential_hash: CredentialHash::from_hex(&credential_hash)
            .map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
        title,
        created_at: parse_datetime(&created_at)?,
    })
}

impl RegistrationRepository for SqliteRegistrationRepository {
    async fn create(&self, registration: &EndpointRegistration) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO webhook_registrations (endpoint_id, credential_hash, title, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(registration.id.as_str())
        .bind(registration.credential_hash.expose_hex())
        .bind(&registration.title)
        .bind(format_datetime(&registration.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(registration.id.to_string())
            }
            other => query_error(other),
        })?;

        Ok(())
    }

    async fn get(&self, id: &EndpointId) -> Result<Option<EndpointRegistration>, RepositoryError> {
        let row = sqlx::query(
            "SELECT endpoint_id, credential_hash, title, created_at
             FROM webhook_registrations WHERE endpoint_id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(row_to_registration).transpose()
    }

    async fn list(&self) -> Result<Vec<EndpointRegistration>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT endpoint_id, credential_hash, title, created_at
             FROM webhook_registrations ORDER BY created_at ASC, endpoint_id ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(row_to_registration).collect()
    }

    async fn delete(&self, id: &EndpointId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM webhook_registrations WHERE endpoint_id = ?")
            .bind(id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}
