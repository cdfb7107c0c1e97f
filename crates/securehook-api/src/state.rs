//! Application state wiring services to their infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use securehook_core::service::setup::SetupService;
use securehook_infra::crypto::hash::Sha256CredentialHasher;
use securehook_infra::crypto::token::OsRngTokenGenerator;
use securehook_infra::sqlite::pool::{DatabasePool, database_url};
use securehook_infra::sqlite::registration::SqliteRegistrationRepository;
use securehook_types::config::ServerConfig;

/// `SetupService` pinned to SQLite, SHA-256 and the OS RNG.
pub type ConcreteSetupService =
    SetupService<SqliteRegistrationRepository, Sha256CredentialHasher, OsRngTokenGenerator>;

/// Shared state for CLI commands and the server.
#[derive(Clone)]
pub struct AppState {
    pub setup_service: Arc<ConcreteSetupService>,
    pub config: ServerConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Create the data directory if needed, open the database and wire services.
    pub async fn init(data_dir: PathBuf, config: ServerConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let setup_service = SetupService::new(
            SqliteRegistrationRepository::new(db_pool.clone()),
            Sha256CredentialHasher::new(),
            OsRngTokenGenerator,
        );

        Ok(Self {
            setup_service: Arc::new(setup_service),
            config,
            data_dir,
            db_pool,
        })
    }

    /// Public URL of an endpoint on the configured listener.
    pub fn webhook_url(&self, endpoint_id: &str) -> String {
        format!(
            "http://{}:{}/api/webhook/{endpoint_id}",
            self.config.host, self.config.port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_creates_data_dir_and_database() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("nested");

        let state = AppState::init(data_dir.clone(), ServerConfig::default())
            .await
            .unwrap();

        assert!(data_dir.join("securehook.db").exists());
        assert!(state.setup_service.list_endpoints().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn webhook_url_uses_configured_listener() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            host: "10.0.0.5".to_string(),
            port: 9000,
            ..ServerConfig::default()
        };
        let state = AppState::init(tmp.path().to_path_buf(), config).await.unwrap();

        assert_eq!(
            state.webhook_url("garage"),
            "http://10.0.0.5:9000/api/webhook/garage"
        );
    }
}
