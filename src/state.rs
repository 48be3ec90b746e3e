use std::sync::Arc;

use edulink_config::{GatewayConfig, StorageConfig};
use edulink_core::AppError;
use edulink_gateway::{AuthGateway, SupabaseGateway};
use edulink_storage::{FileStorage, KeyValueStorage, ProfileStore};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn AuthGateway>,
    pub profiles: ProfileStore,
    pub gateway_config: GatewayConfig,
    pub storage_config: StorageConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gateway_config", &self.gateway_config)
            .field("storage_config", &self.storage_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(gateway: Arc<dyn AuthGateway>, profiles: ProfileStore) -> Self {
        Self {
            gateway,
            profiles,
            gateway_config: GatewayConfig::default(),
            storage_config: StorageConfig::default(),
        }
    }
}

/// Builds the state from the environment and migrates the stored profile, if any.
pub fn init_app_state() -> Result<AppState, AppError> {
    let gateway_config = GatewayConfig::from_env();
    let storage_config = StorageConfig::from_env();

    let gateway = SupabaseGateway::new(gateway_config.clone()).map_err(AppError::internal)?;
    let storage: Arc<dyn KeyValueStorage> =
        Arc::new(FileStorage::new(storage_config.data_dir.clone()));

    let profiles = ProfileStore::new(storage);
    profiles.init().map_err(AppError::storage)?;

    Ok(AppState {
        gateway: Arc::new(gateway),
        profiles,
        gateway_config,
        storage_config,
    })
}
