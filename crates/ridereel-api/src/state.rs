use std::sync::Arc;

use tracing::error;

use ridereel_db::Store;
use ridereel_payments::PaymentProvider;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
    pub jwt_secret: String,
    pub card: Arc<dyn PaymentProvider>,
    pub wallet: Arc<dyn PaymentProvider>,
}

/// Run a blocking store call off the async runtime.
pub async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn Store) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Storage(anyhow::anyhow!("store task failed: {}", e))
        })?
        .map_err(ApiError::Storage)
}
