use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ridereel_api::{AppStateInner, router};
use ridereel_db::{MemStore, SqliteStore, Store, seed};
use ridereel_payments::{CardProvider, WalletProvider};

const DEV_ADMIN_PASSWORD: &str = "change-me";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridereel=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("RIDEREEL_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let host = std::env::var("RIDEREEL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("RIDEREEL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let admin_username =
        std::env::var("RIDEREEL_ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
    let admin_password =
        std::env::var("RIDEREEL_ADMIN_PASSWORD").unwrap_or_else(|_| DEV_ADMIN_PASSWORD.into());
    if admin_password == DEV_ADMIN_PASSWORD {
        warn!("RIDEREEL_ADMIN_PASSWORD not set; using the development default");
    }

    // Store selection: a configured path means SQLite, otherwise fall back
    // to the non-persistent in-memory store.
    let store: Arc<dyn Store> = match std::env::var("RIDEREEL_DB_PATH") {
        Ok(path) if !path.is_empty() => Arc::new(SqliteStore::open(&PathBuf::from(path))?),
        _ => {
            warn!("RIDEREEL_DB_PATH not set; using in-memory store (data is not persisted)");
            Arc::new(MemStore::new())
        }
    };

    // First boot: admin account and sample catalog.
    let admin_hash = hash_password(&admin_password)?;
    seed::ensure_admin(store.as_ref(), &admin_username, &admin_hash)?;
    seed::seed_sample_catalog(store.as_ref())?;

    let state = Arc::new(AppStateInner {
        store,
        jwt_secret,
        card: Arc::new(CardProvider),
        wallet: Arc::new(WalletProvider),
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("ridereel server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash admin password: {}", e))?;
    Ok(hash.to_string())
}
