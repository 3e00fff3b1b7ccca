use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_server::config::{ServerConfig, StoreSource};
use bus_server::store::{MemoryRouteStore, SqlRouteStore};
use bus_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let state = match &config.source {
        StoreSource::Database(store_config) => match SqlRouteStore::new(store_config) {
            Ok(store) => AppState::new(store),
            Err(e) => {
                error!("failed to configure store: {e}");
                return ExitCode::FAILURE;
            }
        },
        StoreSource::Demo(path) => match MemoryRouteStore::from_json_file(path) {
            Ok(store) => {
                info!(
                    path = %path.display(),
                    states = store.states().len(),
                    offerings = store.offering_count(),
                    "loaded demo route data"
                );
                AppState::new(store)
            }
            Err(e) => {
                error!("failed to load demo data: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let app = create_router(state, &config.static_dir);

    let listener = match tokio::net::TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.listen_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Bus booking server listening on http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
