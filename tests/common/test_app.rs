use std::net::SocketAddr;

use fittrack::{create_router, database::connect_lazy, load_config, AppState, Config};
use reqwest::{redirect::Policy, Client};
use tokio::net::TcpListener;

/// HTTP test application wrapper
///
/// Runs the full router on a random port. The pool connects lazily, so
/// requests that never reach the database (guest chat, auth rejections,
/// validation errors, health) work without Postgres.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client with a cookie store
    pub client: Client,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = load_config().expect("Failed to load config");
        let pool = connect_lazy(&config.database).expect("Failed to build lazy pool");
        let state = AppState::new(config.clone(), pool).expect("Failed to build state");
        let app = create_router(state).expect("Failed to build router");

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            config,
        }
    }

    /// Get the full URL for an API endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
