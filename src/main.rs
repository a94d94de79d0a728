use devnet_api::config;
use devnet_api::database::DatabaseManager;
use devnet_api::server;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Devnet API in {:?} mode", config.environment);

    // Apply the embedded schema; the server still boots without a database
    // and reports degraded health until one appears
    if let Err(e) = DatabaseManager::bootstrap_schema().await {
        tracing::warn!("Schema bootstrap skipped: {}", e);
    }

    let app = server::app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Devnet API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
