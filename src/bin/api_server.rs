// src/bin/api_server.rs

use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use vvallet_client::transport;
use vvallet_client::{ClientConfig, VVallet};

/// Read-only HTTP API over the vvallet program.
#[derive(Parser, Debug)]
#[command(name = "api_server")]
struct Args {
    /// Address the API listens on.
    #[arg(long, env = "API_BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    // --- Client Initialization ---
    println!("> Initializing read-only vvallet client...");
    let config = ClientConfig::from_env()?;
    let client = VVallet::read_only(&config)?;
    println!("> RPC endpoint: {}", redact(client.endpoint(), config.cluster.private_key.as_deref()));
    println!("> Program id: {}", client.program_id());

    let app_state = transport::http::AppState {
        client: Arc::new(client),
    };

    // --- API Server Initialization ---
    let bind_addr = args.bind;
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("> API server listening on http://{}", bind_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\n> Shutdown signal received (Ctrl+C)...");
        })
        .await?;

    println!("> Graceful shutdown complete.");
    Ok(())
}

/// Keeps the private cluster key out of the logs.
fn redact(endpoint: &str, key: Option<&str>) -> String {
    match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => endpoint.replace(k, "***"),
        None => endpoint.to_string(),
    }
}
