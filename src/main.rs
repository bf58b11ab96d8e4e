#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = hydro_api_rust::config::config();
    tracing::info!("Starting Hydro API in {:?} mode", config.environment);

    if let Err(e) = hydro_api_rust::serve(None).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
