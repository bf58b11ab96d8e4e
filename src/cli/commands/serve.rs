pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let config = crate::config::config();
    tracing::info!("Starting Hydro API in {:?} mode", config.environment);

    crate::serve(port).await
}
