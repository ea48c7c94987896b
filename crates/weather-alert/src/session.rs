use std::sync::Arc;

/// Default router endpoint (local zenohd).
pub const DEFAULT_ENDPOINT: &str = "tcp/127.0.0.1:7447";

/// Pick the Zenoh endpoint to connect to.
///
/// `ZENOH_ENDPOINT` wins over the CLI value, which wins over the default.
pub fn resolve_endpoint(cli: Option<&str>) -> String {
    std::env::var("ZENOH_ENDPOINT")
        .ok()
        .or_else(|| cli.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

/// Open a Zenoh session in client mode against `endpoint`.
pub async fn open_session(endpoint: &str) -> anyhow::Result<Arc<zenoh::Session>> {
    log::info!("Connecting to Zenoh at: {}", endpoint);

    let mut config = zenoh::Config::default();
    config
        .insert_json5("mode", r#""client""#)
        .map_err(|e| anyhow::anyhow!("Failed to set Zenoh mode: {}", e))?;
    config
        .insert_json5("connect/endpoints", &format!(r#"["{}"]"#, endpoint))
        .map_err(|e| anyhow::anyhow!("Failed to set Zenoh endpoint: {}", e))?;
    // Only talk to the configured router
    config
        .insert_json5("scouting/multicast/enabled", "false")
        .map_err(|e| anyhow::anyhow!("Failed to disable multicast: {}", e))?;

    let session = zenoh::open(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open Zenoh session: {}", e))?;

    log::info!("Connected to Zenoh");
    Ok(Arc::new(session))
}
