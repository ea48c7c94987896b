use argh::FromArgs;
use std::sync::Arc;
use tokio::sync::watch;
use weather_alert::{
    config::Config, control::run_threshold_queryable, session, AlertService, FileSource,
    OpenMeteoClient, ThresholdStore, WeatherSource, ZenohPublisher,
};

#[derive(FromArgs)]
/// Weather alert and status publisher for Zenoh
struct Args {
    /// path to the configuration file (optional, uses defaults)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// zenoh router endpoint to connect to
    /// Default: tcp/127.0.0.1:7447 (local zenohd router)
    #[argh(option, short = 'z')]
    zenoh_endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    // Load configuration (or use defaults)
    let config = if let Some(config_path) = &args.config {
        match Config::from_file(config_path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to load config from '{}': {}", config_path, e);
                std::process::exit(1);
            }
        }
    } else {
        log::info!("No config file specified, using defaults");
        Config::default()
    };

    let source: Arc<dyn WeatherSource> = match &config.mock_data_path {
        Some(path) => {
            log::info!("Using mock weather data from {}", path.display());
            Arc::new(FileSource::new(path))
        }
        None => {
            log::info!("Using weather API at {}", config.endpoint_url);
            Arc::new(OpenMeteoClient::new(
                config.endpoint_url.clone(),
                config.fetch_timeout(),
            )?)
        }
    };

    let thresholds = Arc::new(ThresholdStore::from_map(&config.thresholds));
    log::info!("{} custom threshold(s) registered", thresholds.len());

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // Set up Ctrl+C handler
    ctrlc::set_handler({
        let shutdown_tx = shutdown_tx.clone();
        move || {
            log::info!("Received Ctrl+C, shutting down gracefully...");
            shutdown_tx.send(()).ok();
        }
    })?;

    let endpoint = session::resolve_endpoint(args.zenoh_endpoint.as_deref());
    let session = session::open_session(&endpoint).await?;
    let publisher = Arc::new(ZenohPublisher::new(&session).await?);

    let control_task = tokio::spawn({
        let session = session.clone();
        let thresholds = thresholds.clone();
        let shutdown_rx = shutdown_rx.clone();
        async move {
            if let Err(e) = run_threshold_queryable(session, thresholds, shutdown_rx).await {
                log::error!("Threshold queryable error: {}", e);
            }
        }
    });

    let service = AlertService::new(source, publisher, thresholds, config.schedule())?;
    let handle = service.spawn(shutdown_rx);

    log::info!("Weather alert node running. Press Ctrl+C to exit.");

    // Runs until the Ctrl+C handler fires
    handle.join().await;
    control_task.await.ok();

    log::info!("Weather alert node stopped.");
    Ok(())
}
