//! Prints every message published on the weather channels.

use argh::FromArgs;
use tokio::sync::watch;
use weather_alert::{session, Channel};

#[derive(FromArgs)]
/// Subscribe to weather alerts and updates
struct Args {
    /// zenoh router endpoint to connect to
    #[argh(option, short = 'z')]
    zenoh_endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    let (shutdown_tx, mut shutdown_rx) = watch::channel(());
    ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        shutdown_tx.send(()).ok();
    })?;

    let endpoint = session::resolve_endpoint(args.zenoh_endpoint.as_deref());
    let session = session::open_session(&endpoint).await?;

    let mut subscribers = Vec::new();
    for channel in Channel::ALL {
        let subscriber = session
            .declare_subscriber(channel.key())
            .callback(|sample| {
                let message = String::from_utf8_lossy(&sample.payload().to_bytes()).into_owned();
                println!("Received message from {}: {}", sample.key_expr(), message);
            })
            .await?;
        subscribers.push(subscriber);
    }

    log::info!(
        "Subscribed to {} and {}",
        Channel::Alerts,
        Channel::Updates
    );

    let _ = shutdown_rx.changed().await;
    drop(subscribers);
    Ok(())
}
