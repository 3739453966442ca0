mod logger;

use anyhow::Context;
use server::{Receiver, ServerConfig};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    logger::init()?;

    info!("Starting upload receiver (PID: {})", std::process::id());

    let config = ServerConfig::load().context("Invalid server configuration")?;
    info!(
        "Storage root: {:?}, listen addresses: {:?}",
        config.storage_root, config.listen
    );

    let mut receiver = Receiver::new(config);
    receiver
        .start()
        .await
        .context("Failed to start receiver")?;

    // Runs until the server receives a shutdown signal
    receiver.wait().await?;

    info!("Receiver stopped");
    Ok(())
}
