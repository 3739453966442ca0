use tracing_subscriber::EnvFilter;

/// Initialize tracing with env filter, writing to stderr
/// Filter out actix-server worker and accept messages unless RUST_LOG asks for them
pub fn init() -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive("actix_server::worker=warn".parse()?)
            .add_directive("actix_server::accept=warn".parse()?),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
