use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Level comes from `RUST_LOG`,
/// `info` when unset. The Functions host captures stdout, so no ANSI colours.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {e}"))
}
