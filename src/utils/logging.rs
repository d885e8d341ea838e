use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` replaces the CLI level entirely when it is set.
fn build_filter(level: Level, env: Option<&str>) -> Result<EnvFilter> {
    let filter = match env {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_new(format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level))?,
    };
    Ok(filter)
}

/// Logs go to stderr so they never interleave with tool output on stdout.
pub fn init(level: Level) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(level, env.as_deref().filter(|v| !v.trim().is_empty()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
