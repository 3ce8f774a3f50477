//! Tracing setup
//!
//! Logs go to stderr; stdout carries the MCP protocol.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the server.
///
/// Filtering follows `RUST_LOG`, with `github_repos_mcp=info` added as the
/// default directive. Set `LOG_FORMAT=json` for structured JSON output.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("github_repos_mcp=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
