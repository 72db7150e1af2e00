use anyhow::Context;

use cddemo_server::{parse_listen_addr, DemoServer, ServerConfig};

use crate::cli::Cli;

/// Configuration file first, then `--listen` on top.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = &cli.listen {
        config.bind_addr = parse_listen_addr(listen)?;
    }
    Ok(config)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    tracing::debug!(?config, "resolved configuration");
    DemoServer::in_memory(config).serve().await?;
    Ok(())
}
