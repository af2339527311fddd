use clap::Parser;
use pokemon_mcp::{run, ServerConfig};

fn init_logging(config: &ServerConfig) {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config);
    run(config).await
}
