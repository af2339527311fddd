//! Pokemon catalog lookups and a small turn-based battle simulator, exposed as
//! tools over a stdio JSON-RPC connection.
//!
//! The battle entry point is [`battle::BattleEngine`]; the tool surface is
//! [`tools::ToolService`].

pub mod battle;
pub mod catalog;
pub mod config;
pub mod damage;
pub mod format;
pub mod items;
pub mod model;
pub mod query;
pub mod rng;
pub mod server;
pub mod session;
pub mod tools;
pub mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::battle::BattleEngine;
use crate::catalog::PokeApiClient;
use crate::rng::SmallRngSource;
use crate::server::Server;
use crate::tools::ToolService;

pub use crate::config::ServerConfig;

/// Wires the catalog client, battle engine and tools together.
pub fn build_server(config: &ServerConfig) -> anyhow::Result<Server> {
    let chart = config.load_type_chart()?;
    let catalog = PokeApiClient::new(config.catalog_base_url.clone(), config.request_timeout())
        .context("Failed to build the catalog HTTP client")?;
    let (battle_seed, picker_seed) = config.seeds();
    let engine = BattleEngine::new(chart, Box::new(SmallRngSource::new(battle_seed)));
    let tools = ToolService::new(
        Arc::new(catalog),
        engine,
        Box::new(SmallRngSource::new(picker_seed)),
        config.default_level,
    );
    Ok(Server::new(tools))
}

/// Serves tool calls on stdin/stdout until stdin closes.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let server = build_server(&config)?;
    info!(catalog = %config.catalog_base_url, "serving tools on stdio");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server
        .serve(stdin, stdout)
        .await
        .context("stdio transport failed")?;
    Ok(())
}
