use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use crate::catalog::DEFAULT_BASE_URL;
use crate::model::DEFAULT_LEVEL;
use crate::types::TypeChart;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Parser, Debug, Clone)]
#[command(name = "pokemon-mcp")]
#[command(version, about = "Pokemon lookups and battles served as tools over stdio")]
pub struct ServerConfig {
    /// Base URL of the PokeAPI-compatible catalog.
    #[arg(long = "catalog-url", env = "POKEMON_MCP_CATALOG_URL", default_value = DEFAULT_BASE_URL)]
    pub catalog_base_url: String,

    /// Per-request timeout for catalog lookups.
    #[arg(
        long = "timeout-secs",
        env = "POKEMON_MCP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout_secs: u64,

    /// Level used when start_battle does not pass one.
    #[arg(
        long,
        env = "POKEMON_MCP_DEFAULT_LEVEL",
        default_value_t = DEFAULT_LEVEL,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub default_level: u32,

    /// JSON file replacing the built-in type chart.
    #[arg(long, env = "POKEMON_MCP_TYPE_CHART")]
    pub type_chart: Option<PathBuf>,

    /// Seed for battle and selection randomness.
    #[arg(long, env = "POKEMON_MCP_SEED")]
    pub seed: Option<u64>,

    #[arg(long, env = "POKEMON_MCP_LOG", default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_level: DEFAULT_LEVEL,
            type_chart: None,
            seed: None,
            log_level: Level::INFO,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn load_type_chart(&self) -> anyhow::Result<TypeChart> {
        match &self.type_chart {
            Some(path) => TypeChart::load(path)
                .with_context(|| format!("--type-chart {} is unusable", path.display())),
            None => Ok(TypeChart::builtin()),
        }
    }

    /// Seeds for the battle engine and the selection tools; the second is offset so they differ.
    pub fn seeds(&self) -> (Option<u64>, Option<u64>) {
        (self.seed, self.seed.map(|s| s.wrapping_add(1)))
    }
}
