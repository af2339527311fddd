//! Typed lookups against the remote creature catalog.
//!
//! [`CatalogClient`] is the seam: the server talks to PokeAPI through
//! [`PokeApiClient`], tests plug in an in-memory catalog. Every failure comes
//! back as a [`CatalogError`]; nothing panics past this boundary.

mod pokeapi;

use async_trait::async_trait;
use tracing::warn;

use crate::model::{Combatant, Move, MoveCategory, Stats, StatusKind, MAX_MOVES};

pub use pokeapi::{PokeApiClient, DEFAULT_BASE_URL};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog request timed out")]
    Timeout,
    #[error("'{0}' was not found in the catalog")]
    NotFound(String),
    #[error("'{0}' is not a valid catalog name")]
    InvalidName(String),
    #[error("catalog answered with HTTP {0}")]
    Status(u16),
    #[error("malformed catalog response: {0}")]
    Parse(String),
}

/// Roster entry pointing at a creature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatureRef {
    pub name: String,
    pub url: String,
}

impl CreatureRef {
    /// Numeric id taken from the trailing path segment of the resource url.
    pub fn id(&self) -> Option<u32> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }

    /// What to pass to [`CatalogClient::fetch_creature`]: the id when known.
    pub fn lookup_key(&self) -> String {
        self.id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatureRecord {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Stats,
    pub abilities: Vec<String>,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub base_experience: u32,
    pub moves: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlavorText {
    pub language: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    pub genus: Option<String>,
    pub flavor_texts: Vec<FlavorText>,
}

impl SpeciesRecord {
    pub fn english_description(&self) -> Option<&str> {
        self.flavor_texts
            .iter()
            .find(|entry| entry.language == "en")
            .map(|entry| entry.text.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub name: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    pub damage_class: String,
    pub affinity: String,
    pub ailment: Option<String>,
    pub ailment_chance: u32,
}

impl MoveRecord {
    /// Missing power becomes 0, missing accuracy 100 and missing pp 20.
    pub fn into_move(self) -> Move {
        let mut mv = Move::new(
            &self.name,
            &self.affinity,
            MoveCategory::from_damage_class(&self.damage_class),
            self.power.unwrap_or(0),
            self.accuracy.unwrap_or(100),
        );
        mv.pp = self.pp.unwrap_or(20);
        if let Some(kind) = self.ailment.as_deref().and_then(StatusKind::from_ailment) {
            mv = mv.with_ailment(kind, self.ailment_chance);
        }
        mv
    }
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_creature(&self, id_or_name: &str) -> Result<CreatureRecord, CatalogError>;

    async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, CatalogError>;

    async fn fetch_generation_roster(
        &self,
        generation: u32,
    ) -> Result<Vec<CreatureRef>, CatalogError>;

    async fn fetch_affinity_roster(
        &self,
        affinity: &str,
    ) -> Result<Vec<CreatureRef>, CatalogError>;

    async fn fetch_move(&self, name: &str) -> Result<MoveRecord, CatalogError>;
}

/// Lowercased, trimmed lookup key; `#25` and ` Pikachu ` become `25` and `pikachu`.
pub fn normalize_key(id_or_name: &str) -> String {
    id_or_name
        .trim()
        .trim_start_matches('#')
        .to_ascii_lowercase()
        .replace(' ', "-")
}

/// Fallback for creatures whose move lookups all failed.
pub fn struggle() -> Move {
    Move::new("struggle", "normal", MoveCategory::Physical, 50, 100)
}

/// Builds a battle-ready combatant: stats, types and up to four moves.
///
/// Only the creature lookup is fatal. Moves that fail to load are skipped.
pub async fn hydrate_combatant(
    catalog: &dyn CatalogClient,
    id_or_name: &str,
    level: u32,
) -> Result<Combatant, CatalogError> {
    let record = catalog.fetch_creature(&normalize_key(id_or_name)).await?;
    let mut moves = Vec::with_capacity(MAX_MOVES);
    for name in record.moves.iter().take(MAX_MOVES) {
        match catalog.fetch_move(name).await {
            Ok(detail) => moves.push(detail.into_move()),
            Err(err) => {
                warn!(creature = %record.name, move_name = %name, error = %err, "skipping move")
            }
        }
    }
    if moves.is_empty() {
        moves.push(struggle());
    }
    let mut combatant = Combatant::new(
        record.id,
        &display_name(&record.name),
        level,
        record.types.clone(),
        record.stats,
        moves,
    );
    combatant.base_experience = record.base_experience;
    Ok(combatant)
}

/// `mr-mime` -> `Mr Mime`.
pub fn display_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
