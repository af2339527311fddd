//! The tool surface: lookups against the catalog and the battle session.
//!
//! Every handler returns text. Failures become readable messages instead of
//! errors so the transport always sees a successful reply.

use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::battle::{BattleEngine, BattleError, Encounter, Side};
use crate::catalog::{hydrate_combatant, CatalogClient, CatalogError, CreatureRef};
use crate::format;
use crate::items::default_inventory;
use crate::model::WeatherKind;
use crate::query::{self, Intent};
use crate::rng::RandomSource;
use crate::session::EncounterStore;

/// Highest national dex number the plain random lookup draws from.
pub const MAX_CREATURE_ID: u32 = 1025;
pub const MAX_LEVEL: u32 = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CreatureKey {
    Number(#[serde(deserialize_with = "whole_number")] u32),
    Name(String),
}

impl CreatureKey {
    fn as_lookup(&self) -> String {
        match self {
            CreatureKey::Number(id) => id.to_string(),
            CreatureKey::Name(name) => name.clone(),
        }
    }
}

/// Accepts `3` and `3.0` alike; clients built on JSON numbers often send floats.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    });
    whole
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {number}")))
}

fn optional_whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    #[derive(Deserialize)]
    struct Whole<T: TryFrom<u64>>(#[serde(deserialize_with = "whole_number")] T);

    Ok(Option::<Whole<T>>::deserialize(deserializer)?.map(|Whole(value)| value))
}

#[derive(Deserialize)]
struct RegionArgs {
    region: String,
}

#[derive(Deserialize)]
struct AffinityArgs {
    #[serde(alias = "type")]
    affinity: String,
}

#[derive(Deserialize)]
struct QueryArgs {
    query: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartBattleArgs {
    #[serde(alias = "player_id")]
    player_id: CreatureKey,
    #[serde(alias = "opponent_id")]
    opponent_id: CreatureKey,
    #[serde(default, deserialize_with = "optional_whole_number")]
    level: Option<u32>,
    #[serde(default)]
    weather: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveArgs {
    #[serde(alias = "move_index", deserialize_with = "whole_number")]
    move_index: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemArgs {
    #[serde(alias = "item_index", deserialize_with = "whole_number")]
    item_index: usize,
}

struct BattleSession {
    engine: BattleEngine,
    store: EncounterStore,
}

pub struct ToolService {
    catalog: Arc<dyn CatalogClient>,
    battle: Mutex<BattleSession>,
    picker: Mutex<Box<dyn RandomSource + Send>>,
    default_level: u32,
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({ "type": "object", "properties": properties, "required": required })
}

impl ToolService {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        engine: BattleEngine,
        picker: Box<dyn RandomSource + Send>,
        default_level: u32,
    ) -> Self {
        Self {
            catalog,
            battle: Mutex::new(BattleSession {
                engine,
                store: EncounterStore::new(),
            }),
            picker: Mutex::new(picker),
            default_level,
        }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: "random_creature",
                description: concat!(
                    "Get a random Pokemon with its types, size, abilities ",
                    "and description."
                ),
                input_schema: object_schema(json!({}), &[]),
            },
            ToolDefinition {
                name: "random_creature_from_region",
                description: concat!(
                    "Get a random Pokemon first introduced in a region (kanto, johto, ",
                    "hoenn, sinnoh, unova, kalos, alola, galar, paldea)."
                ),
                input_schema: object_schema(
                    json!({
                        "region": {
                            "type": "string",
                            "enum": query::region_names(),
                            "description": "Region name"
                        }
                    }),
                    &["region"],
                ),
            },
            ToolDefinition {
                name: "random_creature_by_affinity",
                description: "Get a random Pokemon of an elemental type.",
                input_schema: object_schema(
                    json!({
                        "affinity": {
                            "type": "string",
                            "enum": query::AFFINITIES,
                            "description": "Type name, e.g. fire"
                        }
                    }),
                    &["affinity"],
                ),
            },
            ToolDefinition {
                name: "natural_language_query",
                description: concat!(
                    "Ask for a Pokemon in plain English, e.g. 'pokemon #25' ",
                    "or 'random fire pokemon'."
                ),
                input_schema: object_schema(
                    json!({
                        "query": { "type": "string", "description": "Free-text request" }
                    }),
                    &["query"],
                ),
            },
            ToolDefinition {
                name: "start_battle",
                description: concat!(
                    "Start a battle between two Pokemon, ",
                    "replacing any battle in progress."
                ),
                input_schema: object_schema(
                    json!({
                        "playerId": {
                            "type": ["integer", "string"],
                            "minimum": 1,
                            "description": "Pokedex number or name of your Pokemon"
                        },
                        "opponentId": {
                            "type": ["integer", "string"],
                            "minimum": 1,
                            "description": "Pokedex number or name of the opponent"
                        },
                        "level": {
                            "type": "integer",
                            "minimum": 1,
                            "maximum": MAX_LEVEL,
                            "description": "Level for both sides (default 50)"
                        },
                        "weather": {
                            "type": "string",
                            "enum": ["sunny", "rainy"],
                            "description": "Optional weather lasting 5 turns"
                        }
                    }),
                    &["playerId", "opponentId"],
                ),
            },
            ToolDefinition {
                name: "make_move",
                description: concat!(
                    "Use one of your Pokemon's moves (0-based index) ",
                    "and resolve a turn."
                ),
                input_schema: object_schema(
                    json!({
                        "moveIndex": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Index into your move list"
                        }
                    }),
                    &["moveIndex"],
                ),
            },
            ToolDefinition {
                name: "use_item",
                description: concat!(
                    "Use an item from your bag (0-based index). ",
                    "Does not use up your turn."
                ),
                input_schema: object_schema(
                    json!({
                        "itemIndex": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Index into your bag"
                        }
                    }),
                    &["itemIndex"],
                ),
            },
        ]
    }

    /// Runs the named tool. Unknown tools and bad arguments produce text too.
    pub async fn call(&self, name: &str, arguments: Value) -> String {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        match name {
            "random_creature" => self.random_creature().await,
            "random_creature_from_region" => match parse_args::<RegionArgs>(name, arguments) {
                Ok(args) => self.random_creature_from_region(&args.region).await,
                Err(message) => message,
            },
            "random_creature_by_affinity" => match parse_args::<AffinityArgs>(name, arguments) {
                Ok(args) => self.random_creature_by_affinity(&args.affinity).await,
                Err(message) => message,
            },
            "natural_language_query" => match parse_args::<QueryArgs>(name, arguments) {
                Ok(args) => self.natural_language_query(&args.query).await,
                Err(message) => message,
            },
            "start_battle" => match parse_args::<StartBattleArgs>(name, arguments) {
                Ok(args) => {
                    self.start_battle(
                        &args.player_id.as_lookup(),
                        &args.opponent_id.as_lookup(),
                        args.level,
                        args.weather.as_deref(),
                    )
                    .await
                }
                Err(message) => message,
            },
            "make_move" => match parse_args::<MoveArgs>(name, arguments) {
                Ok(args) => self.make_move(args.move_index).await,
                Err(message) => message,
            },
            "use_item" => match parse_args::<ItemArgs>(name, arguments) {
                Ok(args) => self.use_item(args.item_index).await,
                Err(message) => message,
            },
            other => format!("Unknown tool '{other}'."),
        }
    }

    pub async fn lookup_creature(&self, id_or_name: &str, label: Option<&str>) -> String {
        match self.creature_card(id_or_name, label).await {
            Ok(card) => card,
            Err(err) => {
                warn!(key = id_or_name, error = %err, "creature lookup failed");
                format!("Sorry, I couldn't fetch Pokemon '{id_or_name}': {err}")
            }
        }
    }

    pub async fn random_creature(&self) -> String {
        let id = self.pick(MAX_CREATURE_ID as usize).await as u32 + 1;
        self.lookup_creature(&id.to_string(), Some("Random Pokemon")).await
    }

    pub async fn random_creature_from_region(&self, region: &str) -> String {
        let Some(generation) = query::region_generation(region) else {
            return format!(
                "Unknown region '{region}'. Valid regions: {}.",
                query::region_names().join(", ")
            );
        };
        let region = region.trim().to_ascii_lowercase();
        let label = format!(
            "Random Pokemon from {} (generation {generation})",
            crate::catalog::display_name(&region)
        );
        match self.catalog.fetch_generation_roster(generation).await {
            Ok(roster) => self.random_from_roster(&roster, &label).await,
            Err(err) => format!("Sorry, I couldn't load the {region} roster: {err}"),
        }
    }

    pub async fn random_creature_by_affinity(&self, affinity: &str) -> String {
        let affinity = affinity.trim().to_ascii_lowercase();
        if !query::is_known_affinity(&affinity) {
            return format!(
                "Unknown type '{affinity}'. Valid types: {}.",
                query::AFFINITIES.join(", ")
            );
        }
        let label = format!("Random {} type Pokemon", crate::catalog::display_name(&affinity));
        match self.catalog.fetch_affinity_roster(&affinity).await {
            Ok(roster) => self.random_from_roster(&roster, &label).await,
            Err(err) => format!("Sorry, I couldn't load {affinity} type Pokemon: {err}"),
        }
    }

    pub async fn natural_language_query(&self, text: &str) -> String {
        match query::parse_intent(text) {
            Some(Intent::ByNumber(number)) => {
                self.lookup_creature(&number.to_string(), None).await
            }
            Some(Intent::Random) => self.random_creature().await,
            Some(Intent::RandomFromRegion(region)) => {
                self.random_creature_from_region(&region).await
            }
            Some(Intent::RandomByAffinity(affinity)) => {
                self.random_creature_by_affinity(&affinity).await
            }
            None => query::help_text(),
        }
    }

    /// Hydrates both sides and replaces the current encounter. A failure leaves
    /// any existing encounter as it was.
    pub async fn start_battle(
        &self,
        player: &str,
        opponent: &str,
        level: Option<u32>,
        weather: Option<&str>,
    ) -> String {
        let level = level.unwrap_or(self.default_level);
        if !(1..=MAX_LEVEL).contains(&level) {
            return format!("Level must be between 1 and {MAX_LEVEL}, got {level}.");
        }
        let weather = match weather.map(str::trim).filter(|w| !w.is_empty()) {
            None => None,
            Some(name) => match WeatherKind::parse(name) {
                Some(kind) => Some(kind),
                None => return format!("Unknown weather '{name}'. Use sunny or rainy."),
            },
        };

        let mut session = self.battle.lock().await;
        let encounter = match self.build_encounter(player, opponent, level, weather).await {
            Ok(encounter) => encounter,
            Err(err) => {
                warn!(error = %err, "battle hydration failed");
                return format!("Failed to start battle: {err}");
            }
        };
        let card = format::battle_card(&encounter);
        if session.store.set(encounter).is_some() {
            info!("replaced the previous battle");
        }
        info!(player, opponent, level, "battle started");
        card
    }

    pub async fn make_move(&self, move_index: usize) -> String {
        let mut session = self.battle.lock().await;
        let BattleSession { engine, store } = &mut *session;
        let result = match store.get_mut() {
            Some(encounter) => engine
                .resolve_turn(encounter, move_index)
                .map(|()| format::turn_report(encounter)),
            None => Err(BattleError::NoActiveBattle),
        };
        result.unwrap_or_else(battle_error_text)
    }

    pub async fn use_item(&self, item_index: usize) -> String {
        let mut session = self.battle.lock().await;
        let BattleSession { engine, store } = &mut *session;
        let result = match store.get_mut() {
            Some(encounter) => engine
                .use_item(encounter, item_index)
                .map(|used| format::item_report(encounter, &used)),
            None => Err(BattleError::NoActiveBattle),
        };
        result.unwrap_or_else(battle_error_text)
    }

    /// Snapshot of the current encounter, if any.
    pub async fn current_encounter(&self) -> Option<Encounter> {
        self.battle.lock().await.store.get().cloned()
    }

    async fn build_encounter(
        &self,
        player: &str,
        opponent: &str,
        level: u32,
        weather: Option<WeatherKind>,
    ) -> Result<Encounter, BattleError> {
        let mut player = hydrate_combatant(self.catalog.as_ref(), player, level)
            .await
            .map_err(|source| BattleError::Hydration {
                side: Side::Player,
                source,
            })?;
        let opponent = hydrate_combatant(self.catalog.as_ref(), opponent, level)
            .await
            .map_err(|source| BattleError::Hydration {
                side: Side::Opponent,
                source,
            })?;
        player.items = default_inventory();
        Ok(Encounter::new(player, opponent, weather))
    }

    async fn creature_card(
        &self,
        id_or_name: &str,
        label: Option<&str>,
    ) -> Result<String, CatalogError> {
        let key = crate::catalog::normalize_key(id_or_name);
        let record = self.catalog.fetch_creature(&key).await?;
        let species = match self.catalog.fetch_species(record.id).await {
            Ok(species) => Some(species),
            Err(err) => {
                warn!(id = record.id, error = %err, "no species text");
                None
            }
        };
        Ok(format::creature_card(label, &record, species.as_ref()))
    }

    async fn random_from_roster(&self, roster: &[CreatureRef], label: &str) -> String {
        if roster.is_empty() {
            return format!("{label}: no Pokemon found.");
        }
        let pick = &roster[self.pick(roster.len()).await];
        self.lookup_creature(&pick.lookup_key(), Some(label)).await
    }

    async fn pick(&self, len: usize) -> usize {
        self.picker.lock().await.index(len)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, String> {
    serde_json::from_value(arguments).map_err(|err| format!("Invalid arguments for {tool}: {err}"))
}

fn battle_error_text(err: BattleError) -> String {
    match err {
        BattleError::NoActiveBattle => {
            "There is no active battle. Use start_battle to begin one.".to_string()
        }
        BattleError::BattleOver => {
            "This battle is already over. Use start_battle to begin a new one.".to_string()
        }
        other => format!("Error: {other}"),
    }
}
