use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    CatalogClient, CatalogError, CreatureRecord, CreatureRef, FlavorText, MoveRecord, SpeciesRecord,
};
use crate::model::Stats;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    base_experience: Option<u32>,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    moves: Vec<PokemonMoveSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    id: u32,
    name: String,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    genera: Vec<GenusEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GenerationResponse {
    pokemon_species: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeDetailResponse {
    pokemon: Vec<TypePokemonEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypePokemonEntry {
    pokemon: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct MoveDetailResponse {
    name: String,
    power: Option<u32>,
    accuracy: Option<u32>,
    pp: Option<u32>,
    damage_class: Option<NamedResource>,
    #[serde(rename = "type")]
    type_info: NamedResource,
    meta: Option<MoveMeta>,
}

#[derive(Clone, Debug, Deserialize)]
struct MoveMeta {
    ailment: NamedResource,
    #[serde(default)]
    ailment_chance: u32,
}

/// [`CatalogClient`] backed by the PokeAPI REST service.
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokemon-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, "catalog request");
        let response = self.client.get(&url).send().await.map_err(request_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "catalog request rejected");
            return Err(CatalogError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(request_error)?;
        serde_json::from_slice(&bytes).map_err(|err| CatalogError::Parse(err.to_string()))
    }
}

#[async_trait]
impl CatalogClient for PokeApiClient {
    async fn fetch_creature(&self, id_or_name: &str) -> Result<CreatureRecord, CatalogError> {
        let response: PokemonResponse =
            self.fetch_json(&resource_path("pokemon", id_or_name)?).await?;
        Ok(creature_from_response(response))
    }

    async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, CatalogError> {
        let response: PokemonSpeciesResponse =
            self.fetch_json(&format!("pokemon-species/{id}")).await?;
        Ok(species_from_response(response))
    }

    async fn fetch_generation_roster(
        &self,
        generation: u32,
    ) -> Result<Vec<CreatureRef>, CatalogError> {
        let response: GenerationResponse =
            self.fetch_json(&format!("generation/{generation}")).await?;
        Ok(response.pokemon_species.into_iter().map(creature_ref).collect())
    }

    async fn fetch_affinity_roster(
        &self,
        affinity: &str,
    ) -> Result<Vec<CreatureRef>, CatalogError> {
        let path = resource_path("type", &affinity.to_ascii_lowercase())?;
        let response: TypeDetailResponse = self.fetch_json(&path).await?;
        Ok(response
            .pokemon
            .into_iter()
            .map(|entry| creature_ref(entry.pokemon))
            .collect())
    }

    async fn fetch_move(&self, name: &str) -> Result<MoveRecord, CatalogError> {
        let response: MoveDetailResponse = self.fetch_json(&resource_path("move", name)?).await?;
        Ok(move_from_response(response))
    }
}

/// Builds `kind/key`, refusing keys that could leave the resource path.
/// PokeAPI names only use lowercase ascii letters, digits and hyphens.
fn resource_path(kind: &str, key: &str) -> Result<String, CatalogError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
    if !valid {
        return Err(CatalogError::InvalidName(key.to_string()));
    }
    Ok(format!("{kind}/{key}"))
}

fn request_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Transport(err.to_string())
    }
}

fn creature_ref(resource: NamedResource) -> CreatureRef {
    CreatureRef {
        name: resource.name,
        url: resource.url,
    }
}

fn creature_from_response(response: PokemonResponse) -> CreatureRecord {
    let mut stats = Stats::default();
    for slot in &response.stats {
        match slot.stat.name.as_str() {
            "hp" => stats.hp = slot.base_stat,
            "attack" => stats.atk = slot.base_stat,
            "defense" => stats.def = slot.base_stat,
            "special-attack" => stats.spa = slot.base_stat,
            "special-defense" => stats.spd = slot.base_stat,
            "speed" => stats.spe = slot.base_stat,
            _ => {}
        }
    }
    CreatureRecord {
        id: response.id,
        name: response.name,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats,
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        height: response.height,
        weight: response.weight,
        base_experience: response.base_experience.unwrap_or(0),
        moves: response
            .moves
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect(),
    }
}

fn species_from_response(response: PokemonSpeciesResponse) -> SpeciesRecord {
    SpeciesRecord {
        id: response.id,
        name: response.name,
        genus: response
            .genera
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.genus.clone()),
        flavor_texts: response
            .flavor_text_entries
            .into_iter()
            .map(|entry| FlavorText {
                language: entry.language.name,
                text: sanitize_text(&entry.flavor_text),
            })
            .collect(),
    }
}

fn move_from_response(response: MoveDetailResponse) -> MoveRecord {
    let (ailment, ailment_chance) = match response.meta {
        Some(meta) if meta.ailment.name != "none" => {
            (Some(meta.ailment.name), meta.ailment_chance)
        }
        _ => (None, 0),
    };
    MoveRecord {
        name: response.name,
        power: response.power,
        accuracy: response.accuracy,
        pp: response.pp,
        damage_class: response
            .damage_class
            .map(|class| class.name)
            .unwrap_or_else(|| "physical".to_string()),
        affinity: response.type_info.name,
        ailment,
        ailment_chance,
    }
}

fn sanitize_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
}
