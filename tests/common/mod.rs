#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pokemon_mcp::battle::BattleEngine;
use pokemon_mcp::catalog::{
    CatalogClient, CatalogError, CreatureRecord, CreatureRef, FlavorText, MoveRecord, SpeciesRecord,
};
use pokemon_mcp::model::{Combatant, Move, MoveCategory, Stats};
use pokemon_mcp::rng::{RandomSource, ScriptedRandom, SmallRngSource};
use pokemon_mcp::tools::ToolService;
use pokemon_mcp::types::TypeChart;

#[derive(Default)]
pub struct FakeCatalog {
    creatures: HashMap<String, CreatureRecord>,
    species: HashMap<u32, SpeciesRecord>,
    moves: HashMap<String, MoveRecord>,
    generations: HashMap<u32, Vec<CreatureRef>>,
    affinities: HashMap<String, Vec<CreatureRef>>,
}

fn stats(hp: u32, atk: u32, def: u32, spa: u32, spd: u32, spe: u32) -> Stats {
    Stats {
        hp,
        atk,
        def,
        spa,
        spd,
        spe,
    }
}

fn move_record(
    name: &str,
    affinity: &str,
    class: &str,
    power: Option<u32>,
    accuracy: Option<u32>,
) -> MoveRecord {
    MoveRecord {
        name: name.to_string(),
        power,
        accuracy,
        pp: Some(25),
        damage_class: class.to_string(),
        affinity: affinity.to_string(),
        ailment: None,
        ailment_chance: 0,
    }
}

fn species_ref(name: &str, id: u32) -> CreatureRef {
    CreatureRef {
        name: name.to_string(),
        url: format!("https://pokeapi.test/api/v2/pokemon-species/{id}/"),
    }
}

impl FakeCatalog {
    /// Bulbasaur, Charmander, Squirtle and Pikachu with small move pools.
    pub fn standard() -> Self {
        let mut catalog = FakeCatalog::default();
        catalog.add_creature(
            1,
            "bulbasaur",
            &["grass", "poison"],
            stats(45, 49, 49, 65, 65, 45),
            &["tackle", "vine-whip", "growl", "razor-leaf"],
            64,
        );
        catalog.add_creature(
            4,
            "charmander",
            &["fire"],
            stats(39, 52, 43, 60, 50, 65),
            &["scratch", "ember", "growl", "smokescreen"],
            62,
        );
        catalog.add_creature(
            7,
            "squirtle",
            &["water"],
            stats(44, 48, 65, 50, 64, 43),
            &["tackle", "water-gun", "tail-whip"],
            63,
        );
        catalog.add_creature(
            25,
            "pikachu",
            &["electric"],
            stats(35, 55, 40, 50, 50, 90),
            &["thunder-shock", "quick-attack", "growl", "thunder-wave", "mystery-move"],
            112,
        );

        for record in [
            move_record("tackle", "normal", "physical", Some(40), Some(100)),
            move_record("scratch", "normal", "physical", Some(40), Some(100)),
            move_record("vine-whip", "grass", "physical", Some(45), Some(100)),
            move_record("razor-leaf", "grass", "physical", Some(55), Some(95)),
            move_record("water-gun", "water", "special", Some(40), Some(100)),
            move_record("quick-attack", "normal", "physical", Some(40), Some(100)),
            move_record("growl", "normal", "status", None, Some(100)),
            move_record("tail-whip", "normal", "status", None, Some(100)),
            move_record("smokescreen", "normal", "status", None, Some(100)),
            MoveRecord {
                ailment: Some("burn".into()),
                ailment_chance: 10,
                ..move_record("ember", "fire", "special", Some(40), Some(100))
            },
            MoveRecord {
                ailment: Some("paralysis".into()),
                ailment_chance: 10,
                ..move_record("thunder-shock", "electric", "special", Some(40), Some(100))
            },
            MoveRecord {
                ailment: Some("paralysis".into()),
                ailment_chance: 0,
                ..move_record("thunder-wave", "electric", "status", None, Some(90))
            },
        ] {
            catalog.moves.insert(record.name.clone(), record);
        }

        catalog.species.insert(
            25,
            SpeciesRecord {
                id: 25,
                name: "pikachu".into(),
                genus: Some("Mouse Pokemon".into()),
                flavor_texts: vec![
                    FlavorText {
                        language: "ja".into(),
                        text: "ほっぺたの りょうがわに".into(),
                    },
                    FlavorText {
                        language: "en".into(),
                        text: "When several of these gather, their electricity can build.".into(),
                    },
                ],
            },
        );
        catalog.species.insert(
            1,
            SpeciesRecord {
                id: 1,
                name: "bulbasaur".into(),
                genus: None,
                flavor_texts: vec![FlavorText {
                    language: "fr".into(),
                    text: "Au matin de sa vie".into(),
                }],
            },
        );

        catalog.generations.insert(
            1,
            vec![
                species_ref("bulbasaur", 1),
                species_ref("charmander", 4),
                species_ref("squirtle", 7),
                species_ref("pikachu", 25),
            ],
        );
        catalog.generations.insert(2, Vec::new());
        catalog
            .affinities
            .insert("fire".into(), vec![species_ref("charmander", 4)]);
        catalog.affinities.insert("dragon".into(), Vec::new());
        catalog
    }

    pub fn add_creature(
        &mut self,
        id: u32,
        name: &str,
        types: &[&str],
        stats: Stats,
        moves: &[&str],
        base_experience: u32,
    ) {
        let record = CreatureRecord {
            id,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            stats,
            abilities: vec!["overgrow".into(), "chlorophyll".into()],
            height: 7,
            weight: 69,
            base_experience,
            moves: moves.iter().map(|m| m.to_string()).collect(),
        };
        self.creatures.insert(id.to_string(), record.clone());
        self.creatures.insert(name.to_string(), record);
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_creature(&self, id_or_name: &str) -> Result<CreatureRecord, CatalogError> {
        self.creatures
            .get(id_or_name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("pokemon/{id_or_name}")))
    }

    async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, CatalogError> {
        self.species
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("pokemon-species/{id}")))
    }

    async fn fetch_generation_roster(
        &self,
        generation: u32,
    ) -> Result<Vec<CreatureRef>, CatalogError> {
        self.generations
            .get(&generation)
            .cloned()
            .ok_or(CatalogError::Status(503))
    }

    async fn fetch_affinity_roster(
        &self,
        affinity: &str,
    ) -> Result<Vec<CreatureRef>, CatalogError> {
        self.affinities
            .get(affinity)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("type/{affinity}")))
    }

    async fn fetch_move(&self, name: &str) -> Result<MoveRecord, CatalogError> {
        self.moves
            .get(name)
            .cloned()
            .ok_or(CatalogError::Timeout)
    }
}

pub fn service_with_catalog(
    catalog: FakeCatalog,
    picker: impl RandomSource + Send + 'static,
    battle_seed: u64,
) -> ToolService {
    let engine = BattleEngine::new(
        TypeChart::builtin(),
        Box::new(SmallRngSource::seeded(battle_seed)),
    );
    ToolService::new(Arc::new(catalog), engine, Box::new(picker), 50)
}

pub fn service_with(picker: impl RandomSource + Send + 'static, battle_seed: u64) -> ToolService {
    service_with_catalog(FakeCatalog::standard(), picker, battle_seed)
}

pub fn service() -> ToolService {
    service_with(ScriptedRandom::new(), 7)
}

pub fn neutral_stats(hp: u32) -> Stats {
    stats(hp, 100, 100, 100, 100, 100)
}

pub fn strike(power: u32) -> Move {
    Move::new("strike", "normal", MoveCategory::Physical, power, 100)
}

pub fn make_mon(name: &str, types: &[&str], hp: u32, moves: Vec<Move>) -> Combatant {
    Combatant::new(
        1,
        name,
        50,
        types.iter().map(|t| t.to_string()).collect(),
        neutral_stats(hp),
        moves,
    )
}
