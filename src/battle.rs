//! Two-combatant encounter and turn resolution.
//!
//! The main entry point is [`BattleEngine::resolve_turn`]. An [`Encounter`]
//! only changes through the engine, one turn (or one item) per call.

use crate::catalog::CatalogError;
use crate::damage::{compute_damage, roll_accuracy};
use crate::items::apply_item;
use crate::model::{Combatant, StatusKind, Weather, WeatherKind};
use crate::rng::RandomSource;
use crate::types::TypeChart;
use std::fmt;
use tracing::debug;

/// Chance a paralyzed combatant loses its move.
const FULL_PARALYSIS_PERCENT: u32 = 25;
const BURN_UPKEEP_PERCENT: u32 = 10;
const POISON_UPKEEP_PERCENT: u32 = 8;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BattleError {
    #[error("could not load the {side} Pokemon: {source}")]
    Hydration {
        side: Side,
        #[source]
        source: CatalogError,
    },
    #[error("invalid move index {index}: {available} move(s) available")]
    InvalidMoveIndex { index: usize, available: usize },
    #[error("invalid item index {index}: {available} item(s) in the bag")]
    InvalidItemIndex { index: usize, available: usize },
    #[error("no active battle")]
    NoActiveBattle,
    #[error("the battle is already over")]
    BattleOver,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncounterStatus {
    Active,
    Ended { winner: Side },
}

#[derive(Clone, Debug)]
pub struct Encounter {
    pub player: Combatant,
    pub opponent: Combatant,
    pub turn: u32,
    pub weather: Option<Weather>,
    pub status: EncounterStatus,
    /// Events of the most recent turn, oldest first.
    pub log: Vec<String>,
}

impl Encounter {
    pub fn new(player: Combatant, opponent: Combatant, weather: Option<WeatherKind>) -> Self {
        Self {
            player,
            opponent,
            turn: 1,
            weather: weather.map(Weather::new),
            status: EncounterStatus::Active,
            log: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EncounterStatus::Active
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn winner(&self) -> Option<&Combatant> {
        match self.status {
            EncounterStatus::Active => None,
            EncounterStatus::Ended { winner } => Some(self.combatant(winner)),
        }
    }
}

/// Owns the effectiveness table and the randomness every turn draws from.
pub struct BattleEngine {
    chart: TypeChart,
    rng: Box<dyn RandomSource + Send>,
}

impl BattleEngine {
    pub fn new(chart: TypeChart, rng: Box<dyn RandomSource + Send>) -> Self {
        Self { chart, rng }
    }

    /// Advances `encounter` by one turn with the player's move at `move_index`.
    ///
    /// Order: clear log, weather, status upkeep (player then opponent),
    /// opponent picks a random move, player attacks, opponent attacks if still
    /// standing, turn counter, faint check. The player always acts first and
    /// the opponent only acts with hp left, so both sides cannot be knocked
    /// out by moves in the same turn.
    pub fn resolve_turn(
        &mut self,
        encounter: &mut Encounter,
        move_index: usize,
    ) -> Result<(), BattleError> {
        if !encounter.is_active() {
            return Err(BattleError::BattleOver);
        }
        if move_index >= encounter.player.moves.len() {
            return Err(BattleError::InvalidMoveIndex {
                index: move_index,
                available: encounter.player.moves.len(),
            });
        }

        let Encounter {
            player,
            opponent,
            turn,
            weather,
            log,
            ..
        } = encounter;
        log.clear();

        if let Some(current) = weather {
            log.push(
                match current.kind {
                    WeatherKind::Sunny => "The sunlight is strong.",
                    WeatherKind::Rainy => "Rain continues to fall.",
                }
                .to_string(),
            );
        }
        let weather_kind = weather.map(|w| w.kind);

        apply_upkeep(player, log);
        apply_upkeep(opponent, log);

        if !player.is_fainted() && !opponent.is_fainted() {
            let opponent_move = if opponent.moves.is_empty() {
                None
            } else {
                Some(self.rng.index(opponent.moves.len()))
            };

            let rng: &mut dyn RandomSource = self.rng.as_mut();
            execute_move(player, opponent, move_index, &self.chart, weather_kind, rng, log);

            if !opponent.is_fainted() {
                match opponent_move {
                    Some(idx) => {
                        execute_move(opponent, player, idx, &self.chart, weather_kind, rng, log)
                    }
                    None => log.push(format!("{} has no moves to use.", opponent.name)),
                }
            }
        }

        *turn += 1;
        tick_weather(weather, log);

        // Upkeep can zero both sides before any move; the player is checked first and loses.
        let loser = if player.is_fainted() {
            Some(Side::Player)
        } else if opponent.is_fainted() {
            Some(Side::Opponent)
        } else {
            None
        };
        if let Some(loser) = loser {
            let winner = loser.other();
            encounter.status = EncounterStatus::Ended { winner };
            finish(encounter, winner);
        }
        debug!(
            turn = encounter.turn,
            player_hp = encounter.player.current_hp,
            opponent_hp = encounter.opponent.current_hp,
            "turn resolved"
        );
        Ok(())
    }

    /// Uses an item from the player's bag. Does not consume a turn.
    pub fn use_item(
        &mut self,
        encounter: &mut Encounter,
        item_index: usize,
    ) -> Result<Vec<String>, BattleError> {
        if !encounter.is_active() {
            return Err(BattleError::BattleOver);
        }
        let lines = apply_item(&mut encounter.player, item_index)?;
        encounter.log.extend(lines.iter().cloned());
        Ok(lines)
    }
}

fn apply_upkeep(combatant: &mut Combatant, log: &mut Vec<String>) {
    let percent = match combatant.status.kind {
        StatusKind::Burn => Some((BURN_UPKEEP_PERCENT, "burn")),
        StatusKind::Poison => Some((POISON_UPKEEP_PERCENT, "poison")),
        _ => None,
    };
    if let Some((percent, cause)) = percent {
        let amount = combatant.max_hp() * percent / 100;
        let lost = combatant.take_damage(amount);
        log.push(format!(
            "{} is hurt by its {} (-{} HP, {}/{}).",
            combatant.name,
            cause,
            lost,
            combatant.current_hp,
            combatant.max_hp()
        ));
    }
    let before = combatant.status.kind;
    combatant.status.tick();
    if before != StatusKind::None && combatant.status.is_none() {
        log.push(format!("{} is no longer {}.", combatant.name, before.label()));
    }
}

fn tick_weather(weather: &mut Option<Weather>, log: &mut Vec<String>) {
    let Some(current) = weather.as_mut() else {
        return;
    };
    current.turns_left = current.turns_left.saturating_sub(1);
    if current.turns_left == 0 {
        log.push(
            match current.kind {
                WeatherKind::Sunny => "The sunlight faded.",
                WeatherKind::Rainy => "The rain stopped.",
            }
            .to_string(),
        );
        *weather = None;
    }
}

fn can_act(attacker: &Combatant, rng: &mut dyn RandomSource, log: &mut Vec<String>) -> bool {
    match attacker.status.kind {
        StatusKind::Sleep => {
            log.push(format!("{} is fast asleep.", attacker.name));
            false
        }
        StatusKind::Paralyze if rng.chance(FULL_PARALYSIS_PERCENT) => {
            log.push(format!("{} is paralyzed! It can't move!", attacker.name));
            false
        }
        _ => true,
    }
}

fn execute_move(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    move_idx: usize,
    chart: &TypeChart,
    weather: Option<WeatherKind>,
    rng: &mut dyn RandomSource,
    log: &mut Vec<String>,
) {
    if !can_act(attacker, rng, log) {
        return;
    }
    let move_def = attacker.moves[move_idx].clone();
    log.push(format!("{} used {}!", attacker.name, move_def.name));

    if !roll_accuracy(&move_def, rng) {
        log.push(format!("{}'s attack missed!", attacker.name));
        return;
    }

    // Immunity blocks the whole move, secondary ailment included.
    let effectiveness = chart.effectiveness(&move_def.affinity, &defender.types);
    if effectiveness == 0.0 {
        log.push(format!("It doesn't affect {}...", defender.name));
        return;
    }

    if move_def.is_status_only() {
        log.push(format!("It had no damaging effect on {}.", defender.name));
    } else {
        let damage = compute_damage(attacker, defender, &move_def, chart, weather, rng);
        let dealt = defender.take_damage(damage);
        log.push(format!(
            "It dealt {} damage to {} ({}/{} HP).",
            dealt,
            defender.name,
            defender.current_hp,
            defender.max_hp()
        ));
        if effectiveness > 1.0 {
            log.push("It's super effective!".to_string());
        } else if effectiveness < 1.0 {
            log.push("It's not very effective...".to_string());
        }
        if defender.is_fainted() {
            log.push(format!("{} fainted!", defender.name));
            return;
        }
    }

    if let Some(ailment) = move_def.ailment {
        let lands = move_def.ailment_chance == 0 || rng.chance(move_def.ailment_chance);
        if lands && ailment != StatusKind::None {
            defender.inflict(ailment);
            log.push(format!("{} is now {}!", defender.name, ailment.label()));
        }
    }
}

fn finish(encounter: &mut Encounter, winner: Side) {
    let (winner_mon, loser_mon) = match winner {
        Side::Player => (&mut encounter.player, &encounter.opponent),
        Side::Opponent => (&mut encounter.opponent, &encounter.player),
    };
    let gained = loser_mon.base_experience * loser_mon.level / 7;
    winner_mon.experience += gained;
    encounter.log.push(format!("{} wins the battle!", winner_mon.name));
    if gained > 0 {
        encounter
            .log
            .push(format!("{} gained {} experience.", winner_mon.name, gained));
    }
}
