use serde::{Deserialize, Serialize};

pub const DEFAULT_LEVEL: u32 = 50;
pub const MAX_MOVES: usize = 4;
pub const MAX_STAGE: i8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
}

impl MoveCategory {
    /// Catalog damage classes; `status` moves are treated as physical with zero power.
    pub fn from_damage_class(class: &str) -> Self {
        if class.eq_ignore_ascii_case("special") {
            MoveCategory::Special
        } else {
            MoveCategory::Physical
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    #[default]
    None,
    Burn,
    Poison,
    Paralyze,
    Sleep,
}

impl StatusKind {
    pub fn from_ailment(name: &str) -> Option<Self> {
        match name {
            "burn" => Some(StatusKind::Burn),
            "poison" => Some(StatusKind::Poison),
            "paralysis" | "paralyze" => Some(StatusKind::Paralyze),
            "sleep" => Some(StatusKind::Sleep),
            _ => None,
        }
    }

    /// Turns an inflicted status lasts before upkeep clears it.
    pub fn default_duration(self) -> u32 {
        match self {
            StatusKind::None => 0,
            StatusKind::Burn | StatusKind::Poison => 5,
            StatusKind::Paralyze => 3,
            StatusKind::Sleep => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusKind::None => "none",
            StatusKind::Burn => "burned",
            StatusKind::Poison => "poisoned",
            StatusKind::Paralyze => "paralyzed",
            StatusKind::Sleep => "asleep",
        }
    }
}

/// Active status plus the turns it has left.
/// `turns_left == 0` always pairs with `StatusKind::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCondition {
    pub kind: StatusKind,
    pub turns_left: u32,
}

impl StatusCondition {
    pub fn new(kind: StatusKind, turns: u32) -> Self {
        if kind == StatusKind::None || turns == 0 {
            return Self::default();
        }
        Self {
            kind,
            turns_left: turns,
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == StatusKind::None
    }

    /// Counts one turn down, resetting to `None` once the counter runs out.
    pub fn tick(&mut self) {
        if self.is_none() {
            return;
        }
        self.turns_left = self.turns_left.saturating_sub(1);
        if self.turns_left == 0 {
            *self = Self::default();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Sunny,
    Rainy,
}

impl WeatherKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sun" | "sunny" | "harsh-sunlight" => Some(WeatherKind::Sunny),
            "rain" | "rainy" => Some(WeatherKind::Rainy),
            _ => None,
        }
    }

    /// Multiplier applied to moves of the given affinity.
    pub fn damage_modifier(self, move_affinity: &str) -> f64 {
        let affinity = move_affinity.to_ascii_lowercase();
        match (self, affinity.as_str()) {
            (WeatherKind::Sunny, "fire") | (WeatherKind::Rainy, "water") => 1.5,
            (WeatherKind::Sunny, "water") | (WeatherKind::Rainy, "fire") => 0.5,
            _ => 1.0,
        }
    }
}

pub const WEATHER_TURNS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weather {
    pub kind: WeatherKind,
    pub turns_left: u32,
}

impl Weather {
    pub fn new(kind: WeatherKind) -> Self {
        Self {
            kind,
            turns_left: WEATHER_TURNS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatKind {
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Attack => "Attack",
            StatKind::Defense => "Defense",
            StatKind::SpecialAttack => "Sp. Atk",
            StatKind::SpecialDefense => "Sp. Def",
            StatKind::Speed => "Speed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
}

impl StatStages {
    pub fn get(&self, stat: StatKind) -> i8 {
        match stat {
            StatKind::Attack => self.atk,
            StatKind::Defense => self.def,
            StatKind::SpecialAttack => self.spa,
            StatKind::SpecialDefense => self.spd,
            StatKind::Speed => self.spe,
        }
    }

    /// Applies `delta` clamped to +/-6 and returns the stage actually reached.
    pub fn shift(&mut self, stat: StatKind, delta: i8) -> i8 {
        let slot = match stat {
            StatKind::Attack => &mut self.atk,
            StatKind::Defense => &mut self.def,
            StatKind::SpecialAttack => &mut self.spa,
            StatKind::SpecialDefense => &mut self.spd,
            StatKind::Speed => &mut self.spe,
        };
        *slot = slot.saturating_add(delta).clamp(-MAX_STAGE, MAX_STAGE);
        *slot
    }
}

/// Multiplier for a stat stage: (2+s)/2 when boosted, 2/(2-s) when lowered.
pub fn stage_multiplier(stage: i8) -> f64 {
    let stage = stage.clamp(-MAX_STAGE, MAX_STAGE) as f64;
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

fn default_accuracy() -> u32 {
    100
}

fn default_pp() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    #[serde(default)]
    pub power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: u32,
    #[serde(default = "default_pp")]
    pub pp: u32,
    pub category: MoveCategory,
    #[serde(rename = "type")]
    pub affinity: String,
    #[serde(default)]
    pub ailment: Option<StatusKind>,
    /// Percent chance to inflict `ailment` on hit; 0 means it always lands.
    #[serde(default)]
    pub ailment_chance: u32,
}

impl Move {
    pub fn new(
        name: &str,
        affinity: &str,
        category: MoveCategory,
        power: u32,
        accuracy: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            power,
            accuracy: accuracy.min(100),
            pp: default_pp(),
            category,
            affinity: affinity.to_string(),
            ailment: None,
            ailment_chance: 0,
        }
    }

    pub fn with_ailment(mut self, ailment: StatusKind, chance: u32) -> Self {
        self.ailment = Some(ailment);
        self.ailment_chance = chance.min(100);
        self
    }

    pub fn is_status_only(&self) -> bool {
        self.power == 0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemEffect {
    pub heal: Option<u32>,
    pub cure_status: bool,
    pub boost: Option<(StatKind, i8)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub effect: ItemEffect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub id: u32,
    pub name: String,
    pub level: u32,
    pub types: Vec<String>,
    pub stats: Stats,
    pub current_hp: u32,
    pub moves: Vec<Move>,
    pub status: StatusCondition,
    pub stages: StatStages,
    pub base_experience: u32,
    pub experience: u32,
    pub items: Vec<Item>,
}

impl Combatant {
    pub fn new(
        id: u32,
        name: &str,
        level: u32,
        types: Vec<String>,
        stats: Stats,
        moves: Vec<Move>,
    ) -> Self {
        let mut moves = moves;
        moves.truncate(MAX_MOVES);
        Self {
            id,
            name: name.to_string(),
            level: level.max(1),
            types,
            stats,
            current_hp: stats.hp,
            moves,
            status: StatusCondition::default(),
            stages: StatStages::default(),
            base_experience: 0,
            experience: 0,
            items: Vec::new(),
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Subtracts `amount`, flooring at zero. Returns the hp actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_sub(amount);
        before - self.current_hp
    }

    /// Adds `amount`, capped at max hp. Returns the hp actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    /// Overwrites any existing status.
    pub fn inflict(&mut self, kind: StatusKind) {
        self.status = StatusCondition::new(kind, kind.default_duration());
    }

    /// Effective attack/special-attack or defense/special-defense after stages.
    pub fn effective_stat(&self, stat: StatKind) -> f64 {
        let base = match stat {
            StatKind::Attack => self.stats.atk,
            StatKind::Defense => self.stats.def,
            StatKind::SpecialAttack => self.stats.spa,
            StatKind::SpecialDefense => self.stats.spd,
            StatKind::Speed => self.stats.spe,
        } as f64;
        base * stage_multiplier(self.stages.get(stat))
    }
}
