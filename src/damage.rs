use crate::model::{Combatant, Move, MoveCategory, StatKind, StatusKind, WeatherKind};
use crate::rng::RandomSource;
use crate::types::TypeChart;

/// Attack/defense pair for a move category.
pub fn stat_pair(category: MoveCategory) -> (StatKind, StatKind) {
    match category {
        MoveCategory::Physical => (StatKind::Attack, StatKind::Defense),
        MoveCategory::Special => (StatKind::SpecialAttack, StatKind::SpecialDefense),
    }
}

/// Level-scaled base damage before effectiveness and modifiers:
/// `floor(((2*level/5 + 2) * power * atk / def) / 50 + 2)`.
pub fn base_damage(level: u32, power: u32, attack: f64, defense: f64) -> f64 {
    let level = level as f64;
    let defense = defense.max(1.0);
    (((2.0 * level / 5.0 + 2.0) * power as f64 * attack / defense) / 50.0 + 2.0).floor()
}

/// Damage for one hit with an explicit random factor in `0.85..=1.0`.
///
/// Moves without power deal nothing. Weather and stat stages are neutral
/// unless set, so a fresh combatant in clear weather gets the plain formula.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_def: &Move,
    chart: &TypeChart,
    weather: Option<WeatherKind>,
    random_factor: f64,
) -> u32 {
    if move_def.is_status_only() {
        return 0;
    }
    let (atk_stat, def_stat) = stat_pair(move_def.category);
    let attack = attacker.effective_stat(atk_stat);
    let defense = defender.effective_stat(def_stat);
    let mut damage = base_damage(attacker.level, move_def.power, attack, defense);
    damage *= chart.effectiveness(&move_def.affinity, &defender.types);
    if let Some(weather) = weather {
        damage *= weather.damage_modifier(&move_def.affinity);
    }
    if attacker.status.kind == StatusKind::Burn && move_def.category == MoveCategory::Physical {
        damage *= 0.5;
    }
    damage *= random_factor;
    damage.floor().max(0.0) as u32
}

pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_def: &Move,
    chart: &TypeChart,
    weather: Option<WeatherKind>,
    rng: &mut dyn RandomSource,
) -> u32 {
    let roll = rng.damage_roll();
    calculate_damage(attacker, defender, move_def, chart, weather, roll)
}

/// Draws a percentage and hits when it does not exceed the move's accuracy.
pub fn roll_accuracy(move_def: &Move, rng: &mut dyn RandomSource) -> bool {
    rng.percent() <= move_def.accuracy as f64
}

/// Every possible damage value across the random factor range, low to high.
pub fn damage_range(
    attacker: &Combatant,
    defender: &Combatant,
    move_def: &Move,
    chart: &TypeChart,
    weather: Option<WeatherKind>,
) -> Vec<u32> {
    (85..=100)
        .map(|pct| {
            calculate_damage(attacker, defender, move_def, chart, weather, pct as f64 / 100.0)
        })
        .collect()
}
