mod common;

use common::{make_mon, strike};
use pokemon_mcp::battle::{BattleEngine, BattleError, Encounter, EncounterStatus, Side};
use pokemon_mcp::damage::{base_damage, calculate_damage, damage_range};
use pokemon_mcp::items::{default_inventory, full_heal, potion, x_attack};
use pokemon_mcp::model::{Move, MoveCategory, StatKind, StatusKind, WeatherKind};
use pokemon_mcp::rng::{ScriptedRandom, SmallRngSource};
use pokemon_mcp::types::TypeChart;
use pretty_assertions::assert_eq;

fn growl() -> Move {
    Move::new("growl", "normal", MoveCategory::Physical, 0, 100)
}

fn scripted_engine(rng: ScriptedRandom) -> BattleEngine {
    BattleEngine::new(TypeChart::builtin(), Box::new(rng))
}

fn duel(player_moves: Vec<Move>, opponent_moves: Vec<Move>) -> Encounter {
    Encounter::new(
        make_mon("Hero", &["normal"], 200, player_moves),
        make_mon("Foe", &["normal"], 200, opponent_moves),
        None,
    )
}

#[test]
fn damage_formula_matches_hand_computation() {
    let chart = TypeChart::builtin();
    let attacker = make_mon("A", &["normal"], 200, vec![strike(80)]);
    let defender = make_mon("D", &["normal"], 200, vec![strike(80)]);
    let mv = strike(80);

    // floor((22 * 80 * 100 / 100) / 50 + 2) = 37
    assert_eq!(calculate_damage(&attacker, &defender, &mv, &chart, None, 1.0), 37);
    assert_eq!(calculate_damage(&attacker, &defender, &mv, &chart, None, 0.925), 34);
    assert_eq!(calculate_damage(&attacker, &defender, &mv, &chart, None, 0.85), 31);
}

#[test]
fn base_damage_floors_fractional_levels() {
    // (2*7/5 + 2) * 40 = 192; 192 / 50 + 2 = 5.84
    assert_eq!(base_damage(7, 40, 100.0, 100.0), 5.0);
    // zero defense is treated as one
    assert_eq!(base_damage(50, 40, 100.0, 0.0), base_damage(50, 40, 100.0, 1.0));
}

#[test]
fn effectiveness_multiplies_damage() {
    let chart = TypeChart::builtin();
    let attacker = make_mon("A", &["fire"], 200, vec![]);
    let grass = make_mon("G", &["grass"], 200, vec![]);
    let water = make_mon("W", &["water"], 200, vec![]);
    let flame = Move::new("flame", "fire", MoveCategory::Physical, 80, 100);

    assert_eq!(calculate_damage(&attacker, &grass, &flame, &chart, None, 1.0), 74);
    assert_eq!(calculate_damage(&attacker, &grass, &flame, &chart, None, 0.925), 68);
    assert_eq!(calculate_damage(&attacker, &water, &flame, &chart, None, 1.0), 18);
}

#[test]
fn status_moves_deal_no_damage() {
    let chart = TypeChart::builtin();
    let attacker = make_mon("A", &["normal"], 200, vec![]);
    let defender = make_mon("D", &["normal"], 200, vec![]);
    assert_eq!(calculate_damage(&attacker, &defender, &growl(), &chart, None, 1.0), 0);
}

#[test]
fn burn_halves_physical_damage_only() {
    let chart = TypeChart::builtin();
    let mut attacker = make_mon("A", &["normal"], 200, vec![]);
    let defender = make_mon("D", &["normal"], 200, vec![]);
    attacker.inflict(StatusKind::Burn);

    let physical = strike(80);
    let special = Move::new("beam", "normal", MoveCategory::Special, 80, 100);
    assert_eq!(calculate_damage(&attacker, &defender, &physical, &chart, None, 1.0), 18);
    assert_eq!(calculate_damage(&attacker, &defender, &special, &chart, None, 1.0), 37);
}

#[test]
fn weather_boosts_and_weakens_matching_types() {
    let chart = TypeChart::builtin();
    let attacker = make_mon("A", &["normal"], 200, vec![]);
    let defender = make_mon("D", &["normal"], 200, vec![]);
    let flame = Move::new("flame", "fire", MoveCategory::Special, 80, 100);
    let splash = Move::new("splash", "water", MoveCategory::Special, 80, 100);

    let sunny = Some(WeatherKind::Sunny);
    let rainy = Some(WeatherKind::Rainy);
    assert_eq!(calculate_damage(&attacker, &defender, &flame, &chart, sunny, 1.0), 55);
    assert_eq!(calculate_damage(&attacker, &defender, &flame, &chart, rainy, 1.0), 18);
    assert_eq!(calculate_damage(&attacker, &defender, &splash, &chart, rainy, 1.0), 55);
    assert_eq!(calculate_damage(&attacker, &defender, &strike(80), &chart, sunny, 1.0), 37);
}

#[test]
fn damage_range_spans_the_roll() {
    let chart = TypeChart::builtin();
    let attacker = make_mon("A", &["normal"], 200, vec![]);
    let defender = make_mon("D", &["normal"], 200, vec![]);
    let range = damage_range(&attacker, &defender, &strike(80), &chart, None);
    assert_eq!(range.len(), 16);
    assert_eq!(range.first().copied(), Some(31));
    assert_eq!(range.last().copied(), Some(37));
    assert!(range.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn stat_stages_scale_attack() {
    let chart = TypeChart::builtin();
    let mut attacker = make_mon("A", &["normal"], 200, vec![]);
    let defender = make_mon("D", &["normal"], 200, vec![]);
    attacker.stages.shift(StatKind::Attack, 2);
    assert_eq!(attacker.effective_stat(StatKind::Attack), 200.0);
    // floor((22 * 80 * 200 / 100) / 50 + 2) = 72
    assert_eq!(calculate_damage(&attacker, &defender, &strike(80), &chart, None, 1.0), 72);
}

#[test]
fn turn_applies_both_attacks_in_order() {
    let mut engine = scripted_engine(ScriptedRandom::new().with_rolls(&[1.0, 0.925]));
    let mut encounter = duel(vec![strike(80)], vec![strike(80)]);

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.turn, 2);
    assert_eq!(encounter.opponent.current_hp, 163);
    assert_eq!(encounter.player.current_hp, 166);
    assert_eq!(
        encounter.log,
        vec![
            "Hero used strike!".to_string(),
            "It dealt 37 damage to Foe (163/200 HP).".to_string(),
            "Foe used strike!".to_string(),
            "It dealt 34 damage to Hero (166/200 HP).".to_string(),
        ]
    );
    assert!(encounter.is_active());
}

#[test]
fn accuracy_roll_above_accuracy_misses() {
    let wild = Move::new("wild swing", "normal", MoveCategory::Physical, 80, 90);
    let mut engine = scripted_engine(ScriptedRandom::new().with_percents(&[95.0]));
    let mut encounter = duel(vec![wild], vec![growl()]);

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.opponent.current_hp, 200);
    assert!(encounter.log.contains(&"Hero's attack missed!".to_string()));
    assert!(encounter.log.contains(&"It had no damaging effect on Hero.".to_string()));
}

#[test]
fn opponent_picks_its_move_at_random() {
    let mut engine = scripted_engine(ScriptedRandom::new().with_indices(&[1]));
    let mut encounter = duel(vec![growl()], vec![growl(), strike(80)]);

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.player.current_hp, 163);
    assert!(encounter.log.contains(&"Foe used strike!".to_string()));
}

#[test]
fn invalid_move_index_changes_nothing() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![strike(80)], vec![strike(80)]);
    encounter.log.push("previous turn".to_string());

    let err = engine.resolve_turn(&mut encounter, 4).unwrap_err();

    assert!(matches!(err, BattleError::InvalidMoveIndex { index: 4, available: 1 }));
    assert_eq!(encounter.turn, 1);
    assert_eq!(encounter.player.current_hp, 200);
    assert_eq!(encounter.opponent.current_hp, 200);
    assert_eq!(encounter.log, vec!["previous turn".to_string()]);
}

#[test]
fn knockout_ends_battle_and_awards_experience() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![strike(80)], vec![strike(80)]);
    encounter.opponent.current_hp = 30;
    encounter.opponent.base_experience = 64;

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.status, EncounterStatus::Ended { winner: Side::Player });
    assert_eq!(encounter.opponent.current_hp, 0);
    assert_eq!(encounter.player.current_hp, 200);
    assert_eq!(encounter.player.experience, 457);
    assert!(encounter.log.contains(&"Foe fainted!".to_string()));
    assert!(!encounter.log.contains(&"Foe used strike!".to_string()));
    assert_eq!(
        encounter.log[encounter.log.len() - 2..].to_vec(),
        vec!["Hero wins the battle!".to_string(), "Hero gained 457 experience.".to_string()]
    );
    assert_eq!(encounter.winner().map(|w| w.name.as_str()), Some("Hero"));

    assert!(matches!(engine.resolve_turn(&mut encounter, 0), Err(BattleError::BattleOver)));
    assert!(matches!(engine.use_item(&mut encounter, 0), Err(BattleError::BattleOver)));
}

#[test]
fn opponent_can_win() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![growl()], vec![strike(80)]);
    encounter.player.current_hp = 10;

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.status, EncounterStatus::Ended { winner: Side::Opponent });
    assert!(encounter.log.contains(&"Hero fainted!".to_string()));
    assert!(encounter.log.contains(&"Foe wins the battle!".to_string()));
}

#[test]
fn burn_and_poison_upkeep() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = Encounter::new(
        make_mon("Hero", &["normal"], 100, vec![growl()]),
        make_mon("Foe", &["normal"], 100, vec![growl()]),
        None,
    );
    encounter.player.inflict(StatusKind::Burn);
    encounter.opponent.inflict(StatusKind::Poison);

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.player.current_hp, 90);
    assert_eq!(encounter.opponent.current_hp, 92);
    assert_eq!(encounter.player.status.turns_left, 4);
    assert_eq!(
        encounter.log[..2].to_vec(),
        vec![
            "Hero is hurt by its burn (-10 HP, 90/100).".to_string(),
            "Foe is hurt by its poison (-8 HP, 92/100).".to_string(),
        ]
    );

    for _ in 0..4 {
        engine.resolve_turn(&mut encounter, 0).unwrap();
    }
    assert_eq!(encounter.player.current_hp, 50);
    assert_eq!(encounter.opponent.current_hp, 60);
    assert!(encounter.player.status.is_none());
    assert!(encounter.opponent.status.is_none());
    assert!(encounter.log.contains(&"Hero is no longer burned.".to_string()));
    assert!(encounter.log.contains(&"Foe is no longer poisoned.".to_string()));

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert_eq!(encounter.player.current_hp, 50);
}

#[test]
fn upkeep_knocking_out_both_sides_loses_for_the_player() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = Encounter::new(
        make_mon("Hero", &["normal"], 100, vec![strike(80)]),
        make_mon("Foe", &["normal"], 100, vec![strike(80)]),
        None,
    );
    encounter.player.current_hp = 5;
    encounter.opponent.current_hp = 5;
    encounter.player.inflict(StatusKind::Burn);
    encounter.opponent.inflict(StatusKind::Burn);

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.status, EncounterStatus::Ended { winner: Side::Opponent });
    assert!(encounter.log.iter().all(|line| !line.contains("used strike")));
}

#[test]
fn sleep_skips_moves_until_it_wears_off() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![strike(80)], vec![growl()]);
    encounter.player.inflict(StatusKind::Sleep);

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert!(encounter.log.contains(&"Hero is fast asleep.".to_string()));
    assert_eq!(encounter.opponent.current_hp, 200);

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert!(encounter.log.contains(&"Hero is no longer asleep.".to_string()));
    assert_eq!(encounter.opponent.current_hp, 163);
}

#[test]
fn paralysis_can_stop_a_move() {
    let mut engine = scripted_engine(ScriptedRandom::new().with_percents(&[10.0, 0.0, 50.0, 0.0]));
    let mut encounter = duel(vec![strike(80)], vec![growl()]);
    encounter.player.inflict(StatusKind::Paralyze);

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert!(encounter.log.contains(&"Hero is paralyzed! It can't move!".to_string()));
    assert_eq!(encounter.opponent.current_hp, 200);

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert!(encounter.log.contains(&"Hero used strike!".to_string()));
    assert_eq!(encounter.opponent.current_hp, 163);
}

#[test]
fn guaranteed_ailment_lands_on_the_defender() {
    let jolt = Move::new("jolt", "electric", MoveCategory::Special, 0, 100)
        .with_ailment(StatusKind::Paralyze, 0);
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![jolt], vec![strike(80)]);

    engine.resolve_turn(&mut encounter, 0).unwrap();

    assert_eq!(encounter.opponent.status.kind, StatusKind::Paralyze);
    assert_eq!(encounter.opponent.status.turns_left, 3);
    assert!(encounter.log.contains(&"Foe is now paralyzed!".to_string()));
}

#[test]
fn immune_targets_take_neither_damage_nor_ailments() {
    let shock = Move::new("thunder shock", "electric", MoveCategory::Special, 40, 100)
        .with_ailment(StatusKind::Paralyze, 0);
    let wave = Move::new("thunder wave", "electric", MoveCategory::Special, 0, 90)
        .with_ailment(StatusKind::Paralyze, 0);
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = Encounter::new(
        make_mon("Hero", &["electric"], 200, vec![shock, wave]),
        make_mon("Digger", &["ground"], 200, vec![growl()]),
        None,
    );

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert_eq!(encounter.opponent.current_hp, 200);
    assert!(encounter.opponent.status.is_none());
    assert_eq!(
        encounter.log[..2].to_vec(),
        vec![
            "Hero used thunder shock!".to_string(),
            "It doesn't affect Digger...".to_string(),
        ]
    );
    assert!(encounter.log.contains(&"Digger used growl!".to_string()));

    engine.resolve_turn(&mut encounter, 1).unwrap();
    assert!(encounter.opponent.status.is_none());
    assert!(encounter.log.contains(&"It doesn't affect Digger...".to_string()));
}

#[test]
fn weather_runs_out_after_five_turns() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = Encounter::new(
        make_mon("Hero", &["normal"], 200, vec![growl()]),
        make_mon("Foe", &["normal"], 200, vec![growl()]),
        Some(WeatherKind::Sunny),
    );

    for _ in 0..4 {
        engine.resolve_turn(&mut encounter, 0).unwrap();
        assert_eq!(encounter.log.first().map(String::as_str), Some("The sunlight is strong."));
    }
    assert_eq!(encounter.weather.map(|w| w.turns_left), Some(1));

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert!(encounter.weather.is_none());
    assert_eq!(encounter.log.last().map(String::as_str), Some("The sunlight faded."));

    engine.resolve_turn(&mut encounter, 0).unwrap();
    assert!(encounter.log.iter().all(|line| !line.contains("sunlight")));
}

#[test]
fn items_heal_cure_and_boost() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![strike(80)], vec![growl()]);
    encounter.player.items = vec![potion(), full_heal(), x_attack()];
    encounter.player.current_hp = 190;

    let lines = engine.use_item(&mut encounter, 0).unwrap();
    assert_eq!(encounter.player.current_hp, 200);
    assert_eq!(lines[1], "Hero restored 10 HP (200/200).");
    assert_eq!(encounter.player.items.len(), 2);

    // nothing to cure, but the item is still spent
    let lines = engine.use_item(&mut encounter, 0).unwrap();
    assert_eq!(lines.last().map(String::as_str), Some("It had no effect."));
    assert_eq!(encounter.player.items.len(), 1);

    engine.use_item(&mut encounter, 0).unwrap();
    assert_eq!(encounter.player.stages.get(StatKind::Attack), 1);
    assert!(encounter.player.items.is_empty());
    assert_eq!(encounter.turn, 1);
}

#[test]
fn full_heal_clears_status() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![strike(80)], vec![growl()]);
    encounter.player.items = vec![full_heal()];
    encounter.player.inflict(StatusKind::Poison);

    let lines = engine.use_item(&mut encounter, 0).unwrap();
    assert!(encounter.player.status.is_none());
    assert!(lines.contains(&"Hero is no longer poisoned.".to_string()));
}

#[test]
fn invalid_item_index_keeps_the_bag() {
    let mut engine = scripted_engine(ScriptedRandom::new());
    let mut encounter = duel(vec![strike(80)], vec![growl()]);
    encounter.player.items = default_inventory();
    encounter.player.current_hp = 50;

    let err = engine.use_item(&mut encounter, 9).unwrap_err();
    assert!(matches!(err, BattleError::InvalidItemIndex { index: 9, available: 4 }));
    assert_eq!(encounter.player.items.len(), 4);
    assert_eq!(encounter.player.current_hp, 50);
}

#[test]
fn seeded_battles_always_end_with_one_winner() {
    for seed in 0..25u64 {
        let mut engine =
            BattleEngine::new(TypeChart::builtin(), Box::new(SmallRngSource::seeded(seed)));
        let ember = Move::new("ember", "fire", MoveCategory::Special, 40, 100)
            .with_ailment(StatusKind::Burn, 10);
        let vine = Move::new("vine whip", "grass", MoveCategory::Physical, 45, 95);
        let mut encounter = Encounter::new(
            make_mon("Sprout", &["grass", "poison"], 150, vec![vine, growl()]),
            make_mon("Ember", &["fire"], 140, vec![ember, strike(40), growl()]),
            None,
        );

        let mut turns = 0;
        while encounter.is_active() {
            let before = encounter.turn;
            engine.resolve_turn(&mut encounter, turns % 2).unwrap();
            turns += 1;
            assert_eq!(encounter.turn, before + 1);
            assert!(encounter.player.current_hp <= encounter.player.max_hp());
            assert!(encounter.opponent.current_hp <= encounter.opponent.max_hp());
            assert!(turns <= 100, "seed {seed} did not finish");
        }

        let fainted = [encounter.player.is_fainted(), encounter.opponent.is_fainted()];
        assert_eq!(fainted.iter().filter(|f| **f).count(), 1, "seed {seed}");
        let winner = encounter.winner().expect("finished battle has a winner");
        assert!(!winner.is_fainted());
    }
}
