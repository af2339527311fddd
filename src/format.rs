use crate::battle::{Encounter, EncounterStatus};
use crate::catalog::{display_name, CreatureRecord, SpeciesRecord};
use crate::model::Combatant;

/// Text card for a looked-up creature.
/// `label` prefixes the card, e.g. "Random Pokemon from Kanto".
pub fn creature_card(
    label: Option<&str>,
    record: &CreatureRecord,
    species: Option<&SpeciesRecord>,
) -> String {
    let mut lines = Vec::new();
    if let Some(label) = label {
        lines.push(format!("{label}:"));
    }
    let name = display_name(&record.name);
    match species.and_then(|s| s.genus.as_deref()) {
        Some(genus) => lines.push(format!("{name} (#{}) - the {genus}", record.id)),
        None => lines.push(format!("{name} (#{})", record.id)),
    }
    lines.push(format!("Types: {}", title_list(&record.types)));
    lines.push(format!("Height: {:.1} m", record.height as f64 / 10.0));
    lines.push(format!("Weight: {:.1} kg", record.weight as f64 / 10.0));
    lines.push(format!("Abilities: {}", title_list(&record.abilities)));
    let description = species
        .and_then(|s| s.english_description())
        .unwrap_or("No description available.");
    lines.push(format!("Description: {description}"));
    lines.join("\n")
}

fn title_list(values: &[String]) -> String {
    if values.is_empty() {
        return "unknown".to_string();
    }
    values
        .iter()
        .map(|value| display_name(value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn combatant_line(combatant: &Combatant) -> String {
    let mut line = format!(
        "{} (Lv. {}) HP {}/{}",
        combatant.name,
        combatant.level,
        combatant.current_hp,
        combatant.max_hp()
    );
    if !combatant.status.is_none() {
        line.push_str(&format!(" [{}]", combatant.status.kind.label()));
    }
    line
}

fn hp_summary(encounter: &Encounter) -> Vec<String> {
    let mut lines = vec![
        format!("Your {}", combatant_line(&encounter.player)),
        format!("Foe {}", combatant_line(&encounter.opponent)),
    ];
    if let Some(weather) = encounter.weather {
        lines.push(format!(
            "Weather: {:?} ({} turn(s) left)",
            weather.kind, weather.turns_left
        ));
    }
    lines
}

fn move_list(combatant: &Combatant) -> Vec<String> {
    combatant
        .moves
        .iter()
        .enumerate()
        .map(|(idx, mv)| {
            format!(
                "  {idx}. {} ({}, power {}, accuracy {})",
                display_name(&mv.name),
                mv.affinity,
                mv.power,
                mv.accuracy
            )
        })
        .collect()
}

fn item_list(combatant: &Combatant) -> Vec<String> {
    if combatant.items.is_empty() {
        return vec!["  (empty)".to_string()];
    }
    combatant
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("  {idx}. {}", item.name))
        .collect()
}

fn outcome_lines(encounter: &Encounter) -> Vec<String> {
    match encounter.status {
        EncounterStatus::Active => {
            let mut lines = vec!["Your moves:".to_string()];
            lines.extend(move_list(&encounter.player));
            lines
        }
        EncounterStatus::Ended { .. } => {
            let winner = encounter
                .winner()
                .map(|w| w.name.clone())
                .unwrap_or_default();
            vec![format!("Battle over! {winner} is the winner.")]
        }
    }
}

/// Status card shown when a battle starts.
pub fn battle_card(encounter: &Encounter) -> String {
    let mut lines = vec![format!(
        "Battle started: {} vs {}!",
        encounter.player.name, encounter.opponent.name
    )];
    lines.extend(hp_summary(encounter));
    lines.push("Your moves:".to_string());
    lines.extend(move_list(&encounter.player));
    lines.push("Items:".to_string());
    lines.extend(item_list(&encounter.player));
    lines.join("\n")
}

/// Log of the turn just resolved plus where things stand.
pub fn turn_report(encounter: &Encounter) -> String {
    let resolved = encounter.turn.saturating_sub(1);
    let mut lines = vec![format!("Turn {resolved}:")];
    lines.extend(encounter.log.iter().map(|line| format!("  {line}")));
    lines.extend(hp_summary(encounter));
    lines.extend(outcome_lines(encounter));
    lines.join("\n")
}

pub fn item_report(encounter: &Encounter, used: &[String]) -> String {
    let mut lines: Vec<String> = used.to_vec();
    lines.extend(hp_summary(encounter));
    lines.push("Items left:".to_string());
    lines.extend(item_list(&encounter.player));
    lines.join("\n")
}
