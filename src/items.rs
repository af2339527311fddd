use crate::battle::BattleError;
use crate::model::{Combatant, Item, ItemEffect, StatKind};

pub fn potion() -> Item {
    Item {
        name: "Potion".to_string(),
        effect: ItemEffect {
            heal: Some(20),
            ..ItemEffect::default()
        },
    }
}

pub fn super_potion() -> Item {
    Item {
        name: "Super Potion".to_string(),
        effect: ItemEffect {
            heal: Some(50),
            ..ItemEffect::default()
        },
    }
}

pub fn full_heal() -> Item {
    Item {
        name: "Full Heal".to_string(),
        effect: ItemEffect {
            cure_status: true,
            ..ItemEffect::default()
        },
    }
}

pub fn x_attack() -> Item {
    Item {
        name: "X Attack".to_string(),
        effect: ItemEffect {
            boost: Some((StatKind::Attack, 1)),
            ..ItemEffect::default()
        },
    }
}

/// Starting bag handed to the player's combatant.
pub fn default_inventory() -> Vec<Item> {
    vec![potion(), super_potion(), full_heal(), x_attack()]
}

/// Uses the item at `index` on `combatant`.
///
/// The index is checked before anything changes. A valid item is always
/// removed from the bag, even if none of its effects applied.
pub fn apply_item(combatant: &mut Combatant, index: usize) -> Result<Vec<String>, BattleError> {
    if index >= combatant.items.len() {
        return Err(BattleError::InvalidItemIndex {
            index,
            available: combatant.items.len(),
        });
    }
    let item = combatant.items.remove(index);
    let mut log = vec![format!("{} used {}!", combatant.name, item.name)];
    let mut applied = false;

    if let Some(amount) = item.effect.heal {
        let restored = combatant.heal(amount);
        log.push(format!(
            "{} restored {} HP ({}/{}).",
            combatant.name,
            restored,
            combatant.current_hp,
            combatant.max_hp()
        ));
        applied = true;
    }
    if item.effect.cure_status && !combatant.status.is_none() {
        log.push(format!(
            "{} is no longer {}.",
            combatant.name,
            combatant.status.kind.label()
        ));
        combatant.status = Default::default();
        applied = true;
    }
    if let Some((stat, delta)) = item.effect.boost {
        let before = combatant.stages.get(stat);
        let after = combatant.stages.shift(stat, delta);
        if after != before {
            log.push(format!("{}'s {} rose to stage {:+}.", combatant.name, stat.label(), after));
            applied = true;
        }
    }
    if !applied {
        log.push("It had no effect.".to_string());
    }
    Ok(log)
}
