use std::collections::HashMap;

use serde::Serialize;
use skirmish_rules::{
    Attackable, Attacker, Die, RangeBand, RollModifier, Roller, types::CreatureId,
};
use tracing::debug;

use crate::{board::BoardPosition, errors::CombatError};

pub trait ProvidesBoardPosition {
    fn board_position(&self, creature: CreatureId) -> Option<BoardPosition>;
}

impl ProvidesBoardPosition for HashMap<CreatureId, BoardPosition> {
    fn board_position(&self, creature: CreatureId) -> Option<BoardPosition> {
        self.get(&creature).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttackOutcome {
    pub hit: bool,
    pub damage_dealt: i32,
    pub hit_roll: i32,
    pub critical: bool,
    pub range: RangeBand,
}

impl AttackOutcome {
    pub const OUT_OF_RANGE: AttackOutcome = AttackOutcome {
        hit: false,
        damage_dealt: 0,
        hit_roll: 0,
        critical: false,
        range: RangeBand::OutOfRange,
    };

    pub fn was_rolled(&self) -> bool {
        self.range != RangeBand::OutOfRange
    }
}

pub fn attack(
    attacker: &dyn Attacker,
    defender: &mut dyn Attackable,
    positions: &dyn ProvidesBoardPosition,
    modifier: RollModifier,
    dice: &mut dyn Roller,
) -> Result<AttackOutcome, CombatError> {
    let attacker_id = attacker.attacker_id();
    let defender_id = defender.defender_id();
    let from = positions
        .board_position(attacker_id)
        .ok_or(CombatError::MissingPosition(attacker_id))?;
    let to = positions
        .board_position(defender_id)
        .ok_or(CombatError::MissingPosition(defender_id))?;

    let weapon = attacker.weapon();
    let distance = from.distance_to(&to);
    let range = weapon.range.classify(distance);
    let modifier = match range {
        RangeBand::Normal => modifier,
        RangeBand::Long => modifier.give_disadvantage(),
        RangeBand::OutOfRange => {
            debug!(%attacker_id, %defender_id, %distance, "target out of range");
            return Ok(AttackOutcome::OUT_OF_RANGE);
        }
    };

    let roll = modifier.roll(Die::D20, dice);
    let critical = attacker.is_critical_hit(roll);
    let hit_roll = roll.value as i32 + attacker.attack_modifier();
    let armour_class = *defender.armour_class();

    if hit_roll < armour_class {
        debug!(%attacker_id, %defender_id, hit_roll, armour_class, "attack missed");
        return Ok(AttackOutcome {
            hit: false,
            damage_dealt: 0,
            hit_roll,
            critical,
            range,
        });
    }

    let damage = weapon.damage.roll(critical, dice) + attacker.damage_modifier();
    let damage_dealt = defender.receive_damage(damage, weapon.damage_type);
    debug!(
        %attacker_id,
        %defender_id,
        hit_roll,
        armour_class,
        critical,
        damage,
        damage_dealt,
        "attack hit"
    );

    Ok(AttackOutcome {
        hit: true,
        damage_dealt,
        hit_roll,
        critical,
        range,
    })
}
