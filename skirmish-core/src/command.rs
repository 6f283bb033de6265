use serde::{Deserialize, Serialize};
use skirmish_rules::{RollModifier, types::CreatureId};

use crate::{
    attack::AttackOutcome,
    board::BoardPosition,
    encounter::Encounter,
    errors::CombatError,
    turn::{Hit, Turn, TurnOutcome, TurnResource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatCommand {
    Move {
        to: BoardPosition,
    },
    Attack {
        target: CreatureId,
        modifier: RollModifier,
    },
    OffhandAttack {
        target: CreatureId,
    },
}

impl CombatCommand {
    pub fn resource(&self) -> TurnResource {
        match self {
            CombatCommand::Move { .. } => TurnResource::Movement,
            CombatCommand::Attack { .. } => TurnResource::Action,
            CombatCommand::OffhandAttack { .. } => TurnResource::BonusAction,
        }
    }

    pub fn perform(
        &self,
        actor: CreatureId,
        turn: Turn,
        encounter: &mut Encounter,
        outcomes: &mut Vec<TurnOutcome>,
    ) -> Result<Turn, CombatError> {
        let resource = self.resource();
        if !turn.has(resource) {
            return Err(CombatError::AlreadyPerformed(resource));
        }

        match *self {
            CombatCommand::Move { to } => {
                let from = encounter.move_creature(actor, to)?;
                outcomes.push(TurnOutcome::Moved {
                    name: encounter.creature(actor)?.name.clone(),
                    from,
                    to,
                });
            }
            CombatCommand::Attack { target, modifier } => {
                let outcome = encounter.resolve_attack(actor, target, modifier)?;
                record_attack(encounter, actor, target, outcome, outcomes)?;
            }
            CombatCommand::OffhandAttack { target } => {
                let outcome = encounter.resolve_attack(actor, target, RollModifier::Normal)?;
                record_attack(encounter, actor, target, outcome, outcomes)?;
            }
        }

        turn.consume(resource)
    }
}

fn record_attack(
    encounter: &Encounter,
    attacker: CreatureId,
    target: CreatureId,
    outcome: AttackOutcome,
    outcomes: &mut Vec<TurnOutcome>,
) -> Result<(), CombatError> {
    let attacker_name = encounter.creature(attacker)?.name.clone();
    let target = encounter.creature(target)?;
    let attacked_name = target.name.clone();

    if !outcome.was_rolled() {
        outcomes.push(TurnOutcome::OutOfRange {
            attacker_name,
            attacked_name,
        });
    } else if outcome.hit {
        outcomes.push(TurnOutcome::Hit(Hit {
            attacker_name,
            attacked_name: attacked_name.clone(),
            damage: outcome.damage_dealt,
            hit_roll: outcome.hit_roll,
            critical: outcome.critical,
            health_left: target.current_health,
        }));
        if !target.is_alive() {
            outcomes.push(TurnOutcome::Death(attacked_name));
        }
    } else {
        outcomes.push(TurnOutcome::Miss {
            attacker_name,
            attacked_name,
            hit_roll: outcome.hit_roll,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use skirmish_rules::{
        ClassKind, Creature, CreatureTemplate, FixedRolls, StatBlock, WeaponType,
        types::{ArmourClass, HitPoints, Level},
    };

    use super::*;
    use crate::board::GameBoard;

    fn encounter(rolls: impl IntoIterator<Item = u32>) -> Encounter {
        let mut encounter = Encounter::new(GameBoard::new(6, 6).unwrap(), FixedRolls::new(rolls));
        encounter
            .add_creature(
                CreatureTemplate::Fighter.to_creature(CreatureId::new(1), "Aldo"),
                BoardPosition::new(0, 0),
            )
            .unwrap();
        encounter
            .add_creature(
                CreatureTemplate::Goblin.to_creature(CreatureId::new(2), "Snik"),
                BoardPosition::new(1, 0),
            )
            .unwrap();
        encounter
    }

    #[test]
    fn commands_name_their_resource() {
        let target = CreatureId::new(2);
        assert_eq!(
            CombatCommand::Move {
                to: BoardPosition::new(0, 0)
            }
            .resource(),
            TurnResource::Movement
        );
        assert_eq!(
            CombatCommand::Attack {
                target,
                modifier: RollModifier::Normal
            }
            .resource(),
            TurnResource::Action
        );
        assert_eq!(
            CombatCommand::OffhandAttack { target }.resource(),
            TurnResource::BonusAction
        );
    }

    #[test]
    fn moving_spends_movement() {
        let mut encounter = encounter([]);
        let mut outcomes = vec![];
        let to = BoardPosition::new(3, 4);

        let turn = CombatCommand::Move { to }
            .perform(CreatureId::new(1), Turn::new(1), &mut encounter, &mut outcomes)
            .unwrap();

        assert!(!turn.has(TurnResource::Movement));
        assert!(turn.has(TurnResource::Action));
        assert_eq!(encounter.position_of(CreatureId::new(1)), Some(to));
        assert_eq!(
            outcomes,
            vec![TurnOutcome::Moved {
                name: "Aldo".to_string(),
                from: BoardPosition::new(0, 0),
                to,
            }]
        );
    }

    #[test]
    fn lethal_attack_reports_death() {
        // 17 + 4 hits AC 15, then 1d8 rolls 6 + 3.
        let mut encounter = encounter([17, 6]);
        let mut outcomes = vec![];

        let turn = CombatCommand::Attack {
            target: CreatureId::new(2),
            modifier: RollModifier::Normal,
        }
        .perform(CreatureId::new(1), Turn::new(1), &mut encounter, &mut outcomes)
        .unwrap();

        assert!(!turn.has(TurnResource::Action));
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            &outcomes[0],
            TurnOutcome::Hit(Hit { damage: 9, health_left, .. }) if *health_left == HitPoints::ZERO
        ));
        assert_eq!(outcomes[1], TurnOutcome::Death("Snik".to_string()));
    }

    #[test]
    fn clumsy_adjacent_swing_is_a_miss() {
        let mut encounter = Encounter::new(GameBoard::new(3, 3).unwrap(), FixedRolls::new([1]));
        encounter
            .add_creature(
                Creature::new(
                    CreatureId::new(1),
                    "Weak",
                    ClassKind::Wizard,
                    Level::new(1),
                    StatBlock::new(8, 10, 10, 10, 10, 10),
                    HitPoints::new(6),
                    ArmourClass::new(10),
                    WeaponType::Longsword.to_weapon(),
                ),
                BoardPosition::new(0, 0),
            )
            .unwrap();
        encounter
            .add_creature(
                CreatureTemplate::Goblin.to_creature(CreatureId::new(2), "Target"),
                BoardPosition::new(1, 0),
            )
            .unwrap();
        let mut outcomes = vec![];

        // 1 - 1 for strength, no proficiency with a martial weapon.
        CombatCommand::Attack {
            target: CreatureId::new(2),
            modifier: RollModifier::Normal,
        }
        .perform(CreatureId::new(1), Turn::new(1), &mut encounter, &mut outcomes)
        .unwrap();

        assert_eq!(
            outcomes,
            vec![TurnOutcome::Miss {
                attacker_name: "Weak".to_string(),
                attacked_name: "Target".to_string(),
                hit_roll: 0,
            }]
        );
    }

    #[test]
    fn far_target_is_out_of_range() {
        let mut encounter = encounter([]);
        encounter
            .move_creature(CreatureId::new(2), BoardPosition::new(4, 0))
            .unwrap();
        let mut outcomes = vec![];

        let turn = CombatCommand::Attack {
            target: CreatureId::new(2),
            modifier: RollModifier::Normal,
        }
        .perform(CreatureId::new(1), Turn::new(1), &mut encounter, &mut outcomes)
        .unwrap();

        assert!(!turn.has(TurnResource::Action));
        assert_eq!(
            outcomes,
            vec![TurnOutcome::OutOfRange {
                attacker_name: "Aldo".to_string(),
                attacked_name: "Snik".to_string(),
            }]
        );
    }

    #[test]
    fn spent_resource_cannot_be_performed() {
        let mut encounter = encounter([]);
        let turn = Turn::new(1).use_bonus_action().unwrap();

        let result = CombatCommand::OffhandAttack {
            target: CreatureId::new(2),
        }
        .perform(CreatureId::new(1), turn, &mut encounter, &mut vec![]);

        let error = result.unwrap_err();
        assert_eq!(error, CombatError::AlreadyPerformed(TurnResource::BonusAction));
        assert!(error.to_string().contains("already performed in this turn"));
    }
}
