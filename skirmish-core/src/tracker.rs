use tracing::{debug, info};

use crate::{
    combatant::{Combatant, CombatantsCollection, Scenario},
    encounter::Encounter,
    errors::CombatError,
    factions::{FactionRelations, Stance},
    turn::{Turn, TurnOutcome},
};

pub trait CombatTrackerListener {
    fn initiative_rolled(&mut self, order: &[Combatant]);
}

#[derive(Debug)]
pub struct CombatTracker {
    combatants: CombatantsCollection,
    round: u32,
    current: usize,
    turn: Turn,
}

impl CombatTracker {
    pub fn new(
        combatants: Vec<Combatant>,
        relations: FactionRelations,
        encounter: &mut Encounter,
        listener: Option<&mut dyn CombatTrackerListener>,
    ) -> Result<Self, CombatError> {
        if combatants.is_empty() {
            return Err(CombatError::NoCombatants);
        }

        for combatant in &combatants {
            encounter.roll_initiative(combatant)?;
        }
        let mut combatants = CombatantsCollection::new(combatants, relations);
        combatants.sort_by_initiative();

        for combatant in combatants.iter() {
            debug!(
                creature = %combatant.creature,
                initiative = ?combatant.rolled_initiative(),
                "initiative order"
            );
        }
        if let Some(listener) = listener {
            listener.initiative_rolled(combatants.as_slice());
        }

        Ok(Self {
            combatants,
            round: 1,
            current: 0,
            turn: Turn::new(1),
        })
    }

    pub fn combatants_ordered_by_initiative(&self) -> &[Combatant] {
        self.combatants.as_slice()
    }

    pub fn combatants(&self) -> &CombatantsCollection {
        &self.combatants
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_combatant(&self) -> &Combatant {
        &self.combatants.as_slice()[self.current]
    }

    pub fn current_turn(&self) -> &Turn {
        &self.turn
    }

    pub fn advance_turn(
        &mut self,
        encounter: &mut Encounter,
    ) -> Result<Vec<TurnOutcome>, CombatError> {
        let mut outcomes = vec![];
        let combatant = &self.combatants.as_slice()[self.current];
        let creature = encounter.creature(combatant.creature)?;

        if !creature.is_alive() {
            debug!(creature = %creature.id, "skipping defeated combatant");
            outcomes.push(TurnOutcome::Skipped(creature.name.clone()));
        } else {
            outcomes.push(TurnOutcome::StartTurn(creature.name.clone()));

            // A failed command leaves the floor with this combatant and what it already spent.
            loop {
                let scenario = Scenario {
                    encounter: &*encounter,
                    combatants: &self.combatants,
                };
                let Some(command) = combatant.actor.next_command(combatant, &self.turn, &scenario)
                else {
                    break;
                };

                debug!(creature = %combatant.creature, ?command, "performing command");
                self.turn =
                    command.perform(combatant.creature, self.turn, encounter, &mut outcomes)?;
                if !self.turn.has_options_for_turn_left() {
                    break;
                }
            }
        }

        self.current += 1;
        if self.current == self.combatants.len() {
            self.current = 0;
            self.round += 1;
            info!(round = self.round, "new round");
            outcomes.push(TurnOutcome::RoundStarted(self.round));
        }
        self.turn = Turn::new(self.round);

        Ok(outcomes)
    }

    /// True once no two living combatants are hostile to each other.
    pub fn is_finished(&self, encounter: &Encounter) -> bool {
        let alive: Vec<&Combatant> = self
            .combatants
            .iter()
            .filter(|combatant| {
                encounter
                    .creature(combatant.creature)
                    .is_ok_and(|creature| creature.is_alive())
            })
            .collect();

        !alive.iter().any(|a| {
            alive
                .iter()
                .any(|b| self.combatants.stance_between(a, b) == Stance::Hostile)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use skirmish_rules::{
        ClassKind, Creature, FixedRolls, RollModifier, StatBlock, WeaponType,
        types::{ArmourClass, CreatureId, FactionId, HitPoints, Level},
    };

    use super::*;
    use crate::{
        board::{BoardPosition, GameBoard},
        combatant::TurnActor,
        command::CombatCommand,
        factions::FactionRelationship,
        turn::TurnResource,
    };

    struct Scripted {
        calls: Rc<Cell<usize>>,
        commands: Vec<CombatCommand>,
    }

    impl Scripted {
        fn boxed(calls: &Rc<Cell<usize>>, commands: Vec<CombatCommand>) -> Box<Self> {
            Box::new(Self {
                calls: Rc::clone(calls),
                commands,
            })
        }
    }

    impl TurnActor for Scripted {
        fn next_command(
            &self,
            _: &Combatant,
            _: &Turn,
            _: &Scenario<'_>,
        ) -> Option<CombatCommand> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            self.commands.get(call).copied()
        }
    }

    #[derive(Default)]
    struct RecordOrder(Vec<CreatureId>);

    impl CombatTrackerListener for RecordOrder {
        fn initiative_rolled(&mut self, order: &[Combatant]) {
            self.0 = order.iter().map(|combatant| combatant.creature).collect();
        }
    }

    fn creature(id: u64) -> Creature {
        Creature::new(
            CreatureId::new(id),
            &format!("creature {id}"),
            ClassKind::Fighter,
            Level::new(1),
            StatBlock::default(),
            HitPoints::new(10),
            ArmourClass::new(15),
            WeaponType::Mace.to_weapon(),
        )
    }

    fn encounter(count: u64, rolls: impl IntoIterator<Item = u32>) -> Encounter {
        let mut encounter = Encounter::new(GameBoard::new(5, 5).unwrap(), FixedRolls::new(rolls));
        for id in 1..=count {
            encounter
                .add_creature(creature(id), BoardPosition::new(id as i32 - 1, 0))
                .unwrap();
        }
        encounter
    }

    fn idle(id: u64, faction: u64, calls: &Rc<Cell<usize>>) -> Combatant {
        Combatant::new(
            CreatureId::new(id),
            FactionId::new(faction),
            Scripted::boxed(calls, vec![]),
        )
    }

    fn order(tracker: &CombatTracker) -> Vec<u64> {
        tracker
            .combatants_ordered_by_initiative()
            .iter()
            .map(|combatant| *combatant.creature)
            .collect()
    }

    #[test]
    fn no_combatants_is_an_error() {
        let mut encounter = encounter(0, []);
        let result = CombatTracker::new(vec![], FactionRelations::default(), &mut encounter, None);
        assert!(matches!(result, Err(CombatError::NoCombatants)));
    }

    #[test]
    fn unknown_creature_is_an_error() {
        let mut encounter = encounter(1, []);
        let calls = Rc::new(Cell::new(0));
        let result = CombatTracker::new(
            vec![idle(7, 1, &calls)],
            FactionRelations::default(),
            &mut encounter,
            None,
        );
        assert!(matches!(
            result,
            Err(CombatError::UnknownCreature(id)) if id == CreatureId::new(7)
        ));
    }

    #[test]
    fn initiative_order_is_descending_and_stable() {
        let mut encounter = encounter(4, [5, 15, 15, 9]);
        let calls = Rc::new(Cell::new(0));
        let mut listener = RecordOrder::default();

        let tracker = CombatTracker::new(
            (1..=4).map(|id| idle(id, id, &calls)).collect(),
            FactionRelations::default(),
            &mut encounter,
            Some(&mut listener),
        )
        .unwrap();

        assert_eq!(order(&tracker), vec![2, 3, 4, 1]);
        assert_eq!(
            listener.0,
            [2, 3, 4, 1].map(CreatureId::new).to_vec()
        );
        assert_eq!(tracker.round(), 1);
        assert_eq!(*tracker.current_combatant().creature, 2);
    }

    #[test]
    fn initiative_is_not_rerolled() {
        let mut encounter = encounter(2, [12, 8]);
        let calls = Rc::new(Cell::new(0));
        let tracker = CombatTracker::new(
            vec![idle(1, 1, &calls), idle(2, 2, &calls)],
            FactionRelations::default(),
            &mut encounter,
            None,
        )
        .unwrap();

        let first = &tracker.combatants_ordered_by_initiative()[0];
        assert_eq!(first.rolled_initiative(), Some(12));
        // The dice are exhausted, so a second roll would panic.
        assert_eq!(encounter.roll_initiative(first).unwrap(), 12);
        assert_eq!(first.rolled_initiative(), Some(12));
    }

    #[test]
    fn rounds_wrap_after_the_last_combatant() {
        let mut encounter = encounter(2, [12, 8]);
        let calls = Rc::new(Cell::new(0));
        let mut tracker = CombatTracker::new(
            vec![idle(1, 1, &calls), idle(2, 2, &calls)],
            FactionRelations::default(),
            &mut encounter,
            None,
        )
        .unwrap();

        let outcomes = tracker.advance_turn(&mut encounter).unwrap();
        assert_eq!(outcomes, vec![TurnOutcome::StartTurn("creature 1".into())]);
        assert_eq!(tracker.round(), 1);

        let outcomes = tracker.advance_turn(&mut encounter).unwrap();
        assert_eq!(
            outcomes,
            vec![
                TurnOutcome::StartTurn("creature 2".into()),
                TurnOutcome::RoundStarted(2),
            ]
        );
        assert_eq!(tracker.round(), 2);
        assert_eq!(*tracker.current_combatant().creature, 1);
        assert_eq!(tracker.current_turn().round, 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn defeated_combatants_are_skipped() {
        let mut encounter = encounter(2, [12, 8]);
        let dead_calls = Rc::new(Cell::new(0));
        let live_calls = Rc::new(Cell::new(0));
        let mut tracker = CombatTracker::new(
            vec![idle(1, 1, &dead_calls), idle(2, 2, &live_calls)],
            FactionRelations::default(),
            &mut encounter,
            None,
        )
        .unwrap();
        encounter.creature_mut(CreatureId::new(1)).unwrap().current_health = HitPoints::ZERO;

        let outcomes = tracker.advance_turn(&mut encounter).unwrap();
        assert_eq!(outcomes, vec![TurnOutcome::Skipped("creature 1".into())]);
        assert_eq!(dead_calls.get(), 0);

        tracker.advance_turn(&mut encounter).unwrap();
        assert_eq!(live_calls.get(), 1);

        tracker.advance_turn(&mut encounter).unwrap();
        assert_eq!(dead_calls.get(), 0);
    }

    #[test]
    fn actor_is_asked_once_per_available_resource() {
        // Initiative 18 and 3, then two missed attack rolls.
        let mut encounter = encounter(2, [18, 3, 1, 1]);
        let calls = Rc::new(Cell::new(0));
        let target = CreatureId::new(2);
        let commands = vec![
            CombatCommand::Attack {
                target,
                modifier: RollModifier::Normal,
            },
            CombatCommand::OffhandAttack { target },
            CombatCommand::Move {
                to: BoardPosition::new(0, 1),
            },
            CombatCommand::Attack {
                target,
                modifier: RollModifier::Normal,
            },
        ];
        let mut tracker = CombatTracker::new(
            vec![
                Combatant::new(
                    CreatureId::new(1),
                    FactionId::new(1),
                    Scripted::boxed(&calls, commands),
                ),
                idle(2, 2, &Rc::new(Cell::new(0))),
            ],
            FactionRelations::default(),
            &mut encounter,
            None,
        )
        .unwrap();

        let outcomes = tracker.advance_turn(&mut encounter).unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(outcomes.len(), 4);
        assert!(matches!(outcomes[1], TurnOutcome::Miss { hit_roll: 2, .. }));
        assert!(matches!(outcomes[2], TurnOutcome::Miss { .. }));
        assert!(matches!(outcomes[3], TurnOutcome::Moved { .. }));
        assert_eq!(
            encounter.position_of(CreatureId::new(1)),
            Some(BoardPosition::new(0, 1))
        );
        assert!(tracker.current_turn().has(TurnResource::Action));
    }

    #[test]
    fn invalid_command_is_reported() {
        let mut encounter = encounter(2, [18, 3]);
        let calls = Rc::new(Cell::new(0));
        let mut tracker = CombatTracker::new(
            vec![
                Combatant::new(
                    CreatureId::new(1),
                    FactionId::new(1),
                    Scripted::boxed(
                        &calls,
                        vec![CombatCommand::Move {
                            to: BoardPosition::new(1, 0),
                        }],
                    ),
                ),
                idle(2, 2, &calls),
            ],
            FactionRelations::default(),
            &mut encounter,
            None,
        )
        .unwrap();

        assert_eq!(
            tracker.advance_turn(&mut encounter),
            Err(CombatError::Unreachable(
                CreatureId::new(1),
                BoardPosition::new(1, 0)
            ))
        );
    }

    #[test]
    fn failed_command_keeps_spent_resources() {
        // Initiative 18 and 3, then 15 + 1 hits AC 15 and the mace rolls 4.
        let mut encounter = encounter(2, [18, 3, 15, 4]);
        let calls = Rc::new(Cell::new(0));
        let target = CreatureId::new(2);
        let commands = vec![
            CombatCommand::Attack {
                target,
                modifier: RollModifier::Normal,
            },
            CombatCommand::Move {
                to: BoardPosition::new(1, 0),
            },
        ];
        let mut tracker = CombatTracker::new(
            vec![
                Combatant::new(
                    CreatureId::new(1),
                    FactionId::new(1),
                    Scripted::boxed(&calls, commands),
                ),
                idle(2, 2, &Rc::new(Cell::new(0))),
            ],
            FactionRelations::default(),
            &mut encounter,
            None,
        )
        .unwrap();

        assert!(matches!(
            tracker.advance_turn(&mut encounter),
            Err(CombatError::Unreachable(..))
        ));
        assert_eq!(*tracker.current_combatant().creature, 1);
        assert!(!tracker.current_turn().has(TurnResource::Action));
        assert!(tracker.current_turn().has(TurnResource::Movement));
        assert_eq!(
            encounter.creature(target).unwrap().current_health,
            HitPoints::new(6)
        );

        // The same turn resumes without a second attack.
        let outcomes = tracker.advance_turn(&mut encounter).unwrap();
        assert_eq!(outcomes, vec![TurnOutcome::StartTurn("creature 1".into())]);
        assert_eq!(calls.get(), 3);
        assert_eq!(
            encounter.creature(target).unwrap().current_health,
            HitPoints::new(6)
        );
        assert_eq!(*tracker.current_combatant().creature, 2);
        assert!(tracker.current_turn().has(TurnResource::Action));
    }

    #[test]
    fn finished_once_no_hostiles_remain() {
        let mut encounter = encounter(3, [10, 9, 8]);
        let calls = Rc::new(Cell::new(0));
        let relations = FactionRelations::builder()
            .with(FactionRelationship::new(
                FactionId::new(1),
                FactionId::new(3),
                Stance::Neutral,
            ))
            .unwrap()
            .build();
        let tracker = CombatTracker::new(
            vec![idle(1, 1, &calls), idle(2, 2, &calls), idle(3, 3, &calls)],
            relations,
            &mut encounter,
            None,
        )
        .unwrap();

        assert!(!tracker.is_finished(&encounter));
        encounter.creature_mut(CreatureId::new(2)).unwrap().current_health = HitPoints::ZERO;
        assert!(tracker.is_finished(&encounter));
    }
}
