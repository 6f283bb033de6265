use skirmish_core::{
    BoardPosition, CombatCommand, Combatant, Scenario, Stance, Turn, TurnActor, TurnResource,
};
use skirmish_rules::{Creature, RangeBand, RollModifier};

#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyActor;

struct Target<'a> {
    creature: &'a Creature,
    position: BoardPosition,
}

impl GreedyActor {
    fn nearest_enemy<'a>(
        combatant: &Combatant,
        position: BoardPosition,
        scenario: &Scenario<'a>,
    ) -> Option<Target<'a>> {
        let encounter = scenario.encounter;
        scenario
            .combatants
            .find_all_with_stance(combatant, Stance::Hostile)
            .into_iter()
            .filter_map(|enemy| {
                let creature = encounter.creature(enemy.creature).ok()?;
                let position = encounter.position_of(enemy.creature)?;
                creature.is_alive().then_some(Target { creature, position })
            })
            .min_by_key(|target| {
                (
                    position.distance_to(&target.position),
                    target.creature.current_health,
                    target.creature.id,
                )
            })
    }

    fn step_towards(
        me: &Creature,
        from: BoardPosition,
        goal: BoardPosition,
        scenario: &Scenario<'_>,
    ) -> Option<BoardPosition> {
        let reach = scenario.encounter.reach_of(me.id).ok()?;
        let (best, _) = reach
            .into_iter()
            .map(|(index, cost)| (BoardPosition::from(index), cost))
            .min_by_key(|(cell, cost)| (cell.distance_to(&goal), *cost, *cell))?;

        (best.distance_to(&goal) < from.distance_to(&goal)).then_some(best)
    }
}

impl TurnActor for GreedyActor {
    fn next_command(
        &self,
        combatant: &Combatant,
        turn: &Turn,
        scenario: &Scenario<'_>,
    ) -> Option<CombatCommand> {
        let me = scenario.encounter.creature(combatant.creature).ok()?;
        let position = scenario.encounter.position_of(me.id)?;
        let target = Self::nearest_enemy(combatant, position, scenario)?;

        let weapon = &me.equipped_weapon;
        let band = weapon.range.classify(position.distance_to(&target.position));

        if band == RangeBand::Normal {
            if turn.has(TurnResource::Action) {
                return Some(CombatCommand::Attack {
                    target: target.creature.id,
                    modifier: RollModifier::Normal,
                });
            }
            if turn.has(TurnResource::BonusAction) && weapon.light {
                return Some(CombatCommand::OffhandAttack {
                    target: target.creature.id,
                });
            }
        }

        if band != RangeBand::Normal && turn.has(TurnResource::Movement) {
            if let Some(to) = Self::step_towards(me, position, target.position, scenario) {
                return Some(CombatCommand::Move { to });
            }
        }

        if band == RangeBand::Long && turn.has(TurnResource::Action) {
            return Some(CombatCommand::Attack {
                target: target.creature.id,
                modifier: RollModifier::Normal,
            });
        }

        None
    }
}
