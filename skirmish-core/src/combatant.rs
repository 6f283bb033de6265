use std::cell::OnceCell;
use std::fmt;

use skirmish_rules::{
    Creature, Die, Roller,
    types::{CreatureId, FactionId},
};

use crate::{
    command::CombatCommand,
    encounter::Encounter,
    factions::{FactionRelations, Stance},
    turn::Turn,
};

/// Decides what a combatant does next. Returning `None` ends the turn.
pub trait TurnActor {
    fn next_command(
        &self,
        combatant: &Combatant,
        turn: &Turn,
        scenario: &Scenario<'_>,
    ) -> Option<CombatCommand>;
}

#[derive(Debug, Clone, Copy)]
pub struct Scenario<'a> {
    pub encounter: &'a Encounter,
    pub combatants: &'a CombatantsCollection,
}

pub struct Combatant {
    pub creature: CreatureId,
    pub faction: FactionId,
    pub actor: Box<dyn TurnActor>,
    initiative: OnceCell<i32>,
}

impl Combatant {
    pub fn new(creature: CreatureId, faction: FactionId, actor: Box<dyn TurnActor>) -> Self {
        Self {
            creature,
            faction,
            actor,
            initiative: OnceCell::new(),
        }
    }

    pub fn initiative(&self, creature: &Creature, dice: &mut dyn Roller) -> i32 {
        *self.initiative.get_or_init(|| {
            dice.roll(Die::D20).value as i32 + *creature.initiative_modifier() as i32
        })
    }

    pub fn rolled_initiative(&self) -> Option<i32> {
        self.initiative.get().copied()
    }
}

impl fmt::Debug for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combatant")
            .field("creature", &self.creature)
            .field("faction", &self.faction)
            .field("initiative", &self.rolled_initiative())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct CombatantsCollection {
    combatants: Vec<Combatant>,
    relations: FactionRelations,
}

impl CombatantsCollection {
    pub fn new(combatants: Vec<Combatant>, relations: FactionRelations) -> Self {
        Self {
            combatants,
            relations,
        }
    }

    pub fn get(&self, creature: CreatureId) -> Option<&Combatant> {
        self.combatants
            .iter()
            .find(|combatant| combatant.creature == creature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn as_slice(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn stance_between(&self, a: &Combatant, b: &Combatant) -> Stance {
        self.relations.query_stance(a.faction, b.faction)
    }

    pub fn find_all_with_stance(&self, towards: &Combatant, stance: Stance) -> Vec<&Combatant> {
        self.combatants
            .iter()
            .filter(|combatant| self.stance_between(towards, combatant) == stance)
            .collect()
    }

    pub(crate) fn sort_by_initiative(&mut self) {
        self.combatants
            .sort_by_key(|combatant| std::cmp::Reverse(combatant.rolled_initiative()));
    }
}
