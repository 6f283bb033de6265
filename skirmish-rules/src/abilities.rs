use std::fmt;

use crate::types::{AbilityModifier, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum AbilityScaling {
    Strength,
    Dexterity,
    Either,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn from_ability_str(string: &str) -> Option<Self> {
        let string = string.to_lowercase();
        match string.as_str() {
            "strength" | "str" => Some(Self::Strength),
            "dexterity" | "dex" => Some(Self::Dexterity),
            "constitution" | "con" => Some(Self::Constitution),
            "intelligence" | "int" => Some(Self::Intelligence),
            "wisdom" | "wis" => Some(Self::Wisdom),
            "charisma" | "cha" => Some(Self::Charisma),
            _ => None,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct StatBlock {
    pub strength: Stat,
    pub dexterity: Stat,
    pub constitution: Stat,
    pub intelligence: Stat,
    pub wisdom: Stat,
    pub charisma: Stat,
}

impl StatBlock {
    pub fn new(
        strength: i16,
        dexterity: i16,
        constitution: i16,
        intelligence: i16,
        wisdom: i16,
        charisma: i16,
    ) -> Self {
        Self {
            strength: Stat::new(strength),
            dexterity: Stat::new(dexterity),
            constitution: Stat::new(constitution),
            intelligence: Stat::new(intelligence),
            wisdom: Stat::new(wisdom),
            charisma: Stat::new(charisma),
        }
    }

    pub fn stat(&self, ability: Ability) -> Stat {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> AbilityModifier {
        self.stat(ability).modifier()
    }

    pub fn scaling_modifier(&self, scaling: AbilityScaling) -> AbilityModifier {
        match scaling {
            AbilityScaling::Strength => self.modifier(Ability::Strength),
            AbilityScaling::Dexterity => self.modifier(Ability::Dexterity),
            AbilityScaling::Either => self
                .modifier(Ability::Strength)
                .max(self.modifier(Ability::Dexterity)),
        }
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}
