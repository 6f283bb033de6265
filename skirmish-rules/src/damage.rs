use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Psychic,
    Force,
    Thunder,
}

impl DamageType {
    pub fn all() -> &'static [DamageType] {
        &[
            DamageType::Slashing,
            DamageType::Piercing,
            DamageType::Bludgeoning,
            DamageType::Fire,
            DamageType::Cold,
            DamageType::Lightning,
            DamageType::Acid,
            DamageType::Poison,
            DamageType::Necrotic,
            DamageType::Radiant,
            DamageType::Psychic,
            DamageType::Force,
            DamageType::Thunder,
        ]
    }
}

impl FromStr for DamageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DamageType::all()
            .iter()
            .copied()
            .find(|damage_type| damage_type.to_string() == s.to_lowercase())
            .ok_or(())
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DamageType::Slashing => "slashing",
            DamageType::Piercing => "piercing",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Fire => "fire",
            DamageType::Cold => "cold",
            DamageType::Lightning => "lightning",
            DamageType::Acid => "acid",
            DamageType::Poison => "poison",
            DamageType::Necrotic => "necrotic",
            DamageType::Radiant => "radiant",
            DamageType::Psychic => "psychic",
            DamageType::Force => "force",
            DamageType::Thunder => "thunder",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifiers {
    pub immunities: BTreeSet<DamageType>,
    pub resistances: BTreeSet<DamageType>,
    pub vulnerabilities: BTreeSet<DamageType>,
}

impl DamageModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn immune_to(mut self, damage_type: DamageType) -> Self {
        self.immunities.insert(damage_type);
        self
    }

    pub fn resistant_to(mut self, damage_type: DamageType) -> Self {
        self.resistances.insert(damage_type);
        self
    }

    pub fn vulnerable_to(mut self, damage_type: DamageType) -> Self {
        self.vulnerabilities.insert(damage_type);
        self
    }

    pub fn apply(&self, amount: i32, damage_type: DamageType) -> i32 {
        let amount = amount.max(0);
        if self.immunities.contains(&damage_type) {
            0
        } else if self.resistances.contains(&damage_type) {
            amount / 2
        } else if self.vulnerabilities.contains(&damage_type) {
            amount * 2
        } else {
            amount
        }
    }
}
