use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use skirmish_rules::types::FactionId;

use crate::errors::FactionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
}

impl Faction {
    pub fn new(id: FactionId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stance {
    Friendly,
    Neutral,
    Hostile,
}

impl Stance {
    pub const DEFAULT: Stance = Stance::Hostile;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRelationship {
    pub first: FactionId,
    pub second: FactionId,
    pub stance: Stance,
}

impl FactionRelationship {
    pub fn new(first: FactionId, second: FactionId, stance: Stance) -> Self {
        Self {
            first,
            second,
            stance,
        }
    }

    fn key(&self) -> (FactionId, FactionId) {
        pair(self.first, self.second)
    }
}

fn pair(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactionRelations {
    stances: HashMap<(FactionId, FactionId), Stance>,
}

impl FactionRelations {
    pub fn builder() -> FactionRelationsBuilder {
        FactionRelationsBuilder::default()
    }

    pub fn query_stance(&self, a: FactionId, b: FactionId) -> Stance {
        if a == b {
            return Stance::Friendly;
        }
        self.stances
            .get(&pair(a, b))
            .copied()
            .unwrap_or(Stance::DEFAULT)
    }
}

#[derive(Debug, Default)]
pub struct FactionRelationsBuilder {
    registered: HashMap<(FactionId, FactionId), Stance>,
}

impl FactionRelationsBuilder {
    pub fn with(mut self, relationship: FactionRelationship) -> Result<Self, FactionError> {
        let key = relationship.key();
        if self.registered.contains_key(&key) {
            return Err(FactionError::DuplicateRelationship(key.0, key.1));
        }
        self.registered.insert(key, relationship.stance);
        Ok(self)
    }

    pub fn build(self) -> FactionRelations {
        let stances = self
            .registered
            .into_iter()
            .filter(|(_, stance)| *stance != Stance::DEFAULT)
            .collect();
        FactionRelations { stances }
    }
}
