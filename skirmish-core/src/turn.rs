use std::fmt;

use serde::Serialize;
use skirmish_rules::types::HitPoints;

use crate::{board::BoardPosition, errors::CombatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TurnResource {
    Movement,
    Action,
    BonusAction,
    Reaction,
}

impl fmt::Display for TurnResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnResource::Movement => "movement",
            TurnResource::Action => "action",
            TurnResource::BonusAction => "bonus action",
            TurnResource::Reaction => "reaction",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub round: u32,
    movement: bool,
    action: bool,
    bonus_action: bool,
    reaction: bool,
}

impl Turn {
    pub fn new(round: u32) -> Self {
        Self {
            round,
            movement: true,
            action: true,
            bonus_action: true,
            reaction: true,
        }
    }

    pub fn has(&self, resource: TurnResource) -> bool {
        match resource {
            TurnResource::Movement => self.movement,
            TurnResource::Action => self.action,
            TurnResource::BonusAction => self.bonus_action,
            TurnResource::Reaction => self.reaction,
        }
    }

    pub fn consume(self, resource: TurnResource) -> Result<Turn, CombatError> {
        if !self.has(resource) {
            return Err(CombatError::ResourceUsed(resource));
        }

        let mut turn = self;
        match resource {
            TurnResource::Movement => turn.movement = false,
            TurnResource::Action => turn.action = false,
            TurnResource::BonusAction => turn.bonus_action = false,
            TurnResource::Reaction => turn.reaction = false,
        }
        Ok(turn)
    }

    pub fn use_movement(self) -> Result<Turn, CombatError> {
        self.consume(TurnResource::Movement)
    }

    pub fn use_action(self) -> Result<Turn, CombatError> {
        self.consume(TurnResource::Action)
    }

    pub fn use_bonus_action(self) -> Result<Turn, CombatError> {
        self.consume(TurnResource::BonusAction)
    }

    pub fn use_reaction(self) -> Result<Turn, CombatError> {
        self.consume(TurnResource::Reaction)
    }

    /// Reactions happen outside the turn cycle, so they are not counted here.
    pub fn has_options_for_turn_left(&self) -> bool {
        self.movement || self.action || self.bonus_action
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub attacker_name: String,
    pub attacked_name: String,
    pub damage: i32,
    pub hit_roll: i32,
    pub critical: bool,
    pub health_left: HitPoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TurnOutcome {
    RoundStarted(u32),
    StartTurn(String),
    Skipped(String),
    Moved {
        name: String,
        from: BoardPosition,
        to: BoardPosition,
    },
    Hit(Hit),
    Miss {
        attacker_name: String,
        attacked_name: String,
        hit_roll: i32,
    },
    OutOfRange {
        attacker_name: String,
        attacked_name: String,
    },
    Death(String),
}
