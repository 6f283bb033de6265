use skirmish_rules::types::{CreatureId, FactionId};
use thiserror::Error;

use crate::{
    board::{BoardPosition, Layer},
    grid::{BoundingBox, GridIndex},
    turn::TurnResource,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("{0} holds too many cells")]
    TooLarge(BoundingBox),

    #[error("{0} is outside the grid bounds {1}")]
    OutOfBounds(GridIndex, BoundingBox),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Steps must be >= 0, got {0}")]
    NegativeSteps(i32),

    #[error("The {layer} layer at {position} is already occupied")]
    Occupied {
        layer: Layer,
        position: BoardPosition,
    },

    #[error("Nothing on the {layer} layer at {position}")]
    Vacant {
        layer: Layer,
        position: BoardPosition,
    },

    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactionError {
    #[error("Relationship between factions {0} and {1} is already registered")]
    DuplicateRelationship(FactionId, FactionId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("Creature {0} has no board position")]
    MissingPosition(CreatureId),

    #[error("Unknown creature {0}")]
    UnknownCreature(CreatureId),

    #[error("Creature {0} is already part of the encounter")]
    DuplicateCreature(CreatureId),

    #[error("Creature {0} cannot target itself")]
    SelfTarget(CreatureId),

    #[error("Creature {0} cannot reach {1}")]
    Unreachable(CreatureId, BoardPosition),

    #[error("The {0} was already used this turn")]
    ResourceUsed(TurnResource),

    #[error("The {0} was already performed in this turn")]
    AlreadyPerformed(TurnResource),

    #[error("A combat needs at least one combatant")]
    NoCombatants,

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Faction(#[from] FactionError),
}

impl From<GridError> for CombatError {
    fn from(value: GridError) -> Self {
        CombatError::Board(value.into())
    }
}
