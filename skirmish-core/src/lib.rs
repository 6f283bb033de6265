pub mod attack;
pub mod board;
pub mod combatant;
pub mod command;
pub mod encounter;
pub mod errors;
pub mod factions;
pub mod grid;
pub mod tracker;
pub mod turn;

pub use attack::{AttackOutcome, ProvidesBoardPosition, attack};
pub use board::{BoardPosition, GameBoard, Layer, Token, TokenKind};
pub use combatant::{Combatant, CombatantsCollection, Scenario, TurnActor};
pub use command::CombatCommand;
pub use encounter::Encounter;
pub use errors::{BoardError, CombatError, FactionError, GridError};
pub use factions::{Faction, FactionRelations, FactionRelationship, Stance};
pub use grid::{BooleanGrid, BoundedGrid, BoundingBox, Grid, GridIndex, UnboundedGrid};
pub use tracker::{CombatTracker, CombatTrackerListener};
pub use turn::{Hit, Turn, TurnOutcome, TurnResource};
