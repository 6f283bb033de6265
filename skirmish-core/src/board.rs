use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use skirmish_rules::{
    CELL_SIZE,
    types::{CreatureId, Feet, TokenId},
};
use tracing::trace;

use crate::{
    errors::BoardError,
    grid::{BooleanGrid, BoundedGrid, BoundingBox, GridIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardPosition {
    pub x: i32,
    pub y: i32,
}

impl BoardPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn index(&self) -> GridIndex {
        GridIndex::new(self.x, self.y)
    }

    pub fn to_world(&self) -> (f32, f32) {
        let scale = *CELL_SIZE as f32;
        (self.x as f32 * scale, self.y as f32 * scale)
    }

    pub fn from_world(x: f32, y: f32) -> Self {
        let scale = *CELL_SIZE as f32;
        Self::new((x / scale).floor() as i32, (y / scale).floor() as i32)
    }

    pub fn distance_to(&self, other: &BoardPosition) -> Feet {
        Feet::new(self.index().chebyshev_distance(&other.index()) * *CELL_SIZE)
    }
}

impl From<GridIndex> for BoardPosition {
    fn from(index: GridIndex) -> Self {
        Self::new(index.x, index.y)
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Ground,
    Object,
    Creature,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Ground, Layer::Object, Layer::Creature];

    fn slot(self) -> usize {
        match self {
            Layer::Ground => 0,
            Layer::Object => 1,
            Layer::Creature => 2,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Ground => "ground",
            Layer::Object => "object",
            Layer::Creature => "creature",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Floor,
    Wall,
    Window,
    Door,
    Smoke,
    Creature(CreatureId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub kind: TokenKind,
    pub layer: Layer,
    pub allows_movement: bool,
    pub allows_sight: bool,
}

impl Token {
    pub fn floor(id: TokenId) -> Self {
        Self::new(id, TokenKind::Floor, Layer::Ground, true, true)
    }

    pub fn wall(id: TokenId) -> Self {
        Self::new(id, TokenKind::Wall, Layer::Object, false, false)
    }

    pub fn window(id: TokenId) -> Self {
        Self::new(id, TokenKind::Window, Layer::Object, false, true)
    }

    pub fn door(id: TokenId, open: bool) -> Self {
        Self::new(id, TokenKind::Door, Layer::Object, open, open)
    }

    pub fn smoke(id: TokenId) -> Self {
        Self::new(id, TokenKind::Smoke, Layer::Ground, true, false)
    }

    pub fn creature(id: TokenId, creature: CreatureId) -> Self {
        Self::new(id, TokenKind::Creature(creature), Layer::Creature, false, true)
    }

    fn new(
        id: TokenId,
        kind: TokenKind,
        layer: Layer,
        allows_movement: bool,
        allows_sight: bool,
    ) -> Self {
        Self {
            id,
            kind,
            layer,
            allows_movement,
            allows_sight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameBoard {
    bounds: BoundingBox,
    layers: [BoundedGrid<Token>; 3],
}

impl GameBoard {
    pub fn new(width: i32, height: i32) -> Result<Self, BoardError> {
        Self::with_bounds(BoundingBox::new(0, 0, width.saturating_sub(1), height.saturating_sub(1)))
    }

    pub fn with_bounds(bounds: BoundingBox) -> Result<Self, BoardError> {
        Ok(Self {
            bounds,
            layers: [
                BoundedGrid::new(bounds)?,
                BoundedGrid::new(bounds)?,
                BoundedGrid::new(bounds)?,
            ],
        })
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn contains(&self, position: BoardPosition) -> bool {
        self.bounds.contains(position.index())
    }

    pub fn put_token_to(&mut self, position: BoardPosition, token: Token) -> Result<(), BoardError> {
        let grid = &mut self.layers[token.layer.slot()];
        if !grid.is_empty(position.index())? {
            return Err(BoardError::Occupied {
                layer: token.layer,
                position,
            });
        }
        grid.set(position.index(), token)?;
        Ok(())
    }

    pub fn get_token_at(
        &self,
        layer: Layer,
        position: BoardPosition,
    ) -> Result<Option<&Token>, BoardError> {
        Ok(self.layers[layer.slot()].get(position.index())?)
    }

    pub fn remove_token(
        &mut self,
        layer: Layer,
        position: BoardPosition,
    ) -> Result<Option<Token>, BoardError> {
        Ok(self.layers[layer.slot()].remove(position.index())?)
    }

    pub fn move_token(
        &mut self,
        layer: Layer,
        from: BoardPosition,
        to: BoardPosition,
    ) -> Result<(), BoardError> {
        if from == to {
            return Ok(());
        }
        if self.get_token_at(layer, to)?.is_some() {
            return Err(BoardError::Occupied {
                layer,
                position: to,
            });
        }
        let token = self
            .remove_token(layer, from)?
            .ok_or(BoardError::Vacant {
                layer,
                position: from,
            })?;
        self.put_token_to(to, token)
    }

    pub fn tokens_at(&self, position: BoardPosition) -> impl Iterator<Item = &Token> {
        self.layers
            .iter()
            .filter_map(move |grid| grid.get(position.index()).ok().flatten())
    }

    pub fn blocks_movement(&self, position: BoardPosition) -> bool {
        self.tokens_at(position).any(|token| !token.allows_movement)
    }

    pub fn blocks_sight(&self, position: BoardPosition) -> bool {
        self.tokens_at(position).any(|token| !token.allows_sight)
    }

    /// Diagonal steps may cut between two blocked orthogonal cells.
    pub fn calculate_reach(
        &self,
        start: BoardPosition,
        steps: i32,
    ) -> Result<HashMap<GridIndex, u32>, BoardError> {
        if steps < 0 {
            return Err(BoardError::NegativeSteps(steps));
        }
        let steps = steps as u32;
        let start = start.index();
        self.layers[0].get(start)?;

        let mut costs = HashMap::from([(start, 0)]);
        let mut frontier = VecDeque::from([(start, 0)]);

        while let Some((cell, cost)) = frontier.pop_front() {
            if cost == steps {
                continue;
            }
            for neighbour in cell.neighbours() {
                if costs.contains_key(&neighbour)
                    || !self.bounds.contains(neighbour)
                    || self.blocks_movement(neighbour.into())
                {
                    continue;
                }
                costs.insert(neighbour, cost + 1);
                frontier.push_back((neighbour, cost + 1));
            }
        }

        trace!(%start, steps, reachable = costs.len(), "calculated reach");
        Ok(costs)
    }

    pub fn has_line_of_sight(&self, from: BoardPosition, to: BoardPosition) -> bool {
        // Always walk in the same direction so the answer is symmetric.
        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        let steps = start.index().chebyshev_distance(&end.index());
        if steps <= 1 {
            return true;
        }

        let dx = (end.x - start.x) as f64;
        let dy = (end.y - start.y) as f64;
        let clear = (1..steps).all(|step| {
            let t = step as f64 / steps as f64;
            let sample = BoardPosition::new(
                (start.x as f64 + dx * t).round() as i32,
                (start.y as f64 + dy * t).round() as i32,
            );
            !self.blocks_sight(sample)
        });

        trace!(%from, %to, clear, "line of sight");
        clear
    }

    pub fn visible_cells(&self, from: BoardPosition) -> Result<BooleanGrid, BoardError> {
        let mut visible = BooleanGrid::new(self.bounds)?;
        for index in self.bounds.cells() {
            if self.has_line_of_sight(from, index.into()) {
                visible.set(index, true)?;
            }
        }
        Ok(visible)
    }
}
