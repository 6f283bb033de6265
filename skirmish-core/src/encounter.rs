use std::collections::HashMap;
use std::fmt;

use skirmish_rules::{
    Creature, RollModifier, Roller,
    types::{CreatureId, TokenId},
};
use tracing::{debug, info};

use crate::{
    attack::{AttackOutcome, ProvidesBoardPosition, attack},
    board::{BoardPosition, GameBoard, Layer, Token},
    combatant::Combatant,
    errors::CombatError,
    grid::GridIndex,
};

pub struct Encounter {
    board: GameBoard,
    creatures: Vec<Creature>,
    positions: HashMap<CreatureId, BoardPosition>,
    dice: Box<dyn Roller>,
    next_token: u64,
}

impl Encounter {
    pub fn new(board: GameBoard, dice: impl Roller + 'static) -> Self {
        Self {
            board,
            creatures: vec![],
            positions: HashMap::new(),
            dice: Box::new(dice),
            next_token: 1,
        }
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    fn allocate_token(&mut self) -> TokenId {
        let id = TokenId::new(self.next_token);
        self.next_token += 1;
        id
    }

    pub fn add_terrain(
        &mut self,
        position: BoardPosition,
        make: impl FnOnce(TokenId) -> Token,
    ) -> Result<TokenId, CombatError> {
        let token = make(self.allocate_token());
        self.board.put_token_to(position, token)?;
        Ok(token.id)
    }

    pub fn add_creature(
        &mut self,
        creature: Creature,
        position: BoardPosition,
    ) -> Result<(), CombatError> {
        if self.creature(creature.id).is_ok() {
            return Err(CombatError::DuplicateCreature(creature.id));
        }

        let token = Token::creature(self.allocate_token(), creature.id);
        self.board.put_token_to(position, token)?;
        info!(creature = %creature.id, name = %creature.name, %position, "creature joined the encounter");

        self.positions.insert(creature.id, position);
        self.creatures.push(creature);
        Ok(())
    }

    pub fn creature(&self, id: CreatureId) -> Result<&Creature, CombatError> {
        self.creatures
            .iter()
            .find(|creature| creature.id == id)
            .ok_or(CombatError::UnknownCreature(id))
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Result<&mut Creature, CombatError> {
        self.creatures
            .iter_mut()
            .find(|creature| creature.id == id)
            .ok_or(CombatError::UnknownCreature(id))
    }

    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    pub fn position_of(&self, id: CreatureId) -> Option<BoardPosition> {
        self.positions.get(&id).copied()
    }

    pub fn roll_initiative(&mut self, combatant: &Combatant) -> Result<i32, CombatError> {
        let creature = self
            .creatures
            .iter()
            .find(|creature| creature.id == combatant.creature)
            .ok_or(CombatError::UnknownCreature(combatant.creature))?;
        Ok(combatant.initiative(creature, self.dice.as_mut()))
    }

    pub fn reach_of(&self, id: CreatureId) -> Result<HashMap<GridIndex, u32>, CombatError> {
        let creature = self.creature(id)?;
        let position = self
            .position_of(id)
            .ok_or(CombatError::MissingPosition(id))?;
        Ok(self
            .board
            .calculate_reach(position, creature.speed_in_cells() as i32)?)
    }

    pub fn move_creature(
        &mut self,
        id: CreatureId,
        to: BoardPosition,
    ) -> Result<BoardPosition, CombatError> {
        let from = self
            .position_of(id)
            .ok_or(CombatError::MissingPosition(id))?;
        if !self.reach_of(id)?.contains_key(&to.index()) {
            return Err(CombatError::Unreachable(id, to));
        }

        self.board.move_token(Layer::Creature, from, to)?;
        self.positions.insert(id, to);
        debug!(creature = %id, %from, %to, "creature moved");
        Ok(from)
    }

    pub fn resolve_attack(
        &mut self,
        attacker: CreatureId,
        defender: CreatureId,
        modifier: RollModifier,
    ) -> Result<AttackOutcome, CombatError> {
        if attacker == defender {
            return Err(CombatError::SelfTarget(attacker));
        }
        let attacker_index = self.index_of(attacker)?;
        let defender_index = self.index_of(defender)?;
        let (attacking, defending) =
            pair_mut(&mut self.creatures, attacker_index, defender_index);

        let outcome = attack(
            attacking,
            &mut *defending,
            &self.positions,
            modifier,
            self.dice.as_mut(),
        )?;

        if outcome.hit && !defending.is_alive() {
            info!(creature = %defender, name = %defending.name, "creature died");
            if let Some(position) = self.positions.remove(&defender) {
                self.board.remove_token(Layer::Creature, position)?;
            }
        }

        Ok(outcome)
    }

    fn index_of(&self, id: CreatureId) -> Result<usize, CombatError> {
        self.creatures
            .iter()
            .position(|creature| creature.id == id)
            .ok_or(CombatError::UnknownCreature(id))
    }
}

fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&T, &mut T) {
    if first < second {
        let (left, right) = items.split_at_mut(second);
        (&left[first], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(first);
        (&right[0], &mut left[second])
    }
}

impl ProvidesBoardPosition for Encounter {
    fn board_position(&self, creature: CreatureId) -> Option<BoardPosition> {
        self.position_of(creature)
    }
}

impl fmt::Debug for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("board", &self.board)
            .field("creatures", &self.creatures)
            .field("positions", &self.positions)
            .finish_non_exhaustive()
    }
}
