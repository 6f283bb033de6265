use std::path::Path;
use std::rc::Rc;

use rhai::{AST, CustomType, Dynamic, Engine, ImmutableString, Map, Scope, TypeBuilder};
use skirmish_core::{
    BoardPosition, CombatCommand, Combatant, Scenario, Stance, Turn, TurnActor, TurnResource,
};
use skirmish_rules::{Creature, RangeBand, RollModifier, types::CreatureId};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_SCRIPT: &str = r#"
// Decide the next command for one of your creatures.
// Return attack(id), offhand_attack(id), move_to(x, y) or () to end the turn.
fn distance(ax, ay, bx, by) {
    let dx = (ax - bx).abs();
    let dy = (ay - by).abs();
    if dx > dy { dx } else { dy }
}

let enemies = state.enemies;
if enemies.is_empty() {
    return ();
}

// Nearest first, weakest on ties
enemies.sort(|a, b| if a.distance == b.distance { a.health - b.health } else { a.distance - b.distance });
let target = enemies[0];

if target.in_range {
    if state.has_action {
        return attack(target.id);
    }
    if state.has_bonus_action && state.light_weapon {
        return offhand_attack(target.id);
    }
}

if state.has_movement && !target.in_range {
    let found = false;
    let best_x = 0;
    let best_y = 0;
    let best_distance = target.distance;
    for cell in state.reachable {
        let d = distance(cell.x, cell.y, target.x, target.y);
        if d < best_distance {
            found = true;
            best_x = cell.x;
            best_y = cell.y;
            best_distance = d;
        }
    }
    if found {
        return move_to(best_x, best_y);
    }
}

()
"#;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Could not load script: {0}")]
    Load(String),

    #[error("Script failed: {0}")]
    Eval(String),

    #[error("Script returned something that is not a command: {0}")]
    NotACommand(String),

    #[error("Unknown script command {0}")]
    UnknownCommand(String),

    #[error("Invalid creature id {0}")]
    InvalidTarget(i64),

    #[error("The {0} is already spent")]
    ResourceSpent(TurnResource),

    #[error("Cannot reach {0}")]
    Unreachable(BoardPosition),
}

#[derive(Debug, Clone, CustomType)]
#[rhai_type(extra = Self::build_extra)]
struct ScriptCommand {
    kind: ImmutableString,
    target: i64,
    x: i64,
    y: i64,
}

impl ScriptCommand {
    fn attack(target: i64) -> Self {
        Self {
            kind: "attack".into(),
            target,
            x: 0,
            y: 0,
        }
    }

    fn offhand_attack(target: i64) -> Self {
        Self {
            kind: "offhand_attack".into(),
            target,
            x: 0,
            y: 0,
        }
    }

    fn move_to(x: i64, y: i64) -> Self {
        Self {
            kind: "move".into(),
            target: 0,
            x,
            y,
        }
    }

    fn build_extra(builder: &mut TypeBuilder<Self>) {
        builder.with_fn("attack", ScriptCommand::attack);
        builder.with_fn("offhand_attack", ScriptCommand::offhand_attack);
        builder.with_fn("move_to", ScriptCommand::move_to);
    }

    fn to_command(&self) -> Result<CombatCommand, ScriptError> {
        let target = || {
            u64::try_from(self.target)
                .map(CreatureId::new)
                .map_err(|_| ScriptError::InvalidTarget(self.target))
        };

        match self.kind.as_str() {
            "attack" => Ok(CombatCommand::Attack {
                target: target()?,
                modifier: RollModifier::Normal,
            }),
            "offhand_attack" => Ok(CombatCommand::OffhandAttack { target: target()? }),
            "move" => Ok(CombatCommand::Move {
                to: BoardPosition::new(self.x as i32, self.y as i32),
            }),
            other => Err(ScriptError::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct ScriptActor {
    engine: Rc<Engine>,
    ast: AST,
}

impl ScriptActor {
    pub fn from_source(source: &str) -> Result<Self, ScriptError> {
        let engine = engine();
        let ast = engine
            .compile(source)
            .map_err(|error| ScriptError::Load(error.to_string()))?;
        Ok(Self {
            engine: Rc::new(engine),
            ast,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let engine = engine();
        let ast = engine
            .compile_file(path.to_path_buf())
            .map_err(|error| ScriptError::Load(error.to_string()))?;
        Ok(Self {
            engine: Rc::new(engine),
            ast,
        })
    }

    fn decide(
        &self,
        combatant: &Combatant,
        turn: &Turn,
        scenario: &Scenario<'_>,
    ) -> Result<Option<CombatCommand>, ScriptError> {
        let mut scope = Scope::new();
        scope.push_dynamic("state", script_state(combatant, turn, scenario));

        let result: Dynamic = self
            .engine
            .eval_ast_with_scope(&mut scope, &self.ast)
            .map_err(|error| ScriptError::Eval(error.to_string()))?;
        if result.is_unit() {
            return Ok(None);
        }

        let type_name = result.type_name().to_string();
        let command = result
            .try_cast::<ScriptCommand>()
            .ok_or(ScriptError::NotACommand(type_name))?
            .to_command()?;
        validate(combatant, turn, scenario, command).map(Some)
    }
}

impl TurnActor for ScriptActor {
    fn next_command(
        &self,
        combatant: &Combatant,
        turn: &Turn,
        scenario: &Scenario<'_>,
    ) -> Option<CombatCommand> {
        match self.decide(combatant, turn, scenario) {
            Ok(command) => command,
            Err(error) => {
                warn!(creature = %combatant.creature, %error, "script actor gave up its turn");
                None
            }
        }
    }
}

fn engine() -> Engine {
    let mut engine = Engine::new();
    engine.build_type::<ScriptCommand>();
    engine
}

fn validate(
    combatant: &Combatant,
    turn: &Turn,
    scenario: &Scenario<'_>,
    command: CombatCommand,
) -> Result<CombatCommand, ScriptError> {
    if !turn.has(command.resource()) {
        return Err(ScriptError::ResourceSpent(command.resource()));
    }

    let encounter = scenario.encounter;
    match command {
        CombatCommand::Move { to } => {
            let reach = encounter
                .reach_of(combatant.creature)
                .map_err(|_| ScriptError::Unreachable(to))?;
            if !reach.contains_key(&to.index()) {
                return Err(ScriptError::Unreachable(to));
            }
        }
        CombatCommand::Attack { target, .. } | CombatCommand::OffhandAttack { target } => {
            let alive = encounter
                .creature(target)
                .is_ok_and(|creature| creature.is_alive());
            if target == combatant.creature || !alive || encounter.position_of(target).is_none() {
                return Err(ScriptError::InvalidTarget(*target as i64));
            }
        }
    }

    Ok(command)
}

fn creature_map(creature: &Creature, position: BoardPosition) -> Map {
    let mut map = Map::new();
    map.insert("id".into(), Dynamic::from(*creature.id as i64));
    map.insert("name".into(), Dynamic::from(creature.name.clone()));
    map.insert("health".into(), Dynamic::from(*creature.current_health as i64));
    map.insert("max_health".into(), Dynamic::from(*creature.max_health as i64));
    map.insert("x".into(), Dynamic::from(position.x as i64));
    map.insert("y".into(), Dynamic::from(position.y as i64));
    map
}

fn script_state(combatant: &Combatant, turn: &Turn, scenario: &Scenario<'_>) -> Dynamic {
    let encounter = scenario.encounter;
    let mut state = Map::new();

    let me = encounter
        .creature(combatant.creature)
        .ok()
        .zip(encounter.position_of(combatant.creature));

    let mut enemies = vec![];
    let mut reachable = vec![];
    if let Some((creature, position)) = me {
        state.insert("me".into(), Dynamic::from_map(creature_map(creature, position)));
        state.insert(
            "light_weapon".into(),
            Dynamic::from_bool(creature.equipped_weapon.light),
        );

        for enemy in scenario
            .combatants
            .find_all_with_stance(combatant, Stance::Hostile)
        {
            let (Ok(other), Some(at)) = (
                encounter.creature(enemy.creature),
                encounter.position_of(enemy.creature),
            ) else {
                continue;
            };
            if !other.is_alive() {
                continue;
            }

            let distance = position.distance_to(&at);
            let mut map = creature_map(other, at);
            map.insert(
                "distance".into(),
                Dynamic::from(position.index().chebyshev_distance(&at.index()) as i64),
            );
            map.insert(
                "in_range".into(),
                Dynamic::from_bool(
                    creature.equipped_weapon.range.classify(distance) == RangeBand::Normal,
                ),
            );
            enemies.push(Dynamic::from_map(map));
        }

        if let Ok(reach) = encounter.reach_of(creature.id) {
            let mut cells: Vec<_> = reach.into_iter().collect();
            cells.sort();
            for (index, cost) in cells {
                let mut cell = Map::new();
                cell.insert("x".into(), Dynamic::from(index.x as i64));
                cell.insert("y".into(), Dynamic::from(index.y as i64));
                cell.insert("cost".into(), Dynamic::from(cost as i64));
                reachable.push(Dynamic::from_map(cell));
            }
        }
    }

    state.insert("round".into(), Dynamic::from(turn.round as i64));
    state.insert(
        "has_movement".into(),
        Dynamic::from_bool(turn.has(TurnResource::Movement)),
    );
    state.insert(
        "has_action".into(),
        Dynamic::from_bool(turn.has(TurnResource::Action)),
    );
    state.insert(
        "has_bonus_action".into(),
        Dynamic::from_bool(turn.has(TurnResource::BonusAction)),
    );
    state.insert("enemies".into(), Dynamic::from_array(enemies));
    state.insert("reachable".into(), Dynamic::from_array(reachable));

    Dynamic::from_map(state)
}
