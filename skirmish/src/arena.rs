use anyhow::Result;
use color_print::{cprint, cprintln};
use skirmish_core::{
    BoardPosition, CombatTracker, Combatant, Encounter, Faction, FactionRelations,
    FactionRelationship, GameBoard, Stance, Token, TurnActor, TurnOutcome,
};
use skirmish_rules::{
    CreatureTemplate, RandomRoller,
    types::{CreatureId, FactionId},
};
use tracing::info;

const HEROES: FactionId = FactionId::new(1);
const GOBLINS: FactionId = FactionId::new(2);
const WOLVES: FactionId = FactionId::new(3);

pub struct Demo {
    pub encounter: Encounter,
    pub combatants: Vec<Combatant>,
    pub relations: FactionRelations,
    pub factions: Vec<Faction>,
}

struct Member {
    id: u64,
    template: CreatureTemplate,
    name: &'static str,
    faction: FactionId,
    position: (i32, i32),
}

const MEMBERS: [Member; 6] = [
    Member {
        id: 1,
        template: CreatureTemplate::Champion,
        name: "Brunhild",
        faction: HEROES,
        position: (1, 3),
    },
    Member {
        id: 2,
        template: CreatureTemplate::Archer,
        name: "Wren",
        faction: HEROES,
        position: (0, 5),
    },
    Member {
        id: 3,
        template: CreatureTemplate::Goblin,
        name: "Snik",
        faction: GOBLINS,
        position: (10, 2),
    },
    Member {
        id: 4,
        template: CreatureTemplate::Goblin,
        name: "Grub",
        faction: GOBLINS,
        position: (11, 5),
    },
    Member {
        id: 5,
        template: CreatureTemplate::Wolf,
        name: "Fang",
        faction: WOLVES,
        position: (9, 6),
    },
    Member {
        id: 6,
        template: CreatureTemplate::Skeleton,
        name: "Rattles",
        faction: GOBLINS,
        position: (11, 1),
    },
];

pub fn demo(
    seed: u64,
    hero_actor: impl Fn() -> Box<dyn TurnActor>,
    monster_actor: impl Fn() -> Box<dyn TurnActor>,
) -> Result<Demo> {
    let mut encounter = Encounter::new(GameBoard::new(12, 8)?, RandomRoller::seeded(seed));

    for y in [1, 2, 4, 5] {
        encounter.add_terrain(BoardPosition::new(5, y), Token::wall)?;
    }
    encounter.add_terrain(BoardPosition::new(5, 3), |id| Token::door(id, true))?;
    encounter.add_terrain(BoardPosition::new(5, 6), Token::window)?;
    encounter.add_terrain(BoardPosition::new(7, 4), Token::smoke)?;

    let mut combatants = vec![];
    for member in MEMBERS {
        let id = CreatureId::new(member.id);
        let (x, y) = member.position;
        encounter.add_creature(
            member.template.to_creature(id, member.name),
            BoardPosition::new(x, y),
        )?;
        let actor = if member.faction == HEROES {
            hero_actor()
        } else {
            monster_actor()
        };
        combatants.push(Combatant::new(id, member.faction, actor));
    }

    let relations = FactionRelations::builder()
        .with(FactionRelationship::new(GOBLINS, WOLVES, Stance::Friendly))?
        .build();

    Ok(Demo {
        encounter,
        combatants,
        relations,
        factions: vec![
            Faction::new(HEROES, "Heroes"),
            Faction::new(GOBLINS, "Goblins"),
            Faction::new(WOLVES, "Wolves"),
        ],
    })
}

pub fn run(
    demo: Demo,
    max_rounds: u32,
    mut report: impl FnMut(&TurnOutcome) -> Result<()>,
) -> Result<Encounter> {
    let Demo {
        mut encounter,
        combatants,
        relations,
        factions,
    } = demo;

    let mut tracker = CombatTracker::new(combatants, relations, &mut encounter, None)?;
    for combatant in tracker.combatants_ordered_by_initiative() {
        let faction = factions
            .iter()
            .find(|faction| faction.id == combatant.faction)
            .map_or("unaligned", |faction| faction.name.as_str());
        info!(
            creature = %combatant.creature,
            faction,
            initiative = ?combatant.rolled_initiative(),
            "joined initiative"
        );
    }

    while !tracker.is_finished(&encounter) && tracker.round() <= max_rounds {
        for outcome in tracker.advance_turn(&mut encounter)? {
            report(&outcome)?;
        }
    }

    info!(rounds = tracker.round(), "skirmish over");
    Ok(encounter)
}

pub fn display_turn_outcome(outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::RoundStarted(round) => cprintln!("<bold>Round {}</>", round),
        TurnOutcome::StartTurn(name) => cprintln!("<green>It is {}'s turn!</>", name),
        TurnOutcome::Skipped(name) => cprintln!("<dim>{} is down and skips the turn</>", name),
        TurnOutcome::Moved { name, from, to } => println!("{name} moved from {from} to {to}"),
        TurnOutcome::Hit(hit) => {
            if hit.critical {
                cprint!("<red>Critical hit!</> ");
            }
            println!(
                "{} hit {} ({}) for {} damage, {} health left",
                hit.attacker_name, hit.attacked_name, hit.hit_roll, hit.damage, hit.health_left
            );
        }
        TurnOutcome::Miss {
            attacker_name,
            attacked_name,
            hit_roll,
        } => cprintln!(
            "<yellow>{} missed {} ({})</>",
            attacker_name,
            attacked_name,
            hit_roll
        ),
        TurnOutcome::OutOfRange {
            attacker_name,
            attacked_name,
        } => cprintln!(
            "<yellow>{} cannot reach {}</>",
            attacker_name,
            attacked_name
        ),
        TurnOutcome::Death(name) => cprintln!("<red>{} died</>", name),
    }
}
