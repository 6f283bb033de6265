use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("Dice count must be at least 1")]
    NoDice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum Die {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl Die {
    pub fn faces(&self) -> u32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
            Die::D8 => 8,
            Die::D10 => 10,
            Die::D12 => 12,
            Die::D20 => 20,
            Die::D100 => 100,
        }
    }

    pub fn from_faces(faces: u32) -> Option<Die> {
        match faces {
            4 => Some(Die::D4),
            6 => Some(Die::D6),
            8 => Some(Die::D8),
            10 => Some(Die::D10),
            12 => Some(Die::D12),
            20 => Some(Die::D20),
            100 => Some(Die::D100),
            _ => None,
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.faces())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DieRoll {
    pub die: Die,
    pub value: u32,
}

impl DieRoll {
    pub fn new(die: Die, value: u32) -> Self {
        Self { die, value }
    }

    pub fn is_max(&self) -> bool {
        self.value == self.die.faces()
    }
}

pub trait Roller {
    fn roll(&mut self, die: Die) -> DieRoll;
}

pub fn roll(die: Die) -> DieRoll {
    DieRoll::new(die, rand::random_range(1..=die.faces()))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRoller;

impl Roller for ThreadRoller {
    fn roll(&mut self, die: Die) -> DieRoll {
        roll(die)
    }
}

#[derive(Debug, Clone)]
pub struct RandomRoller {
    rng: StdRng,
}

impl RandomRoller {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Roller for RandomRoller {
    fn roll(&mut self, die: Die) -> DieRoll {
        DieRoll::new(die, self.rng.random_range(1..=die.faces()))
    }
}

/// Panics when the sequence runs dry or a value does not fit the die.
#[derive(Debug, Clone, Default)]
pub struct FixedRolls {
    values: VecDeque<u32>,
}

impl FixedRolls {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl Roller for FixedRolls {
    fn roll(&mut self, die: Die) -> DieRoll {
        let Some(value) = self.values.pop_front() else {
            panic!("no scripted roll left for {die}");
        };
        if value == 0 || value > die.faces() {
            panic!("scripted roll {value} does not fit a {die}");
        }
        DieRoll::new(die, value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum RollModifier {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl RollModifier {
    pub fn roll(self, die: Die, dice: &mut dyn Roller) -> DieRoll {
        match self {
            RollModifier::Normal => dice.roll(die),
            RollModifier::Advantage => {
                let first = dice.roll(die);
                let second = dice.roll(die);
                trace!(first = first.value, second = second.value, "rolled {die} with advantage");
                if second.value > first.value { second } else { first }
            }
            RollModifier::Disadvantage => {
                let first = dice.roll(die);
                let second = dice.roll(die);
                trace!(first = first.value, second = second.value, "rolled {die} with disadvantage");
                if second.value < first.value { second } else { first }
            }
        }
    }

    pub fn give_advantage(self) -> Self {
        match self {
            RollModifier::Disadvantage => RollModifier::Normal,
            RollModifier::Normal | RollModifier::Advantage => RollModifier::Advantage,
        }
    }

    pub fn give_disadvantage(self) -> Self {
        match self {
            RollModifier::Advantage => RollModifier::Normal,
            RollModifier::Normal | RollModifier::Disadvantage => RollModifier::Disadvantage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct DamageRoll {
    pub count: u32,
    pub die: Die,
    pub bonus: i32,
}

impl DamageRoll {
    pub const fn new(count: u32, die: Die, bonus: i32) -> Self {
        Self { count, die, bonus }
    }

    pub fn roll(&self, critical: bool, dice: &mut dyn Roller) -> i32 {
        let count = if critical { self.count * 2 } else { self.count };
        let rolled: u32 = (0..count).map(|_| dice.roll(self.die).value).sum();
        rolled as i32 + self.bonus
    }

    pub fn min(&self) -> i32 {
        self.count as i32 + self.bonus
    }

    pub fn max(&self) -> i32 {
        (self.count * self.die.faces()) as i32 + self.bonus
    }

    pub fn average(&self) -> i32 {
        (self.count * (self.die.faces() + 1) / 2) as i32 + self.bonus
    }
}

impl fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.die)?;
        match self.bonus {
            0 => Ok(()),
            bonus if bonus > 0 => write!(f, "+{bonus}"),
            bonus => write!(f, "{bonus}"),
        }
    }
}

impl FromStr for DamageRoll {
    type Err = DiceError;

    fn from_str(notation: &str) -> Result<Self, Self::Err> {
        let notation = notation.trim().to_lowercase();
        let invalid = || DiceError::InvalidNotation(notation.clone());

        let d_pos = notation.find('d').ok_or_else(invalid)?;
        let count = match &notation[..d_pos] {
            "" => 1,
            count => count.parse().map_err(|_| invalid())?,
        };
        if count == 0 {
            return Err(DiceError::NoDice);
        }

        let rest = &notation[d_pos + 1..];
        let (faces, bonus) = match rest.find(['+', '-']) {
            Some(sign_pos) => {
                let bonus: i32 = rest[sign_pos..]
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| invalid())?;
                (&rest[..sign_pos], bonus)
            }
            None => (rest, 0),
        };

        let faces: u32 = faces.parse().map_err(|_| invalid())?;
        let die = Die::from_faces(faces).ok_or(DiceError::InvalidDieSize(faces))?;

        Ok(DamageRoll::new(count, die, bonus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advantage_keeps_the_higher_draw() {
        let mut dice = FixedRolls::new([8, 17]);
        let roll = RollModifier::Advantage.roll(Die::D20, &mut dice);
        assert_eq!(roll, DieRoll::new(Die::D20, 17));

        let mut dice = FixedRolls::new([17, 8]);
        let roll = RollModifier::Advantage.roll(Die::D20, &mut dice);
        assert_eq!(roll.value, 17);
    }

    #[test]
    fn disadvantage_keeps_the_lower_draw() {
        let mut dice = FixedRolls::new([8, 17]);
        let roll = RollModifier::Disadvantage.roll(Die::D20, &mut dice);
        assert_eq!(roll, DieRoll::new(Die::D20, 8));
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn normal_rolls_once() {
        let mut dice = FixedRolls::new([8, 17]);
        let roll = RollModifier::Normal.roll(Die::D20, &mut dice);
        assert_eq!(roll.value, 8);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn modifier_transitions_do_not_escalate() {
        assert_eq!(RollModifier::Normal.give_advantage(), RollModifier::Advantage);
        assert_eq!(
            RollModifier::Normal.give_advantage().give_advantage(),
            RollModifier::Advantage
        );
        assert_eq!(
            RollModifier::Disadvantage.give_advantage(),
            RollModifier::Normal
        );
        assert_eq!(
            RollModifier::Normal.give_disadvantage().give_disadvantage(),
            RollModifier::Disadvantage
        );
        assert_eq!(
            RollModifier::Advantage.give_disadvantage(),
            RollModifier::Normal
        );
    }

    #[test]
    fn critical_damage_doubles_dice_only() {
        let formula = DamageRoll::new(1, Die::D8, 1);
        let mut dice = FixedRolls::new([5, 8]);
        assert_eq!(formula.roll(true, &mut dice), 14);

        let mut dice = FixedRolls::new([5]);
        assert_eq!(formula.roll(false, &mut dice), 6);
    }

    #[test]
    fn seeded_rolls_replay() {
        let mut first = RandomRoller::seeded(7);
        let mut second = RandomRoller::seeded(7);

        for _ in 0..50 {
            let a = first.roll(Die::D20);
            let b = second.roll(Die::D20);
            assert_eq!(a, b);
            assert!((1..=20).contains(&a.value));
        }
    }

    #[test]
    fn thread_rolls_stay_in_range() {
        for _ in 0..100 {
            let roll = ThreadRoller.roll(Die::D6);
            assert!((1..=6).contains(&roll.value));
        }
    }

    #[test]
    #[should_panic(expected = "no scripted roll left")]
    fn exhausted_fixed_rolls_panic() {
        FixedRolls::default().roll(Die::D4);
    }

    #[test]
    fn parses_and_displays_notation() {
        let formula: DamageRoll = "2d6+3".parse().unwrap();
        assert_eq!(formula, DamageRoll::new(2, Die::D6, 3));
        assert_eq!(formula.to_string(), "2d6+3");

        let formula: DamageRoll = " d8-1 ".parse().unwrap();
        assert_eq!(formula, DamageRoll::new(1, Die::D8, -1));
        assert_eq!(formula.to_string(), "1d8-1");

        assert_eq!("1d7".parse::<DamageRoll>(), Err(DiceError::InvalidDieSize(7)));
        assert_eq!("0d6".parse::<DamageRoll>(), Err(DiceError::NoDice));
        assert!("abc".parse::<DamageRoll>().is_err());
    }

    #[test]
    fn formula_bounds() {
        let formula = DamageRoll::new(2, Die::D6, 3);
        assert_eq!(formula.min(), 5);
        assert_eq!(formula.max(), 15);
        assert_eq!(formula.average(), 10);
    }
}
