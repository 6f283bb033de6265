pub mod abilities;
pub mod classes;
pub mod creature;
pub mod damage;
pub mod dice;
pub mod templates;
pub mod types;
pub mod weapons;

pub use abilities::{Ability, AbilityScaling, StatBlock};
pub use classes::ClassKind;
pub use creature::{Attackable, Attacker, CELL_SIZE, Creature};
pub use damage::{DamageModifiers, DamageType};
pub use dice::{
    DamageRoll, Die, DieRoll, FixedRolls, RandomRoller, RollModifier, Roller, ThreadRoller, roll,
};
pub use templates::CreatureTemplate;
pub use weapons::{RangeBand, Weapon, WeaponRange, WeaponType};
