use crate::{
    dice::DieRoll,
    weapons::{Weapon, WeaponCategory},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum ClassKind {
    Fighter,
    Champion,
    Rogue,
    Wizard,
    Monster,
}

impl ClassKind {
    pub fn is_proficient_with(&self, weapon: &Weapon) -> bool {
        match self {
            ClassKind::Fighter | ClassKind::Champion | ClassKind::Monster => true,
            ClassKind::Rogue => weapon.category == WeaponCategory::Simple || weapon.light,
            ClassKind::Wizard => weapon.category == WeaponCategory::Simple,
        }
    }

    pub fn is_critical_hit(&self, roll: DieRoll) -> bool {
        match self {
            ClassKind::Champion => roll.value + 1 >= roll.die.faces(),
            _ => roll.is_max(),
        }
    }
}
