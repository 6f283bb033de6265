use crate::{
    AbilityScaling,
    damage::DamageType,
    dice::{DamageRoll, Die},
    types::Feet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum WeaponCategory {
    Simple,
    Martial,
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum WeaponRange {
    Melee { reach: Feet },
    Ranged { normal: Feet, long: Feet },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum RangeBand {
    Normal,
    Long,
    OutOfRange,
}

impl WeaponRange {
    pub const fn melee() -> Self {
        WeaponRange::Melee {
            reach: Feet::new(5),
        }
    }

    pub fn classify(&self, distance: Feet) -> RangeBand {
        match *self {
            WeaponRange::Melee { reach } if distance <= reach => RangeBand::Normal,
            WeaponRange::Melee { .. } => RangeBand::OutOfRange,
            WeaponRange::Ranged { normal, .. } if distance <= normal => RangeBand::Normal,
            WeaponRange::Ranged { long, .. } if distance <= long => RangeBand::Long,
            WeaponRange::Ranged { .. } => RangeBand::OutOfRange,
        }
    }

    pub fn max_distance(&self) -> Feet {
        match *self {
            WeaponRange::Melee { reach } => reach,
            WeaponRange::Ranged { long, .. } => long,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Weapon {
    pub name: String,
    pub category: WeaponCategory,
    pub scaling: AbilityScaling,
    pub damage: DamageRoll,
    pub damage_type: DamageType,
    pub range: WeaponRange,
    pub light: bool,
}

#[derive(
    Debug, Clone, Copy, serde::Deserialize, serde::Serialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum WeaponType {
    Unarmed,
    Dagger,
    Mace,
    Shortsword,
    Longsword,
    Greataxe,
    Shortbow,
    Longbow,
    Claws,
    Bite,
}

impl WeaponType {
    fn to_name(self) -> &'static str {
        match self {
            WeaponType::Unarmed => "unarmed strike",
            WeaponType::Dagger => "dagger",
            WeaponType::Mace => "mace",
            WeaponType::Shortsword => "shortsword",
            WeaponType::Longsword => "longsword",
            WeaponType::Greataxe => "greataxe",
            WeaponType::Shortbow => "shortbow",
            WeaponType::Longbow => "longbow",
            WeaponType::Claws => "claws",
            WeaponType::Bite => "bite",
        }
    }

    pub fn from_weapon_str(string: &str) -> Option<Self> {
        let string = string.to_lowercase();
        match string.as_str() {
            "unarmed" => Some(Self::Unarmed),
            "dagger" => Some(Self::Dagger),
            "mace" => Some(Self::Mace),
            "shortsword" => Some(Self::Shortsword),
            "longsword" => Some(Self::Longsword),
            "greataxe" => Some(Self::Greataxe),
            "shortbow" => Some(Self::Shortbow),
            "longbow" => Some(Self::Longbow),
            "claws" => Some(Self::Claws),
            "bite" => Some(Self::Bite),
            _ => None,
        }
    }

    pub fn to_weapon(&self) -> Weapon {
        let weapon = |category: WeaponCategory,
                      scaling: AbilityScaling,
                      damage: DamageRoll,
                      damage_type: DamageType,
                      range: WeaponRange,
                      light: bool| Weapon {
            name: self.to_name().to_string(),
            category,
            scaling,
            damage,
            damage_type,
            range,
            light,
        };

        match self {
            WeaponType::Unarmed => weapon(
                WeaponCategory::Simple,
                AbilityScaling::Strength,
                DamageRoll::new(1, Die::D4, 0),
                DamageType::Bludgeoning,
                WeaponRange::melee(),
                true,
            ),
            WeaponType::Dagger => weapon(
                WeaponCategory::Simple,
                AbilityScaling::Either,
                DamageRoll::new(1, Die::D4, 0),
                DamageType::Piercing,
                WeaponRange::melee(),
                true,
            ),
            WeaponType::Mace => weapon(
                WeaponCategory::Simple,
                AbilityScaling::Strength,
                DamageRoll::new(1, Die::D6, 0),
                DamageType::Bludgeoning,
                WeaponRange::melee(),
                false,
            ),
            WeaponType::Shortsword => weapon(
                WeaponCategory::Martial,
                AbilityScaling::Either,
                DamageRoll::new(1, Die::D6, 0),
                DamageType::Piercing,
                WeaponRange::melee(),
                true,
            ),
            WeaponType::Longsword => weapon(
                WeaponCategory::Martial,
                AbilityScaling::Strength,
                DamageRoll::new(1, Die::D8, 0),
                DamageType::Slashing,
                WeaponRange::melee(),
                false,
            ),
            WeaponType::Greataxe => weapon(
                WeaponCategory::Martial,
                AbilityScaling::Strength,
                DamageRoll::new(1, Die::D12, 0),
                DamageType::Slashing,
                WeaponRange::melee(),
                false,
            ),
            WeaponType::Shortbow => weapon(
                WeaponCategory::Simple,
                AbilityScaling::Dexterity,
                DamageRoll::new(1, Die::D6, 0),
                DamageType::Piercing,
                WeaponRange::Ranged {
                    normal: Feet::new(80),
                    long: Feet::new(320),
                },
                false,
            ),
            WeaponType::Longbow => weapon(
                WeaponCategory::Martial,
                AbilityScaling::Dexterity,
                DamageRoll::new(1, Die::D8, 0),
                DamageType::Piercing,
                WeaponRange::Ranged {
                    normal: Feet::new(150),
                    long: Feet::new(600),
                },
                false,
            ),
            WeaponType::Claws => weapon(
                WeaponCategory::Natural,
                AbilityScaling::Strength,
                DamageRoll::new(2, Die::D4, 0),
                DamageType::Slashing,
                WeaponRange::melee(),
                false,
            ),
            WeaponType::Bite => weapon(
                WeaponCategory::Natural,
                AbilityScaling::Strength,
                DamageRoll::new(1, Die::D6, 0),
                DamageType::Piercing,
                WeaponRange::melee(),
                false,
            ),
        }
    }
}
