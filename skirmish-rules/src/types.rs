use derive_more::{Add, AddAssign, Deref, Display, Sub, SubAssign};
use serde::{Deserialize, Serialize};

macro_rules! wrapped_type {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Display,
            Deserialize,
            Serialize,
            Deref,
            Add,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Sub,
            AddAssign,
            SubAssign,
        )]
        pub struct $name($inner);

        impl $name {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Display,
            Deserialize,
            Serialize,
            Deref,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
        )]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(CreatureId);
id_type!(FactionId);
id_type!(TokenId);

wrapped_type!(Level, u16);
wrapped_type!(HitPoints, i32);
wrapped_type!(ArmourClass, i32);
wrapped_type!(Stat, i16);
wrapped_type!(AbilityModifier, i16);
wrapped_type!(ProficiencyBonus, i16);
wrapped_type!(Feet, u32);

impl Stat {
    pub fn modifier(&self) -> AbilityModifier {
        AbilityModifier((self.0 - 10).div_euclid(2))
    }
}

impl ProficiencyBonus {
    pub const NONE: ProficiencyBonus = ProficiencyBonus(0);

    /// Levels start at 1; a level of 0 gets the level 1 bonus.
    pub fn for_level(level: Level) -> Self {
        let tiers = (*level).saturating_sub(1) / 4;
        Self(1 + tiers as i16)
    }
}

impl From<AbilityModifier> for ProficiencyBonus {
    fn from(value: AbilityModifier) -> Self {
        Self(*value)
    }
}

impl HitPoints {
    pub const ZERO: HitPoints = HitPoints(0);

    pub fn saturating_sub(self, amount: i32) -> Self {
        Self((self.0 - amount.max(0)).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_modifier_rounds_down() {
        let pairs = [
            (1, -5),
            (8, -1),
            (9, -1),
            (10, 0),
            (11, 0),
            (12, 1),
            (13, 1),
            (20, 5),
        ];

        for (value, modifier) in pairs {
            assert_eq!(
                Stat::new(value).modifier(),
                AbilityModifier::new(modifier),
                "stat {value}"
            );
        }
    }

    #[test]
    fn proficiency_bonus_by_level() {
        let pairs = [
            (0, 1),
            (1, 1),
            (4, 1),
            (5, 2),
            (8, 2),
            (9, 3),
            (13, 4),
            (17, 5),
            (20, 5),
            (u16::MAX, 16_384),
        ];

        for (level, bonus) in pairs {
            assert_eq!(
                ProficiencyBonus::for_level(Level::new(level)),
                ProficiencyBonus::new(bonus),
                "level {level}"
            );
        }
    }

    #[test]
    fn hit_points_never_drop_below_zero() {
        assert_eq!(HitPoints::new(5).saturating_sub(3), HitPoints::new(2));
        assert_eq!(HitPoints::new(5).saturating_sub(30), HitPoints::ZERO);
        assert_eq!(HitPoints::new(5).saturating_sub(-4), HitPoints::new(5));
    }
}
