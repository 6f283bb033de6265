use crate::{
    abilities::StatBlock,
    classes::ClassKind,
    creature::Creature,
    damage::{DamageModifiers, DamageType},
    types::{ArmourClass, CreatureId, Feet, HitPoints, Level},
    weapons::WeaponType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum CreatureTemplate {
    Fighter,
    Champion,
    Archer,
    Goblin,
    Wolf,
    Skeleton,
}

impl CreatureTemplate {
    pub fn from_template_str(string: &str) -> Option<Self> {
        let string = string.to_lowercase();
        match string.as_str() {
            "fighter" => Some(Self::Fighter),
            "champion" => Some(Self::Champion),
            "archer" => Some(Self::Archer),
            "goblin" => Some(Self::Goblin),
            "wolf" => Some(Self::Wolf),
            "skeleton" => Some(Self::Skeleton),
            _ => None,
        }
    }

    pub fn to_creature(self, id: CreatureId, name: &str) -> Creature {
        match self {
            CreatureTemplate::Fighter => Creature::new(
                id,
                name,
                ClassKind::Fighter,
                Level::new(3),
                StatBlock::new(16, 12, 14, 10, 10, 10),
                HitPoints::new(28),
                ArmourClass::new(16),
                WeaponType::Longsword.to_weapon(),
            ),
            CreatureTemplate::Champion => Creature::new(
                id,
                name,
                ClassKind::Champion,
                Level::new(5),
                StatBlock::new(17, 12, 14, 8, 10, 10),
                HitPoints::new(44),
                ArmourClass::new(17),
                WeaponType::Greataxe.to_weapon(),
            ),
            CreatureTemplate::Archer => Creature::new(
                id,
                name,
                ClassKind::Rogue,
                Level::new(3),
                StatBlock::new(10, 16, 12, 12, 14, 10),
                HitPoints::new(21),
                ArmourClass::new(14),
                WeaponType::Shortbow.to_weapon(),
            ),
            CreatureTemplate::Goblin => Creature::new(
                id,
                name,
                ClassKind::Monster,
                Level::new(1),
                StatBlock::new(8, 14, 10, 10, 8, 8),
                HitPoints::new(7),
                ArmourClass::new(15),
                WeaponType::Shortsword.to_weapon(),
            ),
            CreatureTemplate::Wolf => Creature::new(
                id,
                name,
                ClassKind::Monster,
                Level::new(1),
                StatBlock::new(12, 15, 12, 3, 12, 6),
                HitPoints::new(11),
                ArmourClass::new(13),
                WeaponType::Bite.to_weapon(),
            )
            .with_speed(Feet::new(40)),
            CreatureTemplate::Skeleton => Creature::new(
                id,
                name,
                ClassKind::Monster,
                Level::new(1),
                StatBlock::new(10, 14, 15, 6, 8, 5),
                HitPoints::new(13),
                ArmourClass::new(13),
                WeaponType::Shortsword.to_weapon(),
            )
            .with_damage_modifiers(
                DamageModifiers::new()
                    .vulnerable_to(DamageType::Bludgeoning)
                    .immune_to(DamageType::Poison),
            ),
        }
    }
}
