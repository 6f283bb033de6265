use crate::{
    abilities::{Ability, AbilityScaling, StatBlock},
    classes::ClassKind,
    damage::{DamageModifiers, DamageType},
    dice::DieRoll,
    types::{
        AbilityModifier, ArmourClass, CreatureId, Feet, HitPoints, Level, ProficiencyBonus,
    },
    weapons::Weapon,
};

pub const CELL_SIZE: Feet = Feet::new(5);

pub trait Attacker {
    fn attacker_id(&self) -> CreatureId;

    fn weapon(&self) -> &Weapon;

    fn ability_modifier(&self, scaling: AbilityScaling) -> AbilityModifier;

    fn proficiency_bonus(&self) -> ProficiencyBonus;

    fn is_critical_hit(&self, roll: DieRoll) -> bool;

    fn attack_modifier(&self) -> i32 {
        self.damage_modifier() + *self.proficiency_bonus() as i32
    }

    fn damage_modifier(&self) -> i32 {
        *self.ability_modifier(self.weapon().scaling) as i32
    }
}

pub trait Attackable {
    fn defender_id(&self) -> CreatureId;

    fn armour_class(&self) -> ArmourClass;

    fn receive_damage(&mut self, amount: i32, damage_type: DamageType) -> i32;
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub class: ClassKind,
    pub level: Level,
    pub ability_scores: StatBlock,
    pub current_health: HitPoints,
    pub max_health: HitPoints,
    pub armour_class: ArmourClass,
    pub damage_modifiers: DamageModifiers,
    pub equipped_weapon: Weapon,
    pub speed: Feet,
}

impl Creature {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CreatureId,
        name: &str,
        class: ClassKind,
        level: Level,
        ability_scores: StatBlock,
        max_health: HitPoints,
        armour_class: ArmourClass,
        equipped_weapon: Weapon,
    ) -> Self {
        Self {
            id,
            name: name.to_owned(),
            class,
            level,
            ability_scores,
            current_health: max_health,
            max_health,
            armour_class,
            damage_modifiers: DamageModifiers::default(),
            equipped_weapon,
            speed: Feet::new(30),
        }
    }

    pub fn with_damage_modifiers(mut self, damage_modifiers: DamageModifiers) -> Self {
        self.damage_modifiers = damage_modifiers;
        self
    }

    pub fn with_speed(mut self, speed: Feet) -> Self {
        self.speed = speed;
        self
    }

    pub fn is_alive(&self) -> bool {
        *self.current_health > 0
    }

    pub fn speed_in_cells(&self) -> u32 {
        *self.speed / *CELL_SIZE
    }

    pub fn initiative_modifier(&self) -> AbilityModifier {
        self.ability_scores.modifier(Ability::Dexterity)
    }

    pub fn heal(&mut self, amount: HitPoints) {
        self.current_health = (self.current_health + amount).min(self.max_health);
    }
}

impl Attacker for Creature {
    fn attacker_id(&self) -> CreatureId {
        self.id
    }

    fn weapon(&self) -> &Weapon {
        &self.equipped_weapon
    }

    fn ability_modifier(&self, scaling: AbilityScaling) -> AbilityModifier {
        self.ability_scores.scaling_modifier(scaling)
    }

    fn proficiency_bonus(&self) -> ProficiencyBonus {
        if self.class.is_proficient_with(&self.equipped_weapon) {
            ProficiencyBonus::for_level(self.level)
        } else {
            ProficiencyBonus::NONE
        }
    }

    fn is_critical_hit(&self, roll: DieRoll) -> bool {
        self.class.is_critical_hit(roll)
    }
}

impl Attackable for Creature {
    fn defender_id(&self) -> CreatureId {
        self.id
    }

    fn armour_class(&self) -> ArmourClass {
        self.armour_class
    }

    fn receive_damage(&mut self, amount: i32, damage_type: DamageType) -> i32 {
        let received = self.damage_modifiers.apply(amount, damage_type);
        self.current_health = self.current_health.saturating_sub(received);
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::WeaponType;

    fn testington(class: ClassKind, weapon: WeaponType) -> Creature {
        Creature::new(
            CreatureId::new(1),
            "Testington",
            class,
            Level::new(1),
            StatBlock::new(12, 14, 10, 10, 10, 10),
            HitPoints::new(20),
            ArmourClass::new(12),
            weapon.to_weapon(),
        )
    }

    #[test]
    fn resistance_vulnerability_and_immunity() {
        let mut creature = testington(ClassKind::Fighter, WeaponType::Longsword)
            .with_damage_modifiers(
                DamageModifiers::new()
                    .resistant_to(DamageType::Force)
                    .vulnerable_to(DamageType::Fire)
                    .immune_to(DamageType::Poison),
            );

        assert_eq!(creature.receive_damage(9, DamageType::Force), 4);
        assert_eq!(creature.current_health, HitPoints::new(16));

        assert_eq!(creature.receive_damage(6, DamageType::Fire), 12);
        assert_eq!(creature.current_health, HitPoints::new(4));

        assert_eq!(creature.receive_damage(15, DamageType::Poison), 0);
        assert_eq!(creature.current_health, HitPoints::new(4));

        creature.receive_damage(50, DamageType::Slashing);
        assert_eq!(creature.current_health, HitPoints::ZERO);
        assert!(!creature.is_alive());
    }

    #[test]
    fn attack_modifier_includes_proficiency_when_proficient() {
        let fighter = testington(ClassKind::Fighter, WeaponType::Longsword);
        assert_eq!(fighter.attack_modifier(), 2);
        assert_eq!(fighter.damage_modifier(), 1);

        let wizard = testington(ClassKind::Wizard, WeaponType::Longsword);
        assert_eq!(wizard.proficiency_bonus(), ProficiencyBonus::NONE);
        assert_eq!(wizard.attack_modifier(), 1);
    }

    #[test]
    fn finesse_weapon_uses_dexterity() {
        let rogue = testington(ClassKind::Rogue, WeaponType::Dagger);
        assert_eq!(rogue.damage_modifier(), 2);
        assert_eq!(rogue.attack_modifier(), 3);
    }

    #[test]
    fn healing_is_capped_at_max_health() {
        let mut creature = testington(ClassKind::Fighter, WeaponType::Longsword);
        creature.receive_damage(5, DamageType::Slashing);
        creature.heal(HitPoints::new(3));
        assert_eq!(creature.current_health, HitPoints::new(18));
        creature.heal(HitPoints::new(30));
        assert_eq!(creature.current_health, creature.max_health);
    }

    #[test]
    fn speed_in_cells() {
        let creature = testington(ClassKind::Fighter, WeaponType::Longsword);
        assert_eq!(creature.speed_in_cells(), 6);
        assert_eq!(creature.with_speed(Feet::new(40)).speed_in_cells(), 8);
    }
}
