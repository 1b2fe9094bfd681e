//! Базовые компоненты акторов: Health, Targetable, категории целей

use bevy::prelude::*;

/// Результат одного вызова `take_damage`/`heal`
///
/// `changed`: значение реально изменилось (только тогда шлём HealthChanged).
/// `died`: именно этот вызов перевёл актора в dead (ровно один раз за жизнь).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub previous: f32,
    pub current: f32,
    pub died: bool,
    pub source: Option<Entity>,
}

impl HealthChange {
    fn unchanged(current: f32) -> Self {
        Self {
            previous: current,
            current,
            died: false,
            source: None,
        }
    }

    pub fn changed(&self) -> bool {
        self.current != self.previous
    }
}

/// Здоровье актора
///
/// Инварианты:
/// - 0 ≤ current ≤ max, max ≥ 1
/// - dead: односторонний gate: после смерти take_damage/heal = no-op
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(1.0);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    /// Урон с clamp в 0. Отрицательный amount считается нулём.
    pub fn take_damage(&mut self, amount: f32, source: Option<Entity>) -> HealthChange {
        if self.dead {
            return HealthChange::unchanged(self.current);
        }

        let previous = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);

        let died = self.current <= 0.0;
        if died {
            self.current = 0.0;
            self.dead = true;
        }

        HealthChange {
            previous,
            current: self.current,
            died,
            source,
        }
    }

    /// Лечение с clamp в max. Мёртвых не лечим.
    pub fn heal(&mut self, amount: f32) -> HealthChange {
        if self.dead {
            return HealthChange::unchanged(self.current);
        }

        let previous = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);

        HealthChange {
            previous,
            current: self.current,
            died: false,
            source: None,
        }
    }
}

/// Битовая маска категорий целей (аналог physics layers)
///
/// Sensor хранит allow-list в виде маски, Targetable: одну категорию.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct CategoryMask(pub u32);

impl CategoryMask {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(0b0001);
    pub const ENEMY: Self = Self(0b0010);
    pub const NEUTRAL: Self = Self(0b0100);

    pub fn contains(&self, other: CategoryMask) -> bool {
        other.0 != 0 && (self.0 & other.0) == other.0
    }

    pub fn with(self, other: CategoryMask) -> Self {
        Self(self.0 | other.0)
    }
}

/// Entity которую можно обнаружить sensor'ом и атаковать
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Targetable {
    pub category: CategoryMask,
}

impl Targetable {
    pub fn new(category: CategoryMask) -> Self {
        Self { category }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);
        assert_eq!(health.current(), 100.0);

        let change = health.take_damage(30.0, None);
        assert_eq!(health.current(), 70.0);
        assert!(change.changed());
        assert!(!change.died);
        assert!(health.is_alive());
    }

    #[test]
    fn test_overkill_clamps_and_dies_once() {
        let mut health = Health::new(100.0);
        let killer = Entity::from_raw(7);

        let change = health.take_damage(150.0, Some(killer));
        assert_eq!(health.current(), 0.0);
        assert!(change.died);
        assert_eq!(change.source, Some(killer));
        assert!(health.is_dead());

        // Повторный урон после смерти: no-op, второго died нет
        let again = health.take_damage(10.0, None);
        assert_eq!(health.current(), 0.0);
        assert!(!again.died);
        assert!(!again.changed());
    }

    #[test]
    fn test_zero_or_negative_damage_is_not_a_change() {
        let mut health = Health::new(50.0);
        assert!(!health.take_damage(0.0, None).changed());
        assert!(!health.take_damage(-20.0, None).changed());
        assert_eq!(health.current(), 50.0);
    }

    #[test]
    fn test_lethal_hit_on_tiny_remainder_is_reported() {
        let mut health = Health::new(1.0);

        let first = health.take_damage(0.999_999_94, None);
        assert!(first.changed());
        assert!(health.is_alive());
        assert!(health.current() > 0.0 && health.current() < f32::EPSILON);

        let lethal = health.take_damage(10.0, None);
        assert!(lethal.died);
        assert!(lethal.changed());
        assert!(health.is_dead());
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0, None);

        health.heal(30.0);
        assert_eq!(health.current(), 80.0);

        let change = health.heal(100.0); // Clamped to max
        assert_eq!(health.current(), 100.0);
        assert!(change.changed());

        assert!(!health.heal(5.0).changed());
    }

    #[test]
    fn test_heal_after_death_is_noop() {
        let mut health = Health::new(10.0);
        health.take_damage(10.0, None);
        assert!(health.is_dead());

        health.heal(50.0);
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_max_health_at_least_one() {
        let health = Health::new(0.0);
        assert_eq!(health.max(), 1.0);
        assert!(health.is_alive());
    }

    #[test]
    fn test_category_mask() {
        let mask = CategoryMask::PLAYER.with(CategoryMask::NEUTRAL);
        assert!(mask.contains(CategoryMask::PLAYER));
        assert!(!mask.contains(CategoryMask::ENEMY));
        assert!(!mask.contains(CategoryMask::NONE));
    }
}
