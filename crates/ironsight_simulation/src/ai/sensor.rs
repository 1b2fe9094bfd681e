//! Sensor: обнаружение целей (trigger volume + allow-list категорий)
//!
//! Sensor не знает про states: он только говорит "цель X появилась" один раз
//! на acquisition. Повторный вход уже отслеживаемой цели молчит, пока агент
//! не отпустит её через `forget()`.

use bevy::prelude::*;

use crate::components::CategoryMask;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Sensor {
    radius: f32,
    allowed: CategoryMask,
    tracked: Option<Entity>,
}

impl Default for Sensor {
    fn default() -> Self {
        Self::new(10.0, CategoryMask::PLAYER)
    }
}

impl Sensor {
    pub fn new(radius: f32, allowed: CategoryMask) -> Self {
        Self {
            radius: radius.max(0.0),
            allowed,
            tracked: None,
        }
    }

    pub fn configure_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn allowed(&self) -> CategoryMask {
        self.allowed
    }

    pub fn tracked(&self) -> Option<Entity> {
        self.tracked
    }

    /// Entity вошла в trigger volume
    ///
    /// Some(entity) = новая acquisition (поднять TargetAcquired ровно один раз).
    pub fn on_entered(&mut self, entity: Entity, category: CategoryMask) -> Option<Entity> {
        if !self.allowed.contains(category) {
            return None;
        }
        if self.tracked == Some(entity) {
            return None;
        }

        self.tracked = Some(entity);
        Some(entity)
    }

    /// Отпустить tracked цель: следующий вход будет новой acquisition
    pub fn forget(&mut self) {
        self.tracked = None;
    }
}

/// Headless trigger volume: кто сейчас внутри радиуса sensor'а
///
/// `detect_in_radius` сравнивает с прошлым кадром и шлёт Entered/Exited
/// только на фронтах. Host с настоящей физикой пишет события сам.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TriggerVolume {
    pub inside: Vec<Entity>,
}
