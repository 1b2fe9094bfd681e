//! AI Events: trigger volume и sensor
//!
//! Поток: SensorEntered (trigger source) → Sensor::on_entered →
//! TargetAcquired → EnemyBrain (Chase).

use bevy::prelude::*;

/// Entity вошла в trigger volume sensor'а
///
/// Пишет `detect_in_radius` (headless) или host с физикой.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorEntered {
    /// Entity с Sensor
    pub sensor: Entity,
    pub other: Entity,
}

/// Entity вышла из trigger volume
///
/// AI на выход не реагирует (цель теряется по lose distance), событие
/// для host'ов/отладки.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorExited {
    pub sensor: Entity,
    pub other: Entity,
}

/// Sensor агента засёк новую цель
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetAcquired {
    pub agent: Entity,
    pub target: Entity,
}
