//! AI компоненты: brain, профиль, waypoints, sensor

// NOTE: типы живут в crate::ai (рядом с логикой), здесь только re-export
// для единообразного `use crate::components::*`.

pub use crate::ai::{AgentProfile, EnemyBrain, Sensor, TriggerVolume, Waypoints};
