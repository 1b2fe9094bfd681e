//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье и категории целей (Health, Targetable, CategoryMask)
//! - movement: navigation контракт + headless navigator (Navigation, NavAgent)
//! - animation: animation cue контракт (CuePlayer, CueTrack)
//! - ai: AI компоненты (EnemyBrain, AgentProfile, Waypoints, Sensor)

pub mod actor;
pub mod ai;
pub mod animation;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use ai::*;
pub use animation::*;
pub use movement::*;
