//! AI systems (ECS обвязка вокруг EnemyBrain)

pub mod fsm;
pub mod host;
pub mod sensing;

// Re-export all systems
pub use fsm::*;
pub use host::*;
pub use sensing::*;
