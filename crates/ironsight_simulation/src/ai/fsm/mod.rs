//! Finite state machine (generic, без ECS зависимостей)

pub mod machine;


pub use machine::{State, StateMachine, StateSet};
