//! AI components

pub mod config;


// Re-export all components
pub use config::*;
