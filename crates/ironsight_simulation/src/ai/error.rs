//! Ошибки конфигурации AI (ловим на старте, не в рантайме)

use thiserror::Error;

use crate::ai::StateId;

/// Невалидный AgentConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse agent config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid agent config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Дефект wiring'а next-state цепочки
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    #[error("state {0:?} has no next state wired")]
    MissingNext(StateId),

    #[error("state {0:?} is wired to itself")]
    SelfLoop(StateId),

    #[error("state {from:?} is wired to externally triggered state {to:?}")]
    ExternalTarget { from: StateId, to: StateId },
}
