use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Combatant not found: {0:?}")]
    CombatantNotFound(crate::core::types::CombatantId),

    #[error("Combatant already defeated: {0:?}")]
    AlreadyDefeated(crate::core::types::CombatantId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
