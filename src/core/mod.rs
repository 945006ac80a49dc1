pub mod config;
pub mod error;
pub mod types;

pub use config::{ArmorConfig, BehaviorProfile, InjuryConfig, SimulationConfig, WoundPolicy};
pub use error::{Result, SimError};
pub use types::{CombatantId, Seconds, Vec2};
