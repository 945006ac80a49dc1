//! Per-combatant behavior: state machine, movement and timing

pub mod controller;
pub mod state;
pub mod timing;

pub use controller::{AiEvent, CombatantAi};
pub use state::BehaviorState;
