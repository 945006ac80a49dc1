//! Behavior states of the combatant AI

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Roaming between random nearby points
    Wandering,
    /// Loitering around the guard anchor
    Guarding,
    /// Walking to a heard noise
    Investigating,
    /// Sweeping around where the player was last seen
    Searching,
    /// Following the player in sight
    Chasing,
}

impl BehaviorState {
    /// The calm state a combatant returns to
    pub fn idle(is_guard: bool) -> Self {
        if is_guard {
            BehaviorState::Guarding
        } else {
            BehaviorState::Wandering
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, BehaviorState::Wandering | BehaviorState::Guarding)
    }

    /// States that require the player to be perceivable
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            BehaviorState::Investigating | BehaviorState::Searching | BehaviorState::Chasing
        )
    }
}
