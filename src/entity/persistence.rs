//! Save boundary for combatants
//!
//! The host's save system owns the file format; this is the set of fields it
//! must carry for a combatant to resume where it left off.

use serde::{Deserialize, Serialize};

use crate::ai::state::BehaviorState;
use crate::core::error::Result;
use crate::core::types::{CombatantId, Vec2};
use crate::entity::combatant::Combatant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub health: f32,
    pub state: BehaviorState,
    pub guard_anchor: Vec2,
}

impl CombatantSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Combatant {
    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id(),
            health: self.health(),
            state: self.state(),
            guard_anchor: self.ai().guard_anchor(),
        }
    }

    /// Overwrite the saved fields; a non-positive health restores as defeated
    ///
    /// Saved health is kept exactly even when this instance rolled a lower max.
    pub fn restore(&mut self, snapshot: &CombatantSnapshot) {
        self.set_id(snapshot.id);
        self.restore_health(snapshot.health);
        if snapshot.health <= 0.0 {
            self.mark_defeated();
        }
        let ai = self.ai_mut();
        ai.set_guard_anchor(snapshot.guard_anchor);
        ai.set_state(snapshot.state);
    }
}
