//! Events queued by the encounter for the host to drain

use serde::{Deserialize, Serialize};

use crate::ai::controller::AiEvent;
use crate::ai::state::BehaviorState;
use crate::combat::resolution::HitOutcome;
use crate::combat::wounds::InjuryId;
use crate::core::types::{CombatantId, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// Behavior state transition
    StateChanged {
        id: CombatantId,
        from: BehaviorState,
        to: BehaviorState,
    },
    /// Entered `Chasing` on sight
    PlayerDetected { id: CombatantId, position: Vec2 },
    /// A noise was loud enough to investigate
    NoiseHeard {
        id: CombatantId,
        position: Vec2,
        strength: f32,
    },
    HitResolved { target: CombatantId, outcome: HitOutcome },
    InjuryHealed { id: CombatantId, injury: InjuryId },
    BandageSoiled { id: CombatantId, injury: InjuryId },
    /// Fired once per combatant; its body became `loot_index`
    CombatantDefeated {
        id: CombatantId,
        position: Vec2,
        loot_index: usize,
    },
}

impl SimulationEvent {
    pub fn from_ai(id: CombatantId, event: AiEvent) -> Self {
        match event {
            AiEvent::StateChanged { from, to } => SimulationEvent::StateChanged { id, from, to },
            AiEvent::PlayerDetected { position } => SimulationEvent::PlayerDetected { id, position },
            AiEvent::NoiseHeard { position, strength } => SimulationEvent::NoiseHeard { id, position, strength },
        }
    }
}
