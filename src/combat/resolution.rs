//! Hit resolution pipeline
//!
//! Location, armor mitigation (which wears the armor), net damage, a possible
//! new wound, health, defeat. The armor query mutates durability, so each
//! actual hit goes through `resolve_hit` exactly once.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::body_zone::{BodyPart, DamageType};
use crate::combat::wounds::{InjuryId, InjuryType};
use crate::core::config::SimulationConfig;
use crate::core::types::CombatantId;
use crate::entity::combatant::Combatant;

/// An incoming attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub attacker: Option<CombatantId>,
    /// Struck part; rolled by hit weight when `None`
    pub part: Option<BodyPart>,
    pub damage_type: DamageType,
    pub raw_damage: f32,
}

impl Hit {
    pub fn new(damage_type: DamageType, raw_damage: f32) -> Self {
        Self {
            attacker: None,
            part: None,
            damage_type,
            raw_damage,
        }
    }

    pub fn at(mut self, part: BodyPart) -> Self {
        self.part = Some(part);
        self
    }

    pub fn by(mut self, attacker: CombatantId) -> Self {
        self.attacker = Some(attacker);
        self
    }
}

/// What a resolved hit did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub part: BodyPart,
    pub mitigation: f32,
    pub net_damage: f32,
    pub injury: Option<InjuryId>,
    /// This hit was the killing blow
    pub defeated: bool,
}

/// Resolve one hit against `target`
///
/// A target that is already defeated takes nothing and its gear is untouched.
pub fn resolve_hit<R: Rng + ?Sized>(
    target: &mut Combatant,
    hit: &Hit,
    config: &SimulationConfig,
    rng: &mut R,
) -> HitOutcome {
    let part = hit.part.unwrap_or_else(|| BodyPart::roll(rng));

    if target.is_defeated() {
        return HitOutcome {
            part,
            mitigation: 0.0,
            net_damage: 0.0,
            injury: None,
            defeated: false,
        };
    }

    let mitigation = target
        .armor
        .absorb_hit(part, hit.damage_type, &target.anatomy, &config.armor);
    let net_damage = (hit.raw_damage - mitigation).max(0.0);

    let mut injury = None;
    let chance = config.wound_policy.chance(net_damage);
    if chance > 0.0 && rng.gen::<f32>() < chance {
        let severity = config.wound_policy.severity(net_damage);
        let id = target.injuries.add(part, InjuryType::from(hit.damage_type), severity, &config.injury);
        tracing::debug!(
            "{} wounded: {:?} on {:?}, severity {:.1}",
            target.name(),
            InjuryType::from(hit.damage_type),
            part,
            severity
        );
        injury = Some(id);
    }

    let defeated = target.apply_damage(net_damage);

    HitOutcome {
        part,
        mitigation,
        net_damage,
        injury,
        defeated,
    }
}
