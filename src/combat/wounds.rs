//! Injury model: open wounds that bleed, heal and can be bandaged
//!
//! Shared by the player and NPCs. Severity drives both the bleed rate and how
//! long the wound takes to close.

use serde::{Deserialize, Serialize};

use crate::combat::body_zone::{BodyPart, DamageType};
use crate::combat::constants::{MAX_SEVERITY, TURN_SECONDS};
use crate::core::config::InjuryConfig;
use crate::core::types::Seconds;

/// Kind of wound, derived from the damage that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryType {
    Cut,
    Stab,
    Fracture,
}

impl From<DamageType> for InjuryType {
    fn from(damage: DamageType) -> Self {
        match damage {
            DamageType::Slash => InjuryType::Cut,
            DamageType::Pierce => InjuryType::Stab,
            DamageType::Blunt => InjuryType::Fracture,
        }
    }
}

/// Identifier of an injury within one combatant's model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjuryId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bandage {
    /// Seconds until the bandage turns dirty
    pub remaining: Seconds,
    /// Expired: still wrapped around the wound but no longer stops bleeding
    pub dirty: bool,
}

impl Bandage {
    pub fn fresh(lifetime: Seconds) -> Self {
        Self {
            remaining: lifetime.max(0.0),
            dirty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    pub id: InjuryId,
    pub part: BodyPart,
    pub kind: InjuryType,
    /// 0..=100
    pub severity: f32,
    /// Severity lost per second
    pub healing_rate: f32,
    pub bandage: Option<Bandage>,
}

impl Injury {
    /// A clean bandage stops the bleeding
    pub fn is_bleeding(&self) -> bool {
        !matches!(self.bandage, Some(Bandage { dirty: false, .. }))
    }

    /// Health lost per second from this wound
    pub fn bleed_rate(&self, config: &InjuryConfig) -> f32 {
        if self.is_bleeding() {
            self.severity.max(0.0) * config.bleed_rate_per_severity
        } else {
            0.0
        }
    }

    pub fn is_bandaged(&self) -> bool {
        self.bandage.is_some()
    }

    pub fn is_bandage_dirty(&self) -> bool {
        matches!(self.bandage, Some(Bandage { dirty: true, .. }))
    }
}

/// Result of a bandaging attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandageOutcome {
    /// First bandage on this wound
    Applied,
    /// An existing bandage was swapped for a fresh one
    Replaced,
    /// The dirty bandage may not be swapped under the current policy
    Refused,
    NotFound,
}

/// What one injury tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjuryTick {
    /// Aggregate bleed damage to apply to health once
    pub damage: f32,
    /// Injuries that closed this tick
    pub healed: Vec<Injury>,
    /// Injuries whose bandage turned dirty this tick
    pub soiled: Vec<InjuryId>,
}

/// All active injuries of one combatant (unordered)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjuryModel {
    injuries: Vec<Injury>,
    next_id: u32,
}

impl InjuryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new wound with the default healing rate
    ///
    /// Never merges: two wounds on the same part are tracked separately.
    pub fn add(&mut self, part: BodyPart, kind: InjuryType, severity: f32, config: &InjuryConfig) -> InjuryId {
        self.add_with_rate(part, kind, severity, config.default_healing_rate)
    }

    pub fn add_with_rate(&mut self, part: BodyPart, kind: InjuryType, severity: f32, healing_rate: f32) -> InjuryId {
        let id = InjuryId(self.next_id);
        self.next_id += 1;
        self.injuries.push(Injury {
            id,
            part,
            kind,
            severity: severity.clamp(0.0, MAX_SEVERITY),
            healing_rate: healing_rate.max(0.0),
            bandage: None,
        });
        id
    }

    /// Advance every injury by `dt` seconds
    ///
    /// Bleed uses the severity from before this tick's healing.
    pub fn tick(&mut self, dt: Seconds, config: &InjuryConfig) -> InjuryTick {
        let mut result = InjuryTick::default();
        if dt <= 0.0 {
            return result;
        }

        for injury in self.injuries.iter_mut() {
            result.damage += injury.bleed_rate(config) * dt;

            injury.severity -= injury.healing_rate * dt;

            if let Some(bandage) = injury.bandage.as_mut() {
                if !bandage.dirty {
                    bandage.remaining -= dt;
                    if bandage.remaining <= 0.0 {
                        bandage.remaining = 0.0;
                        bandage.dirty = true;
                        result.soiled.push(injury.id);
                    }
                }
            }
        }

        let (healed, active): (Vec<Injury>, Vec<Injury>) =
            self.injuries.drain(..).partition(|i| i.severity <= 0.0);
        self.injuries = active;
        result.healed = healed;

        result
    }

    /// One battle turn of injury progression
    pub fn tick_turn(&mut self, config: &InjuryConfig) -> InjuryTick {
        self.tick(TURN_SECONDS, config)
    }

    pub fn apply_bandage(&mut self, id: InjuryId, config: &InjuryConfig) -> BandageOutcome {
        let Some(injury) = self.injuries.iter_mut().find(|i| i.id == id) else {
            return BandageOutcome::NotFound;
        };

        let outcome = match &injury.bandage {
            None => BandageOutcome::Applied,
            Some(b) if b.dirty && !config.allow_rebandage_dirty => return BandageOutcome::Refused,
            Some(_) => BandageOutcome::Replaced,
        };
        injury.bandage = Some(Bandage::fresh(config.bandage_lifetime));
        outcome
    }

    /// Remove an injury outright (curative item); `None` if absent
    pub fn remove(&mut self, id: InjuryId) -> Option<Injury> {
        let index = self.injuries.iter().position(|i| i.id == id)?;
        Some(self.injuries.remove(index))
    }

    pub fn get(&self, id: InjuryId) -> Option<&Injury> {
        self.injuries.iter().find(|i| i.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Injury> {
        self.injuries.iter()
    }

    pub fn on_part(&self, part: BodyPart) -> impl Iterator<Item = &Injury> {
        self.injuries.iter().filter(move |i| i.part == part)
    }

    pub fn len(&self) -> usize {
        self.injuries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injuries.is_empty()
    }

    /// Combined health lost per second
    pub fn bleed_rate(&self, config: &InjuryConfig) -> f32 {
        self.injuries.iter().map(|i| i.bleed_rate(config)).sum()
    }

    pub fn is_bleeding(&self) -> bool {
        self.injuries.iter().any(|i| i.is_bleeding() && i.severity > 0.0)
    }

    pub fn total_severity(&self) -> f32 {
        self.injuries.iter().map(|i| i.severity).sum()
    }
}
