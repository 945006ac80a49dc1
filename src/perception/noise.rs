//! Noise events and the per-tick noise field
//!
//! A noise is heard by everyone in range during the tick it is emitted and
//! then forgotten. Debug markers outlive it but carry no gameplay effect.

use serde::{Deserialize, Serialize};

use crate::core::types::{CombatantId, Seconds, Vec2};

/// Minimum perceived strength that draws attention
pub const MIN_PERCEIVED_STRENGTH: f32 = 0.5;

/// Who made a noise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseSource {
    Player,
    Combatant(CombatantId),
    Environment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseEvent {
    pub position: Vec2,
    pub strength: f32,
    /// How long the debug marker lingers
    pub lifetime: Seconds,
    pub source: NoiseSource,
}

impl NoiseEvent {
    pub fn new(position: Vec2, strength: f32, lifetime: Seconds, source: NoiseSource) -> Self {
        Self {
            position,
            strength: strength.max(0.0),
            lifetime: lifetime.max(0.0),
            source,
        }
    }

    /// Hearing range extended by this noise
    pub fn effective_range(&self, hearing_range: f32) -> f32 {
        hearing_range + self.strength
    }

    /// Strength as heard from `listener`, `None` when out of range
    ///
    /// Falls off linearly to zero at the effective range.
    pub fn perceived_strength(&self, listener: Vec2, hearing_range: f32) -> Option<f32> {
        let effective = self.effective_range(hearing_range);
        if effective <= 0.0 {
            return None;
        }
        let distance = listener.distance(&self.position);
        if distance > effective {
            return None;
        }
        Some(self.strength * (1.0 - distance / effective))
    }
}

/// Visual/debug trace of a past noise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseMarker {
    pub position: Vec2,
    pub strength: f32,
    pub remaining: Seconds,
}

/// Collects the noises of the current tick for broadcast
#[derive(Debug, Clone, Default)]
pub struct NoiseField {
    pending: Vec<NoiseEvent>,
    markers: Vec<NoiseMarker>,
}

impl NoiseField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: NoiseEvent) {
        tracing::debug!(
            "Noise {:.1} at ({:.1}, {:.1}) from {:?}",
            event.strength,
            event.position.x,
            event.position.y,
            event.source
        );
        self.markers.push(NoiseMarker {
            position: event.position,
            strength: event.strength,
            remaining: event.lifetime,
        });
        self.pending.push(event);
    }

    /// Hand over this tick's noises; each is returned exactly once
    pub fn drain_pending(&mut self) -> Vec<NoiseEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[NoiseEvent] {
        &self.pending
    }

    /// Age markers and drop the expired ones
    pub fn tick(&mut self, dt: Seconds) {
        for marker in self.markers.iter_mut() {
            marker.remaining -= dt;
        }
        self.markers.retain(|m| m.remaining > 0.0);
    }

    pub fn markers(&self) -> &[NoiseMarker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perceived_strength_falloff() {
        let noise = NoiseEvent::new(Vec2::new(12.0, 0.0), 10.0, 1.0, NoiseSource::Player);
        let heard = noise.perceived_strength(Vec2::ZERO, 5.0).unwrap();
        assert!((heard - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_not_heard() {
        let noise = NoiseEvent::new(Vec2::new(15.5, 0.0), 10.0, 1.0, NoiseSource::Player);
        assert!(noise.perceived_strength(Vec2::ZERO, 5.0).is_none());
    }

    #[test]
    fn test_edge_of_range_is_silent() {
        let noise = NoiseEvent::new(Vec2::new(15.0, 0.0), 10.0, 1.0, NoiseSource::Player);
        let heard = noise.perceived_strength(Vec2::ZERO, 5.0).unwrap();
        assert!(heard.abs() < 1e-5);
    }

    #[test]
    fn test_zero_range_is_safe() {
        let noise = NoiseEvent::new(Vec2::ZERO, 0.0, 1.0, NoiseSource::Environment);
        assert!(noise.perceived_strength(Vec2::ZERO, 0.0).is_none());
    }

    #[test]
    fn test_drain_is_one_shot() {
        let mut field = NoiseField::new();
        field.emit(NoiseEvent::new(Vec2::ZERO, 3.0, 2.0, NoiseSource::Player));
        assert_eq!(field.drain_pending().len(), 1);
        assert!(field.drain_pending().is_empty());
        // Marker survives the drain
        assert_eq!(field.markers().len(), 1);
    }

    #[test]
    fn test_markers_expire() {
        let mut field = NoiseField::new();
        field.emit(NoiseEvent::new(Vec2::ZERO, 3.0, 1.0, NoiseSource::Player));
        field.tick(0.5);
        assert_eq!(field.markers().len(), 1);
        field.tick(0.5);
        assert!(field.markers().is_empty());
    }
}
