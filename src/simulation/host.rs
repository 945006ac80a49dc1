//! Collaborators supplied by the host engine
//!
//! The simulation reads the world through `Senses` and reports fire-and-forget
//! side effects through `Effects`. `OpenField` and `RecordingEffects` are
//! minimal implementations for headless runs and tests.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::combat::wounds::InjuryId;
use crate::core::types::{CombatantId, Vec2};

bitflags! {
    /// Geometry categories a ray query should collide with
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct BlockingMask: u8 {
        const WALLS = 1 << 0;
        const PROPS = 1 << 1;
        const FOLIAGE = 1 << 2;
        /// What blocks line of sight
        const SIGHT = Self::WALLS.bits() | Self::PROPS.bits() | Self::FOLIAGE.bits();
    }
}

/// Read-only world queries
pub trait Senses {
    fn player_position(&self) -> Vec2;

    /// AI movement is suspended while the battle overlay runs
    fn is_battle_active(&self) -> bool;

    /// Stealth/cheat toggle: when false nobody may chase, investigate or search
    fn is_player_visible(&self) -> bool;

    /// Does anything matching `mask` lie on the ray within `max_distance`?
    fn is_ray_blocked(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: BlockingMask) -> bool;

    /// Is `position` on traversable ground?
    fn is_on_ground(&self, position: Vec2) -> bool;
}

/// One-shot notifications for the host's UI/audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    Death { id: CombatantId, position: Vec2 },
    Healed { id: CombatantId, injury: InjuryId },
    Bandaged { id: CombatantId, injury: InjuryId },
}

/// Fire-and-forget side effects; failures are the host's problem
pub trait Effects {
    fn play_detection_sound(&mut self, id: CombatantId, position: Vec2);

    fn notify(&mut self, notification: Notification);
}

/// Effects sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl Effects for NullEffects {
    fn play_detection_sound(&mut self, _id: CombatantId, _position: Vec2) {}

    fn notify(&mut self, _notification: Notification) {}
}

/// Effects sink that remembers every call
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    pub detection_sounds: Vec<CombatantId>,
    pub notifications: Vec<Notification>,
}

impl Effects for RecordingEffects {
    fn play_detection_sound(&mut self, id: CombatantId, _position: Vec2) {
        self.detection_sounds.push(id);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// Axis-aligned solid block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
}

impl Wall {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Slab test against the segment `origin + direction * t`, t in [0, max_distance]
    pub fn intersects_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for (o, d, lo, hi) in [
            (origin.x, direction.x, self.min.x, self.max.x),
            (origin.y, direction.y, self.min.y, self.max.y),
        ] {
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return false;
                }
            } else {
                let t1 = (lo - o) / d;
                let t2 = (hi - o) / d;
                t_min = t_min.max(t1.min(t2));
                t_max = t_max.min(t1.max(t2));
                if t_min > t_max {
                    return false;
                }
            }
        }
        true
    }
}

/// Flat ground with optional walls and bounds
#[derive(Debug, Clone)]
pub struct OpenField {
    pub player: Vec2,
    pub battle_active: bool,
    pub player_visible: bool,
    pub walls: Vec<Wall>,
    /// Ground outside these bounds is not traversable
    pub bounds: Option<Wall>,
}

impl OpenField {
    pub fn new(player: Vec2) -> Self {
        Self {
            player,
            battle_active: false,
            player_visible: true,
            walls: Vec::new(),
            bounds: None,
        }
    }

    pub fn add_wall(&mut self, a: Vec2, b: Vec2) {
        self.walls.push(Wall::new(a, b));
    }
}

impl Senses for OpenField {
    fn player_position(&self) -> Vec2 {
        self.player
    }

    fn is_battle_active(&self) -> bool {
        self.battle_active
    }

    fn is_player_visible(&self) -> bool {
        self.player_visible
    }

    fn is_ray_blocked(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: BlockingMask) -> bool {
        if !mask.contains(BlockingMask::WALLS) {
            return false;
        }
        self.walls
            .iter()
            .any(|w| w.intersects_ray(origin, direction, max_distance))
    }

    fn is_on_ground(&self, position: Vec2) -> bool {
        let in_bounds = self.bounds.map(|b| b.contains(position)).unwrap_or(true);
        in_bounds && !self.walls.iter().any(|w| w.contains(position))
    }
}
