//! Vision cone and line-of-sight checks

use serde::{Deserialize, Serialize};

use crate::core::config::BehaviorProfile;
use crate::core::types::Vec2;
use crate::simulation::host::{BlockingMask, Senses};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionCone {
    pub range: f32,
    /// Full cone width in degrees
    pub angle: f32,
}

impl VisionCone {
    pub fn new(range: f32, angle: f32) -> Self {
        Self { range, angle }
    }

    pub fn from_profile(profile: &BehaviorProfile) -> Self {
        Self::new(profile.vision_range, profile.vision_angle)
    }

    /// Range and angle test only
    ///
    /// A zero `facing` counts as looking everywhere.
    pub fn contains(&self, origin: Vec2, facing: Vec2, target: Vec2) -> bool {
        let to_target = target - origin;
        if to_target.length() > self.range {
            return false;
        }
        facing.angle_to(&to_target) <= self.angle / 2.0
    }

    /// Cone test plus an unobstructed ray to the target
    pub fn can_see(&self, origin: Vec2, facing: Vec2, target: Vec2, senses: &dyn Senses) -> bool {
        if !self.contains(origin, facing, target) {
            return false;
        }
        let to_target = target - origin;
        !senses.is_ray_blocked(origin, to_target.normalize(), to_target.length(), BlockingMask::SIGHT)
    }
}
