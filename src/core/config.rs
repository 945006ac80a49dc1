//! Simulation configuration with documented defaults
//!
//! Every tunable that is not a hard rule lives here. Configs are plain values
//! handed to the systems that need them; there is no global instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Per-combatant perception and movement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorProfile {
    /// Base hit points before the 90-110% spawn roll
    pub base_health: f32,

    /// Guards idle around their anchor instead of wandering
    pub is_guard: bool,

    /// Maximum sight distance (world units)
    pub vision_range: f32,

    /// Full cone width in degrees; the target must be within half of it
    pub vision_angle: f32,

    /// Base hearing distance, extended by each noise's strength
    pub hearing_range: f32,

    /// Walking speed (world units per second)
    pub move_speed: f32,

    /// Speed multiplier while chasing
    pub chase_speed_multiplier: f32,

    /// Radius around the current position for wander targets
    pub wander_radius: f32,

    /// Radius around the guard anchor for guard targets
    pub guard_radius: f32,

    /// Seconds spent searching after losing sight of the player
    pub search_duration: f32,

    /// Radius around the last known player position for search targets
    pub search_radius: f32,

    /// Mean idle pause between wander/guard moves (stddev is 0.3 of this)
    pub idle_wait_mean: f32,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            base_health: 100.0,
            is_guard: false,
            vision_range: 10.0,
            vision_angle: 90.0,
            hearing_range: 5.0,
            move_speed: 2.0,
            chase_speed_multiplier: 1.5,
            wander_radius: 10.0,
            guard_radius: 3.0,
            search_duration: 10.0,
            search_radius: 4.0,
            idle_wait_mean: 3.0,
        }
    }
}

impl BehaviorProfile {
    /// Default profile configured as a guard
    pub fn guard() -> Self {
        Self {
            is_guard: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_health <= 0.0 {
            return Err(SimError::InvalidConfig("base_health must be positive".into()));
        }
        if self.vision_angle <= 0.0 || self.vision_angle > 360.0 {
            return Err(SimError::InvalidConfig(format!(
                "vision_angle ({}) must be in (0, 360]",
                self.vision_angle
            )));
        }
        let ranges = [
            self.vision_range,
            self.hearing_range,
            self.wander_radius,
            self.guard_radius,
            self.search_radius,
            self.search_duration,
        ];
        if ranges.iter().any(|r| *r < 0.0) {
            return Err(SimError::InvalidConfig("ranges and durations must be non-negative".into()));
        }
        if self.move_speed <= 0.0 || self.chase_speed_multiplier <= 0.0 {
            return Err(SimError::InvalidConfig("move speeds must be positive".into()));
        }
        if self.idle_wait_mean <= 0.0 {
            return Err(SimError::InvalidConfig("idle_wait_mean must be positive".into()));
        }
        Ok(())
    }
}

/// Armor wear settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorConfig {
    /// Fraction of max durability lost by each piece that absorbs a hit
    ///
    /// At 0.01 a 100-durability piece loses 1 point per hit and stops
    /// protecting after 100 hits.
    pub durability_loss_fraction: f32,
}

impl Default for ArmorConfig {
    fn default() -> Self {
        Self {
            durability_loss_fraction: crate::combat::constants::DURABILITY_LOSS_FRACTION,
        }
    }
}

/// Injury dynamics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryConfig {
    /// Health lost per second per point of severity
    pub bleed_rate_per_severity: f32,

    /// Severity healed per second for freshly added injuries
    pub default_healing_rate: f32,

    /// Seconds a bandage stays clean
    pub bandage_lifetime: f32,

    /// Whether a dirty bandage may be swapped for a fresh one
    pub allow_rebandage_dirty: bool,
}

impl Default for InjuryConfig {
    fn default() -> Self {
        use crate::combat::constants::*;
        Self {
            bleed_rate_per_severity: BLEED_RATE_PER_SEVERITY,
            default_healing_rate: DEFAULT_HEALING_RATE,
            bandage_lifetime: BANDAGE_LIFETIME,
            allow_rebandage_dirty: true,
        }
    }
}

/// Chance and severity of a new wound when a hit penetrates armor
///
/// chance   = clamp(base_chance + chance_per_damage * net, 0, max_chance)
/// severity = clamp(net * severity_per_damage, min_severity, 100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoundPolicy {
    pub base_chance: f32,
    pub chance_per_damage: f32,
    pub max_chance: f32,
    pub severity_per_damage: f32,
    pub min_severity: f32,
}

impl Default for WoundPolicy {
    fn default() -> Self {
        Self {
            base_chance: 0.25,
            chance_per_damage: 0.03,
            max_chance: 0.9,
            severity_per_damage: 2.0,
            min_severity: 5.0,
        }
    }
}

impl WoundPolicy {
    /// Probability that `net_damage` opens a wound; zero when nothing got through
    pub fn chance(&self, net_damage: f32) -> f32 {
        if net_damage <= 0.0 {
            return 0.0;
        }
        (self.base_chance + self.chance_per_damage * net_damage).clamp(0.0, self.max_chance)
    }

    pub fn severity(&self, net_damage: f32) -> f32 {
        let max = crate::combat::constants::MAX_SEVERITY;
        (net_damage * self.severity_per_damage).clamp(self.min_severity.min(max), max)
    }
}

/// Complete configuration for an encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Profile used when spawning without an explicit one
    pub ai: BehaviorProfile,
    pub armor: ArmorConfig,
    pub injury: InjuryConfig,
    pub wound_policy: WoundPolicy,
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.ai.validate()?;

        let loss = self.armor.durability_loss_fraction;
        if !(0.0..=1.0).contains(&loss) {
            return Err(SimError::InvalidConfig(format!(
                "durability_loss_fraction ({}) must be in [0, 1]",
                loss
            )));
        }

        if self.injury.bleed_rate_per_severity < 0.0
            || self.injury.default_healing_rate < 0.0
            || self.injury.bandage_lifetime < 0.0
        {
            return Err(SimError::InvalidConfig("injury rates must be non-negative".into()));
        }

        let policy = &self.wound_policy;
        if !(0.0..=1.0).contains(&policy.max_chance) {
            return Err(SimError::InvalidConfig(format!(
                "max_chance ({}) must be in [0, 1]",
                policy.max_chance
            )));
        }
        if policy.severity_per_damage < 0.0 || policy.min_severity < 0.0 {
            return Err(SimError::InvalidConfig("wound severity factors must be non-negative".into()));
        }

        Ok(())
    }
}
