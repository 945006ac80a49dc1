//! Combat system constants - fixed rules and default tunables in one place
//!
//! Defaults here seed `SimulationConfig`; the rest are hard rules.

// Time
/// Seconds of injury progression applied per battle turn
pub const TURN_SECONDS: f32 = 10.0;

// Injury
pub const MAX_SEVERITY: f32 = 100.0;
/// Health lost per second per point of severity
pub const BLEED_RATE_PER_SEVERITY: f32 = 0.02;
pub const DEFAULT_HEALING_RATE: f32 = 0.1;
pub const BANDAGE_LIFETIME: f32 = 300.0;

// Armor
/// Fraction of max durability lost per absorbed hit
pub const DURABILITY_LOSS_FRACTION: f32 = 0.01;

// Spawn
pub const HEALTH_ROLL_MIN: f32 = 0.9;
pub const HEALTH_ROLL_MAX: f32 = 1.1;
