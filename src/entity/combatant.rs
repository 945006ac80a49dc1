//! The combatant aggregate: health, armor, injuries and AI
//!
//! Health, the defeat latch and the AI are private so their invariants hold;
//! armor and injuries are plain values the host may inspect and edit freely.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::controller::{AiEvent, CombatantAi};
use crate::ai::state::BehaviorState;
use crate::combat::armor::{ArmorLoadout, EquippedArmor};
use crate::combat::body_zone::Anatomy;
use crate::combat::constants::{HEALTH_ROLL_MAX, HEALTH_ROLL_MIN};
use crate::combat::wounds::{InjuryModel, InjuryTick};
use crate::core::config::{BehaviorProfile, InjuryConfig};
use crate::core::types::{CombatantId, Seconds, Vec2};
use crate::simulation::host::{Effects, Senses};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Defeated,
}

/// What a defeated combatant leaves behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootContainer {
    pub source: CombatantId,
    pub name: String,
    pub position: Vec2,
    pub armor: Vec<EquippedArmor>,
}

#[derive(Debug, Clone)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    health: f32,
    max_health: f32,
    /// Spawn roll factor, 0.9..=1.1
    strength_modifier: f32,
    life: LifeState,
    ai: CombatantAi,
    pub anatomy: Anatomy,
    pub armor: ArmorLoadout,
    pub injuries: InjuryModel,
}

impl Combatant {
    /// New combatant with max health rolled at 90-110% of the profile's base
    pub fn spawn<R: Rng + ?Sized>(
        name: impl Into<String>,
        profile: BehaviorProfile,
        position: Vec2,
        rng: &mut R,
    ) -> Self {
        let roll = rng.gen_range(HEALTH_ROLL_MIN..=HEALTH_ROLL_MAX);
        let max_health = profile.base_health * roll;
        Self {
            id: CombatantId::new(),
            name: name.into(),
            health: max_health,
            max_health,
            strength_modifier: roll,
            life: LifeState::Alive,
            ai: CombatantAi::new(profile, position),
            anatomy: Anatomy::default(),
            armor: ArmorLoadout::new(),
            injuries: InjuryModel::new(),
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: CombatantId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Clamped to [0, max]; does not trip the defeat latch
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    /// Write saved health as-is, raising max health to hold it
    pub(crate) fn restore_health(&mut self, health: f32) {
        let health = health.max(0.0);
        self.max_health = self.max_health.max(health);
        self.health = health;
    }

    pub fn strength_modifier(&self) -> f32 {
        self.strength_modifier
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_defeated(&self) -> bool {
        self.life == LifeState::Defeated
    }

    pub fn ai(&self) -> &CombatantAi {
        &self.ai
    }

    pub fn ai_mut(&mut self) -> &mut CombatantAi {
        &mut self.ai
    }

    pub fn position(&self) -> Vec2 {
        self.ai.position()
    }

    pub fn state(&self) -> BehaviorState {
        self.ai.state()
    }

    /// Subtract health; true only on the tick this combatant becomes defeated
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.is_defeated() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.life = LifeState::Defeated;
            tracing::info!("{} defeated", self.name);
            return true;
        }
        false
    }

    /// Mark defeated without damage (save restore); true on first transition
    pub(crate) fn mark_defeated(&mut self) -> bool {
        if self.is_defeated() {
            return false;
        }
        self.health = 0.0;
        self.life = LifeState::Defeated;
        true
    }

    pub fn tick_ai<R: Rng + ?Sized>(
        &mut self,
        dt: Seconds,
        senses: &dyn Senses,
        effects: &mut dyn Effects,
        rng: &mut R,
    ) -> Vec<AiEvent> {
        if self.is_defeated() {
            return Vec::new();
        }
        self.ai.tick(self.id, dt, senses, effects, rng)
    }

    /// Progress injuries and drain the bleed damage from health
    ///
    /// Returns the tick summary and whether this bleed defeated the combatant.
    pub fn tick_injuries(&mut self, dt: Seconds, config: &InjuryConfig) -> (InjuryTick, bool) {
        if self.is_defeated() {
            return (InjuryTick::default(), false);
        }
        let tick = self.injuries.tick(dt, config);
        let defeated = self.apply_damage(tick.damage);
        (tick, defeated)
    }

    /// One battle turn of injury progression
    pub fn tick_injuries_turn(&mut self, config: &InjuryConfig) -> (InjuryTick, bool) {
        self.tick_injuries(crate::combat::constants::TURN_SECONDS, config)
    }

    /// Strip the body into a loot container
    pub fn make_loot(&mut self) -> LootContainer {
        LootContainer {
            source: self.id,
            name: format!("{}'s remains", self.name),
            position: self.position(),
            armor: self.armor.strip(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::armor::ArmorDefinition;
    use crate::combat::body_zone::BodyPart;
    use crate::combat::wounds::InjuryType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn() -> Combatant {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        Combatant::spawn("Bandit", BehaviorProfile::default(), Vec2::ZERO, &mut rng)
    }

    #[test]
    fn test_health_roll_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let c = Combatant::spawn("Bandit", BehaviorProfile::default(), Vec2::ZERO, &mut rng);
            assert!(c.max_health() >= 90.0 - 1e-3 && c.max_health() <= 110.0 + 1e-3);
            assert_eq!(c.health(), c.max_health());
            assert!((c.max_health() - 100.0 * c.strength_modifier()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_defeat_latch_fires_once() {
        let mut c = spawn();
        assert!(!c.apply_damage(10.0));
        assert!(c.apply_damage(1000.0));
        assert!(c.is_defeated());
        assert_eq!(c.health(), 0.0);
        assert!(!c.apply_damage(5.0));
    }

    #[test]
    fn test_bleeding_out() {
        let mut c = spawn();
        c.set_health(1.0);
        c.injuries.add_with_rate(BodyPart::Neck, InjuryType::Cut, 100.0, 0.0);
        let (tick, defeated) = c.tick_injuries(1.0, &InjuryConfig::default());
        assert!((tick.damage - 2.0).abs() < 1e-5);
        assert!(defeated);

        let (tick, defeated) = c.tick_injuries(1.0, &InjuryConfig::default());
        assert_eq!(tick.damage, 0.0);
        assert!(!defeated);
    }

    #[test]
    fn test_loot_takes_armor() {
        let mut c = spawn();
        c.armor.equip(ArmorDefinition::kettle_helm());
        c.armor.equip(ArmorDefinition::hauberk());
        let loot = c.make_loot();
        assert_eq!(loot.source, c.id());
        assert_eq!(loot.armor.len(), 2);
        assert!(c.armor.is_empty());
    }

    #[test]
    fn test_set_health_clamped() {
        let mut c = spawn();
        c.set_health(-5.0);
        assert_eq!(c.health(), 0.0);
        assert!(!c.is_defeated());
        c.set_health(1e6);
        assert_eq!(c.health(), c.max_health());
    }
}
