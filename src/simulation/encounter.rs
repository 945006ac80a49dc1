//! Encounter - owns the combatants of one area and drives their updates
//!
//! The host calls `tick` once per frame and `advance_turn` once per battle
//! turn. Within a tick every combatant is processed in order:
//! AI (vision first) -> noise broadcast -> injuries -> defeats.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::resolution::{resolve_hit, Hit, HitOutcome};
use crate::combat::wounds::{BandageOutcome, Injury, InjuryId, InjuryTick};
use crate::core::config::{BehaviorProfile, SimulationConfig};
use crate::core::error::{Result, SimError};
use crate::core::types::{CombatantId, Seconds, Vec2};
use crate::entity::combatant::{Combatant, LootContainer};
use crate::perception::noise::{NoiseEvent, NoiseField};
use crate::simulation::events::SimulationEvent;
use crate::simulation::host::{Effects, Notification, Senses};

pub struct Encounter {
    config: SimulationConfig,
    combatants: Vec<Combatant>,
    noise: NoiseField,
    loot: Vec<LootContainer>,
    events: Vec<SimulationEvent>,
    rng: ChaCha8Rng,
}

impl Encounter {
    /// New empty encounter; `seed` fixes every random draw
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        Self {
            config,
            combatants: Vec::new(),
            noise: NoiseField::new(),
            loot: Vec::new(),
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Spawn with the config's default profile
    pub fn spawn(&mut self, name: &str, position: Vec2) -> CombatantId {
        let profile = self.config.ai.clone();
        self.spawn_with_profile(name, profile, position)
    }

    pub fn spawn_with_profile(&mut self, name: &str, profile: BehaviorProfile, position: Vec2) -> CombatantId {
        let combatant = Combatant::spawn(name, profile, position, &mut self.rng);
        self.insert(combatant)
    }

    /// Add an already built (e.g. restored) combatant
    pub fn insert(&mut self, combatant: Combatant) -> CombatantId {
        let id = combatant.id();
        tracing::debug!("{} joins the encounter at {:?}", combatant.name(), combatant.position());
        self.combatants.push(combatant);
        id
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id() == id)
    }

    fn index_of(&self, id: CombatantId) -> Result<usize> {
        self.combatants
            .iter()
            .position(|c| c.id() == id)
            .ok_or(SimError::CombatantNotFound(id))
    }

    fn living_index_of(&self, id: CombatantId) -> Result<usize> {
        let idx = self.index_of(id)?;
        if self.combatants[idx].is_defeated() {
            return Err(SimError::AlreadyDefeated(id));
        }
        Ok(idx)
    }

    pub fn position(&self, id: CombatantId) -> Option<Vec2> {
        self.get(id).map(|c| c.position())
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| !c.is_defeated())
    }

    pub fn loot(&self) -> &[LootContainer] {
        &self.loot
    }

    pub fn noise_field(&self) -> &NoiseField {
        &self.noise
    }

    /// Queue a noise for broadcast on the next tick
    pub fn emit_noise(&mut self, event: NoiseEvent) {
        self.noise.emit(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance real time by `dt`
    ///
    /// While a battle is active only the noise markers age; pending noises
    /// are dropped so they cannot leak into a later tick.
    pub fn tick(&mut self, dt: Seconds, senses: &dyn Senses, effects: &mut dyn Effects) {
        if dt <= 0.0 {
            return;
        }
        self.noise.tick(dt);
        let noises = self.noise.drain_pending();

        if senses.is_battle_active() {
            return;
        }

        for i in 0..self.combatants.len() {
            let combatant = &mut self.combatants[i];
            let id = combatant.id();
            let ai_events = combatant.tick_ai(dt, senses, effects, &mut self.rng);
            self.events
                .extend(ai_events.into_iter().map(|e| SimulationEvent::from_ai(id, e)));
        }

        for noise in &noises {
            for combatant in self.combatants.iter_mut().filter(|c| !c.is_defeated()) {
                let id = combatant.id();
                let heard = combatant.ai_mut().hear(id, noise, senses);
                self.events
                    .extend(heard.into_iter().map(|e| SimulationEvent::from_ai(id, e)));
            }
        }

        for i in 0..self.combatants.len() {
            let (tick, defeated) = self.combatants[i].tick_injuries(dt, &self.config.injury);
            self.record_injury_tick(i, tick);
            if defeated {
                self.handle_defeat(i, effects);
            }
        }
    }

    /// One turn of the battle overlay: injuries progress a fixed 10 seconds
    pub fn advance_turn(&mut self, effects: &mut dyn Effects) {
        for i in 0..self.combatants.len() {
            let (tick, defeated) = self.combatants[i].tick_injuries_turn(&self.config.injury);
            self.record_injury_tick(i, tick);
            if defeated {
                self.handle_defeat(i, effects);
            }
        }
    }

    fn record_injury_tick(&mut self, idx: usize, tick: InjuryTick) {
        let id = self.combatants[idx].id();
        for injury in tick.healed {
            self.events.push(SimulationEvent::InjuryHealed { id, injury: injury.id });
        }
        for injury in tick.soiled {
            self.events.push(SimulationEvent::BandageSoiled { id, injury });
        }
    }

    /// Resolve one actual hit on `target`
    pub fn strike(&mut self, target: CombatantId, hit: &Hit, effects: &mut dyn Effects) -> Result<HitOutcome> {
        let idx = self.living_index_of(target)?;
        let outcome = resolve_hit(&mut self.combatants[idx], hit, &self.config, &mut self.rng);

        tracing::debug!(
            "Hit on {:?}: {:.1} mitigated, {:.1} through",
            outcome.part,
            outcome.mitigation,
            outcome.net_damage
        );
        self.events.push(SimulationEvent::HitResolved {
            target,
            outcome: outcome.clone(),
        });
        if outcome.defeated {
            self.handle_defeat(idx, effects);
        }
        Ok(outcome)
    }

    pub fn bandage(&mut self, target: CombatantId, injury: InjuryId, effects: &mut dyn Effects) -> Result<BandageOutcome> {
        let idx = self.living_index_of(target)?;
        let outcome = self.combatants[idx]
            .injuries
            .apply_bandage(injury, &self.config.injury);
        if matches!(outcome, BandageOutcome::Applied | BandageOutcome::Replaced) {
            effects.notify(Notification::Bandaged { id: target, injury });
        }
        Ok(outcome)
    }

    /// Remove an injury outright; `Ok(None)` when it was not there
    pub fn cure(&mut self, target: CombatantId, injury: InjuryId, effects: &mut dyn Effects) -> Result<Option<Injury>> {
        let idx = self.living_index_of(target)?;
        let removed = self.combatants[idx].injuries.remove(injury);
        if removed.is_some() {
            effects.notify(Notification::Healed { id: target, injury });
        }
        Ok(removed)
    }

    /// Only reached on the combatant's first transition to defeated
    fn handle_defeat(&mut self, idx: usize, effects: &mut dyn Effects) {
        let combatant = &mut self.combatants[idx];
        let id = combatant.id();
        let position = combatant.position();
        let loot = combatant.make_loot();

        tracing::info!("{} left {} armor pieces", combatant.name(), loot.armor.len());
        self.loot.push(loot);
        let loot_index = self.loot.len() - 1;

        effects.notify(Notification::Death { id, position });
        self.events.push(SimulationEvent::CombatantDefeated { id, position, loot_index });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::state::BehaviorState;
    use crate::combat::body_zone::{BodyPart, DamageType};
    use crate::combat::wounds::InjuryType;
    use crate::perception::noise::NoiseSource;
    use crate::simulation::host::{OpenField, RecordingEffects};

    fn quiet_field() -> OpenField {
        OpenField::new(Vec2::new(500.0, 500.0))
    }

    #[test]
    fn test_noise_broadcast_reaches_listeners_once() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 42);
        let near = encounter.spawn("Near", Vec2::ZERO);
        let far = encounter.spawn("Far", Vec2::new(100.0, 0.0));
        let field = quiet_field();
        let mut effects = RecordingEffects::default();

        encounter.emit_noise(NoiseEvent::new(Vec2::new(-12.0, 0.0), 10.0, 5.0, NoiseSource::Player));
        encounter.tick(0.1, &field, &mut effects);

        assert_eq!(encounter.get(near).unwrap().state(), BehaviorState::Investigating);
        assert_eq!(encounter.get(far).unwrap().state(), BehaviorState::Wandering);

        let heard = encounter
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimulationEvent::NoiseHeard { .. }))
            .count();
        assert_eq!(heard, 1);

        // The noise is gone, the marker stays
        assert!(encounter.noise_field().pending().is_empty());
        assert_eq!(encounter.noise_field().markers().len(), 1);
    }

    #[test]
    fn test_strike_unknown_target() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 1);
        let result = encounter.strike(
            CombatantId::new(),
            &Hit::new(DamageType::Blunt, 5.0),
            &mut RecordingEffects::default(),
        );
        assert!(matches!(result, Err(SimError::CombatantNotFound(_))));
    }

    #[test]
    fn test_defeat_is_one_shot() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 1);
        let id = encounter.spawn("Bandit", Vec2::ZERO);
        let mut effects = RecordingEffects::default();

        let outcome = encounter
            .strike(id, &Hit::new(DamageType::Blunt, 1000.0).at(BodyPart::Head), &mut effects)
            .unwrap();
        assert!(outcome.defeated);

        let again = encounter.strike(id, &Hit::new(DamageType::Blunt, 1000.0), &mut effects);
        assert!(matches!(again, Err(SimError::AlreadyDefeated(_))));

        encounter.tick(1.0, &quiet_field(), &mut effects);
        encounter.advance_turn(&mut effects);

        let deaths = effects
            .notifications
            .iter()
            .filter(|n| matches!(n, Notification::Death { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(encounter.loot().len(), 1);
        assert_eq!(encounter.living().count(), 0);
    }

    #[test]
    fn test_defeated_combatant_not_ticked() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 1);
        let id = encounter.spawn("Bandit", Vec2::ZERO);
        let mut effects = RecordingEffects::default();
        encounter
            .strike(id, &Hit::new(DamageType::Blunt, 1000.0), &mut effects)
            .unwrap();
        let position = encounter.position(id).unwrap();

        for _ in 0..20 {
            encounter.tick(0.5, &quiet_field(), &mut effects);
        }
        assert_eq!(encounter.position(id), Some(position));
    }

    #[test]
    fn test_bleed_out_defeats_during_turns() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 3);
        let id = encounter.spawn("Bandit", Vec2::ZERO);
        let mut effects = RecordingEffects::default();
        {
            let c = encounter.get_mut(id).unwrap();
            c.set_health(5.0);
            c.injuries.add_with_rate(BodyPart::Neck, InjuryType::Cut, 50.0, 0.0);
        }

        // 50 * 0.02 * 10s = 10 per turn
        encounter.advance_turn(&mut effects);
        assert!(encounter.get(id).unwrap().is_defeated());
        assert!(encounter
            .drain_events()
            .iter()
            .any(|e| matches!(e, SimulationEvent::CombatantDefeated { id: d, .. } if *d == id)));
    }

    #[test]
    fn test_battle_suspends_real_time_ticks() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 3);
        let id = encounter.spawn("Bandit", Vec2::ZERO);
        encounter
            .get_mut(id)
            .unwrap()
            .injuries
            .add_with_rate(BodyPart::Legs, InjuryType::Cut, 20.0, 0.0);
        let health = encounter.get(id).unwrap().health();

        let mut field = quiet_field();
        field.battle_active = true;
        encounter.emit_noise(NoiseEvent::new(Vec2::new(1.0, 0.0), 10.0, 1.0, NoiseSource::Player));
        encounter.tick(1.0, &field, &mut RecordingEffects::default());

        let c = encounter.get(id).unwrap();
        assert_eq!(c.health(), health);
        assert_eq!(c.state(), BehaviorState::Wandering);

        // The noise did not survive into the next tick
        field.battle_active = false;
        encounter.tick(0.1, &field, &mut RecordingEffects::default());
        assert_ne!(encounter.get(id).unwrap().state(), BehaviorState::Investigating);
    }

    #[test]
    fn test_bandage_and_cure_notify() {
        let mut encounter = Encounter::new(SimulationConfig::default(), 3);
        let id = encounter.spawn("Bandit", Vec2::ZERO);
        let injury = encounter
            .get_mut(id)
            .unwrap()
            .injuries
            .add_with_rate(BodyPart::Arms, InjuryType::Cut, 20.0, 0.0);
        let mut effects = RecordingEffects::default();

        assert_eq!(encounter.bandage(id, injury, &mut effects).unwrap(), BandageOutcome::Applied);
        assert!(encounter.cure(id, injury, &mut effects).unwrap().is_some());
        assert!(encounter.cure(id, injury, &mut effects).unwrap().is_none());
        assert_eq!(
            encounter.bandage(id, injury, &mut effects).unwrap(),
            BandageOutcome::NotFound
        );
        assert_eq!(effects.notifications.len(), 2);
    }
}
