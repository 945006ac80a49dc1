//! Combatant AI: perception-driven behavior state machine
//!
//! Each tick re-evaluates vision before running the current state's logic, so
//! any state can be interrupted into `Chasing` on a tick boundary. Noises are
//! delivered separately through `hear`.

use rand::Rng;

use crate::ai::state::BehaviorState;
use crate::ai::timing::{idle_wait, random_point_in_radius};
use crate::core::config::BehaviorProfile;
use crate::core::types::{CombatantId, Seconds, Vec2};
use crate::perception::noise::{NoiseEvent, NoiseSource, MIN_PERCEIVED_STRENGTH};
use crate::perception::vision::VisionCone;
use crate::simulation::host::{Effects, Senses};

/// Distance at which a movement target counts as reached
pub const ARRIVAL_DISTANCE: f32 = 0.5;

/// Something the AI decided this tick
#[derive(Debug, Clone, PartialEq)]
pub enum AiEvent {
    StateChanged { from: BehaviorState, to: BehaviorState },
    PlayerDetected { position: Vec2 },
    NoiseHeard { position: Vec2, strength: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveStatus {
    Moving,
    Arrived,
    /// Next step would leave traversable ground
    Blocked,
}

#[derive(Debug, Clone)]
pub struct CombatantAi {
    profile: BehaviorProfile,
    vision: VisionCone,
    state: BehaviorState,
    position: Vec2,
    facing: Vec2,
    guard_anchor: Vec2,
    move_target: Option<Vec2>,
    /// Idle pause remaining
    wait_timer: Seconds,
    /// Search time remaining
    search_timer: Seconds,
    last_known_target: Option<Vec2>,
}

impl CombatantAi {
    /// Starts idle at `position`, which also becomes the guard anchor
    pub fn new(profile: BehaviorProfile, position: Vec2) -> Self {
        Self {
            vision: VisionCone::from_profile(&profile),
            state: BehaviorState::idle(profile.is_guard),
            profile,
            position,
            facing: Vec2::new(1.0, 0.0),
            guard_anchor: position,
            move_target: None,
            wait_timer: 0.0,
            search_timer: 0.0,
            last_known_target: None,
        }
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport (spawn placement, host corrections)
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Vec2) {
        let facing = facing.normalize();
        if facing != Vec2::ZERO {
            self.facing = facing;
        }
    }

    pub fn guard_anchor(&self) -> Vec2 {
        self.guard_anchor
    }

    pub fn set_guard_anchor(&mut self, anchor: Vec2) {
        self.guard_anchor = anchor;
    }

    pub fn move_target(&self) -> Option<Vec2> {
        self.move_target
    }

    pub fn last_known_target(&self) -> Option<Vec2> {
        self.last_known_target
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_timer > 0.0
    }

    fn idle_state(&self) -> BehaviorState {
        BehaviorState::idle(self.profile.is_guard)
    }

    /// Resume in `state` (save restore); transient timers and targets reset
    ///
    /// The investigated point is not saved, so a resumed `Investigating`
    /// returns to idle on its next tick.
    pub fn set_state(&mut self, state: BehaviorState) {
        self.state = state;
        self.move_target = None;
        self.wait_timer = 0.0;
        self.search_timer = if state == BehaviorState::Searching {
            self.profile.search_duration
        } else {
            0.0
        };
        if state.is_alert() && self.last_known_target.is_none() {
            self.last_known_target = Some(self.position);
        }
    }

    /// Drop whatever it was doing and return to the calm state
    pub fn force_idle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<AiEvent> {
        let mut events = Vec::new();
        self.enter_idle(rng, &mut events);
        events
    }

    fn transition(&mut self, to: BehaviorState, events: &mut Vec<AiEvent>) {
        if self.state == to {
            return;
        }
        tracing::debug!("AI state {:?} -> {:?}", self.state, to);
        events.push(AiEvent::StateChanged { from: self.state, to });
        self.state = to;
    }

    fn enter_idle<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<AiEvent>) {
        let idle = self.idle_state();
        self.transition(idle, events);
        self.move_target = None;
        self.search_timer = 0.0;
        self.wait_timer = idle_wait(rng, self.profile.idle_wait_mean);
    }

    /// Advance one tick
    ///
    /// No-op while a battle runs or while standing off traversable ground;
    /// the next tick simply tries again.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        id: CombatantId,
        dt: Seconds,
        senses: &dyn Senses,
        effects: &mut dyn Effects,
        rng: &mut R,
    ) -> Vec<AiEvent> {
        let mut events = Vec::new();
        if dt <= 0.0 || senses.is_battle_active() || !senses.is_on_ground(self.position) {
            return events;
        }

        let player_visible = senses.is_player_visible();
        if !player_visible && self.state.is_alert() {
            self.enter_idle(rng, &mut events);
        }

        if player_visible {
            self.update_vision(id, senses, effects, rng, &mut events);
        }

        match self.state {
            BehaviorState::Wandering | BehaviorState::Guarding => self.tick_idle(dt, senses, rng),
            BehaviorState::Investigating => {
                let status = self.step(dt, self.profile.move_speed, senses);
                if status != MoveStatus::Moving {
                    self.enter_idle(rng, &mut events);
                }
            }
            BehaviorState::Searching => self.tick_search(dt, senses, rng, &mut events),
            BehaviorState::Chasing => {
                self.move_target = Some(senses.player_position());
                let speed = self.profile.move_speed * self.profile.chase_speed_multiplier;
                self.step(dt, speed, senses);
            }
        }

        events
    }

    fn update_vision<R: Rng + ?Sized>(
        &mut self,
        id: CombatantId,
        senses: &dyn Senses,
        effects: &mut dyn Effects,
        rng: &mut R,
        events: &mut Vec<AiEvent>,
    ) {
        let player = senses.player_position();
        let seen = self.vision.can_see(self.position, self.facing, player, senses);

        if seen {
            self.last_known_target = Some(player);
            if self.state != BehaviorState::Chasing {
                self.transition(BehaviorState::Chasing, events);
                self.wait_timer = 0.0;
                self.move_target = Some(player);
                effects.play_detection_sound(id, self.position);
                events.push(AiEvent::PlayerDetected { position: player });
            }
        } else if self.state == BehaviorState::Chasing {
            self.transition(BehaviorState::Searching, events);
            self.search_timer = self.profile.search_duration;
            self.move_target = Some(self.search_point(rng));
        }
    }

    fn tick_idle<R: Rng + ?Sized>(&mut self, dt: Seconds, senses: &dyn Senses, rng: &mut R) {
        if self.wait_timer > 0.0 {
            self.wait_timer = (self.wait_timer - dt).max(0.0);
            return;
        }

        if self.move_target.is_none() {
            let target = match self.state {
                BehaviorState::Guarding => {
                    random_point_in_radius(rng, self.guard_anchor, self.profile.guard_radius)
                }
                _ => random_point_in_radius(rng, self.position, self.profile.wander_radius),
            };
            self.move_target = Some(target);
        }

        match self.step(dt, self.profile.move_speed, senses) {
            MoveStatus::Moving => {}
            MoveStatus::Arrived => {
                self.move_target = None;
                self.wait_timer = idle_wait(rng, self.profile.idle_wait_mean);
            }
            // Pick another point next tick
            MoveStatus::Blocked => self.move_target = None,
        }
    }

    fn tick_search<R: Rng + ?Sized>(
        &mut self,
        dt: Seconds,
        senses: &dyn Senses,
        rng: &mut R,
        events: &mut Vec<AiEvent>,
    ) {
        if self.search_timer <= 0.0 {
            self.enter_idle(rng, events);
            return;
        }
        self.search_timer -= dt;

        if self.move_target.is_none() {
            self.move_target = Some(self.search_point(rng));
        }
        if self.step(dt, self.profile.move_speed, senses) != MoveStatus::Moving {
            self.move_target = Some(self.search_point(rng));
        }
    }

    fn search_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let center = self.last_known_target.unwrap_or(self.position);
        random_point_in_radius(rng, center, self.profile.search_radius)
    }

    /// Straight-line step toward the move target; the host's navmesh owns real paths
    fn step(&mut self, dt: Seconds, speed: f32, senses: &dyn Senses) -> MoveStatus {
        let Some(target) = self.move_target else {
            return MoveStatus::Arrived;
        };
        let to_target = target - self.position;
        let distance = to_target.length();
        if distance <= ARRIVAL_DISTANCE {
            return MoveStatus::Arrived;
        }

        let direction = to_target.normalize();
        let travel = speed * dt;
        let next = if travel >= distance {
            target
        } else {
            self.position + direction * travel
        };

        if !senses.is_on_ground(next) {
            return MoveStatus::Blocked;
        }
        self.position = next;
        self.facing = direction;

        if next.distance(&target) <= ARRIVAL_DISTANCE {
            MoveStatus::Arrived
        } else {
            MoveStatus::Moving
        }
    }

    /// React to a noise broadcast this tick
    pub fn hear(&mut self, id: CombatantId, event: &NoiseEvent, senses: &dyn Senses) -> Vec<AiEvent> {
        let mut events = Vec::new();
        if event.source == NoiseSource::Combatant(id) {
            return events;
        }
        if senses.is_battle_active()
            || !senses.is_player_visible()
            || !senses.is_on_ground(self.position)
        {
            return events;
        }
        if self.state == BehaviorState::Chasing {
            return events;
        }
        if self.state == BehaviorState::Guarding && !self.profile.is_guard {
            return events;
        }

        let Some(strength) = event.perceived_strength(self.position, self.profile.hearing_range) else {
            return events;
        };
        if strength < MIN_PERCEIVED_STRENGTH {
            return events;
        }

        tracing::debug!(
            "Heard noise {:.2} at ({:.1}, {:.1})",
            strength,
            event.position.x,
            event.position.y
        );
        events.push(AiEvent::NoiseHeard {
            position: event.position,
            strength,
        });
        self.transition(BehaviorState::Investigating, &mut events);
        self.wait_timer = 0.0;
        self.search_timer = 0.0;
        self.move_target = Some(event.position);
        events
    }
}
