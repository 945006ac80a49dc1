//! Survival AI - Headless skirmish runner
//!
//! Spawns a band of guards and wanderers on an open field, walks a player
//! past them, runs a short battle overlay and prints a JSON summary.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use survival_ai::ai::BehaviorState;
use survival_ai::combat::{ArmorDefinition, DamageType, Hit};
use survival_ai::core::{BehaviorProfile, Result, SimulationConfig, Vec2};
use survival_ai::perception::{NoiseEvent, NoiseSource};
use survival_ai::simulation::host::Wall;
use survival_ai::simulation::{Encounter, OpenField, RecordingEffects, SimulationEvent};

#[derive(Parser, Debug)]
#[command(name = "survival-ai")]
#[command(about = "Run a headless skirmish and print a JSON summary")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Real-time ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Simulation config (TOML); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 2)]
    guards: usize,

    #[arg(long, default_value_t = 3)]
    wanderers: usize,

    /// Battle turns fought halfway through the run
    #[arg(long, default_value_t = 5)]
    turns: u32,
}

#[derive(Serialize)]
struct CombatantSummary {
    name: String,
    health: f32,
    max_health: f32,
    state: BehaviorState,
    injuries: usize,
    defeated: bool,
}

#[derive(Serialize, Default)]
struct SkirmishSummary {
    seed: u64,
    ticks: u32,
    detections: usize,
    noises_heard: usize,
    state_changes: usize,
    hits: usize,
    defeats: usize,
    loot_containers: usize,
    combatants: Vec<CombatantSummary>,
}

/// Player walking speed, units per second
const PLAYER_SPEED: f32 = 1.5;
/// Ticks between footstep noises
const FOOTSTEP_INTERVAL: u32 = 20;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("survival_ai=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    // load_from_toml validates
    let config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path).map_err(|e| {
            tracing::warn!("Rejected config {}: {}", path.display(), e);
            e
        })?,
        None => SimulationConfig::default(),
    };

    tracing::info!("Skirmish starting (seed {})", seed);

    let mut encounter = Encounter::new(config.clone(), seed);
    let guard_profile = BehaviorProfile {
        is_guard: true,
        ..config.ai.clone()
    };
    for i in 0..args.guards {
        let id = encounter.spawn_with_profile(
            &format!("Guard {}", i + 1),
            guard_profile.clone(),
            Vec2::new(10.0 + i as f32 * 4.0, 6.0),
        );
        if let Some(guard) = encounter.get_mut(id) {
            guard.armor.equip(ArmorDefinition::gambeson());
            guard.armor.equip(ArmorDefinition::breastplate());
            guard.armor.equip(ArmorDefinition::kettle_helm());
        }
    }
    for i in 0..args.wanderers {
        let id = encounter.spawn(&format!("Scavenger {}", i + 1), Vec2::new(-5.0 + i as f32 * 6.0, -8.0));
        if let Some(scavenger) = encounter.get_mut(id) {
            scavenger.armor.equip(ArmorDefinition::gambeson());
        }
    }

    let mut field = OpenField::new(Vec2::new(-30.0, 0.0));
    field.bounds = Some(Wall::new(Vec2::new(-50.0, -50.0), Vec2::new(50.0, 50.0)));
    field.add_wall(Vec2::new(0.0, 2.0), Vec2::new(2.0, 12.0));

    let mut effects = RecordingEffects::default();
    let mut script_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        field.player = field.player + Vec2::new(PLAYER_SPEED * args.dt, 0.0);

        if tick % FOOTSTEP_INTERVAL == 0 {
            encounter.emit_noise(NoiseEvent::new(field.player, 3.0, 2.0, NoiseSource::Player));
        }

        if tick == args.ticks / 2 {
            field.battle_active = true;
            fight(&mut encounter, args.turns, &mut script_rng, &mut effects)?;
            field.battle_active = false;
        }

        encounter.tick(args.dt, &field, &mut effects);
        events.extend(encounter.drain_events());
    }
    events.extend(encounter.drain_events());

    let mut summary = SkirmishSummary {
        seed,
        ticks: args.ticks,
        loot_containers: encounter.loot().len(),
        ..Default::default()
    };
    for event in &events {
        match event {
            SimulationEvent::PlayerDetected { .. } => summary.detections += 1,
            SimulationEvent::NoiseHeard { .. } => summary.noises_heard += 1,
            SimulationEvent::StateChanged { .. } => summary.state_changes += 1,
            SimulationEvent::HitResolved { .. } => summary.hits += 1,
            SimulationEvent::CombatantDefeated { .. } => summary.defeats += 1,
            _ => {}
        }
    }
    summary.combatants = encounter
        .combatants()
        .iter()
        .map(|c| CombatantSummary {
            name: c.name().to_string(),
            health: c.health(),
            max_health: c.max_health(),
            state: c.state(),
            injuries: c.injuries.len(),
            defeated: c.is_defeated(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Turn-based overlay: the player swings at a random living combatant each turn
fn fight(
    encounter: &mut Encounter,
    turns: u32,
    rng: &mut ChaCha8Rng,
    effects: &mut RecordingEffects,
) -> Result<()> {
    for turn in 0..turns {
        let targets: Vec<_> = encounter.living().map(|c| c.id()).collect();
        if targets.is_empty() {
            break;
        }
        let target = targets[rng.gen_range(0..targets.len())];
        let damage_type = DamageType::all()[rng.gen_range(0..3)];
        let raw = rng.gen_range(8.0..30.0);

        let outcome = encounter.strike(target, &Hit::new(damage_type, raw), effects)?;
        tracing::info!(
            "Turn {}: {:?} hit on {:?} for {:.1} ({:.1} absorbed)",
            turn + 1,
            damage_type,
            outcome.part,
            outcome.net_damage,
            outcome.mitigation
        );
        encounter.advance_turn(effects);
    }
    Ok(())
}
