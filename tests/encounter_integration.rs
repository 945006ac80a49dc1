//! Encounter integration tests
//!
//! End-to-end runs through the public API: perception, armor wear, injuries,
//! defeat handling and save/restore determinism.

use survival_ai::ai::BehaviorState;
use survival_ai::combat::{
    Anatomy, ArmorDefinition, ArmorLayer, ArmorSlot, BodyPart, DamageType, EquippedArmor, Hit,
    InjuryModel, InjuryType, SlotDefense,
};
use survival_ai::core::{BehaviorProfile, InjuryConfig, SimulationConfig, Vec2, WoundPolicy};
use survival_ai::entity::CombatantSnapshot;
use survival_ai::perception::{NoiseEvent, NoiseSource};
use survival_ai::simulation::{Encounter, Notification, OpenField, RecordingEffects, SimulationEvent};

fn no_wounds() -> SimulationConfig {
    SimulationConfig {
        wound_policy: WoundPolicy {
            base_chance: 0.0,
            chance_per_damage: 0.0,
            ..WoundPolicy::default()
        },
        ..SimulationConfig::default()
    }
}

/// Player far out of sight so only noise matters
fn distant_player() -> OpenField {
    OpenField::new(Vec2::new(400.0, 400.0))
}

#[test]
fn test_noise_at_twelve_units_triggers_investigation() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 42);
    let id = encounter.spawn("Scavenger", Vec2::ZERO);
    let field = distant_player();
    let mut effects = RecordingEffects::default();

    // hearing 5 + strength 10 = 15 effective; perceived 10 * (1 - 12/15) = 2
    encounter.emit_noise(NoiseEvent::new(Vec2::new(0.0, 12.0), 10.0, 3.0, NoiseSource::Player));
    encounter.tick(0.1, &field, &mut effects);

    let combatant = encounter.get(id).unwrap();
    assert_eq!(combatant.state(), BehaviorState::Investigating);
    assert_eq!(combatant.ai().move_target(), Some(Vec2::new(0.0, 12.0)));

    let heard: Vec<_> = encounter
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            SimulationEvent::NoiseHeard { strength, .. } => Some(strength),
            _ => None,
        })
        .collect();
    assert_eq!(heard.len(), 1);
    assert!((heard[0] - 2.0).abs() < 1e-4);
}

#[test]
fn test_noise_heard_only_on_its_tick() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 42);
    let id = encounter.spawn("Scavenger", Vec2::ZERO);
    let field = distant_player();
    let mut effects = RecordingEffects::default();

    encounter.emit_noise(NoiseEvent::new(Vec2::new(0.0, 12.0), 10.0, 3.0, NoiseSource::Player));
    encounter.tick(0.1, &field, &mut effects);
    encounter.drain_events();

    // Put it back to idle; the old noise must not pull it away again
    encounter.get_mut(id).unwrap().ai_mut().set_state(BehaviorState::Wandering);
    encounter.tick(0.1, &field, &mut effects);
    let reheard = encounter
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimulationEvent::NoiseHeard { .. }));
    assert!(!reheard);
}

#[test]
fn test_own_noise_is_ignored() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 42);
    let id = encounter.spawn("Scavenger", Vec2::ZERO);
    let field = distant_player();

    encounter.emit_noise(NoiseEvent::new(Vec2::new(1.0, 0.0), 10.0, 1.0, NoiseSource::Combatant(id)));
    encounter.tick(0.1, &field, &mut RecordingEffects::default());
    assert_eq!(encounter.get(id).unwrap().state(), BehaviorState::Wandering);
}

#[test]
fn test_chase_search_and_return() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 7);
    let id = encounter.spawn_with_profile("Sentry", BehaviorProfile::guard(), Vec2::ZERO);
    let mut field = OpenField::new(Vec2::new(5.0, 0.0));
    let mut effects = RecordingEffects::default();

    for _ in 0..10 {
        encounter.tick(0.1, &field, &mut effects);
    }
    assert_eq!(encounter.get(id).unwrap().state(), BehaviorState::Chasing);
    assert_eq!(effects.detection_sounds, vec![id]);

    // Player vanishes far behind it
    field.player = Vec2::new(-40.0, 0.0);
    encounter.tick(0.5, &field, &mut effects);
    let sentry = encounter.get(id).unwrap();
    assert_eq!(sentry.state(), BehaviorState::Searching);
    assert_eq!(sentry.ai().last_known_target(), Some(Vec2::new(5.0, 0.0)));

    let mut ticks = 0;
    while encounter.get(id).unwrap().state() == BehaviorState::Searching {
        encounter.tick(0.5, &field, &mut effects);
        ticks += 1;
        assert!(ticks <= 25, "search never ended");
    }
    assert_eq!(encounter.get(id).unwrap().state(), BehaviorState::Guarding);
    assert_eq!(effects.detection_sounds.len(), 1);
}

#[test]
fn test_stealth_resets_alert_state() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 7);
    let id = encounter.spawn_with_profile("Sentry", BehaviorProfile::guard(), Vec2::ZERO);
    let mut field = OpenField::new(Vec2::new(5.0, 0.0));
    let mut effects = RecordingEffects::default();

    encounter.tick(0.1, &field, &mut effects);
    assert_eq!(encounter.get(id).unwrap().state(), BehaviorState::Chasing);

    field.player_visible = false;
    encounter.tick(0.1, &field, &mut effects);
    assert_eq!(encounter.get(id).unwrap().state(), BehaviorState::Guarding);
}

#[test]
fn test_wall_blocks_detection() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 7);
    let id = encounter.spawn_with_profile("Sentry", BehaviorProfile::guard(), Vec2::ZERO);
    let mut field = OpenField::new(Vec2::new(6.0, 0.0));
    field.add_wall(Vec2::new(3.0, -2.0), Vec2::new(4.0, 2.0));
    let mut effects = RecordingEffects::default();

    encounter.tick(0.1, &field, &mut effects);
    assert_ne!(encounter.get(id).unwrap().state(), BehaviorState::Chasing);
    assert!(effects.detection_sounds.is_empty());
}

#[test]
fn test_worn_armor_example() {
    let mut encounter = Encounter::new(no_wounds(), 3);
    let id = encounter.spawn("Bandit", Vec2::ZERO);
    let piece = {
        let bandit = encounter.get_mut(id).unwrap();
        bandit.anatomy = Anatomy::unprotected();
        let plate = ArmorDefinition::new(
            "test_plate",
            "Test Plate",
            ArmorLayer::Plate,
            ArmorSlot::TORSO,
            SlotDefense::new(0.0, 20.0, 0.0),
            100.0,
        );
        bandit
            .armor
            .equip_piece(EquippedArmor::with_durability(plate, 50.0))
            .0
    };
    let mut effects = RecordingEffects::default();

    let hit = Hit::new(DamageType::Pierce, 30.0).at(BodyPart::Torso);
    let first = encounter.strike(id, &hit, &mut effects).unwrap();
    assert!((first.mitigation - 10.0).abs() < 1e-4);
    assert!((first.net_damage - 20.0).abs() < 1e-4);

    let bandit = encounter.get(id).unwrap();
    assert!((bandit.armor.get(piece).unwrap().durability - 49.0).abs() < 1e-4);
    let preview = bandit
        .armor
        .protection(BodyPart::Torso, DamageType::Pierce, &bandit.anatomy);
    assert!((preview - 9.8).abs() < 1e-4);

    let second = encounter.strike(id, &hit, &mut effects).unwrap();
    assert!((second.mitigation - 9.8).abs() < 1e-4);
}

#[test]
fn test_layers_stack_across_pieces() {
    let mut encounter = Encounter::new(no_wounds(), 3);
    let id = encounter.spawn("Knight", Vec2::ZERO);
    {
        let knight = encounter.get_mut(id).unwrap();
        knight.anatomy = Anatomy::unprotected();
        knight.armor.equip(ArmorDefinition::gambeson());
        knight.armor.equip(ArmorDefinition::hauberk());
        knight.armor.equip(ArmorDefinition::breastplate());
    }
    let knight = encounter.get(id).unwrap();
    // gambeson 3 + hauberk 10 + breastplate 18
    let slash = knight
        .armor
        .protection(BodyPart::Torso, DamageType::Slash, &knight.anatomy);
    assert!((slash - 31.0).abs() < 1e-4);
    // only the gambeson reaches the shoulders
    let shoulders = knight
        .armor
        .protection(BodyPart::Shoulders, DamageType::Slash, &knight.anatomy);
    assert!((shoulders - 3.0).abs() < 1e-4);
}

#[test]
fn test_healing_example_removes_on_fortieth_second() {
    let config = InjuryConfig::default();
    let mut injuries = InjuryModel::new();
    injuries.add_with_rate(BodyPart::Arms, InjuryType::Cut, 40.0, 1.0);

    for second in 1..=40 {
        let tick = injuries.tick(1.0, &config);
        if second < 40 {
            assert_eq!(injuries.len(), 1, "removed early at {}", second);
            assert!(tick.healed.is_empty());
        } else {
            assert!(injuries.is_empty());
            assert_eq!(tick.healed.len(), 1);
        }
    }
}

#[test]
fn test_bleed_out_leaves_loot_and_one_death() {
    let mut encounter = Encounter::new(SimulationConfig::default(), 9);
    let id = encounter.spawn("Bandit", Vec2::new(3.0, 4.0));
    {
        let bandit = encounter.get_mut(id).unwrap();
        bandit.armor.equip(ArmorDefinition::kettle_helm());
        bandit.set_health(1.0);
        bandit
            .injuries
            .add_with_rate(BodyPart::Neck, InjuryType::Cut, 100.0, 0.0);
    }
    let field = distant_player();
    let mut effects = RecordingEffects::default();

    for _ in 0..5 {
        encounter.tick(1.0, &field, &mut effects);
    }

    let deaths: Vec<_> = effects
        .notifications
        .iter()
        .filter(|n| matches!(n, Notification::Death { .. }))
        .collect();
    assert_eq!(deaths.len(), 1);

    let loot = encounter.loot();
    assert_eq!(loot.len(), 1);
    assert_eq!(loot[0].source, id);
    assert_eq!(loot[0].armor.len(), 1);
    assert!(encounter.get(id).unwrap().armor.is_empty());

    let defeats = encounter
        .drain_events()
        .iter()
        .filter(|e| matches!(e, SimulationEvent::CombatantDefeated { .. }))
        .count();
    assert_eq!(defeats, 1);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed: u64| {
        let mut encounter = Encounter::new(SimulationConfig::default(), seed);
        let a = encounter.spawn("A", Vec2::ZERO);
        let b = encounter.spawn_with_profile("B", BehaviorProfile::guard(), Vec2::new(8.0, 8.0));
        let field = distant_player();
        let mut effects = RecordingEffects::default();
        let mut trace = Vec::new();
        for _ in 0..300 {
            encounter.tick(0.1, &field, &mut effects);
            trace.push((encounter.position(a).unwrap(), encounter.position(b).unwrap()));
        }
        trace
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn test_restored_combatant_replays_identically() {
    let field = distant_player();

    let mut original = Encounter::new(SimulationConfig::default(), 21);
    let id = original.spawn_with_profile("Sentry", BehaviorProfile::guard(), Vec2::new(2.0, 2.0));
    original.get_mut(id).unwrap().ai_mut().set_state(BehaviorState::Searching);
    let json = original.get(id).unwrap().snapshot().to_json().unwrap();

    let mut resumed = Encounter::new(SimulationConfig::default(), 21);
    let other = resumed.spawn_with_profile("Sentry", BehaviorProfile::guard(), Vec2::new(2.0, 2.0));
    let snapshot = CombatantSnapshot::from_json(&json).unwrap();
    resumed.get_mut(other).unwrap().restore(&snapshot);
    assert!(resumed.get(id).is_some());

    let mut effects_a = RecordingEffects::default();
    let mut effects_b = RecordingEffects::default();
    for _ in 0..200 {
        original.tick(0.1, &field, &mut effects_a);
        resumed.tick(0.1, &field, &mut effects_b);
        let a = original.get(id).unwrap();
        let b = resumed.get(id).unwrap();
        assert_eq!(a.state(), b.state());
        assert_eq!(a.position(), b.position());
    }
}
