//! Tests for the simulation engine, wave scheduling, squadrons and systems.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wingstorm_core::commands::PlayerCommand;
use wingstorm_core::components::{Gunnery, Projectile, Roam};
use wingstorm_core::config::GameSettings;
use wingstorm_core::constants::DT;
use wingstorm_core::enums::*;
use wingstorm_core::events::SimEvent;
use wingstorm_core::types::{Position, Velocity};

use crate::clock::FixedStep;
use crate::combat::{self, FiredBy};
use crate::engine::{SimConfig, SimulationEngine};
use crate::spawner::IndependentSpawner;
use crate::systems;
use crate::wave::{self, Wave};
use crate::world_setup;

/// Drives a single wave the way the engine does, without the engine.
struct Harness {
    world: World,
    rng: ChaCha8Rng,
    events: Vec<SimEvent>,
    tick: u64,
    settings: GameSettings,
    despawn_buffer: Vec<hecs::Entity>,
}

impl Harness {
    fn new(seed: u64) -> Self {
        Self::with_settings(seed, GameSettings::default())
    }

    fn with_settings(seed: u64, settings: GameSettings) -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
            tick: 0,
            settings,
            despawn_buffer: Vec::new(),
        }
    }

    fn now(&self) -> f64 {
        self.tick as f64 * DT
    }

    fn wave(&mut self, wave_number: u32, difficulty: Difficulty) -> Wave {
        let now = self.now();
        Wave::new(wave_number, difficulty, now, &self.settings, &mut self.rng)
    }

    fn step(&mut self, wave: &mut Wave) {
        let now = self.now();
        wave.tick(now, &mut self.world, &mut self.rng, &mut self.events);
        systems::craft::run(&mut self.world, &mut self.rng, now, &self.settings.arena);
        systems::projectile::run(&mut self.world, &self.settings.arena);
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        self.tick += 1;
    }
}

fn started_engine(seed: u64, difficulty: Difficulty) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame { difficulty });
    engine
}

fn short_wave_settings() -> GameSettings {
    let mut settings = GameSettings::default();
    settings.wave.base_duration_secs = 12.0;
    settings.wave.min_duration_secs = 5.0;
    settings
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = started_engine(12345, Difficulty::Veteran);
    let mut engine_b = started_engine(12345, Difficulty::Veteran);

    for _ in 0..2000 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = started_engine(111, Difficulty::Newbie);
    let mut engine_b = started_engine(222, Difficulty::Newbie);

    let mut diverged = false;
    for _ in 0..600 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Engine lifecycle ----

#[test]
fn test_tick_timing_60_ticks_one_second() {
    let mut engine = started_engine(1, Difficulty::Newbie);
    for _ in 0..60 {
        engine.tick();
    }

    assert_eq!(engine.time().tick, 60);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "60 ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started_engine(1, Difficulty::Newbie);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10);
    assert_eq!(engine.phase(), GamePhase::Active);

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10, "Time should not advance while paused");
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 20);
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_start_game_phase_gating() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::MainMenu);
    assert!(snap.wave.is_none());
    assert_eq!(engine.time().tick, 0, "Menu must not advance time");

    engine.queue_command(PlayerCommand::StartGame {
        difficulty: Difficulty::Impossible,
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.difficulty, Difficulty::Impossible);
    assert_eq!(snap.wave.as_ref().map(|w| w.wave_number), Some(1));

    // Starting again mid-run is ignored
    engine.queue_command(PlayerCommand::StartGame {
        difficulty: Difficulty::Newbie,
    });
    engine.tick();
    assert_eq!(engine.difficulty(), Difficulty::Impossible);
}

#[test]
fn test_return_to_menu_clears_field() {
    let mut engine = started_engine(5, Difficulty::Newbie);
    for _ in 0..300 {
        engine.tick();
    }
    assert!(engine.world().len() > 0);

    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::MainMenu);
    assert!(snap.enemies.is_empty());
    assert!(snap.projectiles.is_empty());
    assert!(engine.wave().is_none());
    assert_eq!(engine.world().len(), 0);
}

#[test]
fn test_set_time_scale() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 2.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 2.0);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 100.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 4.0);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: -1.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 0.0);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: f64::NAN });
    engine.tick();
    assert_eq!(engine.time_scale(), 1.0);
}

#[test]
fn test_first_tick_announces_wave_one() {
    let mut engine = started_engine(9, Difficulty::Newbie);
    let snap = engine.tick();
    assert!(snap.events.contains(&SimEvent::WaveStarted {
        wave_number: 1,
        squads: 4
    }));
    // Events are delivered once
    assert!(engine.tick().events.is_empty());
}

#[test]
fn test_snapshot_lists_spawned_enemies() {
    let mut engine = started_engine(21, Difficulty::Veteran);
    let mut snap = engine.tick();
    for _ in 0..300 {
        snap = engine.tick();
    }
    assert!(!snap.enemies.is_empty(), "Squads should have spawned by 5s");

    let mut ids: Vec<u64> = snap.enemies.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), snap.enemies.len(), "Enemy ids must be unique");

    let wave = snap.wave.as_ref().unwrap();
    let spawned_members: u32 = wave
        .squads
        .iter()
        .filter(|s| s.spawned)
        .map(|s| s.members_alive)
        .sum();
    assert!(spawned_members > 0);
}

#[test]
fn test_timed_out_wave_retires_and_settles() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 77,
        settings: short_wave_settings(),
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::StartGame {
        difficulty: Difficulty::Newbie,
    });

    let mut ended_at = None;
    for _ in 0..(15 * 60) {
        let snap = engine.tick();
        if snap.events.contains(&SimEvent::WaveEnded {
            wave_number: 1,
            reason: WaveEndReason::Timeout,
        }) {
            assert!(snap.events.iter().any(|e| matches!(
                e,
                SimEvent::WaveStarted { wave_number: 2, .. }
            )));
            ended_at = Some(engine.time().tick);
            break;
        }
    }
    assert!(ended_at.is_some(), "Wave 1 should time out after 11s");
    assert_eq!(engine.wave().map(|w| w.wave_number()), Some(2));

    let mut settled = false;
    for _ in 0..200 {
        engine.tick();
        if engine.retiring_waves().is_empty() {
            settled = true;
            break;
        }
    }
    assert!(settled, "Escaping members should all leave within 200 ticks");
}

// ---- Wave schedule ----

#[test]
fn test_opening_wave_has_four_squads() {
    let mut h = Harness::new(3);
    let wave = h.wave(1, Difficulty::Newbie);
    assert_eq!(wave.squads().len(), 4);
    assert!((wave.duration() - 39.0).abs() < 1e-9);
}

#[test]
fn test_squad_count_schedule() {
    let settings = GameSettings::default();
    let tuning = &settings.wave;
    let newbie = settings.difficulty.get(Difficulty::Newbie);
    let impossible = settings.difficulty.get(Difficulty::Impossible);

    assert_eq!(wave::squad_count(1, newbie, tuning), 4);
    assert_eq!(wave::squad_count(2, newbie, tuning), 5);
    assert_eq!(wave::squad_count(3, newbie, tuning), 5);
    assert_eq!(wave::squad_count(4, newbie, tuning), 4);
    assert_eq!(wave::squad_count(9, newbie, tuning), 6);
    assert_eq!(wave::squad_count(30, newbie, tuning), 7);

    assert_eq!(wave::squad_count(1, impossible, tuning), 5);
    assert_eq!(wave::squad_count(3, impossible, tuning), 7);
    assert_eq!(wave::squad_count(12, impossible, tuning), 9);
}

#[test]
fn test_duration_schedule() {
    let tuning = GameSettings::default().wave;
    assert!((wave::duration_secs(1, &tuning) - 39.0).abs() < 1e-9);
    assert!((wave::duration_secs(20, &tuning) - 20.0).abs() < 1e-9);
    assert!((wave::duration_secs(30, &tuning) - 15.0).abs() < 1e-9);
    assert!((wave::duration_secs(500, &tuning) - 15.0).abs() < 1e-9);
}

#[test]
fn test_wave_construction_reproducible() {
    for (wave_number, difficulty) in [
        (1, Difficulty::Newbie),
        (4, Difficulty::Veteran),
        (11, Difficulty::Impossible),
    ] {
        let mut a = Harness::new(99);
        let mut b = Harness::new(99);
        let wave_a = a.wave(wave_number, difficulty);
        let wave_b = b.wave(wave_number, difficulty);

        assert_eq!(wave_a.squads().len(), wave_b.squads().len());
        assert_eq!(wave_a.duration(), wave_b.duration());
        for (sa, sb) in wave_a.squads().iter().zip(wave_b.squads()) {
            assert_eq!(sa.spawn_delay_secs(), sb.spawn_delay_secs());
            assert_eq!(sa.formation(), sb.formation());
            assert_eq!(sa.style(), sb.style());
            assert_eq!(sa.member_count(), sb.member_count());
        }
    }
}

#[test]
fn test_spawn_gaps_accumulate() {
    let mut h = Harness::new(4);
    let wave = h.wave(1, Difficulty::Newbie);
    let mut previous = 0.0;
    for squad in wave.squads() {
        let gap = squad.spawn_delay_secs() - previous;
        assert!((1.0..=1.6).contains(&gap), "opening gap {gap}");
        previous = squad.spawn_delay_secs();
    }

    let wave = h.wave(1, Difficulty::Impossible);
    let mut previous = 0.0;
    for squad in wave.squads() {
        let gap = squad.spawn_delay_secs() - previous;
        assert!(gap >= 1.0 / 1.22 - 1e-9 && gap <= 1.6 / 1.22 + 1e-9, "dense gap {gap}");
        previous = squad.spawn_delay_secs();
    }
}

#[test]
fn test_squad_config_scales_with_wave() {
    let mut h = Harness::new(8);
    let early = h.wave(1, Difficulty::Newbie);
    assert!(early.squads().iter().all(|s| s.member_count() == 1));
    assert!(early.squads().iter().all(|s| s.move_speed() == 5.0));

    let late = h.wave(12, Difficulty::Newbie);
    assert!(late.squads().iter().all(|s| s.member_count() == 5));
    assert!(late.squads().iter().all(|s| s.move_speed() == 8.0));
}

// ---- Squadron lifecycle ----

#[test]
fn test_enter_completes_before_patrol() {
    let mut h = Harness::new(2024);
    let mut wave = h.wave(1, Difficulty::Newbie);
    let count = wave.squads().len();
    assert_eq!(count, 4);

    let mut spawned_at: Vec<Option<f64>> = vec![None; count];
    let mut landed = vec![false; count];

    for _ in 0..(12 * 60) {
        h.step(&mut wave);
        for (i, squad) in wave.squads().iter().enumerate() {
            if squad.is_spawned() && spawned_at[i].is_none() {
                spawned_at[i] = Some(squad.phase_started_at());
            }
            if landed[i] || !squad.is_spawned() || squad.phase() == SquadPhase::Enter {
                continue;
            }
            landed[i] = true;
            assert_eq!(squad.phase(), SquadPhase::Patrol);
            assert_eq!(squad.entry_progress(), Some(1.0));
            let enter_secs = squad.phase_started_at() - spawned_at[i].unwrap();
            assert!(enter_secs >= 0.45 - 1e-9, "squad {i} left ENTER after {enter_secs}s");
            assert!(squad.anchor().y >= 0.0);
        }
    }
    assert!(landed.iter().all(|&l| l), "every squad should land: {landed:?}");
}

#[test]
fn test_spawn_atomicity() {
    let mut h = Harness::new(31);
    let mut wave = h.wave(5, Difficulty::Newbie);
    let (w, height) = (h.settings.arena.screen_width, h.settings.arena.screen_height);

    let mut checked = 0;
    let mut was_spawned = vec![false; wave.squads().len()];
    for _ in 0..(20 * 60) {
        h.step(&mut wave);
        for (i, squad) in wave.squads().iter().enumerate() {
            if !squad.is_spawned() {
                assert!(squad.enemies().is_empty());
                continue;
            }
            if was_spawned[i] {
                continue;
            }
            was_spawned[i] = true;
            checked += 1;

            assert_eq!(squad.enemies().len(), squad.member_count());
            assert_eq!(squad.member_count(), 3);
            for &member in squad.enemies() {
                let bounds = combat::bounding_box(&h.world, member).unwrap();
                assert!(
                    bounds.is_outside_screen(w, height),
                    "member visible on spawn tick: {bounds:?}"
                );
            }
        }
    }
    assert_eq!(checked, wave.squads().len());
}

#[test]
fn test_anchor_stays_inside_padding_after_entry() {
    for seed in [1, 2, 3] {
        let mut h = Harness::new(seed);
        let mut wave = h.wave(6, Difficulty::Impossible);
        for _ in 0..(30 * 60) {
            h.step(&mut wave);
            for squad in wave.squads() {
                if !squad.is_spawned() || squad.phase() == SquadPhase::Enter {
                    continue;
                }
                let x = squad.anchor().x;
                assert!((50.0..=750.0).contains(&x), "seed {seed}: anchor x {x}");
            }
        }
    }
}

#[test]
fn test_narrow_arena_keeps_anchor_on_field() {
    let mut settings = GameSettings::default();
    settings.arena.screen_width = 300.0;
    settings.validate().unwrap();

    for seed in [5, 6, 7] {
        let mut h = Harness::with_settings(seed, settings.clone());
        let mut wave = h.wave(1, Difficulty::Newbie);
        let mut last_x: Vec<Option<f64>> = vec![None; wave.squads().len()];

        for _ in 0..(20 * 60) {
            h.step(&mut wave);
            for (i, squad) in wave.squads().iter().enumerate() {
                if !squad.is_spawned() || squad.has_exited() {
                    continue;
                }
                let x = squad.anchor().x;
                assert!(
                    (50.0..=250.0).contains(&x),
                    "seed {seed}: squad {i} anchor x {x} in {:?}",
                    squad.phase()
                );
                if let Some(prev) = last_x[i] {
                    assert!(
                        (x - prev).abs() <= 12.0,
                        "seed {seed}: squad {i} jumped {prev} -> {x}"
                    );
                }
                last_x[i] = Some(x);
            }
        }
        assert!(last_x.iter().all(Option::is_some), "every squad should spawn");
    }
}

#[test]
fn test_dive_state_only_for_fighters() {
    let mut h = Harness::new(55);
    let mut wave = h.wave(12, Difficulty::Newbie);
    for _ in 0..(10 * 60) {
        h.step(&mut wave);
    }
    for squad in wave.squads().iter().filter(|s| s.is_spawned()) {
        assert_eq!(squad.dives().len(), squad.enemies().len());
        for (slot, &member) in squad.enemies().iter().enumerate() {
            let kind = h.world.get::<&wingstorm_core::components::Craft>(member).unwrap().kind;
            assert_eq!(squad.dives()[slot].is_some(), kind.can_dive());
        }
    }
}

#[test]
fn test_escape_completeness() {
    let mut h = Harness::with_settings(404, short_wave_settings());
    let mut wave = h.wave(1, Difficulty::Veteran);

    while !wave.is_wave_over() {
        h.step(&mut wave);
        assert!(h.now() < 12.0, "wave should time out at 11s");
    }
    assert_eq!(wave.end_reason(), Some(WaveEndReason::Timeout));

    let spawned_before = wave.squads().iter().filter(|s| s.is_spawned()).count();
    let spawns_before = wave.spawner().spawned_count();

    let mut settled_after = None;
    for tick in 0..200 {
        if wave.is_settled(&h.world) {
            settled_after = Some(tick);
            break;
        }
        for entity in wave.all_enemies() {
            if combat::is_alive(&h.world, entity) {
                assert_eq!(combat::behavior(&h.world, entity), Some(Behavior::Escaping));
            }
        }
        h.step(&mut wave);
    }
    assert!(settled_after.is_some(), "escapers should be gone within 200 ticks");
    assert_eq!(
        wave.squads().iter().filter(|s| s.is_spawned()).count(),
        spawned_before,
        "no squad spawns after timeout"
    );
    assert_eq!(wave.spawner().spawned_count(), spawns_before);

    wave.despawn(&mut h.world);
    assert!(wave.all_enemies().is_empty());
}

#[test]
fn test_wave_cleared_when_everything_dies() {
    let mut h = Harness::new(17);
    let mut wave = h.wave(1, Difficulty::Newbie);

    // All four squads spawn by 6.4s; newbie wave 1 has a single independent at 1.2s
    for _ in 0..(7 * 60) {
        h.step(&mut wave);
    }
    assert!(wave.squads().iter().all(|s| s.is_spawned()));
    assert_eq!(wave.spawner().spawned_count(), 1);

    for entity in wave.all_enemies() {
        combat::force_kill(&mut h.world, entity);
    }
    h.step(&mut wave);

    assert_eq!(wave.end_reason(), Some(WaveEndReason::Cleared));
    assert!(h.events.iter().any(|e| matches!(
        e,
        SimEvent::WaveEnded {
            wave_number: 1,
            reason: WaveEndReason::Cleared
        }
    )));
}

// ---- Independent spawns ----

#[test]
fn test_dead_spawn_retained_until_shots_expire() {
    let settings = GameSettings::default();
    let profile = settings.difficulty.get(Difficulty::Newbie);
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut spawner = IndependentSpawner::new(1, 0.0, profile);

    let gunnery = world_setup::gunnery_for(1, profile, 0.0);
    let roam = Roam {
        home_x: 400.0,
        home_y: 90.0,
        phase_offset: 0.0,
        spawned_at: 0.0,
    };
    let bee = world_setup::spawn_bee(&mut world, 1, glam::DVec2::new(400.0, 90.0), gunnery, roam);
    spawner.adopt(bee);

    let bounds = combat::bounding_box(&world, bee).unwrap();
    let shot_a = world_setup::spawn_enemy_bullet(&mut world, bee, bounds);
    let shot_b = world_setup::spawn_enemy_bullet(&mut world, bee, bounds);
    assert_eq!(combat::live_shots_from(&world, bee), 2);

    combat::force_kill(&mut world, bee);
    let tick = |spawner: &mut IndependentSpawner, world: &mut World, rng: &mut ChaCha8Rng| {
        spawner.tick(5.0, true, world, rng, &settings.arena, &settings.wave);
    };

    tick(&mut spawner, &mut world, &mut rng);
    assert_eq!(spawner.spawns(), &[bee], "retained while two shots are live");

    world.get::<&mut Projectile>(shot_a).unwrap().alive = false;
    tick(&mut spawner, &mut world, &mut rng);
    assert_eq!(spawner.spawns(), &[bee], "retained while one shot is live");

    world.get::<&mut Projectile>(shot_b).unwrap().alive = false;
    tick(&mut spawner, &mut world, &mut rng);
    assert!(spawner.spawns().is_empty());
    assert!(!world.contains(bee));
}

#[test]
fn test_independent_spawn_cadence() {
    let mut h = Harness::new(12);
    let mut wave = h.wave(8, Difficulty::Impossible);
    assert_eq!(wave.spawner().max_spawns(), 5, "1 + min(2, 8/4) + 2");

    for _ in 0..70 {
        h.step(&mut wave);
    }
    assert_eq!(wave.spawner().spawned_count(), 0, "first spawn waits 1.2s");
    for _ in 0..4 {
        h.step(&mut wave);
    }
    assert_eq!(wave.spawner().spawned_count(), 1);

    // Interval is [1.6, 2.5] trimmed by 0.06 * 8
    let next_gap = wave.spawner().next_spawn_at() - h.now();
    assert!(next_gap > 1.0 && next_gap < 2.1, "gap {next_gap}");

    for &bee in wave.independent_spawns() {
        let pos = combat::position(&h.world, bee).unwrap();
        assert!((50.0..=750.0).contains(&pos.x));
        assert!((40.0..=140.0).contains(&pos.y));
    }
}

// ---- Entity contract and craft systems ----

#[test]
fn test_damage_and_idempotent_force_kill() {
    let mut world = World::new();
    let profile = GameSettings::default().difficulty.newbie;
    let gunnery = world_setup::gunnery_for(1, &profile, 0.0);
    let jelly = world_setup::spawn_squad_member(
        &mut world,
        CraftKind::Jellyfish,
        1,
        glam::DVec2::new(100.0, 100.0),
        gunnery,
    );

    assert!(!combat::apply_damage(&mut world, jelly, 1));
    assert!(combat::is_alive(&world, jelly));
    assert!(combat::apply_damage(&mut world, jelly, 1));
    assert!(!combat::is_alive(&world, jelly));

    combat::force_kill(&mut world, jelly);
    combat::force_kill(&mut world, jelly);
    assert!(!combat::apply_damage(&mut world, jelly, 1));

    world.despawn(jelly).unwrap();
    combat::force_kill(&mut world, jelly);
    assert!(!combat::is_alive(&world, jelly));
    assert!(combat::bounding_box(&world, jelly).is_none());
}

#[test]
fn test_only_projectiles_carry_velocity() {
    let mut world = World::new();
    let profile = GameSettings::default().difficulty.newbie;
    let gunnery = world_setup::gunnery_for(1, &profile, 0.0);
    let fighter = world_setup::spawn_squad_member(
        &mut world,
        CraftKind::Fighter,
        1,
        glam::DVec2::new(100.0, 100.0),
        gunnery,
    );
    let roam = Roam {
        home_x: 300.0,
        home_y: 90.0,
        phase_offset: 0.0,
        spawned_at: 0.0,
    };
    let bee = world_setup::spawn_bee(&mut world, 1, glam::DVec2::new(300.0, 90.0), gunnery, roam);
    let bounds = combat::bounding_box(&world, fighter).unwrap();
    let shot = world_setup::spawn_enemy_bullet(&mut world, fighter, bounds);

    assert!(world.get::<&Velocity>(fighter).is_err());
    assert!(world.get::<&Velocity>(bee).is_err());
    assert_eq!(world.get::<&Velocity>(shot).unwrap().y, 5.0);
}

#[test]
fn test_firing_only_on_screen() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let arena = GameSettings::default().arena;
    let gunnery = Gunnery {
        interval_secs: 0.5,
        last_shot_at: 0.0,
        fire_chance: 1.0,
    };
    let fighter = world_setup::spawn_squad_member(
        &mut world,
        CraftKind::Fighter,
        8,
        glam::DVec2::new(200.0, -100.0),
        gunnery,
    );

    systems::craft::run(&mut world, &mut rng, 1.0, &arena);
    assert_eq!(combat::live_shots_from(&world, fighter), 0, "off-screen craft hold fire");

    combat::set_position(&mut world, fighter, glam::DVec2::new(200.0, 100.0));
    systems::craft::run(&mut world, &mut rng, 1.0, &arena);
    assert_eq!(combat::live_shots_from(&world, fighter), 1);

    // Interval not yet elapsed
    systems::craft::run(&mut world, &mut rng, 1.2, &arena);
    assert_eq!(combat::live_shots_from(&world, fighter), 1);

    let mut q = world.query::<(&Position, &FiredBy)>();
    let (_, (pos, _)) = q.iter().next().unwrap();
    assert_eq!(pos.x, 200.0 + 15.0 - 3.0);
    assert_eq!(pos.y, 140.0);
}

#[test]
fn test_projectile_expires_below_screen() {
    let mut world = World::new();
    let arena = GameSettings::default().arena;
    let owner = world.spawn(());
    let shot = world_setup::spawn_enemy_bullet(
        &mut world,
        owner,
        wingstorm_core::types::Rect::new(100.0, 800.0, 30.0, 40.0),
    );

    systems::projectile::run(&mut world, &arena);
    assert!(world.get::<&Projectile>(shot).unwrap().alive);
    for _ in 0..3 {
        systems::projectile::run(&mut world, &arena);
    }
    assert!(!world.get::<&Projectile>(shot).unwrap().alive);

    let mut buffer = Vec::new();
    systems::cleanup::run(&mut world, &mut buffer);
    assert!(!world.contains(shot));
    assert!(world.contains(owner));
}

#[test]
fn test_escaping_craft_leaves_through_the_top() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let arena = GameSettings::default().arena;
    let profile = GameSettings::default().difficulty.newbie;
    let fighter = world_setup::spawn_squad_member(
        &mut world,
        CraftKind::Fighter,
        1,
        glam::DVec2::new(300.0, 55.0),
        world_setup::gunnery_for(1, &profile, 0.0),
    );
    combat::set_behavior(&mut world, fighter, Behavior::Escaping);

    let mut ticks = 0;
    while combat::is_alive(&world, fighter) {
        systems::craft::run(&mut world, &mut rng, 0.0, &arena);
        ticks += 1;
        assert!(ticks < 20);
    }
    // 55 -> below -40 takes ten 10px steps
    assert_eq!(ticks, 10);
}

#[test]
fn test_roaming_stays_inside_padding() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let arena = GameSettings::default().arena;
    let profile = GameSettings::default().difficulty.newbie;
    let roam = Roam {
        home_x: 60.0,
        home_y: 80.0,
        phase_offset: 1.0,
        spawned_at: 0.0,
    };
    let bee = world_setup::spawn_bee(
        &mut world,
        1,
        glam::DVec2::new(60.0, 80.0),
        world_setup::gunnery_for(1, &profile, 1e9),
        roam,
    );

    for tick in 0..600 {
        systems::craft::run(&mut world, &mut rng, tick as f64 * DT, &arena);
        let pos = combat::position(&world, bee).unwrap();
        assert!((50.0..=750.0).contains(&pos.x), "x {}", pos.x);
        assert!((pos.y - 80.0).abs() <= 24.0 + 1e-9);
    }
}

// ---- Fixed step ----

#[test]
fn test_fixed_step_carries_remainder() {
    let mut clock = FixedStep::new(60, 5);
    assert_eq!(clock.advance(0.010), 0);
    assert_eq!(clock.advance(0.010), 1);
    assert!((clock.remainder() - (0.020 - 1.0 / 60.0)).abs() < 1e-12);
    assert_eq!(clock.advance(-1.0), 0);
}

#[test]
fn test_fixed_step_caps_catch_up() {
    let mut clock = FixedStep::new(60, 5);
    assert_eq!(clock.advance(2.0), 5);
    assert!(clock.remainder() < clock.step_secs());
    assert_eq!(clock.advance(f64::INFINITY), 0);
}
