//! Squadron: one formation of enemies sharing an anchor and a phase machine.
//!
//! The anchor is the canonical position; members are placed from it every
//! tick and never write back to it. Members are created lazily when the
//! spawn delay elapses, entirely above the screen.

use std::f64::consts::TAU;

use glam::DVec2;
use hecs::{Entity, World};
use log::debug;
use rand::Rng;

use wingstorm_core::components::Gunnery;
use wingstorm_core::config::{DifficultyProfile, GameSettings, SquadTuning};
use wingstorm_core::constants::*;
use wingstorm_core::enums::{Behavior, CraftKind, FormationShape, MovementStyle, SquadPhase};
use wingstorm_core::events::SimEvent;
use wingstorm_core::state::SquadView;
use wingstorm_formation::boundary::{BoundaryGovernor, VerticalRegime};
use wingstorm_formation::dive::{self, DiveInfo, DiveLimits};
use wingstorm_formation::entry::EntryPath;
use wingstorm_formation::fsm::{self, PhaseContext};
use wingstorm_formation::layout::{formation_offsets, max_offset_y};
use wingstorm_formation::sample_span;

use crate::combat;
use crate::world_setup;

pub struct Squadron {
    id: u32,
    wave_number: u32,
    formation: FormationShape,
    style: MovementStyle,
    member_count: usize,
    move_speed: f64,
    jellyfish_chance: f64,

    spawn_delay_secs: f64,
    spawned: bool,
    members_created: bool,

    phase: SquadPhase,
    phase_started_at: f64,
    anchor: DVec2,
    governor: BoundaryGovernor,
    entry: Option<EntryPath>,
    hold_until: f64,
    patrol_dwell_secs: f64,
    exit_after_regroup: bool,
    phase_offset: f64,
    sweep_sign: f64,

    offsets: Vec<DVec2>,
    members: Vec<Entity>,
    dives: Vec<Option<DiveInfo>>,
    dive_limits: DiveLimits,
    shoot_interval_secs: f64,

    all_dead: bool,
    exited: bool,
    escaping: bool,
}

/// Members per squadron: `1 + wave/2`, at most five.
pub fn member_count_for(wave_number: u32) -> usize {
    (1 + wave_number as usize / 2).min(MAX_SQUAD_MEMBERS)
}

/// Squadron speed in px/tick: `4 + wave`, at most eight.
pub fn move_speed_for(wave_number: u32) -> f64 {
    (4 + wave_number).min(8) as f64
}

fn pick_style<R: Rng + ?Sized>(rng: &mut R, wave_number: u32, tuning: &SquadTuning) -> MovementStyle {
    let complex = (tuning.complex_style_chance_per_wave * wave_number as f64)
        .min(tuning.complex_style_chance_max);
    if rng.gen::<f64>() < complex {
        MovementStyle::COMPLEX[rng.gen_range(0..MovementStyle::COMPLEX.len())]
    } else if rng.gen_bool(0.5) {
        MovementStyle::Sweep
    } else {
        MovementStyle::Hover
    }
}

impl Squadron {
    /// Decide the squadron's configuration. No entities are created until
    /// the spawn delay elapses.
    pub fn new<R: Rng + ?Sized>(
        id: u32,
        wave_number: u32,
        spawn_delay_secs: f64,
        profile: &DifficultyProfile,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Self {
        let tuning = &settings.squad;
        let member_count = member_count_for(wave_number);
        let style = pick_style(rng, wave_number, tuning);
        let formation = FormationShape::ALL[rng.gen_range(0..FormationShape::ALL.len())];
        let phase_offset = rng.gen::<f64>() * TAU;
        let sweep_sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let jellyfish_chance = (tuning.jellyfish_chance_base
            + tuning.jellyfish_chance_per_wave * wave_number as f64)
            .min(tuning.jellyfish_chance_max);

        Self {
            id,
            wave_number,
            formation,
            style,
            member_count,
            move_speed: move_speed_for(wave_number),
            jellyfish_chance,
            spawn_delay_secs: spawn_delay_secs.max(0.0),
            spawned: false,
            members_created: false,
            phase: SquadPhase::Enter,
            phase_started_at: 0.0,
            anchor: DVec2::ZERO,
            governor: BoundaryGovernor::new(&settings.arena, tuning),
            entry: None,
            hold_until: 0.0,
            patrol_dwell_secs: 0.0,
            exit_after_regroup: false,
            phase_offset,
            sweep_sign,
            offsets: formation_offsets(formation, member_count),
            members: Vec::new(),
            dives: Vec::new(),
            dive_limits: DiveLimits::from_settings(&settings.arena, tuning),
            shoot_interval_secs: world_setup::shoot_interval_secs(wave_number, profile),
            all_dead: false,
            exited: false,
            escaping: false,
        }
    }

    /// Spawn the members once `now - wave_start` reaches the spawn delay.
    /// Returns true on the call that spawned.
    pub fn check_spawn<R: Rng + ?Sized>(
        &mut self,
        wave_start: f64,
        now: f64,
        world: &mut World,
        rng: &mut R,
        settings: &GameSettings,
        events: &mut Vec<SimEvent>,
    ) -> bool {
        if self.spawned || now - wave_start < self.spawn_delay_secs {
            return false;
        }
        let tuning = &settings.squad;

        self.spawned = true;
        self.phase = SquadPhase::Enter;
        self.phase_started_at = now;
        self.hold_until = 0.0;
        self.governor.velocity = DVec2::ZERO;
        self.governor.target_velocity = DVec2::ZERO;

        // Far enough above the screen that the lowest slot is hidden too
        let x = settings.arena.spawn_x_span().lerp(rng.gen::<f64>());
        let outside = SPAWN_CRAFT_HEIGHT * SPAWN_OUTSIDE_CRAFT_HEIGHTS;
        let jitter = rng.gen::<f64>() * SPAWN_CRAFT_HEIGHT * 3.0;
        let y = -(outside + SPAWN_CRAFT_HEIGHT + max_offset_y(&self.offsets) + jitter);
        self.anchor = DVec2::new(x, y);

        let target_y = sample_span(rng, &tuning.enter_target_y);
        let step = sample_span(rng, &tuning.enter_step);
        self.entry = Some(EntryPath::new(
            self.anchor,
            DVec2::new(x, target_y),
            step,
            tuning.enter_curve_amplitude,
        ));

        self.create_members(now, world, rng);

        debug!(
            "Wave {} squad {} spawned: {:?}/{:?} x{} at ({:.0}, {:.0})",
            self.wave_number, self.id, self.formation, self.style, self.member_count, x, y
        );
        events.push(SimEvent::SquadSpawned {
            wave_number: self.wave_number,
            squad_id: self.id,
        });
        true
    }

    fn create_members<R: Rng + ?Sized>(&mut self, now: f64, world: &mut World, rng: &mut R) {
        if self.members_created {
            return;
        }
        self.members_created = true;

        let gunnery = Gunnery {
            interval_secs: self.shoot_interval_secs,
            last_shot_at: now,
            fire_chance: world_setup::fire_chance(self.wave_number),
        };
        for offset in &self.offsets {
            let kind = if rng.gen::<f64>() < self.jellyfish_chance {
                CraftKind::Jellyfish
            } else {
                CraftKind::Fighter
            };
            let member = world_setup::spawn_squad_member(
                world,
                kind,
                self.wave_number,
                self.anchor + *offset,
                gunnery,
            );
            self.members.push(member);
            self.dives.push(kind.can_dive().then(DiveInfo::inert));
        }
    }

    /// Advance the phase machine, move the anchor and place every member.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        world: &mut World,
        rng: &mut R,
        settings: &GameSettings,
        events: &mut Vec<SimEvent>,
    ) {
        if !self.spawned || self.all_dead {
            return;
        }

        self.update_anchor(now, world, rng, &settings.squad);
        self.place_members(world, settings);

        let exit_line = settings.arena.screen_height + settings.arena.exit_margin;
        if self.phase == SquadPhase::Exit && !self.exited && self.anchor.y > exit_line {
            for &member in &self.members {
                combat::force_kill(world, member);
            }
            self.exited = true;
            debug!("Wave {} squad {} exited", self.wave_number, self.id);
            events.push(SimEvent::SquadExited {
                wave_number: self.wave_number,
                squad_id: self.id,
            });
        }

        if self.members.iter().all(|&m| !combat::is_alive(world, m)) {
            self.all_dead = true;
            if !self.exited && !self.escaping {
                debug!("Wave {} squad {} destroyed", self.wave_number, self.id);
                events.push(SimEvent::SquadDestroyed {
                    wave_number: self.wave_number,
                    squad_id: self.id,
                });
            }
        }
    }

    fn update_anchor<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        world: &World,
        rng: &mut R,
        tuning: &SquadTuning,
    ) {
        if self.phase == SquadPhase::Enter {
            if let Some(entry) = self.entry.as_mut() {
                self.anchor = entry.advance();
            }
        }

        let ctx = PhaseContext {
            phase: self.phase,
            now_secs: now,
            elapsed_in_phase_secs: now - self.phase_started_at,
            hold_until_secs: self.hold_until,
            anchor_y: self.anchor.y,
            entry_complete: self.entry.map_or(true, |e| e.is_complete()),
            any_diving: dive::any_diving(&self.dives),
            patrol_dwell_secs: self.patrol_dwell_secs,
            exit_after_regroup: self.exit_after_regroup,
            move_speed: self.move_speed,
            target_velocity: self.governor.target_velocity,
            style: self.style,
            phase_offset: self.phase_offset,
            sweep_sign: self.sweep_sign,
        };
        let update = fsm::evaluate(&ctx, tuning);

        self.governor.target_velocity = update.target_velocity;
        if update.reset_velocity {
            self.governor.velocity = DVec2::ZERO;
            self.governor.target_velocity = DVec2::ZERO;
        }
        if update.phase_changed {
            self.enter_phase(update.new_phase, now, rng, tuning);
        }
        if update.begin_attack {
            let alive: Vec<bool> = self
                .members
                .iter()
                .map(|&m| {
                    combat::is_alive(world, m)
                        && combat::behavior(world, m) != Some(Behavior::Escaping)
                })
                .collect();
            dive::begin_attack_wave(rng, &mut self.dives, &alive, self.anchor, &self.dive_limits);
        }
        if update.recall_divers {
            dive::recall_divers(&mut self.dives);
        }

        if !update.hold {
            let regime = match self.phase {
                SquadPhase::Enter => VerticalRegime::Entering,
                SquadPhase::Exit => VerticalRegime::Exiting,
                _ => VerticalRegime::Combat,
            };
            self.governor
                .step(&mut self.anchor, now, regime, self.phase_offset);
        }
    }

    fn enter_phase<R: Rng + ?Sized>(
        &mut self,
        phase: SquadPhase,
        now: f64,
        rng: &mut R,
        tuning: &SquadTuning,
    ) {
        debug!(
            "Wave {} squad {}: {:?} -> {:?}",
            self.wave_number, self.id, self.phase, phase
        );
        let previous = self.phase;
        self.phase = phase;
        self.phase_started_at = now;

        match phase {
            SquadPhase::Patrol => {
                self.patrol_dwell_secs = sample_span(rng, &tuning.patrol_dwell_secs);
                if previous == SquadPhase::Enter {
                    if let Some(entry) = self.entry {
                        self.anchor = entry.target();
                    }
                    self.hold_until = now + tuning.post_enter_hold_secs;
                }
            }
            SquadPhase::Regroup => {
                self.exit_after_regroup = rng.gen::<f64>() < tuning.exit_probability;
            }
            SquadPhase::Enter | SquadPhase::Attack | SquadPhase::Exit => {}
        }
    }

    fn place_members(&mut self, world: &mut World, settings: &GameSettings) {
        let arena = &settings.arena;
        let kill_line = arena.screen_height + arena.member_kill_margin;

        for (slot, &member) in self.members.iter().enumerate() {
            if !combat::is_alive(world, member)
                || combat::behavior(world, member) == Some(Behavior::Escaping)
            {
                continue;
            }
            let home = self.offsets.get(slot).copied().unwrap_or(DVec2::ZERO);
            let slot_pos = self.anchor + home;

            let pos = match self.dives.get_mut(slot) {
                Some(Some(dive)) => {
                    let diving = dive.is_diving;
                    let mut pos = self.anchor + dive.advance(home);
                    if diving {
                        pos.y = pos.y.min(arena.dive_max_y);
                    }
                    pos
                }
                // Non-diving kinds trail their slot
                _ => {
                    let current = combat::position(world, member).unwrap_or(slot_pos);
                    current + (slot_pos - current) * JELLYFISH_FOLLOW_RATE
                }
            };
            combat::set_position(world, member, pos);

            if pos.y > kill_line {
                combat::force_kill(world, member);
            }
        }
    }

    /// Flip every live member to escape behaviour and cancel all dives.
    pub fn begin_escape(&mut self, world: &mut World) {
        self.escaping = true;
        for &member in &self.members {
            if combat::is_alive(world, member) {
                combat::set_behavior(world, member, Behavior::Escaping);
            }
        }
        for dive in self.dives.iter_mut().flatten() {
            dive.reset();
        }
    }

    /// Members, empty until spawned.
    pub fn enemies(&self) -> &[Entity] {
        if self.spawned {
            &self.members
        } else {
            &[]
        }
    }

    pub fn live_members(&self, world: &World) -> usize {
        self.members
            .iter()
            .filter(|&&m| combat::is_alive(world, m))
            .count()
    }

    /// Remove every member entity from the world.
    pub fn despawn(&mut self, world: &mut World) {
        for member in self.members.drain(..) {
            let _ = world.despawn(member);
        }
        self.dives.clear();
        self.all_dead = true;
    }

    pub fn view(&self, world: &World) -> SquadView {
        SquadView {
            squad_id: self.id,
            formation: self.formation,
            movement: self.style,
            phase: self.phase,
            spawned: self.spawned,
            anchor_x: self.anchor.x,
            anchor_y: self.anchor.y,
            members_alive: self.live_members(world) as u32,
            members_diving: dive::count_diving(&self.dives) as u32,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn formation(&self) -> FormationShape {
        self.formation
    }

    pub fn style(&self) -> MovementStyle {
        self.style
    }

    pub fn member_count(&self) -> usize {
        self.member_count
    }

    pub fn move_speed(&self) -> f64 {
        self.move_speed
    }

    pub fn spawn_delay_secs(&self) -> f64 {
        self.spawn_delay_secs
    }

    pub fn is_spawned(&self) -> bool {
        self.spawned
    }

    pub fn is_all_dead(&self) -> bool {
        self.all_dead
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn phase(&self) -> SquadPhase {
        self.phase
    }

    pub fn anchor(&self) -> DVec2 {
        self.anchor
    }

    pub fn velocity(&self) -> DVec2 {
        self.governor.velocity
    }

    pub fn entry_progress(&self) -> Option<f64> {
        self.entry.map(|e| e.progress())
    }

    pub fn dives(&self) -> &[Option<DiveInfo>] {
        &self.dives
    }

    pub fn offsets(&self) -> &[DVec2] {
        &self.offsets
    }

    pub fn phase_started_at(&self) -> f64 {
        self.phase_started_at
    }
}
