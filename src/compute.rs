//! Game-loop functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, the frame's controls and an RNG handle) and
//! returns a brand-new `GameState`.  Side effects are limited to the injected
//! RNG and to consuming edge-triggered controls.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::info;

use crate::audio::Cue;
use crate::config::{AMBIENT_ENEMIES, AMBIENT_ENEMY_SHOOT_CHANCE, AMBIENT_ENEMY_SPEED};
use crate::entities::{Drawable, Faction, Plane, Projectile};
use crate::input::{Control, Controls};
use crate::levels::{spawn_enemy, LevelTable};
use crate::motion::Arena;

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Attract screen before the first run.
    Title,
    Playing,
    Dead,
    Won,
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub arena: Arena,
    pub levels: LevelTable,
    /// `None` until the first wave begins.  Equal to `levels.len()` once
    /// every wave has been cleared.
    pub level_index: Option<usize>,
    pub started: bool,
    pub player: Plane,
    pub enemies: Vec<Plane>,
    pub projectiles: Vec<Projectile>,
    /// Cues raised during the most recent frame, for the host to play.
    pub cues: Vec<Cue>,
    pub frame: u64,
}

impl GameState {
    pub fn mode(&self) -> Mode {
        if !self.started {
            Mode::Title
        } else if self.player.is_dead() {
            Mode::Dead
        } else if self.level_index == Some(self.levels.len()) {
            Mode::Won
        } else {
            Mode::Playing
        }
    }

    /// One-based wave number for the HUD; 0 before the first wave.
    pub fn level_number(&self) -> usize {
        self.level_index.map_or(0, |i| i + 1)
    }

    pub fn is_won(&self) -> bool {
        self.mode() == Mode::Won
    }

    pub fn is_lost(&self) -> bool {
        self.started && self.player.lives == 0
    }

    /// Everything to draw this frame: the player (once a run has started),
    /// then enemies, then projectiles.
    pub fn drawables(&self) -> impl Iterator<Item = &dyn Drawable> + '_ {
        let player = self.started.then_some(&self.player as &dyn Drawable);
        player
            .into_iter()
            .chain(self.enemies.iter().map(|e| e as &dyn Drawable))
            .chain(self.projectiles.iter().map(|p| p as &dyn Drawable))
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Title-screen state: no run in progress, player parked in the centre.
pub fn init_state(arena: Arena, levels: LevelTable) -> GameState {
    let mut player = Plane::new(Faction::Player);
    let (cx, cy) = arena.center();
    player.set_position(cx, cy);

    GameState {
        arena,
        levels,
        level_index: None,
        started: false,
        player,
        enemies: Vec::new(),
        projectiles: Vec::new(),
        cues: Vec::new(),
        frame: 0,
    }
}

/// A fresh run.  Everything but the arena, level table and frame counter is
/// rebuilt, so this doubles as restart.
pub fn start_game(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut player = Plane::new(Faction::Player);
    let (cx, cy) = state.arena.center();
    player.set_position(cx, cy);
    player.heading = rng.gen::<f64>() * TAU;
    player.spawn_immunity = 0;
    player.shoot_cooldown = 0;
    player.lives = Plane::LIVES;

    info!(levels = state.levels.len(), "game started");

    GameState {
        arena: state.arena,
        levels: state.levels.clone(),
        level_index: None,
        started: true,
        player,
        enemies: Vec::new(),
        projectiles: Vec::new(),
        cues: vec![Cue::GameStart],
        frame: state.frame,
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
///
/// Order: input, player, enemies (AI then physics), projectiles, pruning,
/// level advance.  Fire/start presses not acted on are dropped at the end of
/// the frame.
pub fn tick(state: &GameState, controls: &mut Controls, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.frame += 1;
    next.cues.clear();

    if next.started {
        play_frame(&mut next, controls, rng);
    } else {
        title_frame(&mut next, controls, rng);
    }

    controls.clear_edges();
    next
}

fn title_frame(state: &mut GameState, controls: &mut Controls, rng: &mut impl Rng) {
    if controls.consume(Control::Start) || controls.consume(Control::Fire) {
        *state = start_game(state, rng);
        return;
    }

    let (cx, cy) = state.arena.center();
    state.player.set_position(cx, cy);

    advance_entities(state, rng);

    // Top up the attract-mode population, one per frame.  These never get
    // spawn immunity.
    if state.enemies.len() < AMBIENT_ENEMIES {
        let target = (state.player.x, state.player.y);
        let mut enemy = spawn_enemy(&state.arena, target, rng);
        enemy.spawn_immunity = 0;
        enemy.speed = AMBIENT_ENEMY_SPEED;
        enemy.shoot_chance = AMBIENT_ENEMY_SHOOT_CHANCE;
        state.enemies.push(enemy);
    }
}

fn play_frame(state: &mut GameState, controls: &mut Controls, rng: &mut impl Rng) {
    // ── 1. Input ──────────────────────────────────────────────────────────────
    if controls.is_held(Control::SteerLeft) {
        state.player.turn_left();
    } else if controls.is_held(Control::SteerRight) {
        state.player.turn_right();
    }

    let mut restart = controls.consume(Control::Start)
        && matches!(state.mode(), Mode::Dead | Mode::Won);

    if controls.consume(Control::Fire) {
        if state.player.is_dead() {
            restart = true;
        } else {
            let scale = state.arena.scale_factor();
            state
                .player
                .shoot(scale, &mut state.projectiles, &mut state.cues);
        }
    }

    if restart {
        *state = start_game(state, rng);
        return;
    }

    // ── 2. Player, enemies, projectiles, pruning ─────────────────────────────
    let was_alive = state.player.is_alive();
    let target = (state.player.x, state.player.y);
    state
        .player
        .update(target, &state.arena, &mut state.projectiles, &mut state.cues);

    advance_entities(state, rng);

    if was_alive && state.player.is_dead() {
        info!(level = state.level_number(), "player shot down");
    }

    // ── 3. Level advance ─────────────────────────────────────────────────────
    advance_level(state, rng);
}

/// Enemy AI + physics, projectile flight, then drop everything dead.
/// Survivors keep their relative order.
fn advance_entities(state: &mut GameState, rng: &mut impl Rng) {
    let target = (state.player.x, state.player.y);
    let scale = state.arena.scale_factor();

    for enemy in state.enemies.iter_mut() {
        enemy.move_ai(target, scale, rng, &mut state.projectiles, &mut state.cues);
        enemy.update(target, &state.arena, &mut state.projectiles, &mut state.cues);
    }

    for projectile in state.projectiles.iter_mut() {
        projectile.update(&state.arena);
    }

    state.projectiles.retain(Projectile::is_alive);
    state.enemies.retain(Plane::is_alive);
}

/// Once the field is clear, move to the next wave.  Stepping past the last
/// wave is the win condition.
fn advance_level(state: &mut GameState, rng: &mut impl Rng) {
    if !state.enemies.is_empty() {
        return;
    }

    let next = state.level_index.map_or(0, |i| i + 1);
    if next > state.levels.len() {
        return;
    }
    state.level_index = Some(next);

    let target = (state.player.x, state.player.y);
    if let Some(level) = state.levels.get(next) {
        let wave = level.begin(&state.arena, target, rng);
        info!(level = next + 1, enemies = wave.len(), "level begun");
        state.enemies.extend(wave);
    } else {
        info!(levels = state.levels.len(), "all levels cleared");
    }

    if next != 0 {
        state.cues.push(Cue::Win);
    }
}
