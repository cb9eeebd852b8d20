//! Game entities: planes, the projectiles they fire, and the drawing
//! capability both expose to the renderer.

use std::f64::consts::PI;

use rand::Rng;
use tracing::debug;

use crate::audio::Cue;
use crate::motion::{update_position, Arena};

// ── Factions ──────────────────────────────────────────────────────────────────

/// Friend/foe tag.  Projectiles only hurt planes of the other faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

// ── Drawing ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Plane,
    Projectile,
}

/// Everything a renderer reads from an entity each frame.
pub trait Drawable {
    fn shape(&self) -> Shape;
    fn position(&self) -> (f64, f64);
    fn heading(&self) -> f64;
    fn faction(&self) -> Faction;
    /// Side length of the sprite in arena units.
    fn visual_size(&self, scale: f64) -> f64;
    /// Opacity in `0.0..=1.0`.
    fn alpha(&self) -> f64 {
        1.0
    }
    fn is_alive(&self) -> bool;
}

/// Axis-aligned box.  Points on an edge are outside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Hitbox {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x < x && self.y < y && x < self.x + self.dx && y < self.y + self.dy
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub speed: f64,
    pub size: f64,
    faction: Faction,
    alive: bool,
}

impl Projectile {
    pub const SIZE: f64 = 3.0;

    pub fn new(x: f64, y: f64, heading: f64, faction: Faction, speed: f64) -> Self {
        Projectile {
            x,
            y,
            heading,
            speed,
            size: Self::SIZE,
            faction,
            alive: true,
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn size_px(&self, scale: f64) -> f64 {
        self.size * scale
    }

    pub fn die(&mut self) {
        self.alive = false;
    }

    /// Move one step; expire once more than one sprite-width past any edge.
    pub fn update(&mut self, arena: &Arena) {
        if !self.alive {
            return;
        }
        let scale = arena.scale_factor();
        let (x, y) = update_position(self.x, self.y, self.heading, self.speed, scale);
        self.x = x;
        self.y = y;

        if arena.is_outside_with_margin(self.x, self.y, self.size_px(scale)) {
            self.die();
        }
    }
}

impl Drawable for Projectile {
    fn shape(&self) -> Shape {
        Shape::Projectile
    }

    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn faction(&self) -> Faction {
        self.faction
    }

    fn visual_size(&self, scale: f64) -> f64 {
        self.size_px(scale)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

// ── Planes ────────────────────────────────────────────────────────────────────

/// Greedy-pursuit state for AI planes.
#[derive(Clone, Debug, PartialEq)]
pub struct Steering {
    /// Added to the heading every frame until the next decision.
    pub turn_bias: f64,
    pub move_count: u32,
    /// Frames between decisions.
    pub interval: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub x: f64,
    pub y: f64,
    /// Radians; 0 points along +x, positive turns clockwise on screen.
    pub heading: f64,
    faction: Faction,
    pub size: f64,
    pub speed: f64,
    pub turn_rate: f64,
    /// Added to the plane's own speed for the projectiles it fires.
    pub projectile_speed: f64,
    alive: bool,
    pub lives: u32,
    pub shoot_cooldown: u32,
    pub shoot_cooldown_max: u32,
    pub shot_count: u32,
    /// Per-frame probability that the AI tries to fire.
    pub shoot_chance: f64,
    /// Frames left during which projectiles pass through this plane.
    pub spawn_immunity: u32,
    pub steering: Steering,
}

impl Plane {
    pub const SIZE: f64 = 20.0;
    pub const SPEED: f64 = 0.8;
    pub const TURN_RATE: f64 = 0.05;
    pub const PROJECTILE_SPEED: f64 = 2.0;
    pub const LIVES: u32 = 10;
    /// Cooldown a fresh plane starts with, before its first shot.
    pub const INITIAL_COOLDOWN: u32 = 200;
    pub const COOLDOWN_MAX: u32 = 10;
    pub const SHOOT_CHANCE: f64 = 0.05;
    pub const SPAWN_IMMUNITY: u32 = 200;
    pub const AI_INTERVAL: u32 = 20;

    /// Shots leave this many radians left/right of the nose, alternating.
    const MUZZLE_ANGLE: f64 = 1.0;
    /// Muzzle distance from the centre, as a fraction of the sprite size.
    const MUZZLE_DISTANCE: f64 = 0.3;

    pub fn new(faction: Faction) -> Self {
        Plane {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            faction,
            size: Self::SIZE,
            speed: Self::SPEED,
            turn_rate: Self::TURN_RATE,
            projectile_speed: Self::PROJECTILE_SPEED,
            alive: true,
            lives: Self::LIVES,
            shoot_cooldown: Self::INITIAL_COOLDOWN,
            shoot_cooldown_max: Self::COOLDOWN_MAX,
            shot_count: 0,
            shoot_chance: Self::SHOOT_CHANCE,
            spawn_immunity: Self::SPAWN_IMMUNITY,
            steering: Steering {
                turn_bias: 0.0,
                move_count: 0,
                interval: Self::AI_INTERVAL,
            },
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    pub fn is_spawn_immune(&self) -> bool {
        self.spawn_immunity > 0
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn size_px(&self, scale: f64) -> f64 {
        self.size * scale
    }

    /// Square of side `size_px` centred on the plane.
    pub fn hitbox(&self, scale: f64) -> Hitbox {
        let side = self.size_px(scale);
        Hitbox {
            x: self.x - side / 2.0,
            y: self.y - side / 2.0,
            dx: side,
            dy: side,
        }
    }

    pub fn hit_test(&self, x: f64, y: f64, scale: f64) -> bool {
        self.hitbox(scale).contains(x, y)
    }

    pub fn turn_left(&mut self) {
        if self.is_dead() {
            return;
        }
        self.heading -= self.turn_rate;
    }

    pub fn turn_right(&mut self) {
        if self.is_dead() {
            return;
        }
        self.heading += self.turn_rate;
    }

    /// Take one hit from an opposing projectile.
    pub fn hit(&mut self, cues: &mut Vec<Cue>) {
        if self.faction == Faction::Player {
            cues.push(Cue::Hit);
        }

        if self.lives > 1 {
            self.lives -= 1;
        } else {
            self.lives = 0;
            self.die(cues);
        }
    }

    /// Irreversible.  Also used to force-kill a plane.
    pub fn die(&mut self, cues: &mut Vec<Cue>) {
        self.alive = false;
        cues.push(Cue::Crash);
        match self.faction {
            Faction::Player => cues.push(Cue::Lose),
            Faction::Enemy => {}
        }
        debug!(faction = ?self.faction, x = self.x, y = self.y, "plane down");
    }

    fn muzzle_offset(&self, scale: f64) -> (f64, f64) {
        let angle = if self.shot_count % 2 == 0 {
            self.heading - Self::MUZZLE_ANGLE
        } else {
            self.heading + Self::MUZZLE_ANGLE
        };
        let distance = self.size_px(scale) * Self::MUZZLE_DISTANCE;
        (angle.cos() * distance, angle.sin() * distance)
    }

    /// Fire one projectile if off cooldown.  Returns whether a shot was fired.
    pub fn shoot(
        &mut self,
        scale: f64,
        projectiles: &mut Vec<Projectile>,
        cues: &mut Vec<Cue>,
    ) -> bool {
        if self.is_dead() || self.shoot_cooldown != 0 {
            return false;
        }

        let (ox, oy) = self.muzzle_offset(scale);
        projectiles.push(Projectile::new(
            self.x + ox,
            self.y + oy,
            self.heading,
            self.faction,
            self.speed + self.projectile_speed,
        ));
        cues.push(Cue::Fire);

        self.shoot_cooldown = self.shoot_cooldown_max;
        self.shot_count = self.shot_count.wrapping_add(1);
        true
    }

    /// Pick the turn bias (left, straight or right) whose next step lands
    /// closest to `target`.  On equal distances the earlier candidate wins.
    pub fn choose_turn(&self, target: (f64, f64), scale: f64) -> f64 {
        let candidates = [-self.turn_rate, 0.0, self.turn_rate];

        let mut best = 0.0;
        let mut lowest = f64::INFINITY;
        for option in candidates {
            let (nx, ny) =
                update_position(self.x, self.y, self.heading + option, self.speed, scale);
            let distance = (nx - target.0).hypot(ny - target.1);
            if distance < lowest {
                lowest = distance;
                best = option;
            }
        }
        best
    }

    /// One frame of enemy behaviour: maybe fire, keep turning, and every
    /// `steering.interval` frames re-aim at `target`.
    pub fn move_ai(
        &mut self,
        target: (f64, f64),
        scale: f64,
        rng: &mut impl Rng,
        projectiles: &mut Vec<Projectile>,
        cues: &mut Vec<Cue>,
    ) {
        if self.is_dead() {
            return;
        }

        if rng.gen::<f64>() < self.shoot_chance {
            self.shoot(scale, projectiles, cues);
        }

        self.heading += self.steering.turn_bias;
        self.steering.move_count = self.steering.move_count.wrapping_add(1);
        if self.steering.move_count % self.steering.interval.max(1) != 0 {
            return;
        }

        self.steering.turn_bias = self.choose_turn(target, scale);
    }

    /// Per-frame physics and collision.  `target` is the player position;
    /// enemies that leave the arena turn back toward it.
    pub fn update(
        &mut self,
        target: (f64, f64),
        arena: &Arena,
        projectiles: &mut [Projectile],
        cues: &mut Vec<Cue>,
    ) {
        if self.is_dead() {
            return;
        }

        if self.spawn_immunity > 0 {
            self.spawn_immunity -= 1;
        }

        if arena.is_outside(self.x, self.y) {
            match self.faction {
                Faction::Player => self.heading += PI,
                Faction::Enemy => {
                    self.heading = (self.y - target.1).atan2(self.x - target.0) + PI;
                }
            }
        }

        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }

        let scale = arena.scale_factor();
        let (x, y) = update_position(self.x, self.y, self.heading, self.speed, scale);
        self.x = x;
        self.y = y;

        for projectile in projectiles.iter_mut() {
            if !projectile.is_alive() {
                continue;
            }
            if projectile.faction() == self.faction {
                continue;
            }
            if self.is_spawn_immune() {
                continue;
            }

            if self.hit_test(projectile.x, projectile.y, scale) {
                self.hit(cues);
                projectile.die();
            }
        }
    }
}

impl Drawable for Plane {
    fn shape(&self) -> Shape {
        Shape::Plane
    }

    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn faction(&self) -> Faction {
        self.faction
    }

    fn visual_size(&self, scale: f64) -> f64 {
        self.size_px(scale)
    }

    fn alpha(&self) -> f64 {
        if self.is_spawn_immune() {
            0.5
        } else {
            1.0
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
