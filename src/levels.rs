//! The scripted wave table and the enemy spawner it drives.

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

use crate::entities::{Faction, Plane};
use crate::motion::Arena;

// ── Spawner ───────────────────────────────────────────────────────────────────

/// Create an enemy just outside a random arena edge, nose pointed at `target`.
///
/// Speed is scaled by a random factor in `[0.5, 1.0)` and turn rate by one in
/// `[0.3, 0.8)`.  The caller owns the plane and may override its stats.
pub fn spawn_enemy(arena: &Arena, target: (f64, f64), rng: &mut impl Rng) -> Plane {
    let mut enemy = Plane::new(Faction::Enemy);
    let margin = enemy.size_px(arena.scale_factor());

    let (x, y) = match rng.gen_range(0..4) {
        0 => (rng.gen::<f64>() * arena.width, -margin),
        1 => (rng.gen::<f64>() * arena.width, arena.height + margin),
        2 => (-margin, rng.gen::<f64>() * arena.height),
        _ => (arena.width + margin, rng.gen::<f64>() * arena.height),
    };
    enemy.set_position(x, y);

    enemy.speed *= rng.gen::<f64>() * 0.5 + 0.5;
    enemy.turn_rate *= rng.gen::<f64>() * 0.5 + 0.3;
    enemy.heading = (enemy.y - target.1).atan2(enemy.x - target.0) + PI;

    debug!(x, y, speed = enemy.speed, "enemy spawned");
    enemy
}

// ── Level descriptors ─────────────────────────────────────────────────────────

fn default_lives() -> Option<u32> {
    Some(1)
}

/// One wave.  Unset overrides leave the spawner's value alone, except
/// `lives`, which defaults to a single life.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LevelSpec {
    pub enemies: u32,
    #[serde(default)]
    pub shoot_chance: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub turn_rate: Option<f64>,
    #[serde(default = "default_lives")]
    pub lives: Option<u32>,
    #[serde(default)]
    pub projectile_speed: Option<f64>,
}

impl LevelSpec {
    pub fn new(enemies: u32) -> Self {
        LevelSpec {
            enemies,
            shoot_chance: None,
            speed: None,
            turn_rate: None,
            lives: default_lives(),
            projectile_speed: None,
        }
    }

    /// Overwrite an enemy's stats with whichever overrides are set.
    pub fn apply(&self, enemy: &mut Plane) {
        enemy.speed = self.speed.unwrap_or(enemy.speed);
        enemy.shoot_chance = self.shoot_chance.unwrap_or(enemy.shoot_chance);
        enemy.turn_rate = self.turn_rate.unwrap_or(enemy.turn_rate);
        enemy.lives = self.lives.unwrap_or(enemy.lives);
        enemy.projectile_speed = self.projectile_speed.unwrap_or(enemy.projectile_speed);
    }

    /// Spawn this wave's enemies with the overrides applied.
    pub fn begin(&self, arena: &Arena, target: (f64, f64), rng: &mut impl Rng) -> Vec<Plane> {
        (0..self.enemies)
            .map(|_| {
                let mut enemy = spawn_enemy(arena, target, rng);
                self.apply(&mut enemy);
                enemy
            })
            .collect()
    }
}

// ── Level table ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum LevelTableError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Empty,
}

impl fmt::Display for LevelTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelTableError::Io(err) => write!(f, "could not read level table: {err}"),
            LevelTableError::Parse(err) => write!(f, "invalid level table: {err}"),
            LevelTableError::Empty => write!(f, "level table has no levels"),
        }
    }
}

impl std::error::Error for LevelTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelTableError::Io(err) => Some(err),
            LevelTableError::Parse(err) => Some(err),
            LevelTableError::Empty => None,
        }
    }
}

impl From<std::io::Error> for LevelTableError {
    fn from(err: std::io::Error) -> Self {
        LevelTableError::Io(err)
    }
}

impl From<toml::de::Error> for LevelTableError {
    fn from(err: toml::de::Error) -> Self {
        LevelTableError::Parse(err)
    }
}

/// Waves in the order they are played.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LevelTable {
    #[serde(rename = "level", default)]
    levels: Vec<LevelSpec>,
}

impl LevelTable {
    pub fn new(levels: Vec<LevelSpec>) -> Self {
        LevelTable { levels }
    }

    /// The ten waves the game ships with.
    pub fn builtin() -> Self {
        let wave = |enemies: u32, shoot_chance: f64, speed: f64, turn_rate: f64, lives: u32| {
            LevelSpec {
                enemies,
                shoot_chance: Some(shoot_chance),
                speed: Some(speed),
                turn_rate: Some(turn_rate),
                lives: Some(lives),
                projectile_speed: None,
            }
        };
        let with_projectiles = |spec: LevelSpec, projectile_speed: f64| LevelSpec {
            projectile_speed: Some(projectile_speed),
            ..spec
        };

        LevelTable::new(vec![
            wave(1, 0.005, 0.5, 0.01, 1),
            wave(2, 0.01, 2.0, 0.0, 1),
            wave(2, 0.01, 0.6, 0.03, 1),
            wave(30, 0.001, 0.2, 0.01, 1),
            wave(1, 0.05, 1.0, 0.01, 10),
            with_projectiles(wave(1, 1.0, 0.5, 0.02, 10), 0.5),
            wave(5, 0.01, 1.0, 0.03, 1),
            with_projectiles(wave(3, 1.0, 0.5, 0.01, 10), 0.5),
            wave(1, 0.5, 3.0, 0.0, 8),
            wave(10, 0.5, 3.0, 0.0, 1),
        ])
    }

    pub fn from_toml_str(source: &str) -> Result<Self, LevelTableError> {
        let table: LevelTable = toml::from_str(source)?;
        if table.levels.is_empty() {
            return Err(LevelTableError::Empty);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, LevelTableError> {
        let source = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&source)?;
        info!(path = %path.display(), levels = table.len(), "level table loaded");
        Ok(table)
    }

    pub fn get(&self, index: usize) -> Option<&LevelSpec> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}
