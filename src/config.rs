use std::{env, path::PathBuf, time::Duration};

// Runtime settings (not gameplay tuning).  Read from the environment; the
// binary loads a `.env` file first when one is present.

/// Title-screen enemies kept flying until a run starts.
pub const AMBIENT_ENEMIES: usize = 10;
pub const AMBIENT_ENEMY_SPEED: f64 = 2.0;
pub const AMBIENT_ENEMY_SHOOT_CHANCE: f64 = 0.1;

pub fn frame_duration() -> Duration {
    let millis = env::var("PLANE_ARENA_FRAME_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&ms| ms > 0)
        .unwrap_or(16);
    Duration::from_millis(millis)
}

/// TOML level table to play instead of the built-in one.
pub fn levels_path() -> Option<PathBuf> {
    env::var_os("PLANE_ARENA_LEVELS").map(PathBuf::from)
}

pub fn rng_seed() -> Option<u64> {
    env::var("PLANE_ARENA_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
}

pub fn log_path() -> PathBuf {
    env::var_os("PLANE_ARENA_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("plane_arena.log"))
}
