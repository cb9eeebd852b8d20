use plane_arena::entities::{Faction, Plane};
use plane_arena::levels::*;
use plane_arena::motion::Arena;

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

fn arena() -> Arena {
    Arena::new(200.0, 100.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

// ── Spawner ───────────────────────────────────────────────────────────────────

#[test]
fn spawned_enemy_is_just_outside_an_edge() {
    let arena = arena();
    let mut rng = seeded_rng();
    let margin = Plane::SIZE * arena.scale_factor();

    for _ in 0..200 {
        let e = spawn_enemy(&arena, (100.0, 50.0), &mut rng);
        let on_top_or_bottom = (e.y == -margin || e.y == arena.height + margin)
            && (0.0..=arena.width).contains(&e.x);
        let on_left_or_right = (e.x == -margin || e.x == arena.width + margin)
            && (0.0..=arena.height).contains(&e.y);
        assert!(on_top_or_bottom || on_left_or_right, "({}, {})", e.x, e.y);
        assert!(arena.is_outside(e.x, e.y));
    }
}

#[test]
fn spawner_uses_all_four_edges() {
    let arena = arena();
    let mut rng = seeded_rng();
    let margin = Plane::SIZE * arena.scale_factor();
    let mut seen = [false; 4];

    for _ in 0..200 {
        let e = spawn_enemy(&arena, (100.0, 50.0), &mut rng);
        if e.y == -margin {
            seen[0] = true;
        } else if e.y == arena.height + margin {
            seen[1] = true;
        } else if e.x == -margin {
            seen[2] = true;
        } else if e.x == arena.width + margin {
            seen[3] = true;
        }
    }
    assert_eq!(seen, [true; 4]);
}

#[test]
fn spawned_stats_are_randomised_within_range() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let e = spawn_enemy(&arena(), (100.0, 50.0), &mut rng);
        assert_eq!(e.faction(), Faction::Enemy);
        assert!(e.speed >= Plane::SPEED * 0.5 && e.speed <= Plane::SPEED);
        assert!(e.turn_rate >= Plane::TURN_RATE * 0.3 && e.turn_rate <= Plane::TURN_RATE * 0.8);
        assert_eq!(e.lives, Plane::LIVES);
        assert!(e.is_spawn_immune());
    }
}

#[test]
fn spawned_enemy_faces_target() {
    let mut rng = seeded_rng();
    let target = (100.0, 50.0);
    for _ in 0..50 {
        let e = spawn_enemy(&arena(), target, &mut rng);
        let (dx, dy) = (target.0 - e.x, target.1 - e.y);
        let len = dx.hypot(dy);
        assert_abs_diff_eq!(e.heading.cos(), dx / len, epsilon = 1e-9);
        assert_abs_diff_eq!(e.heading.sin(), dy / len, epsilon = 1e-9);
    }
}

// ── LevelSpec ─────────────────────────────────────────────────────────────────

#[test]
fn overrides_replace_only_what_is_set() {
    let mut enemy = Plane::new(Faction::Enemy);
    enemy.speed = 0.55;
    let spec = LevelSpec {
        enemies: 1,
        shoot_chance: Some(0.3),
        speed: None,
        turn_rate: Some(0.0),
        lives: Some(4),
        projectile_speed: None,
    };
    spec.apply(&mut enemy);

    assert_abs_diff_eq!(enemy.speed, 0.55);
    assert_abs_diff_eq!(enemy.shoot_chance, 0.3);
    assert_abs_diff_eq!(enemy.turn_rate, 0.0);
    assert_eq!(enemy.lives, 4);
    assert_abs_diff_eq!(enemy.projectile_speed, Plane::PROJECTILE_SPEED);
}

#[test]
fn bare_level_defaults_to_one_life() {
    let spec = LevelSpec::new(3);
    let mut enemy = Plane::new(Faction::Enemy);
    spec.apply(&mut enemy);
    assert_eq!(enemy.lives, 1);
    assert_abs_diff_eq!(enemy.shoot_chance, Plane::SHOOT_CHANCE);
}

#[test]
fn begin_spawns_the_whole_wave() {
    let table = LevelTable::builtin();
    let wave = table.get(3).unwrap();
    let enemies = wave.begin(&arena(), (100.0, 50.0), &mut seeded_rng());

    assert_eq!(enemies.len(), 30);
    for e in &enemies {
        assert_abs_diff_eq!(e.speed, 0.2);
        assert_abs_diff_eq!(e.shoot_chance, 0.001);
        assert_abs_diff_eq!(e.turn_rate, 0.01);
        assert_eq!(e.lives, 1);
    }
}

// ── LevelTable ────────────────────────────────────────────────────────────────

#[test]
fn builtin_table_has_ten_waves() {
    let table = LevelTable::builtin();
    assert_eq!(table.len(), 10);
    assert_eq!(table.get(0).unwrap().enemies, 1);
    assert_eq!(table.get(5).unwrap().projectile_speed, Some(0.5));
    assert_eq!(table.get(8).unwrap().lives, Some(8));
    assert!(table.get(10).is_none());
}

#[test]
fn bundled_toml_matches_builtin() {
    let table = LevelTable::from_toml_str(include_str!("../levels.toml")).unwrap();
    assert_eq!(table, LevelTable::builtin());
}

#[test]
fn toml_omitted_fields_use_defaults() {
    let table = LevelTable::from_toml_str(
        r#"
        [[level]]
        enemies = 2

        [[level]]
        enemies = 1
        lives = 5
        speed = 1.5
        "#,
    )
    .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0).unwrap(), &LevelSpec::new(2));
    let second = table.get(1).unwrap();
    assert_eq!(second.lives, Some(5));
    assert_eq!(second.speed, Some(1.5));
    assert_eq!(second.turn_rate, None);
}

#[test]
fn empty_table_is_rejected() {
    let err = LevelTable::from_toml_str("").unwrap_err();
    assert!(matches!(err, LevelTableError::Empty));
}

#[test]
fn malformed_table_is_a_parse_error() {
    let err = LevelTable::from_toml_str("[[level]]\nenemies = \"many\"\n").unwrap_err();
    assert!(matches!(err, LevelTableError::Parse(_)));
    assert!(err.to_string().starts_with("invalid level table"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = LevelTable::load(Path::new("does/not/exist/levels.toml")).unwrap_err();
    assert!(matches!(err, LevelTableError::Io(_)));
}
