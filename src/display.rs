//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! the state's drawable snapshot into terminal commands.

use std::f64::consts::TAU;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use plane_arena::compute::{GameState, Mode};
use plane_arena::entities::{Drawable, Faction, Shape};
use plane_arena::motion::Arena;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Row 0 is the HUD, the last row the controls hint; the arena sits between.
const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

/// Terminal cells are roughly twice as tall as they are wide, so a row spans
/// two arena units and a column one.
const UNITS_PER_ROW: f64 = 2.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_LEVEL: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_IMMUNE: Color = Color::DarkGrey;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_LEVEL_WATERMARK: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// The arena that fits a terminal of `cols` × `rows` cells.
pub fn arena_for_terminal(cols: u16, rows: u16) -> Arena {
    let play_rows = rows.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
    Arena::new(cols.max(1) as f64, play_rows as f64 * UNITS_PER_ROW)
}

fn terminal_size_for(arena: &Arena) -> (u16, u16) {
    let cols = arena.width as u16;
    let rows = (arena.height / UNITS_PER_ROW) as u16 + HUD_ROWS + HINT_ROWS;
    (cols, rows)
}

/// Cell for an arena point, or `None` when it is off-screen.
fn to_cell(arena: &Arena, x: f64, y: f64) -> Option<(u16, u16)> {
    if x < 0.0 || y < 0.0 || x >= arena.width || y >= arena.height {
        return None;
    }
    Some((x as u16, HUD_ROWS + (y / UNITS_PER_ROW) as u16))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.mode() {
        Mode::Title => draw_title(out, state)?,
        Mode::Playing => draw_level_watermark(out, state)?,
        Mode::Dead => draw_banner(out, state, "You were shot down.", "SPACE / R : Restart")?,
        Mode::Won => draw_banner(out, state, "You won!", "R : Restart")?,
    }

    for entity in state.drawables() {
        draw_entity(out, &state.arena, entity)?;
    }

    if state.started {
        draw_hud(out, state)?;
    }
    draw_controls_hint(out, state)?;

    // Park cursor in a harmless spot and flush
    let (_, rows) = terminal_size_for(&state.arena);
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (cols, _) = terminal_size_for(&state.arena);

    // Level — left
    let level = state.level_number().min(state.levels.len());
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("Level {}/{}", level, state.levels.len())))?;

    // Lives — right
    let hearts: String = "♥".repeat(state.player.lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = cols.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Eight-way arrow for a heading (0 = east, clockwise, y grows downward).
fn heading_glyph(heading: f64) -> &'static str {
    const ARROWS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
    let octant = (heading.rem_euclid(TAU) / (TAU / 8.0)).round() as usize % 8;
    ARROWS[octant]
}

fn draw_entity<W: Write>(
    out: &mut W,
    arena: &Arena,
    entity: &dyn Drawable,
) -> std::io::Result<()> {
    if !entity.is_alive() {
        return Ok(());
    }
    let (x, y) = entity.position();
    let Some((col, row)) = to_cell(arena, x, y) else {
        return Ok(());
    };

    let (glyph, color) = match (entity.shape(), entity.faction()) {
        (Shape::Plane, Faction::Player) => (heading_glyph(entity.heading()), C_PLAYER),
        (Shape::Plane, Faction::Enemy) => (heading_glyph(entity.heading()), C_ENEMY),
        (Shape::Projectile, Faction::Player) => ("•", C_SHOT_PLAYER),
        (Shape::Projectile, Faction::Enemy) => ("•", C_SHOT_ENEMY),
    };
    // Translucent (spawn-immune) sprites are drawn dimmed
    let color = if entity.alpha() < 1.0 { C_IMMUNE } else { color };

    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Status text ───────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    state: &GameState,
    line_offset: i32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let (cols, rows) = terminal_size_for(&state.arena);
    let row = (rows / 2) as i32 + line_offset;
    if row < 0 {
        return Ok(());
    }
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    print_centered(out, state, -1, "P L A N E   A R E N A", C_TITLE)?;
    print_centered(out, state, 1, "SPACE / ENTER : Start", Color::White)
}

fn draw_level_watermark<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let text = format!("Level {}", state.level_number());
    print_centered(out, state, 0, &text, C_LEVEL_WATERMARK)
}

fn draw_banner<W: Write>(
    out: &mut W,
    state: &GameState,
    headline: &str,
    hint: &str,
) -> std::io::Result<()> {
    print_centered(out, state, -1, headline, Color::Yellow)?;
    print_centered(out, state, 1, hint, Color::White)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let (_, rows) = terminal_size_for(&state.arena);
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Steer   SPACE : Fire   R : Restart   Q : Quit"))?;
    Ok(())
}
