mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use plane_arena::audio::{AudioSink, Cue};
use plane_arena::compute::{init_state, tick};
use plane_arena::config;
use plane_arena::input::{Control, Controls};
use plane_arena::levels::LevelTable;

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: OS
/// key-repeat keeps refreshing the timestamp while the key is down.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW`.
fn is_held(key_seen: &HashMap<KeyCode, Instant>, keys: &[KeyCode], now: Instant) -> bool {
    keys.iter().any(|key| {
        key_seen
            .get(key)
            .map(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

// ── Audio ─────────────────────────────────────────────────────────────────────

/// The terminal's only speaker: ring the bell for the cues that matter.
struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: Cue) {
        debug!(?cue, "cue");
        if matches!(cue, Cue::Hit | Cue::Lose | Cue::Win) {
            let mut out = stdout();
            let _ = out.write_all(b"\x07").and_then(|_| out.flush());
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode while playing, so logs go to a file.
fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: steering comes from a `key_seen` map recording when each key
/// was last pressed or repeated, so holding ← → keeps turning on terminals
/// with and without key-release events.  Fire and restart are one-shot: only
/// a fresh press (never a repeat) queues them.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    levels: LevelTable,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut state = init_state(display::arena_for_terminal(cols, rows), levels);
    let mut controls = Controls::new();
    let mut audio = TerminalBell;
    let mut key_seen: HashMap<KeyCode, Instant> = HashMap::new();
    let frame = config::frame_duration();

    info!(cols, rows, ?frame, "entering game loop");

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending terminal events (non-blocking) ──────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_seen.insert(code, frame_start);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char(' ') => controls.press(Control::Fire),
                            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => {
                                controls.press(Control::Start)
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_seen.insert(code, frame_start);
                    }
                    KeyEventKind::Release => {
                        key_seen.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => {
                    state.arena = display::arena_for_terminal(cols, rows);
                    debug!(cols, rows, "terminal resized");
                }
                _ => {}
            }
        }

        controls.set(Control::SteerLeft, is_held(&key_seen, &LEFT_KEYS, frame_start));
        controls.set(Control::SteerRight, is_held(&key_seen, &RIGHT_KEYS, frame_start));

        state = tick(&state, &mut controls, rng);
        audio.play_all(&state.cues);

        display::render(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing(&config::log_path())?;

    // Everything the game needs is loaded before the terminal is taken over;
    // a bad level table stops us here.
    let levels = match config::levels_path() {
        Some(path) => LevelTable::load(&path)
            .with_context(|| format!("loading level table {}", path.display()))?,
        None => LevelTable::builtin(),
    };
    let mut rng = match config::rng_seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx, levels, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result.context("terminal I/O failed")
}
