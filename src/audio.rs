//! Sound cues the simulation asks for.  The simulation only records them; the
//! host decides how (and whether) they are heard.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// The player plane took a hit.
    Hit,
    /// Any plane went down.
    Crash,
    /// The player plane went down.
    Lose,
    /// A level was cleared.
    Win,
    /// A plane fired.
    Fire,
    /// A new run began.
    GameStart,
}

/// Fire-and-forget playback.  Implementations swallow their own failures.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);

    fn play_all(&mut self, cues: &[Cue]) {
        for &cue in cues {
            self.play(cue);
        }
    }
}

/// Discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}
