//! Control state sampled once per frame.
//!
//! Steering is level-triggered: the host sets it from whatever keys are held.
//! Fire and start are edge-triggered: the host presses them once per key press
//! and the simulation consumes them when it acts, so a held key never repeats.

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    SteerLeft,
    SteerRight,
    Fire,
    Start,
}

#[derive(Clone, Debug, Default)]
pub struct Controls {
    held: HashSet<Control>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    /// Press or release in one call (used for level-triggered steering).
    pub fn set(&mut self, control: Control, held: bool) {
        if held {
            self.press(control);
        } else {
            self.release(control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Returns whether `control` was held, clearing it either way.
    pub fn consume(&mut self, control: Control) -> bool {
        self.held.remove(&control)
    }

    /// Drop pending edge-triggered presses nobody acted on this frame.
    pub fn clear_edges(&mut self) {
        self.held.remove(&Control::Fire);
        self.held.remove(&Control::Start);
    }
}
