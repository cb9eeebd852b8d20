//! Plane arena: a player plane against scripted waves of homing enemy planes.
//!
//! The library holds the whole simulation and knows nothing about terminals.
//! The binary (`main.rs` + `display.rs`) feeds it input, drains its audio cues
//! and draws its snapshot.

pub mod audio;
pub mod compute;
pub mod config;
pub mod entities;
pub mod input;
pub mod levels;
pub mod motion;
