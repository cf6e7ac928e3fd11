//! Invaders - a classic fixed-screen shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, win/loss)
//! - `input`: Logical key state fed by host keyboard events
//! - `game`: Frame driver and the presentation interface it talks to
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Cue, Game, Presenter};
pub use input::{InputSource, Key, Keyboard};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 300.0;
    pub const ARENA_HEIGHT: f32 = 300.0;

    /// Host refresh rate the tick constants were balanced for
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Upper bound on frames for the headless native run (10 minutes at 60 Hz)
    pub const MAX_HEADLESS_FRAMES: u64 = 10 * 60 * FRAMES_PER_SECOND as u64;
}
