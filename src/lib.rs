//! Endless Drive - simulation core for an endless arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vehicle, track, streaming pools, collisions, scoring)
//! - `tuning`: Data-driven game balance, read once at start-up
//! - `persistence`: Best-effort key-value storage
//! - `platform`: Frame loop and collaborator hooks (renderer, audio, storage)
//! - `audio`: Semantic sound cues derived from simulation events
//! - `web`: wasm-bindgen entry points (wasm32 only)

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{StoreError, TuningError};
pub use highscores::BestScore;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta ever fed to the simulation (stall guard)
    pub const MAX_FRAME_DT: f32 = 0.035;

    /// Session length in seconds
    pub const SESSION_LENGTH_SECS: f32 = 120.0;
    /// Countdown sequence shown before control is enabled
    pub const COUNTDOWN_LABELS: [&str; 4] = ["3", "2", "1", "GO"];
    /// Duration of each countdown step (seconds)
    pub const COUNTDOWN_STEP_SECS: [f32; 4] = [0.9, 0.9, 0.9, 0.6];

    /// Seconds of active play until the difficulty coefficient saturates
    pub const DIFFICULTY_RAMP_SECS: f32 = 90.0;

    /// Fixed depth of the player's car relative to the camera plane
    pub const PLAYER_DEPTH: f32 = -2.0;
    /// Player collision half-extents (lateral, height, depth)
    pub const PLAYER_HALF_EXTENTS: [f32; 3] = [0.9, 0.6, 1.4];

    /// Nitro below this counts as empty
    pub const NITRO_EPSILON: f32 = 0.1;
    /// Share of nitro boost allowed above the dynamic speed cap
    pub const NITRO_OVERSPEED_SHARE: f32 = 0.6;
    /// Starting nitro as a fraction of the gauge
    pub const NITRO_START_FRACTION: f32 = 0.4;
    /// Nitro per second while drafting behind an AI car
    pub const DRAFT_NITRO_PER_SEC: f32 = 6.0;
    /// Nitro per second while drifting
    pub const DRIFT_NITRO_PER_SEC: f32 = 8.0;
    /// Flat nitro granted by a boost pad
    pub const BOOST_PAD_NITRO: f32 = 10.0;
    /// Flat speed granted by a boost pad (m/s)
    pub const BOOST_PAD_SPEED: f32 = 12.0;

    /// Camera shake added per hit, and its ceiling
    pub const CAMERA_SHAKE_PER_HIT: f32 = 0.22;
    pub const CAMERA_SHAKE_MAX: f32 = 0.35;
    /// Camera shake decay per second
    pub const CAMERA_SHAKE_DECAY: f32 = 1.8;

    /// Per-tick tilt smoothing (tuned for SIM_DT)
    pub const TILT_SMOOTHING: f32 = 0.12;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fractional part in [0, 1)
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Hermite smoothstep; edges may be given in either order
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let (e0, e1) = (edge0.min(edge1), edge0.max(edge1));
    if e1 == e0 {
        return if x >= e1 { 1.0 } else { 0.0 };
    }
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sign that treats zero as zero (unlike `f32::signum`)
#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
