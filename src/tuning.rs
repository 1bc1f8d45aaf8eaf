//! Game balance and world configuration
//!
//! Read once at start-up. The JSON layout mirrors the `RACING_CONFIG` object
//! the web build ships (`world`, `car`, `gameplay`), so an existing config
//! file loads unchanged. Any key that is missing falls back to the default
//! listed on the field; unknown keys (colours, fog) are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;
use crate::sim::track::TrackTheme;

/// Road geometry and spawn window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldTuning {
    /// Road width in metres (default 28)
    pub road_width: f32,
    /// Nearest spawn depth for freshly placed entities (default 80)
    pub spawn_near: f32,
    /// Farthest spawn depth (default 800)
    pub spawn_far: f32,
    /// Length of one track period; path shape repeats after this (default 1200)
    pub track_period: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            road_width: 28.0,
            spawn_near: 80.0,
            spawn_far: 800.0,
            track_period: 1200.0,
        }
    }
}

/// Player car handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarTuning {
    /// Base top speed in m/s before the difficulty bonus (default 90)
    pub max_speed: f32,
    /// Throttle acceleration, m/s² (default 28)
    pub accel: f32,
    /// Extra deceleration while braking, m/s² (default 48)
    pub brake_decel: f32,
    /// Coasting deceleration, m/s² (default 8)
    pub natural_decel: f32,
    /// Lateral speed, m/s (default 18)
    pub steer_speed: f32,
    /// Lateral limit either side of the centre line (default 14)
    pub max_steer_x: f32,
}

impl Default for CarTuning {
    fn default() -> Self {
        Self {
            max_speed: 90.0,
            accel: 28.0,
            brake_decel: 48.0,
            natural_decel: 8.0,
            steer_speed: 18.0,
            max_steer_x: 14.0,
        }
    }
}

/// Entity counts, score rates, nitro/drift economy and AI behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameplayTuning {
    // === Pools ===
    pub obstacle_count: usize,
    pub pickup_count: usize,
    pub ai_car_count: usize,
    pub boost_pad_count: usize,
    pub scenery_posts_per_side: usize,

    // === Score ===
    pub base_score_rate: f32,
    pub speed_score_factor: f32,
    pub hit_penalty: f32,

    // === Nitro ===
    pub nitro_max: f32,
    pub nitro_gain_per_second: f32,
    pub nitro_consume_per_second: f32,
    /// Extra m/s per second while nitro burns
    pub nitro_boost: f32,

    // === Drift ===
    /// Fraction of lateral grip lost while drifting
    pub drift_grip_loss: f32,
    pub drift_score_rate: f32,

    // === Pickups ===
    pub pickup_nitro_amount: f32,
    pub pickup_score_amount: f32,

    // === AI traffic ===
    pub ai_speed_min: f32,
    pub ai_speed_max: f32,
    pub ai_steer_speed: f32,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            obstacle_count: 24,
            pickup_count: 10,
            ai_car_count: 5,
            boost_pad_count: 6,
            scenery_posts_per_side: 40,

            base_score_rate: 2.0,
            speed_score_factor: 0.35,
            hit_penalty: 150.0,

            nitro_max: 100.0,
            nitro_gain_per_second: 12.0,
            nitro_consume_per_second: 60.0,
            nitro_boost: 36.0,

            drift_grip_loss: 0.35,
            drift_score_rate: 1.2,

            pickup_nitro_amount: 35.0,
            pickup_score_amount: 200.0,

            ai_speed_min: 18.0,
            ai_speed_max: 58.0,
            ai_steer_speed: 6.0,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub car: CarTuning,
    pub gameplay: GameplayTuning,
    /// Track themes in cycle order; the first one is active on start-up
    pub themes: Vec<TrackTheme>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: WorldTuning::default(),
            car: CarTuning::default(),
            gameplay: GameplayTuning::default(),
            themes: TrackTheme::presets(),
        }
    }
}

impl Tuning {
    /// Parse tuning JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Read a tuning file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read a tuning file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Repair values that would break the simulation.
    ///
    /// Swapped ranges are reordered, negative magnitudes are made positive and
    /// an empty theme list is replaced by the presets.
    pub fn sanitized(mut self) -> Self {
        let w = &mut self.world;
        w.road_width = w.road_width.abs();
        w.spawn_near = w.spawn_near.abs();
        w.spawn_far = w.spawn_far.abs();
        if w.spawn_far < w.spawn_near {
            std::mem::swap(&mut w.spawn_near, &mut w.spawn_far);
        }
        if w.track_period <= 1.0 {
            log::warn!("trackPeriod {} too small, using default", w.track_period);
            w.track_period = WorldTuning::default().track_period;
        }

        let c = &mut self.car;
        for v in [
            &mut c.max_speed,
            &mut c.accel,
            &mut c.brake_decel,
            &mut c.natural_decel,
            &mut c.steer_speed,
            &mut c.max_steer_x,
        ] {
            *v = v.abs();
        }

        let g = &mut self.gameplay;
        if g.nitro_max <= 0.0 {
            g.nitro_max = GameplayTuning::default().nitro_max;
        }
        if g.ai_speed_max < g.ai_speed_min {
            std::mem::swap(&mut g.ai_speed_min, &mut g.ai_speed_max);
        }
        g.drift_grip_loss = g.drift_grip_loss.clamp(0.0, 1.0);
        for v in [
            &mut g.base_score_rate,
            &mut g.speed_score_factor,
            &mut g.hit_penalty,
            &mut g.nitro_gain_per_second,
            &mut g.nitro_consume_per_second,
            &mut g.nitro_boost,
            &mut g.drift_score_rate,
            &mut g.pickup_nitro_amount,
            &mut g.pickup_score_amount,
        ] {
            *v = v.abs();
        }

        if self.themes.is_empty() {
            self.themes = TrackTheme::presets();
        }
        self
    }

    /// Highest speed the player can ever reach at difficulty coefficient `k`
    pub fn speed_cap(&self, k: f32) -> f32 {
        crate::sim::difficulty::max_speed_dynamic(self.car.max_speed, k)
            + self.gameplay.nitro_boost * crate::consts::NITRO_OVERSPEED_SHARE
    }
}
