//! Player car physics
//!
//! Arcade model: scalar forward speed, direct lateral motion, nitro and drift.
//! The car never moves longitudinally; the world streams past it instead.

use glam::Vec3;

use super::drift::{DriftConditions, DriftState};
use super::nitro::NitroGauge;
use crate::consts::*;
use crate::lerp;
use crate::tuning::{CarTuning, GameplayTuning};

/// Tilt target per unit of steer (degrees)
const TILT_PER_STEER_DEG: f32 = 10.0;
/// Extra tilt into a drift (degrees)
const TILT_DRIFT_DEG: f32 = 8.0;

/// Resolved driver controls for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub accelerate: bool,
    pub brake: bool,
    /// -1 (left), 0 or 1 (right)
    pub steer: f32,
    pub nitro: bool,
}

impl Controls {
    /// Build from held keys; opposite directions cancel out
    pub fn from_keys(accelerate: bool, brake: bool, left: bool, right: bool, nitro: bool) -> Self {
        let steer = (right as i8 - left as i8) as f32;
        Self {
            accelerate,
            brake,
            steer,
            nitro,
        }
    }
}

/// Player car
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Lateral offset from the track centre line
    pub x: f32,
    /// Forward speed (m/s)
    pub speed: f32,
    pub nitro: NitroGauge,
    pub drift: DriftState,
    /// Body roll in radians (cosmetic)
    pub tilt: f32,
    pub half_extents: Vec3,
    /// Steer value applied on the last tick
    pub steer: f32,
}

impl PlayerState {
    pub fn new(nitro_max: f32) -> Self {
        Self {
            x: 0.0,
            speed: 0.0,
            nitro: NitroGauge::new(nitro_max * NITRO_START_FRACTION, nitro_max),
            drift: DriftState::Gripping,
            tilt: 0.0,
            half_extents: Vec3::from_array(PLAYER_HALF_EXTENTS),
            steer: 0.0,
        }
    }
}

/// What happened during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Nitro was requested and actually burned
    pub nitro_active: bool,
    /// The car entered a drift this tick
    pub drift_started: bool,
}

/// Limits that depend on the difficulty ramp
#[derive(Debug, Clone, Copy)]
pub struct SpeedLimits {
    pub max_speed_dynamic: f32,
    pub speed_cap: f32,
}

/// Advance the player car by `dt`
pub fn step(
    player: &mut PlayerState,
    controls: &Controls,
    limits: SpeedLimits,
    car: &CarTuning,
    gameplay: &GameplayTuning,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();

    // Longitudinal
    if controls.accelerate {
        player.speed += car.accel * dt;
    } else {
        player.speed -= car.natural_decel * dt;
    }
    if controls.brake {
        player.speed -= car.brake_decel * dt;
    }

    if controls.nitro && player.nitro.available() {
        player.speed += gameplay.nitro_boost * dt;
        player.nitro.drain(gameplay.nitro_consume_per_second, dt);
        report.nitro_active = true;
    } else {
        player.nitro.regen(gameplay.nitro_gain_per_second, dt);
    }

    player.speed = player.speed.clamp(0.0, limits.speed_cap.max(0.0));

    // Lateral, with grip from last tick's drift state
    let grip = player.drift.grip_factor(gameplay.drift_grip_loss);
    player.x += controls.steer * car.steer_speed * dt * grip;
    player.x = player.x.clamp(-car.max_steer_x, car.max_steer_x);
    player.steer = controls.steer;

    // Cosmetic roll eases toward the steer direction
    let target_deg = -TILT_PER_STEER_DEG * controls.steer - player.drift.direction() * TILT_DRIFT_DEG;
    player.tilt = lerp(player.tilt, target_deg.to_radians(), TILT_SMOOTHING);

    let was_drifting = player.drift.is_drifting();
    player.drift = player.drift.evaluate(&DriftConditions {
        steer: controls.steer,
        speed: player.speed,
        max_speed_dynamic: limits.max_speed_dynamic,
        braking: controls.brake,
        nitro_requested: controls.nitro,
    });
    report.drift_started = !was_drifting && player.drift.is_drifting();

    report
}
