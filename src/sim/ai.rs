//! AI traffic
//!
//! Cars move relative to the player: a car slower than the player drifts
//! toward the camera and is respawned ahead once it passes the near plane.
//! Lateral control is deliberately crude (bang-bang toward a target lane).

use rand::Rng;

use super::pool::{AiDriver, EntityKind, Placement, Pool, TrackEntity};
use crate::consts::PLAYER_DEPTH;
use crate::sign;

/// Depth gap under which a car tries to get out of the player's way
const AVOID_DEPTH: f32 = 6.0;
/// Lateral shift of an avoiding car
const AVOID_SHIFT: f32 = 2.0;
/// Keeps target lanes inside the steerable range
const LANE_MARGIN: f32 = 0.5;
/// Chance per tick of picking a new random lane
const LANE_CHANGE_CHANCE: f32 = 0.003;
/// Draft window: ahead of the player by less than this
const DRAFT_DEPTH: f32 = 6.0;
/// Draft window: lateral gap below this
const DRAFT_LATERAL: f32 = 2.2;

/// Per-tick inputs for the traffic update
#[derive(Debug, Clone, Copy)]
pub struct TrafficContext {
    pub player_x: f32,
    pub player_speed: f32,
    /// Difficulty bonus added to every car's base speed
    pub speed_bonus: f32,
    pub max_steer_x: f32,
    pub steer_speed: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub dt: f32,
}

/// Outcome of one traffic update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficReport {
    /// Cars respawned ahead after passing the near plane
    pub recycled: usize,
    /// Cars the player is currently drafting behind
    pub drafting: usize,
}

/// Place a car at a fresh random spot with a new base speed
pub fn respawn<R: Rng>(
    entity: &mut TrackEntity,
    placement: &Placement,
    speed_min: f32,
    speed_max: f32,
    rng: &mut R,
) {
    placement.place(entity, rng);
    let base_speed = speed_min + rng.random::<f32>() * (speed_max - speed_min);
    let lane = entity.lateral;
    if let Some(driver) = entity.ai_mut() {
        *driver = AiDriver {
            base_speed,
            target_lane: lane,
        };
    }
}

fn random_lane<R: Rng>(limit: f32, rng: &mut R) -> f32 {
    -limit + rng.random::<f32>() * 2.0 * limit
}

/// Advance every AI car by one tick
pub fn update<R: Rng>(
    cars: &mut Pool,
    ctx: &TrafficContext,
    placement: &Placement,
    rng: &mut R,
) -> TrafficReport {
    let mut report = TrafficReport::default();
    let near = EntityKind::AiCar.near_plane();
    let lane_limit = (ctx.max_steer_x - LANE_MARGIN).max(0.0);

    for car in cars.iter_mut() {
        let Some(driver) = car.ai().copied() else {
            continue;
        };

        let own_speed = driver.base_speed + ctx.speed_bonus;
        car.depth -= (ctx.player_speed - own_speed) * ctx.dt;
        if car.depth < near {
            respawn(car, placement, ctx.speed_min, ctx.speed_max, rng);
            report.recycled += 1;
        }

        let rel_depth = car.depth - PLAYER_DEPTH;
        let mut target = car.ai().map_or(car.lateral, |d| d.target_lane);
        if rel_depth.abs() < AVOID_DEPTH {
            let away = if car.lateral - ctx.player_x >= 0.0 {
                AVOID_SHIFT
            } else {
                -AVOID_SHIFT
            };
            target = (car.lateral + away).clamp(-lane_limit, lane_limit);
        } else if rng.random::<f32>() < LANE_CHANGE_CHANCE {
            target = random_lane(lane_limit, rng);
        }

        car.lateral += sign(target - car.lateral) * ctx.steer_speed * ctx.dt;
        car.lateral = car.lateral.clamp(-ctx.max_steer_x, ctx.max_steer_x);
        if let Some(driver) = car.ai_mut() {
            driver.target_lane = target;
        }

        if rel_depth > 0.0
            && rel_depth < DRAFT_DEPTH
            && (car.lateral - ctx.player_x).abs() < DRAFT_LATERAL
        {
            report.drafting += 1;
        }
    }

    report
}
