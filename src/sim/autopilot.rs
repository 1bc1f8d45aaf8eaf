//! Attract-mode driver
//!
//! Fills in driving controls from the current state: flat out, dodge the
//! nearest obstacle or car ahead, grab pickups when the road is clear and
//! burn nitro on open road.

use super::pool::TrackEntity;
use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::consts::PLAYER_DEPTH;

/// How far ahead threats are considered
const LOOKAHEAD: f32 = 45.0;
/// Lateral gap below which something ahead is in our lane
const THREAT_LANE: f32 = 2.4;
/// Pickups further ahead than this are ignored
const PICKUP_LOOKAHEAD: f32 = 60.0;
/// Road clear of threats this far ahead means nitro is safe
const NITRO_CLEAR_DISTANCE: f32 = 80.0;
/// Keep this much nitro in reserve
const NITRO_RESERVE_PERCENT: f32 = 30.0;
/// Close enough to a lane target to stop steering
const LANE_DEADBAND: f32 = 0.4;

fn ahead(entity: &TrackEntity) -> f32 {
    entity.depth - PLAYER_DEPTH
}

/// Produce this tick's input with driving controls chosen by the autopilot.
/// Edge commands (pause, restart, theme) are passed through untouched.
pub fn drive(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();

    // Start the session from the title screen
    if state.phase == GamePhase::Idle {
        input.start = true;
    }

    let x = state.player.x;
    let limit = state.tuning.car.max_steer_x;

    let threats = state
        .world
        .obstacles
        .iter()
        .chain(state.world.ai_cars.iter())
        .filter(|e| ahead(e) > 0.0);

    let nearest_threat = threats
        .clone()
        .filter(|e| ahead(e) < LOOKAHEAD && (e.lateral - x).abs() < THREAT_LANE)
        .min_by(|a, b| ahead(a).total_cmp(&ahead(b)));

    let road_clear = threats
        .filter(|e| (e.lateral - x).abs() < THREAT_LANE)
        .all(|e| ahead(e) > NITRO_CLEAR_DISTANCE);

    let target_lane = if let Some(threat) = nearest_threat {
        // Dodge toward the side with more room
        let away = if threat.lateral > x { -1.0 } else { 1.0 };
        let candidate = threat.lateral + away * THREAT_LANE * 1.5;
        if candidate.abs() > limit - 1.0 {
            Some(threat.lateral - away * THREAT_LANE * 1.5)
        } else {
            Some(candidate)
        }
    } else {
        state
            .world
            .pickups
            .iter()
            .filter(|p| ahead(p) > 0.0 && ahead(p) < PICKUP_LOOKAHEAD)
            .min_by(|a, b| ahead(a).total_cmp(&ahead(b)))
            .map(|p| p.lateral)
    };

    let (left, right) = match target_lane {
        Some(lane) if lane < x - LANE_DEADBAND => (true, false),
        Some(lane) if lane > x + LANE_DEADBAND => (false, true),
        _ => (false, false),
    };

    input.accelerate = true;
    input.brake = false;
    input.steer_left = left;
    input.steer_right = right;
    input.nitro = road_clear && state.player.nitro.percent() > NITRO_RESERVE_PERCENT;
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn clear_road() -> GameState {
        let mut state = GameState::new(3, Tuning::default());
        state.phase = GamePhase::Running;
        for e in state
            .world
            .obstacles
            .iter_mut()
            .chain(state.world.ai_cars.iter_mut())
            .chain(state.world.pickups.iter_mut())
        {
            e.depth = 700.0;
            e.lateral = 10.0;
        }
        state
    }

    #[test]
    fn test_starts_from_idle() {
        let state = GameState::new(3, Tuning::default());
        let input = drive(&state, &TickInput::default());
        assert!(input.start);
        assert!(input.accelerate);
    }

    #[test]
    fn test_dodges_obstacle_ahead() {
        let mut state = clear_road();
        let e = state.world.obstacles.get_mut(0).unwrap();
        e.depth = 20.0;
        e.lateral = 0.5;
        let input = drive(&state, &TickInput::default());
        // Obstacle slightly right: go left
        assert!(input.steer_left);
        assert!(!input.steer_right);
        assert!(!input.nitro);
    }

    #[test]
    fn test_nitro_on_open_road() {
        let mut state = clear_road();
        state.player.nitro.set(80.0);
        let input = drive(&state, &TickInput::default());
        assert!(input.nitro);
        assert!(!input.steer_left && !input.steer_right);
    }

    #[test]
    fn test_heads_for_pickup() {
        let mut state = clear_road();
        let p = state.world.pickups.get_mut(0).unwrap();
        p.depth = 30.0;
        p.lateral = -4.0;
        let input = drive(&state, &TickInput::default());
        assert!(input.steer_left);
    }

    #[test]
    fn test_passes_commands_through() {
        let state = clear_road();
        let input = drive(
            &state,
            &TickInput {
                pause: true,
                cycle_theme: true,
                ..Default::default()
            },
        );
        assert!(input.pause && input.cycle_theme);
        assert!(!input.start);
    }
}
