//! Read-only views of the simulation for collaborators
//!
//! The renderer and HUD only ever see these; nothing here can write back into
//! `GameState`.

use glam::Vec3;
use serde::Serialize;

use super::pool::{EntityKind, EntityPayload};
use super::state::{GameEvent, GamePhase, GameState};
use super::track::{ControlPoint, TrackPath, TrackTheme};
use crate::consts::PLAYER_DEPTH;

/// Numbers shown on the HUD and the results screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub phase: GamePhase,
    pub speed_kmh: u32,
    pub score: u64,
    pub nitro_percent: f32,
    pub remain_secs: u32,
    pub best_score: u64,
    pub countdown_label: Option<&'static str>,
    pub theme: String,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let countdown_label = match state.phase {
            GamePhase::Countdown => state.countdown.label(),
            _ => None,
        };
        Self {
            phase: state.phase,
            speed_kmh: (state.player.speed * 3.6).round() as u32,
            score: state.score.rounded(),
            nitro_percent: state.player.nitro.percent(),
            remain_secs: state.remain.max(0.0).ceil() as u32,
            best_score: state.score.best().value(),
            countdown_label,
            theme: state.path.theme().name.clone(),
        }
    }
}

/// Player car pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerPose {
    pub position: Vec3,
    /// Body roll (radians)
    pub tilt: f32,
    pub drifting: bool,
    pub drift_direction: f32,
}

/// One streamed entity, already composed with the track path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityPose {
    pub id: u32,
    pub kind: EntityKind,
    pub position: Vec3,
    pub payload: EntityPayload,
}

/// Track shape parameters, enough for a host to rebuild the road mesh.
///
/// Lateral offset is the polyline through `control_points`; elevation comes
/// from the theme and the frame's `progress`. Both repeat every `period`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadProfile {
    pub theme: TrackTheme,
    pub road_width: f32,
    pub period: f32,
    pub control_points: Vec<ControlPoint>,
}

impl RoadProfile {
    pub fn from_path(path: &TrackPath) -> Self {
        Self {
            theme: path.theme().clone(),
            road_width: path.road_width(),
            period: path.period(),
            control_points: path.control_points().to_vec(),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub progress: f64,
    pub camera_shake: f32,
    pub player: PlayerPose,
    pub entities: Vec<EntityPose>,
    pub road: RoadProfile,
    /// Events raised by the tick that produced this frame
    pub events: Vec<GameEvent>,
    pub hud: HudView,
}

impl WorldSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let path = &state.path;
        let progress = state.progress;

        let player = PlayerPose {
            position: Vec3::new(
                state.player.x + path.path_x(PLAYER_DEPTH),
                path.path_y(PLAYER_DEPTH, progress) * EntityKind::AiCar.vertical_scale(),
                PLAYER_DEPTH,
            ),
            tilt: state.player.tilt,
            drifting: state.player.drift.is_drifting(),
            drift_direction: state.player.drift.direction(),
        };

        let entities = state
            .world
            .pools()
            .into_iter()
            .flat_map(|pool| pool.iter())
            .map(|e| EntityPose {
                id: e.id,
                kind: e.kind(),
                position: e.position(path, progress),
                payload: e.payload,
            })
            .collect();

        Self {
            tick: state.time_ticks,
            progress,
            camera_shake: state.camera_shake,
            player,
            entities,
            road: RoadProfile::from_path(path),
            events: state.events.clone(),
            hud: HudView::from_state(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_hud_rounding() {
        let mut state = GameState::new(1, Tuning::default());
        state.player.speed = 25.2;
        state.remain = 0.2;
        state.score.add_bonus(10.5);
        let hud = HudView::from_state(&state);
        // 25.2 * 3.6 = 90.72
        assert_eq!(hud.speed_kmh, 91);
        assert_eq!(hud.remain_secs, 1);
        assert_eq!(hud.score, 11);
        assert_eq!(hud.nitro_percent, 40.0);
        assert_eq!(hud.countdown_label, None);

        state.remain = -3.0;
        assert_eq!(HudView::from_state(&state).remain_secs, 0);
    }

    #[test]
    fn test_snapshot_lists_every_entity() {
        let state = GameState::new(2, Tuning::default());
        let snap = WorldSnapshot::capture(&state);
        assert_eq!(snap.entities.len(), state.world.entity_count());
        let obstacle = state.world.obstacles.get(0).unwrap();
        let pose = snap.entities.iter().find(|p| p.id == obstacle.id).unwrap();
        assert_eq!(pose.position.z, obstacle.depth);
        assert!(
            (pose.position.x - (obstacle.lateral + state.path.path_x(obstacle.depth))).abs()
                < 1e-5
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3, Tuning::default());
        let json = serde_json::to_string(&WorldSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"speed_kmh\":0"));
    }

    #[test]
    fn test_snapshot_carries_road_and_events() {
        let mut state = GameState::new(4, Tuning::default());
        state.events.push(GameEvent::BoostPad);
        state.events.push(GameEvent::CountdownStep {
            step: 0,
            label: "3",
        });
        let snap = WorldSnapshot::capture(&state);
        assert_eq!(snap.events, state.events);
        assert_eq!(snap.road.control_points, state.path.control_points());
        assert_eq!(snap.road.period, state.tuning.world.track_period);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"control_points\":[{\"depth\":0.0"));
        assert!(json.contains("\"BoostPad\""));
        assert!(json.contains("\"label\":\"3\""));
    }
}
