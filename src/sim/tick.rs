//! Fixed timestep simulation tick
//!
//! One call per rendered frame. The caller clamps the frame delta; the tick
//! integrates whatever delta it is handed.

use super::ai::{self, TrafficContext};
use super::autopilot;
use super::collision::resolve_collisions;
use super::drift::emit_drift_marks;
use super::state::{GameEvent, GamePhase, GameState};
use super::vehicle::{self, Controls};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    // Held
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub nitro: bool,
    // Edge-triggered
    /// Start a session from the title screen (or after the results screen)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Full reset and countdown from any phase
    pub restart: bool,
    /// Switch to the next track theme
    pub cycle_theme: bool,
    /// Attract mode - the autopilot drives
    pub autopilot: bool,
}

impl TickInput {
    /// Clear edge-triggered commands after they have been consumed
    pub fn clear_edges(&mut self) {
        self.start = false;
        self.pause = false;
        self.restart = false;
        self.cycle_theme = false;
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    let input = if input.autopilot {
        autopilot::drive(state, input)
    } else {
        input.clone()
    };

    // Session commands
    let wants_start =
        input.start && matches!(state.phase, GamePhase::Idle | GamePhase::Ended);
    if input.restart || wants_start {
        state.begin_countdown();
        return;
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                log::debug!("Paused at {:.1}s remaining", state.remain);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    if input.cycle_theme && state.phase != GamePhase::Paused {
        state.cycle_theme();
    }

    // Nothing moves while paused, before the first start or after the end
    match state.phase {
        GamePhase::Paused | GamePhase::Idle | GamePhase::Ended => return,
        GamePhase::Countdown | GamePhase::Running => {}
    }

    let control = state.controls_enabled();
    if state.phase == GamePhase::Countdown && state.countdown.advance(dt, &mut state.events) {
        state.phase = GamePhase::Running;
        state.events.push(GameEvent::RaceStarted);
        log::info!("Race started");
    }

    let controls = if control {
        Controls::from_keys(
            input.accelerate,
            input.brake,
            input.steer_left,
            input.steer_right,
            input.nitro,
        )
    } else {
        Controls::default()
    };
    if controls.accelerate {
        state.events.push(GameEvent::Accelerating);
    }
    if controls.brake {
        state.events.push(GameEvent::Braking);
    }

    // Vehicle
    let limits = state.speed_limits();
    let report = vehicle::step(
        &mut state.player,
        &controls,
        limits,
        &state.tuning.car,
        &state.tuning.gameplay,
        dt,
    );
    if report.nitro_active {
        state.events.push(GameEvent::NitroActive);
    }
    if report.drift_started {
        log::trace!("Drift {}", state.player.drift.direction());
    }

    let dz = state.player.speed * dt;
    state.progress += f64::from(dz);

    // Traffic
    let gameplay = &state.tuning.gameplay;
    let traffic = TrafficContext {
        player_x: state.player.x,
        player_speed: state.player.speed,
        speed_bonus: state.difficulty.ai_speed_bonus(),
        max_steer_x: state.tuning.car.max_steer_x,
        steer_speed: gameplay.ai_steer_speed,
        speed_min: gameplay.ai_speed_min,
        speed_max: gameplay.ai_speed_max,
        dt,
    };
    let placement = state.world.placement;
    let traffic = ai::update(&mut state.world.ai_cars, &traffic, &placement, &mut state.rng);
    if traffic.drafting > 0 {
        state
            .player
            .nitro
            .regen(DRAFT_NITRO_PER_SEC * traffic.drafting as f32, dt);
    }

    // Streaming
    state.world.advance(dz, &mut state.rng);

    // Collisions
    let outcome = resolve_collisions(state);
    if let Some(hit) = outcome.hit {
        state.events.push(GameEvent::Collision { kind: hit.kind });
    }
    if let Some(kind) = outcome.pickup {
        state.events.push(GameEvent::PickupCollected { kind });
    }
    if outcome.boost_pad {
        state.events.push(GameEvent::BoostPad);
    }

    // Score
    if control {
        let multiplier = state.difficulty.score_multiplier();
        state
            .score
            .accrue(dt, state.player.speed, &state.tuning.gameplay, multiplier);
    }
    if state.player.drift.is_drifting() {
        let rate = state.tuning.gameplay.drift_score_rate;
        state.score.accrue_drift(dt, rate, state.player.steer);
        state.player.nitro.regen(DRIFT_NITRO_PER_SEC, dt);
        state.events.push(GameEvent::Drifting);
        emit_drift_marks(
            state.player.drift,
            state.player.x,
            &mut state.rng,
            &mut state.events,
        );
    }

    state.camera_shake = (state.camera_shake - CAMERA_SHAKE_DECAY * dt).max(0.0);

    if control {
        state.difficulty.advance(dt);
    }

    if state.score.update_best() {
        let best = state.score.best().value();
        state.events.push(GameEvent::BestScoreImproved { best });
    }

    // Session clock
    if control {
        state.remain -= dt;
        if state.remain <= 0.0 {
            state.remain = 0.0;
            state.phase = GamePhase::Ended;
            let score = state.score.rounded();
            let best = state.score.best().value();
            state.events.push(GameEvent::SessionEnded {
                score,
                best,
                new_record: state.score.new_record(),
            });
            log::info!("Session over: score {}, best {}", score, best);
        }
    }

    state.time_ticks += 1;
}
