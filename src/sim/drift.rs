//! Drift state machine
//!
//! Two states, no hysteresis: the entry condition is re-evaluated every tick
//! and the car drops back to grip the moment it fails.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::sign;

/// Minimum steer magnitude to break traction
const DRIFT_STEER_THRESHOLD: f32 = 0.6;
/// Minimum speed as a fraction of the dynamic top speed
const DRIFT_SPEED_FRACTION: f32 = 0.45;
/// Lateral offset of each rear contact patch
const REAR_CONTACT_OFFSET: f32 = 0.9;
/// Chance per rear contact per tick of leaving a mark
const DRIFT_MARK_CHANCE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DriftState {
    #[default]
    Gripping,
    /// Sliding; `direction` is the steer sign on entry (-1 or 1)
    Drifting { direction: f32 },
}

/// Inputs to the drift transition
#[derive(Debug, Clone, Copy)]
pub struct DriftConditions {
    pub steer: f32,
    pub speed: f32,
    pub max_speed_dynamic: f32,
    pub braking: bool,
    pub nitro_requested: bool,
}

impl DriftConditions {
    pub fn wants_drift(&self) -> bool {
        self.steer.abs() > DRIFT_STEER_THRESHOLD
            && self.speed > self.max_speed_dynamic * DRIFT_SPEED_FRACTION
            && !self.braking
            && !self.nitro_requested
    }
}

impl DriftState {
    pub fn is_drifting(&self) -> bool {
        matches!(self, DriftState::Drifting { .. })
    }

    /// -1, 0 or 1
    pub fn direction(&self) -> f32 {
        match self {
            DriftState::Gripping => 0.0,
            DriftState::Drifting { direction } => *direction,
        }
    }

    /// Lateral grip multiplier
    pub fn grip_factor(&self, grip_loss: f32) -> f32 {
        if self.is_drifting() {
            1.0 - grip_loss
        } else {
            1.0
        }
    }

    /// Advance one tick. Direction latches on entry and holds while sliding.
    pub fn evaluate(self, conditions: &DriftConditions) -> DriftState {
        match (self, conditions.wants_drift()) {
            (DriftState::Gripping, true) => DriftState::Drifting {
                direction: sign(conditions.steer),
            },
            (drifting @ DriftState::Drifting { .. }, true) => drifting,
            (_, false) => DriftState::Gripping,
        }
    }
}

/// Emit tyre-mark cues for the rear contacts while sliding
pub fn emit_drift_marks<R: Rng>(
    state: DriftState,
    player_x: f32,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    if !state.is_drifting() {
        return;
    }
    for offset in [-REAR_CONTACT_OFFSET, REAR_CONTACT_OFFSET] {
        if rng.random::<f32>() < DRIFT_MARK_CHANCE {
            events.push(GameEvent::DriftMark {
                lateral: player_x + offset,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn conditions(steer: f32, speed: f32) -> DriftConditions {
        DriftConditions {
            steer,
            speed,
            max_speed_dynamic: 90.0,
            braking: false,
            nitro_requested: false,
        }
    }

    #[test]
    fn test_enters_drift_with_direction() {
        let state = DriftState::Gripping.evaluate(&conditions(-1.0, 60.0));
        assert_eq!(state, DriftState::Drifting { direction: -1.0 });
        assert_eq!(state.grip_factor(0.35), 0.65);
    }

    #[test]
    fn test_too_slow_to_drift() {
        // 0.45 * 90 = 40.5
        let state = DriftState::Gripping.evaluate(&conditions(1.0, 40.0));
        assert_eq!(state, DriftState::Gripping);
    }

    #[test]
    fn test_brake_or_nitro_cancels() {
        let drifting = DriftState::Drifting { direction: 1.0 };
        let mut c = conditions(1.0, 60.0);
        c.braking = true;
        assert_eq!(drifting.evaluate(&c), DriftState::Gripping);
        let mut c = conditions(1.0, 60.0);
        c.nitro_requested = true;
        assert_eq!(drifting.evaluate(&c), DriftState::Gripping);
    }

    #[test]
    fn test_direction_latches() {
        let drifting = DriftState::Drifting { direction: 1.0 };
        // Still steering hard (other way) keeps the initial slide direction
        assert_eq!(drifting.evaluate(&conditions(-1.0, 60.0)).direction(), 1.0);
    }

    #[test]
    fn test_marks_only_while_drifting() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut events = Vec::new();
        emit_drift_marks(DriftState::Gripping, 0.0, &mut rng, &mut events);
        assert!(events.is_empty());

        for _ in 0..100 {
            emit_drift_marks(
                DriftState::Drifting { direction: 1.0 },
                0.0,
                &mut rng,
                &mut events,
            );
        }
        // ~160 expected out of 200
        assert!(events.len() > 120 && events.len() < 195);
    }
}
