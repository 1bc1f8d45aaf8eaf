//! Time-based difficulty ramp

use crate::consts::DIFFICULTY_RAMP_SECS;

/// Top speed gained at full difficulty (m/s)
const MAX_SPEED_BONUS: f32 = 10.0;
/// AI speed gained at full difficulty (m/s)
const AI_SPEED_BONUS: f32 = 6.0;
/// Extra score multiplier at full difficulty
const SCORE_MULTIPLIER_BONUS: f32 = 0.25;

/// Base top speed raised by the difficulty coefficient `k`
pub fn max_speed_dynamic(base: f32, k: f32) -> f32 {
    base + MAX_SPEED_BONUS * k
}

/// Monotonic 0..1 ramp over active play time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DifficultyRamp {
    elapsed: f32,
}

impl DifficultyRamp {
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn coefficient(&self) -> f32 {
        (self.elapsed / DIFFICULTY_RAMP_SECS).clamp(0.0, 1.0)
    }

    pub fn ai_speed_bonus(&self) -> f32 {
        AI_SPEED_BONUS * self.coefficient()
    }

    pub fn score_multiplier(&self) -> f32 {
        1.0 + SCORE_MULTIPLIER_BONUS * self.coefficient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_saturates() {
        let mut ramp = DifficultyRamp::default();
        assert_eq!(ramp.coefficient(), 0.0);
        ramp.advance(45.0);
        assert!((ramp.coefficient() - 0.5).abs() < 1e-6);
        assert!((ramp.ai_speed_bonus() - 3.0).abs() < 1e-6);
        ramp.advance(100.0);
        assert_eq!(ramp.coefficient(), 1.0);
        assert_eq!(ramp.score_multiplier(), 1.25);
        assert_eq!(max_speed_dynamic(90.0, ramp.coefficient()), 100.0);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut ramp = DifficultyRamp::default();
        ramp.advance(-5.0);
        assert_eq!(ramp.elapsed(), 0.0);
    }
}
