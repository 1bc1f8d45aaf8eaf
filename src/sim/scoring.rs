//! Score accrual and best-score tracking

use crate::highscores::BestScore;
use crate::tuning::GameplayTuning;

/// Running score for the current session plus the all-time best
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    score: f32,
    best: BestScore,
    /// The best was raised at least once since the last reset
    new_record: bool,
}

impl ScoreState {
    pub fn new(best: BestScore) -> Self {
        Self {
            score: 0.0,
            best,
            new_record: false,
        }
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// Score as shown to the player
    pub fn rounded(&self) -> u64 {
        self.score.max(0.0).round() as u64
    }

    pub fn best(&self) -> &BestScore {
        &self.best
    }

    pub fn new_record(&self) -> bool {
        self.new_record
    }

    /// Time and speed based income
    pub fn accrue(&mut self, dt: f32, speed: f32, gameplay: &GameplayTuning, multiplier: f32) {
        self.score +=
            dt * (gameplay.base_score_rate + speed * gameplay.speed_score_factor) * multiplier;
    }

    /// Extra income while sliding, scaled by how hard the player steers
    pub fn accrue_drift(&mut self, dt: f32, drift_score_rate: f32, steer: f32) {
        self.score += dt * drift_score_rate * (1.0 + steer.abs());
    }

    pub fn add_bonus(&mut self, amount: f32) {
        self.score += amount;
    }

    /// Collision penalty, never below zero
    pub fn apply_penalty(&mut self, penalty: f32) {
        self.score = (self.score - penalty).max(0.0);
    }

    /// Fold the current rounded score into the best. Returns true if it improved.
    pub fn update_best(&mut self) -> bool {
        let improved = self.best.observe(self.rounded());
        self.new_record |= improved;
        improved
    }

    /// Drop the session score, keeping the best
    pub fn reset(&mut self) {
        self.score = 0.0;
        self.new_record = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_floors_at_zero() {
        let mut score = ScoreState::default();
        score.add_bonus(100.0);
        score.apply_penalty(150.0);
        assert_eq!(score.score(), 0.0);
    }

    #[test]
    fn test_accrue_rate() {
        let mut score = ScoreState::default();
        let gameplay = GameplayTuning::default();
        // (2 + 40 * 0.35) * 1.25 = 20 per second
        score.accrue(1.0, 40.0, &gameplay, 1.25);
        assert!((score.score() - 20.0).abs() < 1e-4);
        score.accrue_drift(1.0, gameplay.drift_score_rate, -1.0);
        assert!((score.score() - 22.4).abs() < 1e-4);
    }

    #[test]
    fn test_best_tracks_rounded_max() {
        let mut score = ScoreState::new(BestScore::new(10));
        score.add_bonus(9.6);
        assert!(!score.update_best());
        assert_eq!(score.best().value(), 10);
        score.add_bonus(1.0);
        assert!(score.update_best());
        assert_eq!(score.best().value(), 11);
        score.reset();
        assert_eq!(score.best().value(), 11);
    }

    #[test]
    fn test_tying_best_is_not_a_record() {
        let mut score = ScoreState::new(BestScore::new(500));
        score.add_bonus(500.0);
        assert!(!score.update_best());
        assert!(!score.new_record());

        score.add_bonus(1.0);
        score.update_best();
        assert!(score.new_record());
        score.reset();
        assert!(!score.new_record());
    }
}
