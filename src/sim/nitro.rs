//! Nitro gauge
//!
//! A bounded resource: every mutation clamps to `[0, max]`, so no sequence
//! of top-ups and burns can leave the gauge out of range.

use crate::consts::NITRO_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NitroGauge {
    amount: f32,
    max: f32,
}

impl NitroGauge {
    pub fn new(amount: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            amount: amount.clamp(0.0, max),
            max,
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Fill level in percent
    pub fn percent(&self) -> f32 {
        if self.max > 0.0 {
            self.amount / self.max * 100.0
        } else {
            0.0
        }
    }

    /// Enough left to burn this tick
    pub fn available(&self) -> bool {
        self.amount > NITRO_EPSILON
    }

    /// Flat top-up (pickups, boost pads)
    pub fn top_up(&mut self, amount: f32) {
        self.amount = (self.amount + amount).clamp(0.0, self.max);
    }

    /// Rate-based top-up (passive regen, drafting, drifting)
    pub fn regen(&mut self, per_second: f32, dt: f32) {
        self.top_up(per_second * dt);
    }

    /// Burn at `per_second`, flooring at zero
    pub fn drain(&mut self, per_second: f32, dt: f32) {
        self.amount = (self.amount - per_second * dt).clamp(0.0, self.max);
    }

    pub fn set(&mut self, amount: f32) {
        self.amount = amount.clamp(0.0, self.max);
    }
}
