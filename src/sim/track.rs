//! Procedural track shape
//!
//! The road bends and climbs as a function of depth only. Lateral offset is a
//! damped polyline through a handful of control points, rebuilt when the theme
//! changes; elevation is evaluated directly from two harmonics plus a
//! periodic hill window. Both repeat every track period.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{fract, lerp, smoothstep};

/// Number of segments in the lateral polyline (control points = segments + 1)
pub const CURVE_SEGMENTS: usize = 6;

/// Damping toward the previous control point
const CONTROL_POINT_BLEND: f32 = 0.6;

/// Guards interpolation denominators near the period seam
const SEGMENT_EPSILON: f32 = 1e-6;

/// Rates at which world progress phase-shifts the two elevation harmonics
const ELEVATION_PHASE_RATE_1: f64 = 0.0006;
const ELEVATION_PHASE_RATE_2: f64 = 0.0003;

/// Curvature and elevation parameters for one track style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackTheme {
    pub name: String,
    /// First curvature harmonic amplitude (fraction of road width)
    pub x_a1: f32,
    /// First curvature harmonic frequency; zero selects the half-rate harmonic
    pub x_f1: f32,
    /// Second curvature harmonic amplitude (fraction of road width)
    pub x_a2: f32,
    /// Second curvature harmonic frequency; zero selects the quarter-rate harmonic
    pub x_f2: f32,
    /// Elevation amplitude in metres
    pub y_a: f32,
}

impl Default for TrackTheme {
    fn default() -> Self {
        Self {
            name: "Rolling Mix".to_string(),
            x_a1: 0.18,
            x_f1: 0.012,
            x_a2: 0.10,
            x_f2: 0.004,
            y_a: 0.08,
        }
    }
}

impl TrackTheme {
    /// Built-in themes in cycle order
    pub fn presets() -> Vec<TrackTheme> {
        vec![
            TrackTheme::default(),
            TrackTheme {
                name: "Straight Sprint".to_string(),
                x_a1: 0.0,
                x_f1: 0.0,
                x_a2: 0.0,
                x_f2: 0.0,
                y_a: 0.05,
            },
            TrackTheme {
                name: "Esses".to_string(),
                x_a1: 0.25,
                x_f1: 0.015,
                x_a2: 0.15,
                x_f2: 0.005,
                y_a: 0.08,
            },
            TrackTheme {
                name: "Big Hills".to_string(),
                x_a1: 0.1,
                x_f1: 0.008,
                x_a2: 0.05,
                x_f2: 0.003,
                y_a: 0.22,
            },
        ]
    }
}

/// One knot of the lateral polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPoint {
    pub depth: f32,
    pub x: f32,
}

/// Sampled track shape for the active theme
#[derive(Debug, Clone)]
pub struct TrackPath {
    theme: TrackTheme,
    road_width: f32,
    period: f32,
    points: [ControlPoint; CURVE_SEGMENTS + 1],
}

impl TrackPath {
    pub fn new(theme: TrackTheme, road_width: f32, period: f32) -> Self {
        let mut path = Self {
            theme,
            road_width,
            period,
            points: [ControlPoint { depth: 0.0, x: 0.0 }; CURVE_SEGMENTS + 1],
        };
        path.rebuild_points();
        path
    }

    /// Swap the theme and rebuild the control points
    pub fn set_theme(&mut self, theme: TrackTheme) {
        self.theme = theme;
        self.rebuild_points();
    }

    pub fn theme(&self) -> &TrackTheme {
        &self.theme
    }

    pub fn road_width(&self) -> f32 {
        self.road_width
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    fn rebuild_points(&mut self) {
        let seg_len = self.period / CURVE_SEGMENTS as f32;
        let m1 = if self.theme.x_f1 != 0.0 { 1.0 } else { 0.5 };
        let m2 = if self.theme.x_f2 != 0.0 { 1.0 } else { 0.25 };

        let mut prev_x = 0.0;
        for (i, point) in self.points.iter_mut().enumerate() {
            let t = i as f32 / CURVE_SEGMENTS as f32;
            let target = (t * TAU * m1).sin() * self.road_width * self.theme.x_a1
                + (t * 2.0 * TAU * m2).sin() * self.road_width * self.theme.x_a2;
            let x = lerp(prev_x, target, CONTROL_POINT_BLEND);
            *point = ControlPoint {
                depth: i as f32 * seg_len,
                x,
            };
            prev_x = x;
        }
        // Close the loop so the path is seamless across periods
        self.points[CURVE_SEGMENTS].x = self.points[0].x;
    }

    /// Lateral centre-line offset at `depth`
    pub fn path_x(&self, depth: f32) -> f32 {
        let d = depth.rem_euclid(self.period);
        let seg_len = self.period / CURVE_SEGMENTS as f32;
        let i = ((d / seg_len) as usize).min(CURVE_SEGMENTS - 1);
        let (a, b) = (self.points[i], self.points[i + 1]);
        let t = (d - a.depth) / (b.depth - a.depth + SEGMENT_EPSILON);
        lerp(a.x, b.x, t.clamp(0.0, 1.0))
    }

    /// Road elevation at `depth`, phase-shifted by total world progress
    pub fn path_y(&self, depth: f32, progress: f64) -> f32 {
        let ay = self.theme.y_a;
        let t = depth.rem_euclid(self.period) / self.period;
        let phase1 = (progress * ELEVATION_PHASE_RATE_1).fract() as f32;
        let phase2 = (progress * ELEVATION_PHASE_RATE_2).fract() as f32;

        let mut y = ((t + phase1) * TAU).sin() * ay + ((t * 2.0 + phase2) * TAU).sin() * ay * 0.5;

        // One smooth up-then-down hill per third of the period
        let ramp_phase = fract((t + 0.1) * 3.0);
        let up = smoothstep(0.15, 0.35, ramp_phase);
        let down = 1.0 - smoothstep(0.55, 0.75, ramp_phase);
        y += (up * down).max(0.0) * ay * 0.9;
        y
    }
}
