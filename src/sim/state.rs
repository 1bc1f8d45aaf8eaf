//! Game state and core simulation types
//!
//! Every session variable lives in `GameState`; a restart rebuilds all of it
//! except the best score and the active theme.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{DifficultyRamp, max_speed_dynamic};
use super::pool::{EntityKind, PickupKind};
use super::scoring::ScoreState;
use super::track::TrackPath;
use super::vehicle::{PlayerState, SpeedLimits};
use super::world::World;
use crate::consts::*;
use crate::highscores::BestScore;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a start command
    Idle,
    /// Scripted 3-2-1-GO; controls and scoring disabled
    Countdown,
    /// Active gameplay
    Running,
    /// Frozen; only resume or restart are handled
    Paused,
    /// Timer ran out; waiting for restart
    Ended,
}

/// Semantic events emitted during a tick (consumed by audio/VFX/persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    Accelerating,
    Braking,
    NitroActive,
    Drifting,
    /// Tyre mark left by a rear wheel at this lateral offset
    DriftMark { lateral: f32 },
    Collision { kind: EntityKind },
    PickupCollected { kind: PickupKind },
    BoostPad,
    CountdownStep { step: usize, label: &'static str },
    RaceStarted,
    Paused,
    Resumed,
    ThemeChanged { index: usize },
    BestScoreImproved { best: u64 },
    SessionEnded {
        score: u64,
        best: u64,
        /// The session raised the stored best
        new_record: bool,
    },
}

/// Timed countdown table advanced by accumulated delta
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    step: usize,
    elapsed: f32,
}

impl Countdown {
    /// Index of the step being shown
    pub fn step(&self) -> usize {
        self.step
    }

    /// Label of the step being shown, `None` once finished
    pub fn label(&self) -> Option<&'static str> {
        COUNTDOWN_LABELS.get(self.step).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.step >= COUNTDOWN_LABELS.len()
    }

    /// Advance by `dt`, emitting a `CountdownStep` for every step entered.
    /// Time left over from one step carries into the next. Returns true once
    /// the final step has run out.
    pub fn advance(&mut self, dt: f32, events: &mut Vec<GameEvent>) -> bool {
        if self.is_finished() {
            return true;
        }
        self.elapsed += dt;
        while let Some(&duration) = COUNTDOWN_STEP_SECS.get(self.step) {
            if self.elapsed < duration {
                break;
            }
            self.elapsed -= duration;
            self.step += 1;
            if let Some(label) = self.label() {
                events.push(GameEvent::CountdownStep {
                    step: self.step,
                    label,
                });
            }
        }
        self.is_finished()
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub countdown: Countdown,
    /// Seconds left in the session
    pub remain: f32,
    pub difficulty: DifficultyRamp,
    pub player: PlayerState,
    pub score: ScoreState,
    pub world: World,
    pub path: TrackPath,
    /// Index into `tuning.themes`
    pub theme_index: usize,
    /// Distance travelled since the session started
    pub progress: f64,
    /// Presentational camera shake amount
    pub camera_shake: f32,
    /// Events emitted by the most recent tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut next_id = 1;
        let world = World::new(&tuning, &mut rng, &mut next_id);
        let theme = tuning.themes.first().cloned().unwrap_or_default();
        let path = TrackPath::new(theme, tuning.world.road_width, tuning.world.track_period);

        Self {
            seed,
            rng,
            player: PlayerState::new(tuning.gameplay.nitro_max),
            score: ScoreState::default(),
            world,
            path,
            theme_index: 0,
            phase: GamePhase::Idle,
            countdown: Countdown::default(),
            remain: SESSION_LENGTH_SECS,
            difficulty: DifficultyRamp::default(),
            progress: 0.0,
            camera_shake: 0.0,
            events: Vec::new(),
            time_ticks: 0,
            tuning,
        }
    }

    /// Seed the best score (usually loaded from storage)
    pub fn with_best(mut self, best: BestScore) -> Self {
        self.score = ScoreState::new(best);
        self
    }

    /// Rebuild every session variable. Keeps the best score, the active
    /// theme and the RNG stream.
    pub fn reset(&mut self) {
        let mut next_id = 1;
        self.world = World::new(&self.tuning, &mut self.rng, &mut next_id);
        self.player = PlayerState::new(self.tuning.gameplay.nitro_max);
        self.score.reset();
        self.countdown = Countdown::default();
        self.remain = SESSION_LENGTH_SECS;
        self.difficulty = DifficultyRamp::default();
        self.progress = 0.0;
        self.camera_shake = 0.0;
    }

    /// Full reset, then start the 3-2-1-GO sequence
    pub fn begin_countdown(&mut self) {
        self.reset();
        self.phase = GamePhase::Countdown;
        if let Some(label) = self.countdown.label() {
            self.events.push(GameEvent::CountdownStep { step: 0, label });
        }
        log::info!("Session starting (seed {})", self.seed);
    }

    /// Switch to the next track theme
    pub fn cycle_theme(&mut self) {
        let count = self.tuning.themes.len();
        if count == 0 {
            return;
        }
        self.theme_index = (self.theme_index + 1) % count;
        let theme = self.tuning.themes[self.theme_index].clone();
        log::info!("Track theme: {}", theme.name);
        self.path.set_theme(theme);
        self.events.push(GameEvent::ThemeChanged {
            index: self.theme_index,
        });
    }

    /// Whether driver input and scoring are live
    pub fn controls_enabled(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Top speed at the current difficulty, before nitro
    pub fn max_speed_dynamic(&self) -> f32 {
        max_speed_dynamic(self.tuning.car.max_speed, self.difficulty.coefficient())
    }

    /// Absolute speed ceiling including the nitro overspeed share
    pub fn speed_cap(&self) -> f32 {
        self.tuning.speed_cap(self.difficulty.coefficient())
    }

    pub fn speed_limits(&self) -> SpeedLimits {
        SpeedLimits {
            max_speed_dynamic: self.max_speed_dynamic(),
            speed_cap: self.speed_cap(),
        }
    }
}
