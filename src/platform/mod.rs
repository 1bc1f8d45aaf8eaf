//! Platform abstraction layer
//!
//! Owns the per-frame loop that sits between a host (browser animation frame,
//! native headless loop) and the simulation:
//! - Frame delta clamping
//! - One tick per frame, edge inputs cleared afterwards
//! - Best score persistence
//! - Audio cue dispatch and renderer snapshots

use serde::Serialize;

use crate::audio::{AudioFrame, AudioManager, AudioSink, BufferedAudio, EngineMix};
use crate::consts::MAX_FRAME_DT;
use crate::persistence::KvStore;
use crate::sim::{GameEvent, GameState, TickInput, TrackPath, WorldSnapshot, tick};

/// Something that draws a frame
pub trait Renderer {
    fn render(&mut self, snapshot: &WorldSnapshot, path: &TrackPath);
}

/// Renderer that keeps the last snapshot instead of drawing it
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    last: Option<WorldSnapshot>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last(&self) -> Option<&WorldSnapshot> {
        self.last.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, snapshot: &WorldSnapshot, _path: &TrackPath) {
        self.frames += 1;
        self.last = Some(snapshot.clone());
    }
}

/// One frame as handed to a host that draws and plays sound itself
#[derive(Debug, Serialize)]
pub struct FramePacket<'a> {
    pub snapshot: Option<&'a WorldSnapshot>,
    pub audio: AudioFrame,
}

/// Converts host timestamps (milliseconds) into clamped frame deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, clamped to [0, MAX_FRAME_DT].
    /// The first frame is zero.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

/// Map a keyboard `code` (DOM `KeyboardEvent.code` naming) onto the input.
/// Returns false for keys the game does not use.
pub fn apply_key(input: &mut TickInput, code: &str, down: bool) -> bool {
    match code {
        "KeyW" | "ArrowUp" => input.accelerate = down,
        "KeyS" | "ArrowDown" => input.brake = down,
        "KeyA" | "ArrowLeft" => input.steer_left = down,
        "KeyD" | "ArrowRight" => input.steer_right = down,
        "Space" => input.nitro = down,
        // Edge commands fire on press only
        "Enter" => input.start |= down,
        "KeyP" | "Escape" => input.pause |= down,
        "KeyR" => input.restart |= down,
        "KeyT" => input.cycle_theme |= down,
        _ => return false,
    }
    true
}

/// Frame loop wiring the simulation to its collaborators
pub struct Driver<S: KvStore, A: AudioSink, R: Renderer> {
    state: GameState,
    input: TickInput,
    clock: FrameClock,
    store: S,
    audio: AudioManager<A>,
    renderer: R,
}

impl<S: KvStore, A: AudioSink, R: Renderer> Driver<S, A, R> {
    pub fn new(state: GameState, store: S, audio: A, renderer: R) -> Self {
        Self {
            state,
            input: TickInput::default(),
            clock: FrameClock::new(),
            store,
            audio: AudioManager::new(audio),
            renderer,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Input for the next frame. Held keys stay set until released; edge
    /// commands are cleared after the frame consumes them.
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<A> {
        &mut self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The host lost focus or visibility; pause if racing and drop the stale
    /// timestamp so the next frame does not see a huge delta
    pub fn suspend(&mut self) {
        if self.state.phase == crate::sim::GamePhase::Running {
            self.input.pause = true;
        }
        self.clock.reset();
    }

    /// Run one frame at host time `now_ms`. Returns the events it produced.
    pub fn frame(&mut self, now_ms: f64) -> &[GameEvent] {
        let dt = self.clock.delta(now_ms);
        tick(&mut self.state, &self.input, dt);
        self.input.clear_edges();

        let save = self.state.events.iter().any(|e| {
            matches!(
                e,
                GameEvent::BestScoreImproved { .. } | GameEvent::SessionEnded { .. }
            )
        });
        if save {
            let best = self.state.score.best();
            if let Err(e) = best.save(&mut self.store) {
                log::warn!("Failed to save best score: {}", e);
            }
        }

        self.audio
            .dispatch(&self.state.events, EngineMix::from_state(&self.state));

        let snapshot = WorldSnapshot::capture(&self.state);
        self.renderer.render(&snapshot, &self.state.path);

        &self.state.events
    }
}

impl<S: KvStore> Driver<S, BufferedAudio, HeadlessRenderer> {
    /// Run one frame and serialize its snapshot together with the cues it played
    pub fn frame_json(&mut self, now_ms: f64) -> Result<String, serde_json::Error> {
        self.frame(now_ms);
        let packet = FramePacket {
            audio: self.audio.sink_mut().take(),
            snapshot: self.renderer.last(),
        };
        serde_json::to_string(&packet)
    }
}
