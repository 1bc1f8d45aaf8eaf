//! Audio cues derived from simulation events
//!
//! The simulation never talks to an audio backend directly. Each frame the
//! driver maps that tick's `GameEvent`s to `SoundCue`s and hands them, plus a
//! continuous engine mix, to whatever `AudioSink` is attached.

use serde::Serialize;

use crate::sim::{EntityKind, GameEvent, GameState, PickupKind};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundCue {
    /// Throttle held
    Accelerating,
    /// Brake held
    Braking,
    /// Tyres sliding
    Drifting,
    /// Nitro burning
    NitroActive,
    /// Player hit an obstacle
    CrashObstacle,
    /// Player hit an AI car
    CrashCar,
    /// Nitro canister collected
    PickupNitro,
    /// Score token collected
    PickupScore,
    /// Drove over a boost pad
    BoostPad,
    /// One of 3-2-1
    CountdownBeep,
    /// GO
    RaceStart,
    /// Timer ran out
    SessionOver,
    /// New best score reached at the end of a session
    HighScore,
}

/// Map a simulation event to its sound, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match *event {
        GameEvent::Accelerating => Some(SoundCue::Accelerating),
        GameEvent::Braking => Some(SoundCue::Braking),
        GameEvent::Drifting => Some(SoundCue::Drifting),
        GameEvent::NitroActive => Some(SoundCue::NitroActive),
        GameEvent::Collision {
            kind: EntityKind::AiCar,
        } => Some(SoundCue::CrashCar),
        GameEvent::Collision { .. } => Some(SoundCue::CrashObstacle),
        GameEvent::PickupCollected {
            kind: PickupKind::Nitro,
        } => Some(SoundCue::PickupNitro),
        GameEvent::PickupCollected {
            kind: PickupKind::Score,
        } => Some(SoundCue::PickupScore),
        GameEvent::BoostPad => Some(SoundCue::BoostPad),
        GameEvent::CountdownStep { label: "GO", .. } => Some(SoundCue::RaceStart),
        GameEvent::CountdownStep { .. } => Some(SoundCue::CountdownBeep),
        GameEvent::SessionEnded {
            new_record: true, ..
        } => Some(SoundCue::HighScore),
        GameEvent::SessionEnded { .. } => Some(SoundCue::SessionOver),
        GameEvent::DriftMark { .. }
        | GameEvent::RaceStarted
        | GameEvent::Paused
        | GameEvent::Resumed
        | GameEvent::ThemeChanged { .. }
        | GameEvent::BestScoreImproved { .. } => None,
    }
}

/// Continuous engine and wind levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngineMix {
    /// Engine revs for the oscillator pitch
    pub rpm: f32,
    /// Engine gain (0 - ~0.8)
    pub engine_gain: f32,
    /// Wind noise gain
    pub wind_gain: f32,
}

impl EngineMix {
    pub fn from_state(state: &GameState) -> Self {
        let speed = state.player.speed;
        let max_speed = state.tuning.car.max_speed.max(1.0);
        let volume = (speed / (max_speed * 0.9)).min(0.65);
        let drifting = state.player.drift.is_drifting();
        Self {
            rpm: 500.0 + speed * 60.0,
            engine_gain: volume * if drifting { 1.25 } else { 1.0 },
            wind_gain: (volume - 0.25).max(0.0) * if drifting { 1.4 } else { 1.0 },
        }
    }
}

/// Audio backend
pub trait AudioSink {
    /// Play a one-shot (or refresh a looping) cue at `volume`
    fn play(&mut self, cue: SoundCue, volume: f32);
    /// Update the continuous engine sound
    fn set_engine(&mut self, mix: EngineMix);
}

/// Backend that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue, _volume: f32) {}
    fn set_engine(&mut self, _mix: EngineMix) {}
}

/// Backend that logs one-shot cues (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        match cue {
            SoundCue::Accelerating | SoundCue::Braking | SoundCue::Drifting | SoundCue::NitroActive => {
                log::trace!("cue {:?} @ {:.2}", cue, volume)
            }
            _ => log::debug!("cue {:?} @ {:.2}", cue, volume),
        }
    }

    fn set_engine(&mut self, mix: EngineMix) {
        log::trace!("engine {:.0} rpm, gain {:.2}", mix.rpm, mix.engine_gain);
    }
}

/// A cue and the volume it was played at
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayedCue {
    pub cue: SoundCue,
    pub volume: f32,
}

/// Audio output of one frame, for a host that owns the real audio graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioFrame {
    pub cues: Vec<PlayedCue>,
    pub engine: EngineMix,
}

/// Backend that queues cues until the host collects them
#[derive(Debug, Clone, Default)]
pub struct BufferedAudio {
    pending: AudioFrame,
}

impl BufferedAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain queued cues. The engine mix stays at its latest value.
    pub fn take(&mut self) -> AudioFrame {
        AudioFrame {
            cues: std::mem::take(&mut self.pending.cues),
            engine: self.pending.engine,
        }
    }
}

impl AudioSink for BufferedAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        self.pending.cues.push(PlayedCue { cue, volume });
    }

    fn set_engine(&mut self, mix: EngineMix) {
        self.pending.engine = mix;
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Forward one tick's events and the engine mix to the sink
    pub fn dispatch(&mut self, events: &[GameEvent], mix: EngineMix) {
        let vol = self.effective_volume();
        let scale = if self.muted { 0.0 } else { self.master_volume };
        self.sink.set_engine(EngineMix {
            rpm: mix.rpm,
            engine_gain: mix.engine_gain * scale,
            wind_gain: mix.wind_gain * scale,
        });
        if vol <= 0.0 {
            return;
        }
        for cue in events.iter().filter_map(cue_for) {
            self.sink.play(cue, vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Recorder {
        cues: Vec<SoundCue>,
        engine: Option<EngineMix>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue, _volume: f32) {
            self.cues.push(cue);
        }
        fn set_engine(&mut self, mix: EngineMix) {
            self.engine = Some(mix);
        }
    }

    #[test]
    fn test_cue_mapping() {
        assert_eq!(
            cue_for(&GameEvent::Collision {
                kind: EntityKind::AiCar
            }),
            Some(SoundCue::CrashCar)
        );
        assert_eq!(
            cue_for(&GameEvent::CountdownStep {
                step: 3,
                label: "GO"
            }),
            Some(SoundCue::RaceStart)
        );
        assert_eq!(
            cue_for(&GameEvent::SessionEnded {
                score: 520,
                best: 520,
                new_record: true
            }),
            Some(SoundCue::HighScore)
        );
        // Tying an earlier best is not a record
        assert_eq!(
            cue_for(&GameEvent::SessionEnded {
                score: 500,
                best: 500,
                new_record: false
            }),
            Some(SoundCue::SessionOver)
        );
        assert_eq!(
            cue_for(&GameEvent::SessionEnded {
                score: 10,
                best: 500,
                new_record: false
            }),
            Some(SoundCue::SessionOver)
        );
        assert_eq!(cue_for(&GameEvent::DriftMark { lateral: 1.0 }), None);
    }

    #[test]
    fn test_engine_mix() {
        let mut state = crate::sim::GameState::new(1, Tuning::default());
        state.player.speed = 81.0;
        let mix = EngineMix::from_state(&state);
        assert_eq!(mix.rpm, 500.0 + 81.0 * 60.0);
        assert!((mix.engine_gain - 0.65).abs() < 1e-6);
        assert!((mix.wind_gain - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_muted_still_updates_engine() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.dispatch(&[GameEvent::BoostPad], EngineMix::default());
        assert!(audio.sink().cues.is_empty());
        assert!(audio.sink().engine.is_some());

        audio.set_muted(false);
        audio.dispatch(&[GameEvent::BoostPad, GameEvent::RaceStarted], EngineMix::default());
        assert_eq!(audio.sink().cues, vec![SoundCue::BoostPad]);
    }

    #[test]
    fn test_buffered_audio_drains_cues() {
        let mut audio = AudioManager::new(BufferedAudio::new());
        let mix = EngineMix {
            rpm: 2000.0,
            engine_gain: 0.5,
            wind_gain: 0.25,
        };
        audio.dispatch(&[GameEvent::BoostPad, GameEvent::Braking], mix);

        let frame = audio.sink_mut().take();
        let cues: Vec<SoundCue> = frame.cues.iter().map(|p| p.cue).collect();
        assert_eq!(cues, vec![SoundCue::BoostPad, SoundCue::Braking]);
        assert!((frame.cues[0].volume - 0.8).abs() < 1e-6);
        assert!((frame.engine.engine_gain - 0.4).abs() < 1e-6);

        let again = audio.sink_mut().take();
        assert!(again.cues.is_empty());
        assert_eq!(again.engine, frame.engine);
    }
}
