//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering, audio or storage dependencies

pub mod ai;
pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod drift;
pub mod nitro;
pub mod pool;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;
pub mod world;

pub use collision::{Aabb, CollisionOutcome, Hit, resolve_collisions};
pub use difficulty::DifficultyRamp;
pub use drift::DriftState;
pub use nitro::NitroGauge;
pub use pool::{
    AiDriver, EntityKind, EntityPayload, ObstacleShape, PickupKind, Placement, Pool, TrackEntity,
};
pub use scoring::ScoreState;
pub use snapshot::{EntityPose, HudView, PlayerPose, RoadProfile, WorldSnapshot};
pub use state::{Countdown, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use track::{TrackPath, TrackTheme};
pub use vehicle::{Controls, PlayerState};
pub use world::World;
