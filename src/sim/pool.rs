//! Fixed-capacity entity pools
//!
//! Each entity kind lives in its own pool, allocated once per session. The
//! world streams toward the player by lowering every entity's depth; an entity
//! that falls behind its kind's near plane is recycled in place (respawned
//! ahead or wrapped forward by one track period). Slots are never added or
//! removed, so ids stay stable for the whole session.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::track::TrackPath;

/// Distance from the road edge that spawns keep clear of
const SPAWN_EDGE_MARGIN: f32 = 1.2;
/// Lateral band around the centre line considered the player's home lane
const HOME_LANE_HALF_WIDTH: f32 = 2.2;
/// Push applied to spawns that land in the home lane
const HOME_LANE_PUSH: f32 = 2.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Pickup,
    AiCar,
    BoostPad,
    Scenery,
}

/// What happens to an entity that falls behind the near plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recycle {
    /// Fresh random placement ahead
    Respawn,
    /// Same lateral slot, pushed forward by one track period
    Wrap,
}

impl EntityKind {
    /// Depth below which an entity is behind the camera
    pub fn near_plane(self) -> f32 {
        match self {
            EntityKind::Obstacle | EntityKind::Pickup => -6.0,
            EntityKind::AiCar => -8.0,
            EntityKind::BoostPad | EntityKind::Scenery => -10.0,
        }
    }

    pub fn recycle(self) -> Recycle {
        match self {
            EntityKind::Obstacle | EntityKind::Pickup | EntityKind::AiCar => Recycle::Respawn,
            EntityKind::BoostPad | EntityKind::Scenery => Recycle::Wrap,
        }
    }

    /// Collision half-extents (lateral, height, depth)
    pub fn half_extents(self) -> Vec3 {
        match self {
            EntityKind::Obstacle => Vec3::new(0.9, 0.6, 0.9),
            EntityKind::Pickup => Vec3::splat(0.5),
            EntityKind::AiCar => Vec3::new(0.9, 0.6, 1.4),
            EntityKind::BoostPad => Vec3::new(2.0, 0.1, 3.0),
            EntityKind::Scenery => Vec3::new(0.08, 0.3, 0.08),
        }
    }

    /// Resting height above the road surface
    pub fn base_height(self) -> f32 {
        match self {
            EntityKind::Obstacle | EntityKind::Pickup => 0.6,
            EntityKind::AiCar => 0.0,
            EntityKind::BoostPad => 0.02,
            EntityKind::Scenery => 0.3,
        }
    }

    /// How strongly the entity follows road elevation
    pub fn vertical_scale(self) -> f32 {
        match self {
            EntityKind::Obstacle | EntityKind::Pickup => 0.25,
            EntityKind::AiCar | EntityKind::Scenery => 0.2,
            EntityKind::BoostPad => 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleShape {
    Block,
    Cylinder,
    Cone,
}

impl ObstacleShape {
    /// Shapes repeat in slot order
    pub fn for_slot(index: usize) -> Self {
        match index % 3 {
            0 => ObstacleShape::Block,
            1 => ObstacleShape::Cylinder,
            _ => ObstacleShape::Cone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Nitro,
    Score,
}

impl PickupKind {
    /// Even slots carry nitro, odd slots score
    pub fn for_slot(index: usize) -> Self {
        if index % 2 == 0 {
            PickupKind::Nitro
        } else {
            PickupKind::Score
        }
    }
}

/// Per-car AI state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiDriver {
    /// Own forward speed before the difficulty bonus (m/s)
    pub base_speed: f32,
    /// Lateral offset the car is steering toward
    pub target_lane: f32,
}

/// Kind-specific data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityPayload {
    Obstacle { shape: ObstacleShape },
    Pickup { kind: PickupKind },
    AiCar(AiDriver),
    BoostPad,
    /// Roadside post; `side` is -1 (left) or 1 (right)
    Scenery { side: f32 },
}

impl EntityPayload {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPayload::Obstacle { .. } => EntityKind::Obstacle,
            EntityPayload::Pickup { .. } => EntityKind::Pickup,
            EntityPayload::AiCar(_) => EntityKind::AiCar,
            EntityPayload::BoostPad => EntityKind::BoostPad,
            EntityPayload::Scenery { .. } => EntityKind::Scenery,
        }
    }
}

/// One streamed world object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackEntity {
    pub id: u32,
    /// Distance ahead of the camera plane (negative = behind)
    pub depth: f32,
    /// Offset from the track centre line
    pub lateral: f32,
    pub payload: EntityPayload,
}

impl TrackEntity {
    pub fn kind(&self) -> EntityKind {
        self.payload.kind()
    }

    /// Collision box centre in track-relative space
    pub fn box_center(&self) -> Vec3 {
        Vec3::new(self.lateral, self.kind().base_height(), self.depth)
    }

    /// Render position: stored offsets composed with the path at this depth
    pub fn position(&self, path: &TrackPath, progress: f64) -> Vec3 {
        let kind = self.kind();
        Vec3::new(
            self.lateral + path.path_x(self.depth),
            kind.base_height() + path.path_y(self.depth, progress) * kind.vertical_scale(),
            self.depth,
        )
    }

    pub fn ai(&self) -> Option<&AiDriver> {
        match &self.payload {
            EntityPayload::AiCar(driver) => Some(driver),
            _ => None,
        }
    }

    pub fn ai_mut(&mut self) -> Option<&mut AiDriver> {
        match &mut self.payload {
            EntityPayload::AiCar(driver) => Some(driver),
            _ => None,
        }
    }
}

/// Random spawn placement shared by every respawning kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub road_width: f32,
    pub spawn_near: f32,
    pub spawn_far: f32,
}

impl Placement {
    /// Lateral offset anywhere on the road except the player's home lane
    pub fn lateral<R: Rng>(&self, rng: &mut R) -> f32 {
        let half = (self.road_width * 0.5 - SPAWN_EDGE_MARGIN).max(0.0);
        let mut x = (rng.random::<f32>() * 2.0 - 1.0) * half;
        if x.abs() < HOME_LANE_HALF_WIDTH {
            let side = if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else if rng.random::<f32>() > 0.5 {
                1.0
            } else {
                -1.0
            };
            x += side * HOME_LANE_PUSH;
        }
        x
    }

    /// Depth somewhere in the spawn window
    pub fn depth<R: Rng>(&self, rng: &mut R) -> f32 {
        self.spawn_near + rng.random::<f32>() * (self.spawn_far - self.spawn_near)
    }

    /// Move an entity to a fresh random spot
    pub fn place<R: Rng>(&self, entity: &mut TrackEntity, rng: &mut R) {
        entity.lateral = self.lateral(rng);
        entity.depth = self.depth(rng);
    }
}

/// Fixed set of entities of one kind
#[derive(Debug, Clone)]
pub struct Pool {
    kind: EntityKind,
    entities: Box<[TrackEntity]>,
}

impl Pool {
    /// Build a pool from its initial layout. The slice length is the capacity
    /// for the whole session.
    pub fn new(kind: EntityKind, entities: Vec<TrackEntity>) -> Self {
        debug_assert!(entities.iter().all(|e| e.kind() == kind));
        Self {
            kind,
            entities: entities.into_boxed_slice(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, TrackEntity> {
        self.entities.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&TrackEntity> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TrackEntity> {
        self.entities.get_mut(index)
    }

    /// Stream every entity toward the camera by `dz`
    pub fn advance(&mut self, dz: f32) {
        for entity in self.entities.iter_mut() {
            entity.depth -= dz;
        }
    }

    /// Hand every entity behind the near plane to `recycle`. Returns how many
    /// were recycled.
    pub fn recycle_passed<F>(&mut self, mut recycle: F) -> usize
    where
        F: FnMut(&mut TrackEntity),
    {
        let near = self.kind.near_plane();
        let mut count = 0;
        for entity in self.entities.iter_mut().filter(|e| e.depth < near) {
            recycle(entity);
            count += 1;
        }
        count
    }

    /// Push passed entities forward by whole track periods
    pub fn wrap_passed(&mut self, period: f32) -> usize {
        let near = self.kind.near_plane();
        let period = period.max(1.0);
        self.recycle_passed(|entity| {
            while entity.depth < near {
                entity.depth += period;
            }
        })
    }
}
