//! Axis-aligned box collisions between the player and streamed entities
//!
//! Everything is tested in track-relative space (lateral, height, depth), so
//! road curvature never opens or closes a gap. Rotation is ignored on
//! purpose: hits are forgiving.

use glam::Vec3;

use super::pool::{EntityKind, EntityPayload, PickupKind, TrackEntity};
use super::state::GameState;
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half: Vec3) -> Self {
        Self { center, half }
    }

    pub fn of_entity(entity: &TrackEntity) -> Self {
        Self::new(entity.box_center(), entity.kind().half_extents())
    }

    /// Touching boxes count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let gap = (self.center - other.center).abs();
        let reach = self.half + other.half;
        gap.cmple(reach).all()
    }
}

/// The obstacle or AI car struck this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub kind: EntityKind,
    pub id: u32,
}

/// Everything collision resolution changed this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionOutcome {
    pub hit: Option<Hit>,
    pub pickup: Option<PickupKind>,
    pub boost_pad: bool,
}

/// Player collision box
pub fn player_box(state: &GameState) -> Aabb {
    Aabb::new(
        Vec3::new(state.player.x, 0.0, PLAYER_DEPTH),
        state.player.half_extents,
    )
}

fn first_overlap<'a>(
    player: &Aabb,
    mut entities: impl Iterator<Item = &'a TrackEntity>,
) -> Option<usize> {
    entities.position(|e| player.overlaps(&Aabb::of_entity(e)))
}

/// Detect and resolve this tick's collisions.
///
/// Obstacles are checked before AI cars and at most one of them is resolved.
/// Pickups and boost pads are handled independently of that slot.
pub fn resolve_collisions(state: &mut GameState) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let player = player_box(state);

    let struck = first_overlap(&player, state.world.obstacles.iter())
        .map(|i| (EntityKind::Obstacle, i))
        .or_else(|| {
            first_overlap(&player, state.world.ai_cars.iter()).map(|i| (EntityKind::AiCar, i))
        });

    if let Some((kind, index)) = struck {
        let id = state.world.pool(kind).get(index).map_or(0, |e| e.id);
        state.score.apply_penalty(state.tuning.gameplay.hit_penalty);
        state.player.speed = (state.player.speed * 0.5).max(0.0);
        state.camera_shake = (state.camera_shake + CAMERA_SHAKE_PER_HIT).min(CAMERA_SHAKE_MAX);
        state.world.respawn(kind, index, &mut state.rng);
        log::debug!("Hit {:?} #{} at speed {:.1}", kind, id, state.player.speed);
        outcome.hit = Some(Hit { kind, id });
    }

    if let Some(index) = first_overlap(&player, state.world.pickups.iter()) {
        let kind = state.world.pickups.get(index).and_then(|e| match e.payload {
            EntityPayload::Pickup { kind } => Some(kind),
            _ => None,
        });
        let gameplay = &state.tuning.gameplay;
        match kind {
            Some(PickupKind::Nitro) => state.player.nitro.top_up(gameplay.pickup_nitro_amount),
            Some(PickupKind::Score) => state.score.add_bonus(gameplay.pickup_score_amount),
            None => {}
        }
        state.world.respawn(EntityKind::Pickup, index, &mut state.rng);
        outcome.pickup = kind;
    }

    if state
        .world
        .boost_pads
        .iter()
        .any(|pad| player.overlaps(&Aabb::of_entity(pad)))
    {
        let cap = state.speed_cap();
        state.player.speed = (state.player.speed + BOOST_PAD_SPEED).clamp(0.0, cap.max(0.0));
        state.player.nitro.top_up(BOOST_PAD_NITRO);
        outcome.boost_pad = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Session with every streamed entity parked far ahead
    fn clear_road() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        for e in state.world.obstacles.iter_mut() {
            e.depth = 500.0;
        }
        for e in state.world.pickups.iter_mut() {
            e.depth = 500.0;
        }
        for e in state.world.ai_cars.iter_mut() {
            e.depth = 500.0;
        }
        for e in state.world.boost_pads.iter_mut() {
            e.depth = 500.0;
        }
        state
    }

    #[test]
    fn test_aabb_inclusive() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let touching = Aabb::new(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        let apart = Aabb::new(Vec3::new(2.01, 0.0, 0.0), Vec3::ONE);
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_obstacle_hit_penalises_once() {
        let mut state = clear_road();
        state.score.add_bonus(400.0);
        state.player.speed = 60.0;
        let struck_id = {
            let e = state.world.obstacles.get_mut(0).unwrap();
            e.depth = PLAYER_DEPTH;
            e.lateral = 0.0;
            e.id
        };
        // A second obstacle in the same spot is ignored this tick
        {
            let e = state.world.obstacles.get_mut(1).unwrap();
            e.depth = PLAYER_DEPTH;
            e.lateral = 0.0;
        }

        let outcome = resolve_collisions(&mut state);
        assert_eq!(
            outcome.hit,
            Some(Hit {
                kind: EntityKind::Obstacle,
                id: struck_id
            })
        );
        assert_eq!(state.score.score(), 250.0);
        assert_eq!(state.player.speed, 30.0);
        assert!((state.camera_shake - CAMERA_SHAKE_PER_HIT).abs() < 1e-6);
        assert!(state.world.obstacles.get(0).unwrap().depth >= 80.0);
        assert_eq!(state.world.obstacles.get(1).unwrap().depth, PLAYER_DEPTH);
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let mut state = clear_road();
        state.score.add_bonus(20.0);
        let e = state.world.obstacles.get_mut(3).unwrap();
        e.depth = PLAYER_DEPTH + 1.0;
        e.lateral = 0.5;
        resolve_collisions(&mut state);
        assert_eq!(state.score.score(), 0.0);
    }

    #[test]
    fn test_obstacle_beats_ai() {
        let mut state = clear_road();
        for pool in [&mut state.world.obstacles, &mut state.world.ai_cars] {
            let e = pool.get_mut(0).unwrap();
            e.depth = PLAYER_DEPTH;
            e.lateral = 0.0;
        }
        let outcome = resolve_collisions(&mut state);
        assert_eq!(outcome.hit.map(|h| h.kind), Some(EntityKind::Obstacle));
        assert_eq!(state.world.ai_cars.get(0).unwrap().depth, PLAYER_DEPTH);
    }

    #[test]
    fn test_ai_hit_respawns_car() {
        let mut state = clear_road();
        let e = state.world.ai_cars.get_mut(2).unwrap();
        e.depth = PLAYER_DEPTH;
        e.lateral = 0.0;
        let outcome = resolve_collisions(&mut state);
        assert_eq!(outcome.hit.map(|h| h.kind), Some(EntityKind::AiCar));
        let car = state.world.ai_cars.get(2).unwrap();
        assert!(car.depth >= 80.0);
        assert_eq!(car.ai().unwrap().target_lane, car.lateral);
    }

    #[test]
    fn test_pickup_and_hit_same_tick() {
        let mut state = clear_road();
        state.player.nitro.set(10.0);
        for pool in [&mut state.world.obstacles, &mut state.world.pickups] {
            let e = pool.get_mut(0).unwrap();
            e.depth = PLAYER_DEPTH;
            e.lateral = 0.0;
        }
        assert!(matches!(
            state.world.pickups.get(0).unwrap().payload,
            EntityPayload::Pickup {
                kind: PickupKind::Nitro
            }
        ));
        let outcome = resolve_collisions(&mut state);
        assert!(outcome.hit.is_some());
        assert_eq!(outcome.pickup, Some(PickupKind::Nitro));
        assert_eq!(state.player.nitro.amount(), 45.0);
    }

    #[test]
    fn test_score_pickup() {
        let mut state = clear_road();
        let e = state.world.pickups.get_mut(1).unwrap();
        e.depth = PLAYER_DEPTH;
        e.lateral = 0.0;
        let outcome = resolve_collisions(&mut state);
        assert_eq!(outcome.pickup, Some(PickupKind::Score));
        assert_eq!(state.score.score(), 200.0);
    }

    #[test]
    fn test_boost_pad_clamped_to_cap() {
        let mut state = clear_road();
        let cap = state.speed_cap();
        state.player.speed = cap - 2.0;
        state.player.nitro.set(50.0);
        let pad = state.world.boost_pads.get_mut(0).unwrap();
        pad.depth = PLAYER_DEPTH;
        pad.lateral = 1.0;
        let outcome = resolve_collisions(&mut state);
        assert!(outcome.boost_pad);
        assert_eq!(state.player.speed, cap);
        assert_eq!(state.player.nitro.amount(), 60.0);
        assert!(outcome.hit.is_none());
    }

    #[test]
    fn test_boost_pad_never_reverses() {
        let mut state = clear_road();
        // Hand-built tuning that skipped sanitizing
        state.tuning.gameplay.nitro_boost = -200.0;
        state.player.speed = 10.0;
        let pad = state.world.boost_pads.get_mut(0).unwrap();
        pad.depth = PLAYER_DEPTH;
        pad.lateral = 0.0;
        let outcome = resolve_collisions(&mut state);
        assert!(outcome.boost_pad);
        assert!(state.player.speed >= 0.0, "speed {}", state.player.speed);
    }
}
