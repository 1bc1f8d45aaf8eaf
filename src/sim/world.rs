//! Streamed world: one pool per entity kind

use rand::Rng;

use super::ai;
use super::pool::{
    AiDriver, EntityKind, EntityPayload, ObstacleShape, PickupKind, Placement, Pool, Recycle,
    TrackEntity,
};
use crate::tuning::Tuning;

/// Depth spacing between consecutive boost pads in the initial layout
const BOOST_PAD_SPACING: f32 = 200.0;
/// Boost pads sit closer to the centre than other spawns
const BOOST_PAD_LATERAL_SCALE: f32 = 0.6;
/// Scenery posts stand this far outside the road edge
const SCENERY_EDGE_OFFSET: f32 = 0.5;
/// Depth of the first scenery post
const SCENERY_START_DEPTH: f32 = 10.0;

/// Every streamed entity in the session
#[derive(Debug, Clone)]
pub struct World {
    pub obstacles: Pool,
    pub pickups: Pool,
    pub ai_cars: Pool,
    pub boost_pads: Pool,
    pub scenery: Pool,
    pub placement: Placement,
    period: f32,
    ai_speed_min: f32,
    ai_speed_max: f32,
}

impl World {
    /// Allocate and lay out every pool. Ids are taken from `next_id`.
    pub fn new<R: Rng>(tuning: &Tuning, rng: &mut R, next_id: &mut u32) -> Self {
        let w = &tuning.world;
        let g = &tuning.gameplay;
        let placement = Placement {
            road_width: w.road_width,
            spawn_near: w.spawn_near,
            spawn_far: w.spawn_far,
        };
        let mut alloc_id = || {
            let id = *next_id;
            *next_id += 1;
            id
        };

        let obstacles = (0..g.obstacle_count)
            .map(|i| TrackEntity {
                id: alloc_id(),
                depth: placement.depth(rng),
                lateral: placement.lateral(rng),
                payload: EntityPayload::Obstacle {
                    shape: ObstacleShape::for_slot(i),
                },
            })
            .collect();

        let pickups = (0..g.pickup_count)
            .map(|i| TrackEntity {
                id: alloc_id(),
                depth: placement.depth(rng),
                lateral: placement.lateral(rng),
                payload: EntityPayload::Pickup {
                    kind: PickupKind::for_slot(i),
                },
            })
            .collect();

        let ai_cars = (0..g.ai_car_count)
            .map(|_| {
                let mut car = TrackEntity {
                    id: alloc_id(),
                    depth: 0.0,
                    lateral: 0.0,
                    payload: EntityPayload::AiCar(AiDriver {
                        base_speed: g.ai_speed_min,
                        target_lane: 0.0,
                    }),
                };
                ai::respawn(&mut car, &placement, g.ai_speed_min, g.ai_speed_max, rng);
                car
            })
            .collect();

        let boost_pads = (0..g.boost_pad_count)
            .map(|i| {
                let lateral = placement.lateral(rng) * BOOST_PAD_LATERAL_SCALE;
                let depth = placement.depth(rng) + BOOST_PAD_SPACING * i as f32;
                TrackEntity {
                    id: alloc_id(),
                    depth,
                    lateral,
                    payload: EntityPayload::BoostPad,
                }
            })
            .collect();

        let per_side = g.scenery_posts_per_side;
        let spacing = w.track_period / per_side.max(1) as f32;
        let scenery = [-1.0_f32, 1.0]
            .into_iter()
            .flat_map(|side| (0..per_side).map(move |i| (side, i)))
            .map(|(side, i)| TrackEntity {
                id: alloc_id(),
                depth: SCENERY_START_DEPTH + spacing * i as f32,
                lateral: side * (w.road_width * 0.5 + SCENERY_EDGE_OFFSET),
                payload: EntityPayload::Scenery { side },
            })
            .collect();

        Self {
            obstacles: Pool::new(EntityKind::Obstacle, obstacles),
            pickups: Pool::new(EntityKind::Pickup, pickups),
            ai_cars: Pool::new(EntityKind::AiCar, ai_cars),
            boost_pads: Pool::new(EntityKind::BoostPad, boost_pads),
            scenery: Pool::new(EntityKind::Scenery, scenery),
            placement,
            period: w.track_period,
            ai_speed_min: g.ai_speed_min,
            ai_speed_max: g.ai_speed_max,
        }
    }

    pub fn pool(&self, kind: EntityKind) -> &Pool {
        match kind {
            EntityKind::Obstacle => &self.obstacles,
            EntityKind::Pickup => &self.pickups,
            EntityKind::AiCar => &self.ai_cars,
            EntityKind::BoostPad => &self.boost_pads,
            EntityKind::Scenery => &self.scenery,
        }
    }

    /// All pools in a fixed order
    pub fn pools(&self) -> [&Pool; 5] {
        [
            &self.obstacles,
            &self.pickups,
            &self.ai_cars,
            &self.boost_pads,
            &self.scenery,
        ]
    }

    /// Total number of entity slots
    pub fn entity_count(&self) -> usize {
        self.pools().iter().map(|p| p.len()).sum()
    }

    /// Stream the static pools toward the camera by `dz` and recycle whatever
    /// passed. AI cars move on their own (see `ai::update`). Returns the
    /// number of recycled entities.
    pub fn advance<R: Rng>(&mut self, dz: f32, rng: &mut R) -> usize {
        let placement = self.placement;
        let period = self.period;
        let mut recycled = 0;

        for pool in [
            &mut self.obstacles,
            &mut self.pickups,
            &mut self.boost_pads,
            &mut self.scenery,
        ] {
            pool.advance(dz);
            recycled += match pool.kind().recycle() {
                Recycle::Respawn => pool.recycle_passed(|e| placement.place(e, rng)),
                Recycle::Wrap => pool.wrap_passed(period),
            };
        }
        recycled
    }

    /// Respawn one obstacle, pickup or AI car slot. Pads and scenery only wrap.
    pub fn respawn<R: Rng>(&mut self, kind: EntityKind, index: usize, rng: &mut R) {
        let placement = self.placement;
        let (min, max) = (self.ai_speed_min, self.ai_speed_max);
        let pool = match kind {
            EntityKind::Obstacle => &mut self.obstacles,
            EntityKind::Pickup => &mut self.pickups,
            EntityKind::AiCar => &mut self.ai_cars,
            EntityKind::BoostPad | EntityKind::Scenery => return,
        };
        if let Some(entity) = pool.get_mut(index) {
            if kind == EntityKind::AiCar {
                ai::respawn(entity, &placement, min, max, rng);
            } else {
                placement.place(entity, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world() -> (World, u32) {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut next_id = 1;
        let world = World::new(&Tuning::default(), &mut rng, &mut next_id);
        (world, next_id)
    }

    #[test]
    fn test_initial_cardinality() {
        let (world, next_id) = world();
        assert_eq!(world.obstacles.len(), 24);
        assert_eq!(world.pickups.len(), 10);
        assert_eq!(world.ai_cars.len(), 5);
        assert_eq!(world.boost_pads.len(), 6);
        assert_eq!(world.scenery.len(), 80);
        assert_eq!(next_id as usize, world.entity_count() + 1);
    }

    #[test]
    fn test_ids_unique() {
        let (world, _) = world();
        let mut ids: Vec<u32> = world
            .pools()
            .iter()
            .flat_map(|p| p.iter().map(|e| e.id))
            .collect();
        let n = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn test_initial_layout() {
        let (world, _) = world();
        for e in world.scenery.iter() {
            assert_eq!(e.lateral.abs(), 14.5);
        }
        assert_eq!(world.scenery.get(1).unwrap().depth, 40.0);
        for e in world.boost_pads.iter() {
            assert!(e.lateral.abs() <= (14.0 - 1.2) * 0.6 + 1e-4);
        }
        for e in world.obstacles.iter().chain(world.pickups.iter()) {
            assert!(e.depth >= 80.0 && e.depth <= 800.0);
        }
    }

    #[test]
    fn test_advance_keeps_everything_ahead_of_near_plane() {
        let (mut world, _) = world();
        let mut rng = Pcg32::seed_from_u64(5);
        let before = world.entity_count();
        for _ in 0..2000 {
            world.advance(1.5, &mut rng);
        }
        assert_eq!(world.entity_count(), before);
        for pool in world.pools() {
            if pool.kind() == EntityKind::AiCar {
                continue;
            }
            let near = pool.kind().near_plane();
            assert!(pool.iter().all(|e| e.depth >= near));
        }
    }

    #[test]
    fn test_respawn_obstacle_moves_it() {
        let (mut world, _) = world();
        let mut rng = Pcg32::seed_from_u64(8);
        world.obstacles.get_mut(0).unwrap().depth = -2.0;
        world.respawn(EntityKind::Obstacle, 0, &mut rng);
        assert!(world.obstacles.get(0).unwrap().depth >= 80.0);
    }
}
