//! Level layout: floor, platforms, crate stacks and the player spawn.

use glam::Vec2;

use crate::components::PhysicsSprite;
use crate::config::Tuning;
use crate::physics::PhysicsWorld;

use super::prefabs::{spawn_crate, spawn_player, spawn_tile};

/// Everything a level puts into the world.
pub struct Level {
    pub statics: Vec<PhysicsSprite>,
    pub dynamics: Vec<PhysicsSprite>,
    pub actor: PhysicsSprite,
}

const FLOOR_START_X: i32 = -1000;
const FLOOR_END_X: i32 = 2000;

/// A row of tiles along y = S/2 from x = -1000 up to (not including) 2000.
pub fn create_floor<W: PhysicsWorld>(world: &mut W, tuning: &Tuning, out: &mut Vec<PhysicsSprite>) {
    let step = tuning.sprite_size.max(1.0) as usize;
    let y = tuning.sprite_size / 2.0;
    for x in (FLOOR_START_X..FLOOR_END_X).step_by(step) {
        out.push(spawn_tile(world, tuning, Vec2::new(x as f32, y)));
    }
}

/// Tiles from `start_x` to `start_x + count * S` inclusive, so `count + 1` of
/// them.
pub fn create_platform<W: PhysicsWorld>(
    world: &mut W,
    tuning: &Tuning,
    out: &mut Vec<PhysicsSprite>,
    start_x: f32,
    y: f32,
    count: u32,
) {
    for i in 0..=count {
        let x = start_x + i as f32 * tuning.sprite_size;
        out.push(spawn_tile(world, tuning, Vec2::new(x, y)));
    }
}

pub fn create_level_1<W: PhysicsWorld>(world: &mut W, tuning: &Tuning) -> Level {
    let s = tuning.sprite_size;
    let mut statics = Vec::new();
    let mut dynamics = Vec::new();

    create_floor(world, tuning, &mut statics);
    create_platform(world, tuning, &mut statics, 200.0, s * 3.0, 3);
    create_platform(world, tuning, &mut statics, 500.0, s * 6.0, 3);
    create_platform(world, tuning, &mut statics, 200.0, s * 9.0, 3);

    // Stairs of crates: column n holds n crates.
    for column in 0..6 {
        for row in 0..column {
            let x = 600.0 + column as f32 * s;
            let y = 1.5 * s + row as f32 * s;
            dynamics.push(spawn_crate(world, tuning, Vec2::new(x, y)));
        }
    }

    let actor = spawn_player(world, tuning, Vec2::new(50.0, 1.5 * s));

    log::info!(
        "Level 1 built: {} static tiles, {} crates",
        statics.len(),
        dynamics.len()
    );

    Level {
        statics,
        dynamics,
        actor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SpriteKind;
    use crate::physics::{BodyKind, BoxWorld};

    fn build() -> (BoxWorld, Level) {
        let tuning = Tuning::default();
        let mut world = BoxWorld::new(tuning.gravity, tuning.solver_iterations);
        let level = create_level_1(&mut world, &tuning);
        (world, level)
    }

    #[test]
    fn level_one_counts() {
        let (_, level) = build();
        // 47 floor tiles plus three platforms of four.
        assert_eq!(level.statics.len(), 47 + 3 * 4);
        assert_eq!(level.dynamics.len(), 15);
        assert!(level.statics.iter().all(|s| s.kind == SpriteKind::Static));
        assert!(level.dynamics.iter().all(|s| s.is_cullable()));
    }

    #[test]
    fn floor_top_is_one_tile_up() {
        let (world, level) = build();
        let floor = &level.statics[0];
        assert_eq!(world.position(floor.body), Vec2::new(-1000.0, 32.0));
        assert_eq!(world.shape_bounds(floor.shape).top(), 64.0);
        assert_eq!(world.body_kind(floor.body), BodyKind::Static);
    }

    #[test]
    fn crates_stack_from_the_floor() {
        let (world, level) = build();
        let first = &level.dynamics[0];
        assert_eq!(world.position(first.body), Vec2::new(664.0, 96.0));
        assert_eq!(world.friction(first.shape), 0.4);
        let tallest_top = level
            .dynamics
            .iter()
            .map(|c| world.shape_bounds(c.shape).top())
            .fold(f32::MIN, f32::max);
        assert_eq!(tallest_top, 64.0 + 5.0 * 64.0);
    }

    #[test]
    fn player_stands_on_the_floor() {
        let (world, level) = build();
        assert_eq!(world.position(level.actor.body), Vec2::new(50.0, 96.0));
        assert_eq!(world.shape_bounds(level.actor.shape).bottom(), 64.0);
        assert_eq!(world.body_kind(level.actor.body), BodyKind::Dynamic);
    }
}
