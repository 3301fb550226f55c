//! Removal of dynamic objects that fell out of the level.

use crate::components::PhysicsSprite;
use crate::physics::{BodyHandle, PhysicsWorld};

/// Detach and drop every cullable sprite whose body sits below `floor_y`.
///
/// `before_detach` runs for each doomed body while it is still in the world,
/// so joints and drags on it can be released first. Returns the removed
/// bodies in set order.
pub fn cull_fallen<W: PhysicsWorld>(
    world: &mut W,
    sprites: &mut Vec<PhysicsSprite>,
    floor_y: f32,
    mut before_detach: impl FnMut(&mut W, BodyHandle),
) -> Vec<BodyHandle> {
    let mut removed = Vec::new();
    for sprite in sprites.iter_mut() {
        if !sprite.is_cullable() || !sprite.has_body() {
            continue;
        }
        if world.position(sprite.body).y >= floor_y {
            continue;
        }
        before_detach(world, sprite.body);
        if sprite.detach(world) {
            log::debug!("culled {:?} at {}", sprite.body, sprite.position());
            removed.push(sprite.body);
        }
    }
    sprites.retain(|s| s.has_body());
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{SpriteKind, Transform2D};
    use crate::physics::{BodyKind, BoxWorld};
    use glam::{Vec2, Vec3};

    fn sprite(world: &mut BoxWorld, kind: SpriteKind, y: f32) -> PhysicsSprite {
        let body_kind = match kind {
            SpriteKind::Static => BodyKind::Static,
            SpriteKind::Dynamic => BodyKind::Dynamic,
        };
        let body = world.create_body(1.0, 1.0, body_kind);
        let shape = world.create_box_shape(body, 10.0, 10.0, 0.2);
        let center = Vec2::new(0.0, y);
        world.set_position(body, center);
        world.add_to_world(body, shape);
        PhysicsSprite {
            kind,
            body,
            shape,
            size: Vec2::splat(10.0),
            transform: Transform2D::new(center),
            color: Vec3::ONE,
            removed: false,
        }
    }

    #[test]
    fn only_fallen_dynamic_sprites_go() {
        let mut world = BoxWorld::new(Vec2::ZERO, 4);
        let keep = sprite(&mut world, SpriteKind::Dynamic, 10.0);
        let fallen = sprite(&mut world, SpriteKind::Dynamic, -1.0);
        let low_static = sprite(&mut world, SpriteKind::Static, -50.0);
        let (keep_body, fallen_body, static_body) = (keep.body, fallen.body, low_static.body);
        let mut sprites = vec![keep, fallen, low_static];

        let mut seen = Vec::new();
        let removed = cull_fallen(&mut world, &mut sprites, 0.0, |w, body| {
            assert!(w.contains_body(body));
            seen.push(body);
        });

        assert_eq!(removed, vec![fallen_body]);
        assert_eq!(seen, vec![fallen_body]);
        assert!(!world.contains_body(fallen_body));
        assert!(world.contains_body(keep_body));
        assert!(world.contains_body(static_body));
        assert_eq!(sprites.len(), 2);
    }

    #[test]
    fn exactly_on_the_threshold_stays() {
        let mut world = BoxWorld::new(Vec2::ZERO, 4);
        let mut sprites = vec![sprite(&mut world, SpriteKind::Dynamic, 0.0)];
        assert!(cull_fallen(&mut world, &mut sprites, 0.0, |_, _| {}).is_empty());
        assert_eq!(sprites.len(), 1);
    }
}
