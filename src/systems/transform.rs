use crate::components::PhysicsSprite;
use crate::physics::PhysicsWorld;

/// Copy every live body's position and rotation onto its sprite. Sprites
/// whose body has been detached keep their last transform.
pub fn resync_sprites<W: PhysicsWorld>(world: &W, sprites: &mut [PhysicsSprite]) {
    for sprite in sprites.iter_mut().filter(|s| s.has_body()) {
        sprite.resync(world);
    }
}
