use glam::{Vec2, Vec3};

use crate::physics::{Aabb, BodyHandle, PhysicsWorld, ShapeHandle};

/// Visual placement of a sprite, copied from its body after every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    /// Radians, counter-clockwise.
    pub angle: f32,
}

impl Transform2D {
    pub fn new(position: Vec2) -> Self {
        Self { position, angle: 0.0 }
    }
}

/// Whether a sprite's body can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    /// Level geometry; never moves and is never culled.
    Static,
    /// Crates and the actor; simulated, resynced every tick.
    Dynamic,
}

/// A drawable box shadowing one physics body + shape pair.
pub struct PhysicsSprite {
    pub kind: SpriteKind,
    pub body: BodyHandle,
    pub shape: ShapeHandle,
    /// Width and height in world units.
    pub size: Vec2,
    pub transform: Transform2D,
    pub color: Vec3,
    /// Set once the body has been detached from the world.
    pub removed: bool,
}

impl PhysicsSprite {
    pub fn has_body(&self) -> bool {
        !self.removed
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn is_cullable(&self) -> bool {
        self.kind == SpriteKind::Dynamic
    }

    /// Visual bounds, ignoring rotation.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.transform.position, self.size)
    }

    /// Copy position and rotation from the body.
    pub fn resync<W: PhysicsWorld>(&mut self, world: &W) {
        self.transform.position = world.position(self.body);
        self.transform.angle = world.angle(self.body);
    }

    /// Detach from the world. Returns `false` if this already happened.
    pub fn detach<W: PhysicsWorld>(&mut self, world: &mut W) -> bool {
        if self.removed {
            return false;
        }
        world.remove_from_world(self.body, self.shape);
        self.removed = true;
        true
    }
}
