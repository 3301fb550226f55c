use glam::{Vec2, Vec3};

use crate::components::{PhysicsSprite, SpriteKind, Transform2D};
use crate::config::Tuning;
use crate::physics::{moment_for_box, BodyKind, PhysicsWorld};

const GRASS: Vec3 = Vec3::new(0.33, 0.62, 0.25);
const CRATE: Vec3 = Vec3::new(0.72, 0.52, 0.28);
const PLAYER: Vec3 = Vec3::new(0.35, 0.55, 0.9);

/// Player footprint as a fraction of the grid size.
const PLAYER_SCALE: Vec2 = Vec2::new(0.75, 1.0);

/// Physical properties for [`spawn_box_sprite`].
#[derive(Debug, Clone, Copy)]
pub struct BoxDesc {
    pub kind: SpriteKind,
    pub center: Vec2,
    pub size: Vec2,
    pub mass: f32,
    /// `None` derives the moment from mass and size.
    pub moment: Option<f32>,
    pub friction: f32,
    pub color: Vec3,
}

/// Create a body + box shape, add both to the world, and wrap them in a
/// sprite.
pub fn spawn_box_sprite<W: PhysicsWorld>(world: &mut W, desc: BoxDesc) -> PhysicsSprite {
    let body_kind = match desc.kind {
        SpriteKind::Static => BodyKind::Static,
        SpriteKind::Dynamic => BodyKind::Dynamic,
    };
    let moment = desc.moment.unwrap_or_else(|| moment_for_box(desc.mass, desc.size));
    let body = world.create_body(desc.mass, moment, body_kind);
    let shape = world.create_box_shape(body, desc.size.x, desc.size.y, desc.friction);
    world.set_position(body, desc.center);
    world.add_to_world(body, shape);

    PhysicsSprite {
        kind: desc.kind,
        body,
        shape,
        size: desc.size,
        transform: Transform2D::new(desc.center),
        color: desc.color,
        removed: false,
    }
}

/// One grid tile of level geometry.
pub fn spawn_tile<W: PhysicsWorld>(world: &mut W, tuning: &Tuning, center: Vec2) -> PhysicsSprite {
    spawn_box_sprite(
        world,
        BoxDesc {
            kind: SpriteKind::Static,
            center,
            size: Vec2::splat(tuning.sprite_size),
            mass: tuning.default_mass,
            moment: None,
            friction: tuning.default_friction,
            color: GRASS,
        },
    )
}

pub fn spawn_crate<W: PhysicsWorld>(world: &mut W, tuning: &Tuning, center: Vec2) -> PhysicsSprite {
    spawn_box_sprite(
        world,
        BoxDesc {
            kind: SpriteKind::Dynamic,
            center,
            size: Vec2::splat(tuning.sprite_size),
            mass: tuning.default_mass,
            moment: None,
            friction: tuning.crate_friction,
            color: CRATE,
        },
    )
}

/// The actor: unit mass and infinite moment, so it never tips over.
pub fn spawn_player<W: PhysicsWorld>(world: &mut W, tuning: &Tuning, center: Vec2) -> PhysicsSprite {
    spawn_box_sprite(
        world,
        BoxDesc {
            kind: SpriteKind::Dynamic,
            center,
            size: PLAYER_SCALE * tuning.sprite_size,
            mass: 1.0,
            moment: Some(f32::INFINITY),
            friction: tuning.default_friction,
            color: PLAYER,
        },
    )
}
