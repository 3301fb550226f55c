//! Physics world contract used by the game layer, and the rapier2d-backed box
//! world that implements it.
//!
//! The game never touches solver internals: it creates bodies and shapes,
//! pushes them around with forces and impulses, asks which shapes sit under a
//! point, and reads back the contacts of the last completed step.

mod world;

pub use world::{moment_for_box, BoxWorld};

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle};

/// How a body participates in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves; infinite mass.
    Static,
    /// Moved by gravity, forces, contacts and joints.
    Dynamic,
    /// Moved only by its own velocity; infinite mass.
    Kinematic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) RigidBodyHandle);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub(crate) ColliderHandle);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) ImpulseJointHandle);

/// Axis-aligned bounds in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    pub fn top(&self) -> f32 {
        self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Signed distance from `point` to the box surface; negative inside.
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        let half = self.size() * 0.5;
        let d = (point - self.center()).abs() - half;
        let outside = d.max(Vec2::ZERO).length();
        let inside = d.x.max(d.y).min(0.0);
        outside + inside
    }
}

/// One touching pair from the last completed step.
///
/// `normal` points from `body_a` toward `body_b`; which body is `a` depends on
/// the order the world discovered the pair, so readers must check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactRecord {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub normal: Vec2,
    /// Separation along the normal; negative while penetrating.
    pub distance: f32,
    /// Contact point on `body_a`'s surface.
    pub point_a: Vec2,
    /// Contact point on `body_b`'s surface.
    pub point_b: Vec2,
    /// Total impulse applied to `body_b` by the solver this step.
    pub impulse: Vec2,
}

impl ContactRecord {
    /// The body on the other side of the pair, or `None` if `body` is not part
    /// of it.
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Which shapes a point query may return.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFilter {
    /// Skip shapes belonging to this body.
    pub exclude_body: Option<BodyHandle>,
    /// Skip shapes whose body is not [`BodyKind::Dynamic`].
    pub dynamic_only: bool,
}

impl QueryFilter {
    pub fn excluding(body: BodyHandle) -> Self {
        Self {
            exclude_body: Some(body),
            dynamic_only: false,
        }
    }

    pub fn dynamic_only(mut self) -> Self {
        self.dynamic_only = true;
        self
    }
}

/// Everything the game layer needs from a rigid-body simulation.
///
/// Handles are only meaningful to the world that issued them; passing a
/// foreign or destroyed handle is a programming error and implementations are
/// free to panic.
pub trait PhysicsWorld {
    fn create_body(&mut self, mass: f32, moment: f32, kind: BodyKind) -> BodyHandle;
    fn create_box_shape(
        &mut self,
        body: BodyHandle,
        width: f32,
        height: f32,
        friction: f32,
    ) -> ShapeHandle;

    fn add_to_world(&mut self, body: BodyHandle, shape: ShapeHandle);
    /// Detach a body and its shape. Must not be called twice for the same pair.
    fn remove_from_world(&mut self, body: BodyHandle, shape: ShapeHandle);

    fn step(&mut self, dt: f32);

    /// Add a continuous force for the next step only; forces are cleared after
    /// every step.
    fn apply_force(&mut self, body: BodyHandle, force: Vec2, local_point: Vec2);
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, local_point: Vec2);

    fn point_query(&self, point: Vec2, max_distance: f32, filter: QueryFilter) -> Vec<ShapeHandle>;

    /// Contacts involving `body` from the last completed step, in a stable
    /// order.
    fn contacts(&self, body: BodyHandle) -> impl Iterator<Item = ContactRecord> + '_;

    fn create_pin_joint(&mut self, a: BodyHandle, b: BodyHandle) -> JointHandle;
    fn destroy_joint(&mut self, joint: JointHandle);

    fn position(&self, body: BodyHandle) -> Vec2;
    fn set_position(&mut self, body: BodyHandle, position: Vec2);
    fn velocity(&self, body: BodyHandle) -> Vec2;
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);
    /// Orientation in radians, counter-clockwise.
    fn angle(&self, body: BodyHandle) -> f32;
    fn body_kind(&self, body: BodyHandle) -> BodyKind;

    fn shape_body(&self, shape: ShapeHandle) -> BodyHandle;
    fn friction(&self, shape: ShapeHandle) -> f32;
    fn set_friction(&mut self, shape: ShapeHandle, friction: f32);
    fn shape_bounds(&self, shape: ShapeHandle) -> Aabb;

    /// Convert a world point into `body`'s local frame.
    fn world_to_local(&self, body: BodyHandle, point: Vec2) -> Vec2 {
        Vec2::from_angle(-self.angle(body)).rotate(point - self.position(body))
    }

    fn apply_force_at_world_point(&mut self, body: BodyHandle, force: Vec2, point: Vec2) {
        let local = self.world_to_local(body, point);
        self.apply_force(body, force, local);
    }

    fn apply_impulse_at_world_point(&mut self, body: BodyHandle, impulse: Vec2, point: Vec2) {
        let local = self.world_to_local(body, point);
        self.apply_impulse(body, impulse, local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_edges() {
        let b = Aabb::from_center(Vec2::new(50.0, 96.0), Vec2::new(40.0, 64.0));
        assert_eq!(b.left(), 30.0);
        assert_eq!(b.right(), 70.0);
        assert_eq!(b.bottom(), 64.0);
        assert_eq!(b.top(), 128.0);
        assert_eq!(b.center(), Vec2::new(50.0, 96.0));
    }

    #[test]
    fn signed_distance_inside_and_out() {
        let b = Aabb::from_center(Vec2::ZERO, Vec2::splat(2.0));
        assert_eq!(b.signed_distance(Vec2::ZERO), -1.0);
        assert_eq!(b.signed_distance(Vec2::new(3.0, 0.0)), 2.0);
        assert!((b.signed_distance(Vec2::new(2.0, 2.0)) - 2.0_f32.sqrt()).abs() < 1e-6);
    }
}
