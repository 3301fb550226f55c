//! Punching, grabbing and dragging things around.

use glam::Vec2;

use crate::components::PhysicsSprite;
use crate::config::Tuning;
use crate::physics::{BodyHandle, JointHandle, PhysicsWorld, QueryFilter, ShapeHandle};

/// The single active grab: a pin joint from the actor to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabJoint {
    pub joint: JointHandle,
    pub target: BodyHandle,
}

/// A shape held under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub shape: ShapeHandle,
    /// Last pointer position, world coordinates.
    pub pointer: Vec2,
}

pub struct InteractionManager {
    pub grab: Option<GrabJoint>,
    pub drag: Option<DragState>,
    punch_impulse: f32,
    reach: f32,
    query_radius: f32,
    drag_gain: f32,
}

impl InteractionManager {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            grab: None,
            drag: None,
            punch_impulse: tuning.punch_impulse,
            reach: tuning.punch_reach,
            query_radius: tuning.query_radius,
            drag_gain: tuning.drag_gain,
        }
    }

    fn right_probe(&self, actor: &PhysicsSprite) -> Vec2 {
        let b = actor.bounds();
        Vec2::new(b.right() + self.reach, b.center().y)
    }

    fn left_probe(&self, actor: &PhysicsSprite) -> Vec2 {
        let b = actor.bounds();
        Vec2::new(b.left() - self.reach, b.center().y)
    }

    /// Knock everything just beside the actor up and away. Every shape under
    /// a probe gets the full impulse. Returns how many shapes were hit.
    pub fn punch<W: PhysicsWorld>(&self, world: &mut W, actor: &PhysicsSprite) -> usize {
        let filter = QueryFilter::excluding(actor.body);
        let mut hits = 0;
        for (probe, direction) in [(self.right_probe(actor), 1.0), (self.left_probe(actor), -1.0)] {
            let impulse = Vec2::new(direction * self.punch_impulse, self.punch_impulse);
            for shape in world.point_query(probe, self.query_radius, filter) {
                let body = world.shape_body(shape);
                world.apply_impulse_at_world_point(body, impulse, probe);
                hits += 1;
            }
        }
        if hits > 0 {
            log::debug!("punch hit {hits} shape(s)");
        }
        hits
    }

    /// Pin the first dynamic body just right of the actor to it, replacing
    /// any earlier grab. Returns whether a joint was made.
    pub fn grab<W: PhysicsWorld>(&mut self, world: &mut W, actor: &PhysicsSprite) -> bool {
        let probe = self.right_probe(actor);
        let filter = QueryFilter::excluding(actor.body).dynamic_only();
        let Some(&shape) = world.point_query(probe, self.query_radius, filter).first() else {
            return false;
        };

        self.let_go(world);
        let target = world.shape_body(shape);
        let joint = world.create_pin_joint(actor.body, target);
        self.grab = Some(GrabJoint { joint, target });
        log::debug!("grabbed {target:?}");
        true
    }

    /// Destroy the grab joint, if there is one. Returns whether one existed.
    pub fn let_go<W: PhysicsWorld>(&mut self, world: &mut W) -> bool {
        match self.grab.take() {
            Some(grab) => {
                world.destroy_joint(grab.joint);
                log::debug!("released {:?}", grab.target);
                true
            }
            None => false,
        }
    }

    /// Start dragging whatever dynamic shape is under the pointer. The actor
    /// itself is never picked up.
    pub fn pointer_pressed<W: PhysicsWorld>(&mut self, world: &W, actor: BodyHandle, pointer: Vec2) {
        let filter = QueryFilter::excluding(actor).dynamic_only();
        if let Some(&shape) = world.point_query(pointer, self.query_radius, filter).first() {
            self.drag = Some(DragState { shape, pointer });
            log::debug!("drag start {shape:?} at {pointer}");
        }
    }

    /// Follow the pointer immediately, with a velocity proportional to the
    /// pointer delta so the motion reads as responsive.
    pub fn pointer_moved<W: PhysicsWorld>(&mut self, world: &mut W, pointer: Vec2, delta: Vec2) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.pointer = pointer;
        let body = world.shape_body(drag.shape);
        world.set_position(body, pointer);
        world.set_velocity(body, delta * self.drag_gain);
    }

    /// Drop the dragged shape where it is, at rest.
    pub fn pointer_released<W: PhysicsWorld>(&mut self, world: &mut W) {
        if let Some(drag) = self.drag.take() {
            let body = world.shape_body(drag.shape);
            world.set_velocity(body, Vec2::ZERO);
            log::debug!("drag end {:?}", drag.shape);
        }
    }

    /// Per-tick clamp: the dragged body sits exactly under the pointer,
    /// motionless, whatever gravity and contacts did this step.
    pub fn hold_drag<W: PhysicsWorld>(&self, world: &mut W) {
        if let Some(drag) = self.drag {
            let body = world.shape_body(drag.shape);
            world.set_position(body, drag.pointer);
            world.set_velocity(body, Vec2::ZERO);
        }
    }

    /// Release grab and drag on `body` before it leaves the world.
    pub fn forget_body<W: PhysicsWorld>(&mut self, world: &mut W, body: BodyHandle) {
        if self.grab.is_some_and(|g| g.target == body) {
            log::debug!("grab target {body:?} is leaving the world");
            self.let_go(world);
        }
        if self.drag.is_some_and(|d| world.shape_body(d.shape) == body) {
            log::debug!("drag target {body:?} is leaving the world");
            self.drag = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{SpriteKind, Transform2D};
    use crate::physics::{BodyKind, BoxWorld};
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn spawn(world: &mut BoxWorld, kind: BodyKind, center: Vec2, size: Vec2) -> PhysicsSprite {
        let body = world.create_body(1.0, f32::INFINITY, kind);
        let shape = world.create_box_shape(body, size.x, size.y, 0.2);
        world.set_position(body, center);
        world.add_to_world(body, shape);
        PhysicsSprite {
            kind: if kind == BodyKind::Static { SpriteKind::Static } else { SpriteKind::Dynamic },
            body,
            shape,
            size,
            transform: Transform2D::new(center),
            color: Vec3::ONE,
            removed: false,
        }
    }

    fn zero_g() -> BoxWorld {
        BoxWorld::new(Vec2::ZERO, 10)
    }

    fn manager() -> InteractionManager {
        InteractionManager::new(&Tuning::default())
    }

    #[test]
    fn punch_hits_both_sides_independently() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        // Right probe at (30, 0), left probe at (-30, 0).
        let right_a = spawn(&mut world, BodyKind::Dynamic, Vec2::new(50.0, 0.0), Vec2::splat(40.0));
        let right_b = spawn(&mut world, BodyKind::Dynamic, Vec2::new(50.0, 10.0), Vec2::splat(40.0));
        let left = spawn(&mut world, BodyKind::Dynamic, Vec2::new(-50.0, 0.0), Vec2::splat(40.0));

        assert_eq!(manager().punch(&mut world, &actor), 3);
        assert_eq!(world.velocity(right_a.body), Vec2::new(600.0, 600.0));
        assert_eq!(world.velocity(right_b.body), Vec2::new(600.0, 600.0));
        assert_eq!(world.velocity(left.body), Vec2::new(-600.0, 600.0));
        assert_eq!(world.velocity(actor.body), Vec2::ZERO);
    }

    #[test]
    fn punch_into_empty_air_does_nothing() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        assert_eq!(manager().punch(&mut world, &actor), 0);
    }

    #[test]
    fn grab_pins_first_candidate_only() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        let first = spawn(&mut world, BodyKind::Dynamic, Vec2::new(50.0, 0.0), Vec2::splat(40.0));
        let _second = spawn(&mut world, BodyKind::Dynamic, Vec2::new(50.0, 10.0), Vec2::splat(40.0));
        let mut im = manager();

        assert!(im.grab(&mut world, &actor));
        assert_eq!(world.joint_count(), 1);
        let grab = im.grab.unwrap();
        assert_eq!(grab.target, first.body);
        assert_eq!(world.joint_bodies(grab.joint), (actor.body, first.body));
    }

    #[test]
    fn second_grab_replaces_first() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        spawn(&mut world, BodyKind::Dynamic, Vec2::new(50.0, 0.0), Vec2::splat(40.0));
        let mut im = manager();

        assert!(im.grab(&mut world, &actor));
        let old = im.grab.unwrap().joint;
        assert!(im.grab(&mut world, &actor));
        assert!(!world.contains_joint(old));
        assert_eq!(world.joint_count(), 1);
    }

    #[test]
    fn grab_ignores_static_geometry() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        spawn(&mut world, BodyKind::Static, Vec2::new(50.0, 0.0), Vec2::splat(40.0));
        let mut im = manager();
        assert!(!im.grab(&mut world, &actor));
        assert!(im.grab.is_none());
    }

    #[test]
    fn release_without_grab_is_noop() {
        let mut world = zero_g();
        let mut im = manager();
        assert!(!im.let_go(&mut world));
        assert!(im.grab.is_none());
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn drag_pins_body_to_pointer_every_tick() {
        let mut world = BoxWorld::new(Vec2::new(0.0, -900.0), 10);
        let actor = spawn(&mut world, BodyKind::Kinematic, Vec2::new(-500.0, 0.0), Vec2::new(40.0, 64.0));
        let box_sprite = spawn(&mut world, BodyKind::Dynamic, Vec2::new(100.0, 100.0), Vec2::splat(40.0));
        let mut im = manager();

        im.pointer_pressed(&world, actor.body, Vec2::new(105.0, 95.0));
        assert_eq!(im.drag.map(|d| d.shape), Some(box_sprite.shape));

        let p = Vec2::new(300.0, 400.0);
        im.pointer_moved(&mut world, p, Vec2::new(2.0, -1.0));
        assert_eq!(world.position(box_sprite.body), p);
        assert_eq!(world.velocity(box_sprite.body), Vec2::new(40.0, -20.0));

        for _ in 0..10 {
            world.step(DT);
            im.hold_drag(&mut world);
            assert_eq!(world.position(box_sprite.body), p);
            assert_eq!(world.velocity(box_sprite.body), Vec2::ZERO);
        }

        im.pointer_released(&mut world);
        assert!(im.drag.is_none());
        assert_eq!(world.velocity(box_sprite.body), Vec2::ZERO);
        world.step(DT);
        assert!(world.position(box_sprite.body).y < p.y);
    }

    #[test]
    fn pointer_on_nothing_starts_no_drag() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::new(-500.0, 0.0), Vec2::new(40.0, 64.0));
        let mut im = manager();
        im.pointer_pressed(&world, actor.body, Vec2::new(5.0, 5.0));
        assert!(im.drag.is_none());
        im.pointer_moved(&mut world, Vec2::ZERO, Vec2::ONE);
        im.pointer_released(&mut world);
    }

    #[test]
    fn pointer_never_picks_up_the_actor() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        let mut im = manager();

        im.pointer_pressed(&world, actor.body, actor.position());
        assert!(im.drag.is_none());

        // A crate overlapping the press point is still fair game.
        let crate_box = spawn(&mut world, BodyKind::Dynamic, Vec2::new(30.0, 0.0), Vec2::splat(40.0));
        im.pointer_pressed(&world, actor.body, Vec2::new(15.0, 0.0));
        assert_eq!(im.drag.map(|d| d.shape), Some(crate_box.shape));
    }

    #[test]
    fn forgetting_grab_target_destroys_joint() {
        let mut world = zero_g();
        let actor = spawn(&mut world, BodyKind::Dynamic, Vec2::ZERO, Vec2::new(40.0, 64.0));
        let target = spawn(&mut world, BodyKind::Dynamic, Vec2::new(50.0, 0.0), Vec2::splat(40.0));
        let mut im = manager();
        im.grab(&mut world, &actor);
        im.pointer_pressed(&world, actor.body, Vec2::new(50.0, 0.0));

        im.forget_body(&mut world, target.body);
        assert!(im.grab.is_none());
        assert!(im.drag.is_none());
        assert_eq!(world.joint_count(), 0);
    }
}
