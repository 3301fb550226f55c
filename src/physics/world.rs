use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;
use rapier2d::prelude::QueryFilter as ColliderFilter;

use super::{
    Aabb, BodyHandle, BodyKind, ContactRecord, JointHandle, PhysicsWorld, QueryFilter, ShapeHandle,
};

/// World units are pixels; one level tile is treated as a metre so rapier's
/// tolerances and sleep thresholds scale with the sprites.
const LENGTH_UNIT: Real = 64.0;

/// Moment of inertia of a solid box about its centre.
pub fn moment_for_box(mass: f32, size: Vec2) -> f32 {
    mass * (size.x * size.x + size.y * size.y) / 12.0
}

fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

fn to_point(v: Vec2) -> Point<Real> {
    Point::new(v.x, v.y)
}

fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn point_to_vec2(p: &Point<Real>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

fn collider_filter(filter: QueryFilter) -> ColliderFilter<'static> {
    let mut out = if filter.dynamic_only {
        ColliderFilter::only_dynamic()
    } else {
        ColliderFilter::default()
    };
    if let Some(body) = filter.exclude_body {
        out = out.exclude_rigid_body(body.0);
    }
    out
}

/// Rigid-body world backed by rapier2d. Every body carries exactly one
/// cuboid collider. Bodies and colliders are created disabled and only join
/// the simulation in [`PhysicsWorld::add_to_world`]. Each collider's
/// `user_data` holds its insertion order, which fixes query and contact order.
pub struct BoxWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    next_order: u128,
}

impl BoxWorld {
    pub fn new(gravity: Vec2, iterations: u32) -> Self {
        let mut integration_parameters = IntegrationParameters {
            length_unit: LENGTH_UNIT,
            ..IntegrationParameters::default()
        };
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(iterations as usize).unwrap_or(NonZeroUsize::MIN);

        Self {
            gravity: to_vector(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            next_order: 0,
        }
    }

    /// Whether the body is currently part of the simulation.
    pub fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.get(body.0).is_some_and(RigidBody::is_enabled)
    }

    /// Whether the joint still exists.
    pub fn contains_joint(&self, joint: JointHandle) -> bool {
        self.impulse_joints.get(joint.0).is_some()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    /// Bodies joined by `joint`.
    pub fn joint_bodies(&self, joint: JointHandle) -> (BodyHandle, BodyHandle) {
        match self.impulse_joints.get(joint.0) {
            Some(j) => (BodyHandle(j.body1), BodyHandle(j.body2)),
            None => panic!("invalid joint handle {joint:?}"),
        }
    }

    fn body(&self, handle: BodyHandle) -> &RigidBody {
        match self.bodies.get(handle.0) {
            Some(body) => body,
            None => panic!("invalid body handle {handle:?}"),
        }
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        match self.bodies.get_mut(handle.0) {
            Some(body) => body,
            None => panic!("invalid body handle {handle:?}"),
        }
    }

    fn collider(&self, handle: ShapeHandle) -> &Collider {
        match self.colliders.get(handle.0) {
            Some(collider) => collider,
            None => panic!("invalid shape handle {handle:?}"),
        }
    }

    fn collider_mut(&mut self, handle: ShapeHandle) -> &mut Collider {
        match self.colliders.get_mut(handle.0) {
            Some(collider) => collider,
            None => panic!("invalid shape handle {handle:?}"),
        }
    }

    /// Move colliders to their bodies and rebuild the query tree, so queries
    /// between steps see teleports, additions and removals.
    fn sync_queries(&mut self) {
        self.bodies
            .propagate_modified_body_positions_to_colliders(&mut self.colliders);
        self.query_pipeline.update(&self.colliders);
    }

    fn order_of(&self, collider: ColliderHandle) -> u128 {
        self.colliders
            .get(collider)
            .map_or(u128::MAX, |c| c.user_data)
    }

    fn contact_record(&self, pair: &ContactPair, manifold: &ContactManifold) -> Option<ContactRecord> {
        let co1 = self.colliders.get(pair.collider1)?;
        let co2 = self.colliders.get(pair.collider2)?;
        let deepest = manifold
            .points
            .iter()
            .min_by(|p, q| p.dist.total_cmp(&q.dist))?;
        let normal = to_vec2(&manifold.data.normal);
        let impulse: f32 = manifold.points.iter().map(|p| p.data.impulse).sum();
        Some(ContactRecord {
            body_a: BodyHandle(co1.parent()?),
            body_b: BodyHandle(co2.parent()?),
            normal,
            distance: deepest.dist,
            point_a: point_to_vec2(&(co1.position() * deepest.local_p1)),
            point_b: point_to_vec2(&(co2.position() * deepest.local_p2)),
            impulse: normal * impulse,
        })
    }
}

impl PhysicsWorld for BoxWorld {
    fn create_body(&mut self, mass: f32, moment: f32, kind: BodyKind) -> BodyHandle {
        let body_type = match kind {
            BodyKind::Static => RigidBodyType::Fixed,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::Kinematic => RigidBodyType::KinematicVelocityBased,
        };
        let mut builder = RigidBodyBuilder::new(body_type).enabled(false);
        if moment.is_finite() {
            builder = builder
                .additional_mass_properties(MassProperties::new(Point::origin(), mass, moment));
        } else {
            builder = builder
                .additional_mass_properties(MassProperties::new(Point::origin(), mass, 0.0))
                .lock_rotations();
        }
        BodyHandle(self.bodies.insert(builder.build()))
    }

    fn create_box_shape(
        &mut self,
        body: BodyHandle,
        width: f32,
        height: f32,
        friction: f32,
    ) -> ShapeHandle {
        assert!(self.bodies.contains(body.0), "invalid body handle {body:?}");
        // Mass comes from the body alone; friction multiplies across a pair.
        let collider = ColliderBuilder::cuboid(width * 0.5, height * 0.5)
            .density(0.0)
            .friction(friction)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .enabled(false)
            .build();
        ShapeHandle(
            self.colliders
                .insert_with_parent(collider, body.0, &mut self.bodies),
        )
    }

    fn add_to_world(&mut self, body: BodyHandle, shape: ShapeHandle) {
        let owner = self.shape_body(shape);
        assert_eq!(owner, body, "shape {shape:?} does not belong to {body:?}");
        assert!(
            !self.contains_body(body),
            "body {body:?} is already in the world"
        );
        let order = self.next_order;
        self.next_order += 1;

        let collider = self.collider_mut(shape);
        collider.user_data = order;
        collider.set_enabled(true);
        let colliders = &self.colliders;
        let Some(rb) = self.bodies.get_mut(body.0) else {
            panic!("invalid body handle {body:?}");
        };
        rb.set_enabled(true);
        // Impulses may land before the first step, so mass must be current now.
        rb.recompute_mass_properties_from_colliders(colliders);
        self.sync_queries();
    }

    fn remove_from_world(&mut self, body: BodyHandle, shape: ShapeHandle) {
        if !self.contains_body(body) {
            panic!("body {body:?} is not in the world");
        }
        if self.colliders.get(shape.0).and_then(Collider::parent) != Some(body.0) {
            panic!("shape {shape:?} is not in the world");
        }
        // Takes the attached collider and any joints with it.
        let removed = self.bodies.remove(
            body.0,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            panic!("body {body:?} is not in the world");
        }
        self.sync_queries();
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        // rapier keeps user forces until told otherwise.
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2, local_point: Vec2) {
        let rb = self.body_mut(body);
        let point = rb.position() * to_point(local_point);
        rb.add_force_at_point(to_vector(force), point, true);
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2, local_point: Vec2) {
        let rb = self.body_mut(body);
        let point = rb.position() * to_point(local_point);
        rb.apply_impulse_at_point(to_vector(impulse), point, true);
    }

    fn point_query(&self, point: Vec2, max_distance: f32, filter: QueryFilter) -> Vec<ShapeHandle> {
        let mut hits: Vec<ColliderHandle> = Vec::new();
        let mut collect = |handle: ColliderHandle| {
            if self.colliders.get(handle).is_some_and(Collider::is_enabled) {
                hits.push(handle);
            }
            true
        };
        let filter = collider_filter(filter);
        if max_distance > 0.0 {
            self.query_pipeline.intersections_with_shape(
                &self.bodies,
                &self.colliders,
                &Isometry::translation(point.x, point.y),
                &Ball::new(max_distance),
                filter,
                &mut collect,
            );
        } else {
            self.query_pipeline.intersections_with_point(
                &self.bodies,
                &self.colliders,
                &to_point(point),
                filter,
                &mut collect,
            );
        }
        hits.sort_by_key(|&handle| self.order_of(handle));
        hits.into_iter().map(ShapeHandle).collect()
    }

    fn contacts(&self, body: BodyHandle) -> impl Iterator<Item = ContactRecord> + '_ {
        let mut found: Vec<(u128, ContactRecord)> = Vec::new();
        for &collider in self.body(body).colliders() {
            for pair in self.narrow_phase.contact_pairs_with(collider) {
                if !pair.has_any_active_contact {
                    continue;
                }
                let other = if pair.collider1 == collider {
                    pair.collider2
                } else {
                    pair.collider1
                };
                for manifold in &pair.manifolds {
                    if let Some(record) = self.contact_record(pair, manifold) {
                        found.push((self.order_of(other), record));
                    }
                }
            }
        }
        // Stable sort: manifolds of one pair keep their solver order.
        found.sort_by_key(|&(order, _)| order);
        found.into_iter().map(|(_, record)| record)
    }

    fn create_pin_joint(&mut self, a: BodyHandle, b: BodyHandle) -> JointHandle {
        let rest_length = self.position(a).distance(self.position(b));
        let joint = RopeJointBuilder::new(rest_length).build();
        JointHandle(self.impulse_joints.insert(a.0, b.0, joint, true))
    }

    fn destroy_joint(&mut self, joint: JointHandle) {
        if self.impulse_joints.remove(joint.0, true).is_none() {
            panic!("invalid joint handle {joint:?}");
        }
    }

    fn position(&self, body: BodyHandle) -> Vec2 {
        to_vec2(self.body(body).translation())
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        self.body_mut(body)
            .set_translation(to_vector(position), true);
        self.sync_queries();
    }

    fn velocity(&self, body: BodyHandle) -> Vec2 {
        to_vec2(self.body(body).linvel())
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        self.body_mut(body).set_linvel(to_vector(velocity), true);
    }

    fn angle(&self, body: BodyHandle) -> f32 {
        self.body(body).rotation().angle()
    }

    fn body_kind(&self, body: BodyHandle) -> BodyKind {
        match self.body(body).body_type() {
            RigidBodyType::Fixed => BodyKind::Static,
            RigidBodyType::Dynamic => BodyKind::Dynamic,
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => {
                BodyKind::Kinematic
            }
        }
    }

    fn shape_body(&self, shape: ShapeHandle) -> BodyHandle {
        match self.collider(shape).parent() {
            Some(body) => BodyHandle(body),
            None => panic!("shape {shape:?} has no body"),
        }
    }

    fn friction(&self, shape: ShapeHandle) -> f32 {
        self.collider(shape).friction()
    }

    fn set_friction(&mut self, shape: ShapeHandle, friction: f32) {
        self.collider_mut(shape).set_friction(friction);
    }

    fn shape_bounds(&self, shape: ShapeHandle) -> Aabb {
        let bounds = self.collider(shape).compute_aabb();
        Aabb {
            min: point_to_vec2(&bounds.mins),
            max: point_to_vec2(&bounds.maxs),
        }
    }
}
