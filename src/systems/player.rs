use glam::Vec2;

use crate::components::PhysicsSprite;
use crate::config::Tuning;
use crate::fsm::StateMachine;
use crate::physics::PhysicsWorld;

use super::grounding::{self, GroundingResult};

/// Horizontal intent. Grounded/airborne is not stored; it is derived from the
/// contacts every time it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    MovingLeft,
    MovingRight,
}

/// Turns key edges into forces, impulses and friction changes on the actor.
pub struct PlayerController {
    /// Force re-applied to the actor every fixed tick until the next move
    /// key edge.
    pub force: Vec2,
    pub motion: StateMachine<Motion>,
    move_force: f32,
    jump_impulse: f32,
    stop_friction: f32,
}

impl PlayerController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            force: Vec2::ZERO,
            motion: StateMachine::new(Motion::Idle),
            move_force: tuning.move_force,
            jump_impulse: tuning.jump_impulse,
            stop_friction: tuning.stop_friction,
        }
    }

    /// Start pushing left or right. Friction drops to zero so contact friction
    /// does not eat the applied force.
    pub fn press_move<W: PhysicsWorld>(&mut self, world: &mut W, actor: &PhysicsSprite, motion: Motion) {
        self.force = match motion {
            Motion::MovingLeft => Vec2::new(-self.move_force, 0.0),
            Motion::MovingRight => Vec2::new(self.move_force, 0.0),
            Motion::Idle => Vec2::ZERO,
        };
        let friction = if motion == Motion::Idle { self.stop_friction } else { 0.0 };
        world.set_friction(actor.shape, friction);
        let held = self.motion.ticks_in_state;
        if self.motion.go(motion) {
            log::debug!(
                "player motion {:?} -> {:?} after {} ticks",
                self.motion.previous,
                motion,
                held
            );
        }
    }

    /// Stop pushing. High friction lets contact friction bleed off the
    /// remaining speed. Returns how many fixed ticks the released move lasted,
    /// or 0 if the actor was already idle.
    pub fn release_move<W: PhysicsWorld>(&mut self, world: &mut W, actor: &PhysicsSprite) -> u32 {
        let held = match self.motion.state {
            Motion::Idle => 0,
            Motion::MovingLeft | Motion::MovingRight => self.motion.ticks_in_state,
        };
        self.press_move(world, actor, Motion::Idle);
        held
    }

    /// One-shot upward impulse, only from ground flat enough for the actor's
    /// current friction. Returns whether the jump happened.
    pub fn jump<W: PhysicsWorld>(&mut self, world: &mut W, actor: &PhysicsSprite) -> bool {
        let ground = grounding::analyze(world, actor.body);
        let friction = world.friction(actor.shape);
        if !ground.allows_jump(friction) {
            log::debug!(
                "jump denied: ground {:?}, normal {}, friction {}",
                ground.body,
                ground.normal,
                friction
            );
            return false;
        }
        world.apply_impulse(actor.body, Vec2::new(0.0, self.jump_impulse), Vec2::ZERO);
        true
    }

    /// Per-tick force application: the walking force on the actor, and the
    /// opposite force on whatever the actor stands on.
    pub fn apply_forces<W: PhysicsWorld>(&mut self, world: &mut W, actor: &PhysicsSprite) -> GroundingResult {
        world.apply_force(actor.body, self.force, Vec2::ZERO);

        let ground = grounding::analyze(world, actor.body);
        if let Some(surface) = ground.body {
            if self.force.x != 0.0 {
                world.apply_force_at_world_point(surface, Vec2::new(-self.force.x, 0.0), ground.point);
            }
        }
        self.motion.tick();
        ground
    }
}
