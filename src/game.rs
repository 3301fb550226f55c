//! The game context: owns the world and everything living in it, and runs
//! the fixed-step frame order.

use crate::camera::{self, Viewport};
use crate::components::PhysicsSprite;
use crate::config::Tuning;
use crate::engine::input::{InputEvent, Key};
use crate::physics::{BoxWorld, PhysicsWorld};
use crate::scene::{create_level_1, Level};
use crate::systems::{
    analyze, cull_fallen, resync_sprites, GroundingResult, InteractionManager, Motion,
    PlayerController,
};

pub struct Game<W: PhysicsWorld> {
    pub world: W,
    pub actor: PhysicsSprite,
    pub statics: Vec<PhysicsSprite>,
    pub dynamics: Vec<PhysicsSprite>,
    pub controller: PlayerController,
    pub interaction: InteractionManager,
    pub viewport: Viewport,
    pub tuning: Tuning,
    accumulator: f32,
    ticks: u64,
}

impl Game<BoxWorld> {
    /// Fresh box world populated with level 1.
    pub fn level_one(tuning: Tuning) -> Self {
        let mut world = BoxWorld::new(tuning.gravity, tuning.solver_iterations);
        let level = create_level_1(&mut world, &tuning);
        Self::new(world, level, tuning)
    }
}

impl<W: PhysicsWorld> Game<W> {
    pub fn new(world: W, level: Level, tuning: Tuning) -> Self {
        Self {
            world,
            actor: level.actor,
            statics: level.statics,
            dynamics: level.dynamics,
            controller: PlayerController::new(&tuning),
            interaction: InteractionManager::new(&tuning),
            viewport: Viewport::new(tuning.screen_width, tuning.screen_height),
            tuning,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Fixed ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// What the actor stood on during the last step.
    pub fn ground(&self) -> GroundingResult {
        analyze(&self.world, self.actor.body)
    }

    /// Every sprite still in play, level geometry first and the actor last.
    pub fn sprites(&self) -> impl Iterator<Item = &PhysicsSprite> {
        self.statics
            .iter()
            .chain(self.dynamics.iter())
            .chain(std::iter::once(&self.actor))
    }

    /// Apply one input edge. Pointer positions arrive in window coordinates
    /// and are offset by the current viewport.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(Key::Left) => {
                self.controller
                    .press_move(&mut self.world, &self.actor, Motion::MovingLeft)
            }
            InputEvent::KeyPressed(Key::Right) => {
                self.controller
                    .press_move(&mut self.world, &self.actor, Motion::MovingRight)
            }
            InputEvent::KeyPressed(Key::Up) => {
                self.controller.jump(&mut self.world, &self.actor);
            }
            InputEvent::KeyPressed(Key::Punch) => {
                self.interaction.punch(&mut self.world, &self.actor);
            }
            InputEvent::KeyPressed(Key::Grab) => {
                self.interaction.grab(&mut self.world, &self.actor);
            }
            InputEvent::KeyReleased(Key::Left | Key::Right) => {
                self.controller.release_move(&mut self.world, &self.actor);
            }
            InputEvent::KeyReleased(Key::Grab) => {
                self.interaction.let_go(&mut self.world);
            }
            InputEvent::KeyReleased(Key::Up | Key::Punch) => {}
            InputEvent::PointerPressed(screen) => {
                let pointer = self.viewport.screen_to_world(screen);
                self.interaction
                    .pointer_pressed(&self.world, self.actor.body, pointer);
            }
            InputEvent::PointerMoved { position, delta } => {
                let pointer = self.viewport.screen_to_world(position);
                self.interaction
                    .pointer_moved(&mut self.world, pointer, delta);
            }
            InputEvent::PointerReleased(_) => self.interaction.pointer_released(&mut self.world),
        }
    }

    /// One fixed step: forces, world step, drag clamp, resync, cull, camera.
    pub fn tick(&mut self) {
        self.controller.apply_forces(&mut self.world, &self.actor);

        self.world.step(self.tuning.physics_dt);

        self.interaction.hold_drag(&mut self.world);

        resync_sprites(&self.world, &mut self.dynamics);
        self.actor.resync(&self.world);

        let interaction = &mut self.interaction;
        cull_fallen(
            &mut self.world,
            &mut self.dynamics,
            self.tuning.cull_floor_y,
            |world, body| interaction.forget_body(world, body),
        );

        self.viewport = camera::scroll(self.viewport, self.actor.bounds(), self.tuning.viewport_margin);
        self.ticks += 1;
    }

    /// Feed wall-clock time in and run as many whole fixed ticks as it
    /// covers, capped at `max_substeps`. Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = self.tuning.physics_dt;
        self.accumulator += frame_dt;

        let mut steps = 0;
        while self.accumulator >= dt && steps < self.tuning.max_substeps {
            self.tick();
            self.accumulator -= dt;
            steps += 1;
        }

        if self.accumulator >= dt {
            log::warn!(
                "simulation fell behind, dropping {:.3}s after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator %= dt;
        }
        steps
    }
}
