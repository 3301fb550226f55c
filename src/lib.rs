//! boxbrawl: a side-on platformer built on a small rigid-body box world.
//!
//! The player walks by force, stops by friction, jumps only from flat enough
//! ground, punches and grabs crates, and can drag any crate with the mouse.
//! [`game::Game`] owns the world and runs the fixed-step frame; everything
//! under [`app`], [`engine`] and [`renderer`] is the SDL2 shell around it.

pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod game;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod systems;
