//! Tuning constants and the optional JSON override file.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Every gameplay and simulation constant in one place.
///
/// Missing fields in a tuning file fall back to the defaults below, so a file
/// only has to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Window ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// How close the actor may get to a window edge before the view scrolls.
    pub viewport_margin: f32,

    // === World ===
    /// Grid size used by the level builder.
    pub sprite_size: f32,
    pub gravity: Vec2,
    pub default_mass: f32,
    pub default_friction: f32,
    pub crate_friction: f32,
    /// Dynamic bodies whose y drops below this are removed.
    pub cull_floor_y: f32,

    // === Player ===
    pub move_force: f32,
    pub jump_impulse: f32,
    pub punch_impulse: f32,
    /// Distance beyond the actor's side at which punch/grab probe.
    pub punch_reach: f32,
    pub query_radius: f32,
    /// Friction set on the actor while no move key is held.
    pub stop_friction: f32,

    // === Pointer ===
    /// Pointer delta to velocity multiplier while dragging.
    pub drag_gain: f32,

    // === Stepping ===
    pub physics_dt: f32,
    /// Maximum fixed steps per rendered frame.
    pub max_substeps: u32,
    pub solver_iterations: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: 1200.0,
            screen_height: 800.0,
            viewport_margin: 100.0,

            sprite_size: 64.0,
            gravity: Vec2::new(0.0, -900.0),
            default_mass: 1.0,
            default_friction: 0.2,
            crate_friction: 0.4,
            cull_floor_y: 0.0,

            move_force: 700.0,
            jump_impulse: 600.0,
            punch_impulse: 600.0,
            punch_reach: 10.0,
            query_radius: 1.0,
            stop_friction: 15.0,

            drag_gain: 20.0,

            physics_dt: 1.0 / 60.0,
            max_substeps: 8,
            solver_iterations: 10,
        }
    }
}

impl Tuning {
    /// Read a tuning file. Unknown fields are ignored, missing ones defaulted.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let tuning = Self::from_json(&text)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check cross-field constraints. Run again after any manual override.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.physics_dt > 0.0) {
            return Err(ConfigError::Invalid("physics_dt must be positive"));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be at least 1"));
        }
        if self.screen_width <= 2.0 * self.viewport_margin
            || self.screen_height <= 2.0 * self.viewport_margin
        {
            return Err(ConfigError::Invalid(
                "viewport_margin leaves no room inside the window",
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed tuning file: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
