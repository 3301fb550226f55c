pub mod cull;
pub mod grounding;
pub mod interaction;
pub mod player;
mod transform;

pub use cull::cull_fallen;
pub use grounding::{analyze, GroundingResult};
pub use interaction::{DragState, GrabJoint, InteractionManager};
pub use player::{Motion, PlayerController};
pub use transform::resync_sprites;
