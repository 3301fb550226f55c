pub mod level;
pub mod prefabs;

pub use level::{create_level_1, Level};
