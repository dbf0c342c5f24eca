//! Goalkeeper module - skills, decision table, motion, and save rolls

mod components;
mod decision;
mod patrol;
mod save;
mod skills;
mod systems;

pub use components::*;
pub use decision::*;
pub use patrol::*;
pub use save::*;
pub use skills::*;
pub use systems::*;
