//! Shooting module - shot trajectory model and the last-shot record

mod trajectory;

pub use trajectory::*;
