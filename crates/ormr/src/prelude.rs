//! Everything a typical system or listener needs, in one import.

pub use crate::ecs::{Entity, Listener, Query, System, World};
pub use crate::render::Batch;
pub use crate::time::Unit;

pub use glam::Vec2;
