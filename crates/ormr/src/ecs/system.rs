//! # System, per-tick logic in a fixed registration order
//!
//! A system is a stateful object the [`World`](super::world::World) drives
//! once per tick. It holds no component data of its own (that belongs on
//! entities) but may keep private working state such as accumulators.
//!
//! Systems never look each other up through the world. Cross-system
//! communication happens through component data or through events; anything
//! else couples systems to each other's registration order in ways that are
//! impossible to reason about later.

use crate::render::Batch;
use crate::time;

use super::world::World;

/// Lifecycle hooks for a registered system. Every hook has a no-op default,
/// so a concrete system implements only what it needs.
///
/// Hooks run in registration order: `create` once when the world is created,
/// `update` every tick, `draw` every frame, `destroy` once at teardown.
///
/// A system runs while the world iterates a snapshot of its system list, so a
/// hook is free to register new systems or create and destroy entities. The
/// one thing a hook must not do is re-enter the system it is running on, for
/// example by emitting an event the same system is subscribed to; that is a
/// double mutable borrow and panics.
pub trait System {
    /// Called once, when [`World::create`] runs (or immediately on
    /// registration if the world was already created).
    fn create(&mut self, world: &mut World) {
        let _ = world;
    }

    /// Called once at teardown, in registration order.
    fn destroy(&mut self, world: &mut World) {
        let _ = world;
    }

    /// Called every tick with the fixed timestep delta.
    fn update(&mut self, world: &mut World, delta: time::Unit) {
        let _ = (world, delta);
    }

    /// Called every frame with the externally owned draw batch.
    fn draw(&mut self, world: &mut World, batch: &mut Batch) {
        let _ = (world, batch);
    }
}
