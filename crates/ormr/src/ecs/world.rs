//! # World, the owner of everything
//!
//! The [`World`] exclusively owns all entities, their components, the ordered
//! system list, and the event bus. The host drives it with a fixed-timestep
//! loop:
//!
//! ```text
//! world.create();                  // once, runs every System::create
//! loop {
//!     world.update(delta);         // every System::update, reap, flush events
//!     world.draw(&mut batch);      // every System::draw, same order
//! }
//! world.destroy();                 // every System::destroy (or implicit on drop)
//! ```
//!
//! Systems run strictly in registration order, for both `update` and `draw`.
//!
//! ## Entity lifetime
//!
//! [`World::destroy_entity`] does not remove anything on the spot. It marks
//! the entity dead, and the world reaps marked entities at the end of the
//! current `update` pass. A system early in the tick can therefore destroy an
//! entity that systems later in the same tick still see; after `update`
//! returns, the handle is stale and every lookup through it yields `None`.
//! This keeps `each` iteration stable within a tick without any dedicated
//! iterator bookkeeping.
//!
//! ## Ownership
//!
//! Component access always goes through the world with an [`Entity`] handle.
//! Systems are shared `Rc<RefCell<..>>` objects so a system can also sit in
//! event subscriber lists; the world holds one reference in registration
//! order and never drops it until teardown.

use std::cell::RefCell;
use std::rc::Rc;

use crate::render::Batch;
use crate::time;

use super::component::ComponentSlots;
use super::entity::{Entity, EntityAllocator};
use super::event::{EventBus, Listener};
use super::query::Query;
use super::registry::TypeRegistry;
use super::system::System;

struct EntityRecord {
    slots: ComponentSlots,
    /// Cleared by `destroy_entity`; reaped at the end of `update`.
    alive: bool,
}

/// The ECS container. See the [module docs](self) for the lifecycle.
pub struct World {
    allocator: EntityAllocator,
    /// Per-entity storage, indexed by `Entity::index`.
    records: Vec<Option<EntityRecord>>,
    /// Live entities in creation order. Queries iterate this.
    order: Vec<Entity>,
    /// How many entries of `order` are marked dead and await the reap.
    marked_dead: usize,
    component_types: TypeRegistry,
    systems: Vec<Rc<RefCell<dyn System>>>,
    system_names: Vec<&'static str>,
    pub(crate) bus: EventBus,
    created: bool,
    destroyed: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            records: Vec::new(),
            order: Vec::new(),
            marked_dead: 0,
            component_types: TypeRegistry::new(),
            systems: Vec::new(),
            system_names: Vec::new(),
            bus: EventBus::new(),
            created: false,
            destroyed: false,
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Allocate a new empty entity and append it to the iteration order.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        let index = entity.index() as usize;
        if self.records.len() <= index {
            self.records.resize_with(index + 1, || None);
        }
        self.records[index] = Some(EntityRecord {
            slots: ComponentSlots::new(),
            alive: true,
        });
        self.order.push(entity);
        entity
    }

    /// Mark an entity for removal. The entity and its components stay visible
    /// until the end of the current (or next) `update` pass; see the module
    /// docs. Marking twice, or marking a stale handle, is harmless.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if !self.allocator.is_alive(entity) {
            log::warn!("Could not find entity to destroy: {entity:?}");
            return;
        }
        let record = self.records[entity.index() as usize].as_mut().unwrap();
        if record.alive {
            record.alive = false;
            self.marked_dead += 1;
        }
    }

    /// Whether the handle refers to an entity that has not yet been reaped.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
            && self
                .records
                .get(entity.index() as usize)
                .is_some_and(Option::is_some)
    }

    /// Number of entities currently stored, including any marked dead but not
    /// yet reaped.
    pub fn entity_count(&self) -> usize {
        debug_assert_eq!(self.allocator.alive_count(), self.order.len());
        self.allocator.alive_count()
    }

    /// Remove everything marked dead and retire its handle.
    fn reap(&mut self) {
        if self.marked_dead == 0 {
            return;
        }
        let records = &mut self.records;
        let allocator = &mut self.allocator;
        self.order.retain(|&entity| {
            let index = entity.index() as usize;
            let keep = records[index].as_ref().is_some_and(|r| r.alive);
            if !keep {
                records[index] = None;
                allocator.free(entity);
            }
            keep
        });
        self.marked_dead = 0;
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach a component to an entity, replacing any existing component of
    /// the same type, and return a reference to the stored value.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn add<T: 'static>(&mut self, entity: Entity, component: T) -> &mut T {
        assert!(
            self.allocator.is_alive(entity),
            "Cannot add `{}` to dead entity {:?}",
            std::any::type_name::<T>(),
            entity
        );
        let index = self.component_types.register::<T>();
        let record = self.records[entity.index() as usize].as_mut().unwrap();
        record.slots.put(index, Box::new(component));
        record.slots.get_mut::<T>(index).unwrap()
    }

    /// Shared reference to the entity's component of type `T`, or `None` if
    /// the entity does not hold one or the handle is stale. Never panics.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        let index = self.component_types.lookup::<T>()?;
        self.records
            .get(entity.index() as usize)?
            .as_ref()?
            .slots
            .get::<T>(index)
    }

    /// Mutable variant of [`World::get`].
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        let index = self.component_types.lookup::<T>()?;
        self.records
            .get_mut(entity.index() as usize)?
            .as_mut()?
            .slots
            .get_mut::<T>(index)
    }

    /// Whether the entity holds a component of type `T`.
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Whether the entity holds every component named by the query tuple,
    /// e.g. `world.has_all::<(&Position, &Velocity)>(e)`.
    pub fn has_all<Q: Query>(&mut self, entity: Entity) -> bool {
        if !self.allocator.is_alive(entity) {
            return false;
        }
        let indices = Q::indices(&mut self.component_types);
        let Some(record) = self
            .records
            .get(entity.index() as usize)
            .and_then(Option::as_ref)
        else {
            return false;
        };
        indices.iter().all(|&index| record.slots.contains(index))
    }

    /// Detach the entity's component of type `T`. Returns `false`, and does
    /// nothing, when there is none; removing twice is safe.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> bool {
        if !self.allocator.is_alive(entity) {
            return false;
        }
        let Some(index) = self.component_types.lookup::<T>() else {
            return false;
        };
        match self
            .records
            .get_mut(entity.index() as usize)
            .and_then(Option::as_mut)
        {
            Some(record) => record.slots.remove(index),
            None => false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Visit every entity holding all components of the query tuple, in
    /// entity creation order, exactly once each.
    ///
    /// ```ignore
    /// world.each::<(&mut Position, &Velocity)>(|entity, (pos, vel)| {
    ///     pos.0 += vel.0 * delta.secs();
    /// });
    /// ```
    ///
    /// The world stays mutably borrowed for the duration of the call, so the
    /// closure cannot create or destroy entities; do that from the system
    /// body around the query instead.
    ///
    /// # Panics
    ///
    /// Panics if the tuple lists the same component type more than once; two
    /// borrows of one slot cannot coexist.
    pub fn each<Q: Query>(&mut self, mut f: impl FnMut(Entity, Q::Item<'_>)) {
        let indices = Q::indices(&mut self.component_types);
        for (i, &index) in indices.iter().enumerate() {
            assert!(
                !indices[..i].contains(&index),
                "Query lists `{}` more than once",
                self.component_types.name(index)
            );
        }
        let order = self.order.clone();
        for entity in order {
            let Some(record) = self
                .records
                .get_mut(entity.index() as usize)
                .and_then(Option::as_mut)
            else {
                continue;
            };
            if !indices.iter().all(|&index| record.slots.contains(index)) {
                continue;
            }
            let mut taken = Q::take(&mut record.slots, &indices);
            f(entity, Q::fetch(&mut taken));
            Q::restore(taken, &mut record.slots, &indices);
        }
    }

    /// Visit every entity in creation order, regardless of what components
    /// it holds. Includes entities marked dead but not yet reaped.
    pub fn each_entity(&self, mut f: impl FnMut(Entity)) {
        for &entity in &self.order {
            f(entity);
        }
    }

    /// The earliest-created entity holding a `T`, with its component.
    pub fn first<T: 'static>(&self) -> Option<(Entity, &T)> {
        let index = self.component_types.lookup::<T>()?;
        for &entity in &self.order {
            if let Some(record) = self
                .records
                .get(entity.index() as usize)
                .and_then(Option::as_ref)
            {
                if let Some(component) = record.slots.get::<T>(index) {
                    return Some((entity, component));
                }
            }
        }
        None
    }

    // ── Systems ──────────────────────────────────────────────────────

    /// Register a system at the end of the ordered list and return a shared
    /// handle to it. Its `create` hook runs when [`World::create`] is called;
    /// if the world is already created, it runs immediately.
    pub fn create_system<S: System + 'static>(&mut self, system: S) -> Rc<RefCell<S>> {
        let system = Rc::new(RefCell::new(system));
        let erased: Rc<RefCell<dyn System>> = system.clone();
        self.systems.push(erased);
        self.system_names.push(std::any::type_name::<S>());
        log::debug!("Registered system `{}`", std::any::type_name::<S>());
        if self.created {
            system.borrow_mut().create(self);
        }
        system
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Type names of the registered systems, in execution order. Useful for
    /// debug overlays and logs.
    pub fn system_names(&self) -> &[&'static str] {
        &self.system_names
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Run every system's `create` hook, in registration order. Call once
    /// before the first `update`.
    pub fn create(&mut self) {
        debug_assert!(!self.created, "World::create called twice");
        self.created = true;
        for system in self.systems.clone() {
            system.borrow_mut().create(self);
        }
    }

    /// Advance one tick: every system's `update` in registration order, then
    /// reap entities marked dead, then deliver queued events.
    pub fn update(&mut self, delta: time::Unit) {
        debug_assert!(
            self.created && !self.destroyed,
            "World::update outside the created state"
        );
        for system in self.systems.clone() {
            system.borrow_mut().update(self, delta);
        }
        self.reap();
        // Drain every queue before dispatching any of it, so an event queued
        // from inside a delivery always waits for the next update.
        let mut deliveries = Vec::new();
        for drain in self.bus.drainers() {
            if let Some(delivery) = drain(&mut self.bus) {
                deliveries.push(delivery);
            }
        }
        for delivery in deliveries {
            delivery(self);
        }
    }

    /// Run every system's `draw` hook, in registration order, writing into
    /// the externally owned batch. A separate pass from `update`.
    pub fn draw(&mut self, batch: &mut Batch) {
        debug_assert!(
            self.created && !self.destroyed,
            "World::draw outside the created state"
        );
        for system in self.systems.clone() {
            system.borrow_mut().draw(self, batch);
        }
    }

    /// Tear down: every system's `destroy` hook in registration order, then
    /// drop all systems, entities, subscriber lists and buffered events.
    /// Every outstanding entity handle goes stale. Runs at most once;
    /// dropping the world calls it implicitly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for system in self.systems.clone() {
            system.borrow_mut().destroy(self);
        }
        self.systems.clear();
        self.system_names.clear();
        for &entity in &self.order {
            self.allocator.free(entity);
        }
        self.order.clear();
        self.records.clear();
        self.marked_dead = 0;
        self.bus.clear();
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Subscribe a listener to events of type `E`, at the end of `E`'s
    /// dispatch order.
    pub fn subscribe<E: 'static, L: Listener<E> + 'static>(&mut self, listener: &Rc<RefCell<L>>) {
        let erased: Rc<RefCell<dyn Listener<E>>> = listener.clone();
        self.bus.subscribe(erased);
    }

    /// Remove a listener from `E`'s dispatch order. O(n) over the subscriber
    /// list, which is expected to stay small. Logs a warning when the
    /// listener was not subscribed.
    pub fn unsubscribe<E: 'static, L: Listener<E> + 'static>(&mut self, listener: &Rc<RefCell<L>>) {
        let erased: Rc<RefCell<dyn Listener<E>>> = listener.clone();
        self.bus.unsubscribe(&erased);
    }

    /// Synchronously deliver an event to every current subscriber of `E`, in
    /// subscription order, before returning. Subscribing or unsubscribing
    /// from inside a `receive` takes effect for subsequent emits only.
    pub fn emit<E: 'static>(&mut self, event: E) {
        let subscribers = self.bus.snapshot::<E>();
        for listener in subscribers {
            listener.borrow_mut().receive(self, &event);
        }
    }

    /// Buffer an event for delivery at the end of the current `update` pass,
    /// after the entity reap. Events queued while that delivery runs go out
    /// on the next update.
    pub fn queue<E: 'static>(&mut self, event: E) {
        self.bus.enqueue(event);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.destroy();
    }
}
