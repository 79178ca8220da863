//! # EventBus, synchronous typed publish/subscribe
//!
//! Events are plain typed values broadcast to everything currently subscribed
//! to their type. Dispatch is synchronous: `world.emit(Hit { .. })` calls
//! every subscriber's [`Listener::receive`] in subscription order before it
//! returns. There is no event thread and no mailbox; an emit is just an
//! ordered sequence of method calls.
//!
//! ## Mutation during dispatch
//!
//! The classic bug in subscriber lists is mutating the list while it is being
//! walked. Here `emit` dispatches over a snapshot of the list: subscribing or
//! unsubscribing from inside `receive` is allowed and takes effect for the
//! *next* emit, never the one in flight. A listener unsubscribed mid-dispatch
//! still receives the event that was already being delivered.
//!
//! ## Queued events
//!
//! `emit` is immediate. For events that should not interleave with the
//! system currently running, [`World::queue`](super::world::World::queue)
//! buffers the value and the world flushes all buffered events at the end of
//! `update`, after destroyed entities have been reaped. Events queued while
//! that flush is running are delivered on the next update.
//!
//! Subscriptions are explicit: dropping every other handle to a listener does
//! not unsubscribe it (the bus keeps it alive through its `Rc`), so a
//! listener that should stop receiving must be unsubscribed.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use super::registry::{TypeIndex, TypeRegistry};
use super::world::World;

/// A subscriber for events of type `E`. One object may implement `Listener`
/// for several event types and sit in several subscriber lists.
pub trait Listener<E> {
    fn receive(&mut self, world: &mut World, event: &E);
}

/// Ordered subscriber list for one event type.
type Subscribers<E> = Vec<Rc<RefCell<dyn Listener<E>>>>;

/// Per-event-type subscriber lists plus the queued-event buffers, all indexed
/// by the event [`TypeRegistry`].
pub(crate) struct EventBus {
    types: TypeRegistry,
    /// `Subscribers<E>` behind `dyn Any`, one slot per event type.
    subscribers: Vec<Option<Box<dyn Any>>>,
    /// `Vec<E>` behind `dyn Any`, one slot per event type.
    pending: Vec<Option<Box<dyn Any>>>,
    /// Monomorphized drain entry point per event type, registered the first
    /// time that type is queued.
    drainers: Vec<Option<Drainer>>,
}

/// Empties one event type's pending queue into a deferred delivery closure.
/// Draining every queue before dispatching any of them is what keeps events
/// queued during a flush out of the current update, regardless of the order
/// in which their types were first queued.
type Drainer = fn(&mut EventBus) -> Option<Box<dyn FnOnce(&mut World)>>;

impl EventBus {
    pub fn new() -> Self {
        Self {
            types: TypeRegistry::new(),
            subscribers: Vec::new(),
            pending: Vec::new(),
            drainers: Vec::new(),
        }
    }

    fn grow(&mut self, index: TypeIndex) {
        let needed = index.index() + 1;
        if self.subscribers.len() < needed {
            self.subscribers.resize_with(needed, || None);
            self.pending.resize_with(needed, || None);
            self.drainers.resize(needed, None);
        }
    }

    pub fn subscribe<E: 'static>(&mut self, listener: Rc<RefCell<dyn Listener<E>>>) {
        let index = self.types.register::<E>();
        self.grow(index);
        let slot = self.subscribers[index.index()]
            .get_or_insert_with(|| Box::new(Subscribers::<E>::new()));
        let list = slot.downcast_mut::<Subscribers<E>>().unwrap_or_else(|| {
            panic!(
                "Subscriber slot does not hold listeners for `{}`",
                std::any::type_name::<E>()
            )
        });
        list.push(listener);
    }

    pub fn unsubscribe<E: 'static>(&mut self, listener: &Rc<RefCell<dyn Listener<E>>>) {
        let Some(index) = self.types.lookup::<E>() else {
            log::warn!(
                "Unsubscribe from `{}` which has no subscribers",
                std::any::type_name::<E>()
            );
            return;
        };
        let list = self.subscribers[index.index()]
            .as_mut()
            .and_then(|slot| slot.downcast_mut::<Subscribers<E>>());
        let Some(list) = list else { return };
        // Compare by allocation, ignoring vtables from separate coercions.
        let target = Rc::as_ptr(listener) as *const ();
        match list
            .iter()
            .position(|s| Rc::as_ptr(s) as *const () == target)
        {
            Some(position) => {
                // Keep subscription order for everyone behind it.
                list.remove(position);
            }
            None => log::warn!(
                "Could not find listener to unsubscribe from `{}`",
                std::any::type_name::<E>()
            ),
        }
    }

    /// Clone the current subscriber list for `E`. Dispatch iterates this
    /// snapshot, which is what makes mutation during dispatch well-defined.
    pub fn snapshot<E: 'static>(&mut self) -> Subscribers<E> {
        let index = self.types.register::<E>();
        self.grow(index);
        match &self.subscribers[index.index()] {
            Some(slot) => slot
                .downcast_ref::<Subscribers<E>>()
                .map(Clone::clone)
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Buffer an event for delivery at the end of the current update.
    pub fn enqueue<E: 'static>(&mut self, event: E) {
        let index = self.types.register::<E>();
        self.grow(index);
        let slot = self.pending[index.index()].get_or_insert_with(|| Box::new(Vec::<E>::new()));
        let queue = slot.downcast_mut::<Vec<E>>().unwrap_or_else(|| {
            panic!(
                "Pending slot does not hold a queue of `{}`",
                std::any::type_name::<E>()
            )
        });
        queue.push(event);
        if self.drainers[index.index()].is_none() {
            self.drainers[index.index()] = Some(drain_pending::<E>);
        }
    }

    /// Drain everything buffered for `E`, in FIFO order.
    pub fn take_pending<E: 'static>(&mut self) -> Vec<E> {
        let Some(index) = self.types.lookup::<E>() else {
            return Vec::new();
        };
        match self.pending.get_mut(index.index()).and_then(Option::as_mut) {
            Some(slot) => std::mem::take(slot.downcast_mut::<Vec<E>>().unwrap_or_else(|| {
                panic!(
                    "Pending slot does not hold a queue of `{}`",
                    std::any::type_name::<E>()
                )
            })),
            None => Vec::new(),
        }
    }

    /// Every drain entry point registered so far, in event registration
    /// order. Draining an empty queue yields nothing.
    pub fn drainers(&self) -> Vec<Drainer> {
        self.drainers.iter().flatten().copied().collect()
    }

    /// Drop all buffered events without dispatching them.
    pub fn clear_pending(&mut self) {
        for slot in &mut self.pending {
            *slot = None;
        }
    }

    /// Drop every subscriber list and every buffered event.
    pub fn clear(&mut self) {
        for slot in &mut self.subscribers {
            *slot = None;
        }
        self.clear_pending();
    }
}

/// Capture everything queued for `E` so it can be delivered through the
/// world's synchronous emit after all queues have been drained.
fn drain_pending<E: 'static>(bus: &mut EventBus) -> Option<Box<dyn FnOnce(&mut World)>> {
    let events = bus.take_pending::<E>();
    if events.is_empty() {
        return None;
    }
    Some(Box::new(move |world: &mut World| {
        for event in events {
            world.emit(event);
        }
    }))
}
