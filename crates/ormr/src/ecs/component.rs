//! # Component storage, one typed slot per registered type
//!
//! A component is plain data attached to at most one entity. Each entity owns
//! a [`ComponentSlots`]: an array indexed by
//! [`TypeIndex`](super::registry::TypeIndex) where every slot is either empty
//! or holds exactly one component of that type. The array grows on demand up
//! to the registry capacity, so an entity with two components does not pay
//! for 255 slots.
//!
//! Storage is type-erased as `Box<dyn Any>` with runtime downcasts. A slot is
//! only ever written through a path that registered the type, so a downcast
//! failure is a framework bug and panics rather than limping along.
//!
//! `take`/`restore` exist for the query path: a slot's box is temporarily
//! moved out so the closure can hold `&mut` borrows of several components of
//! the same entity without fighting the borrow checker, then moved back.

use std::any::Any;

use super::registry::TypeIndex;

/// Per-entity slot array. Opaque outside the ECS internals; gameplay code
/// goes through [`World`](super::world::World) methods.
pub struct ComponentSlots {
    slots: Vec<Option<Box<dyn Any>>>,
}

impl ComponentSlots {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn grow(&mut self, index: TypeIndex) {
        if self.slots.len() <= index.index() {
            self.slots.resize_with(index.index() + 1, || None);
        }
    }

    /// Store a component in its slot, returning the previous occupant if the
    /// slot was taken.
    pub(crate) fn put(&mut self, index: TypeIndex, boxed: Box<dyn Any>) -> Option<Box<dyn Any>> {
        self.grow(index);
        self.slots[index.index()].replace(boxed)
    }

    pub(crate) fn contains(&self, index: TypeIndex) -> bool {
        self.slots
            .get(index.index())
            .is_some_and(|slot| slot.is_some())
    }

    pub(crate) fn get<T: 'static>(&self, index: TypeIndex) -> Option<&T> {
        let boxed = self.slots.get(index.index())?.as_ref()?;
        Some(boxed.downcast_ref::<T>().unwrap_or_else(|| {
            panic!(
                "Component slot {} does not hold `{}`",
                index.index(),
                std::any::type_name::<T>()
            )
        }))
    }

    pub(crate) fn get_mut<T: 'static>(&mut self, index: TypeIndex) -> Option<&mut T> {
        let boxed = self.slots.get_mut(index.index())?.as_mut()?;
        Some(boxed.downcast_mut::<T>().unwrap_or_else(|| {
            panic!(
                "Component slot {} does not hold `{}`",
                index.index(),
                std::any::type_name::<T>()
            )
        }))
    }

    /// Move the boxed component out of its slot, leaving it empty.
    pub(crate) fn take(&mut self, index: TypeIndex) -> Option<Box<dyn Any>> {
        self.slots.get_mut(index.index())?.take()
    }

    /// Move a previously taken box back into its slot.
    pub(crate) fn restore(&mut self, index: TypeIndex, boxed: Box<dyn Any>) {
        self.grow(index);
        debug_assert!(
            self.slots[index.index()].is_none(),
            "restore into occupied slot {}",
            index.index()
        );
        self.slots[index.index()] = Some(boxed);
    }

    /// Clear a slot. Returns `true` if a component was present; clearing an
    /// empty slot is a no-op.
    pub(crate) fn remove(&mut self, index: TypeIndex) -> bool {
        self.take(index).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: u8) -> TypeIndex {
        TypeIndex(i)
    }

    #[test]
    fn put_and_get() {
        let mut slots = ComponentSlots::new();
        assert!(slots.put(idx(0), Box::new(7u32)).is_none());
        assert!(slots.contains(idx(0)));
        assert_eq!(slots.get::<u32>(idx(0)), Some(&7));
        assert!(slots.get::<u32>(idx(1)).is_none());
    }

    #[test]
    fn put_returns_previous_occupant() {
        let mut slots = ComponentSlots::new();
        slots.put(idx(2), Box::new(1u32));
        let previous = slots.put(idx(2), Box::new(2u32));
        assert_eq!(previous.unwrap().downcast_ref::<u32>(), Some(&1));
        assert_eq!(slots.get::<u32>(idx(2)), Some(&2));
    }

    #[test]
    fn get_mut_writes_through() {
        let mut slots = ComponentSlots::new();
        slots.put(idx(0), Box::new(String::from("a")));
        slots.get_mut::<String>(idx(0)).unwrap().push('b');
        assert_eq!(slots.get::<String>(idx(0)).unwrap(), "ab");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut slots = ComponentSlots::new();
        slots.put(idx(3), Box::new(1.5f32));
        assert!(slots.remove(idx(3)));
        assert!(!slots.remove(idx(3)));
        assert!(!slots.contains(idx(3)));
        // Removing from a slot that never existed is also fine.
        assert!(!slots.remove(idx(200)));
    }

    #[test]
    fn take_and_restore_round_trip() {
        let mut slots = ComponentSlots::new();
        slots.put(idx(1), Box::new(9u64));
        let boxed = slots.take(idx(1)).unwrap();
        assert!(!slots.contains(idx(1)));
        slots.restore(idx(1), boxed);
        assert_eq!(slots.get::<u64>(idx(1)), Some(&9));
    }

    #[test]
    #[should_panic(expected = "does not hold")]
    fn mismatched_downcast_panics() {
        let mut slots = ComponentSlots::new();
        slots.put(idx(0), Box::new(7u32));
        let _ = slots.get::<String>(idx(0));
    }
}
