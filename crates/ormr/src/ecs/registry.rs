//! # TypeRegistry, dense small ids for component and event types
//!
//! Component slots and event subscriber lists are indexed by a small dense
//! integer rather than by [`TypeId`]. A [`TypeRegistry`] hands out those
//! integers: the first type registered gets index 0, the next gets 1, and so
//! on. An index is assigned exactly once per type and stays stable for the
//! lifetime of the registry. Indices are not stable across runs, since they
//! depend on registration order.
//!
//! Each [`World`](super::world::World) owns two independent registries, one
//! for component types and one for event types, so the same concrete type
//! could in principle be both (they would get unrelated indices).
//!
//! ## Single-threaded by contract
//!
//! The registry is plain mutable state with no locking. The whole engine runs
//! on one thread (the fixed-timestep loop owns it), so this is a deliberate
//! contract, not an oversight.

use std::any::TypeId;
use std::collections::HashMap;

/// Dense index assigned to a registered type. Used to address component slots
/// and event subscriber lists. Opaque outside the ECS internals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeIndex(pub(crate) u8);

impl TypeIndex {
    /// The raw slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Assigns a stable dense index to each concrete type on first use.
///
/// Capacity is hard-limited to [`TypeRegistry::CAPACITY`] types. Exceeding it
/// panics in every build profile: indices are `u8` and the per-entity slot
/// arrays are sized by them, so running out is a design-level failure, not a
/// recoverable condition.
pub struct TypeRegistry {
    ids: HashMap<TypeId, TypeIndex>,
    /// Type names in index order, for diagnostics. Its length is the count.
    names: Vec<&'static str>,
}

impl TypeRegistry {
    /// Maximum number of distinct types one registry can hold.
    pub const CAPACITY: usize = 255;

    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Return the index for `T`, assigning the next unused one on first call.
    ///
    /// # Panics
    ///
    /// Panics if the registry already holds [`Self::CAPACITY`] types.
    pub fn register<T: 'static>(&mut self) -> TypeIndex {
        let key = TypeId::of::<T>();
        if let Some(&index) = self.ids.get(&key) {
            return index;
        }
        let index = self.next_index(std::any::type_name::<T>());
        self.ids.insert(key, index);
        index
    }

    /// Return the index for `T` if it has been registered, without assigning
    /// one.
    pub fn lookup<T: 'static>(&self) -> Option<TypeIndex> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Number of distinct types registered so far.
    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Diagnostic name of a registered type.
    pub fn name(&self, index: TypeIndex) -> &'static str {
        self.names[index.index()]
    }

    fn next_index(&mut self, name: &'static str) -> TypeIndex {
        assert!(
            self.names.len() < Self::CAPACITY,
            "Type registry is full: cannot register `{}` (capacity is {} types)",
            name,
            Self::CAPACITY
        );
        let index = TypeIndex(self.names.len() as u8);
        self.names.push(name);
        index
    }

    /// Test-only path that burns an index without a `TypeId` key, so capacity
    /// behavior can be exercised without declaring 255 marker types.
    #[cfg(test)]
    pub(crate) fn register_unkeyed(&mut self, name: &'static str) -> TypeIndex {
        self.next_index(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;
    struct C;

    #[test]
    fn indices_are_dense_and_stable() {
        let mut registry = TypeRegistry::new();
        let a = registry.register::<A>();
        let b = registry.register::<B>();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        // Repeated calls return the same index.
        assert_eq!(registry.register::<A>(), a);
        assert_eq!(registry.register::<B>(), b);
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn distinct_types_get_distinct_indices() {
        let mut registry = TypeRegistry::new();
        let a = registry.register::<A>();
        let b = registry.register::<B>();
        let c = registry.register::<C>();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn lookup_does_not_register() {
        let mut registry = TypeRegistry::new();
        assert!(registry.lookup::<A>().is_none());
        assert_eq!(registry.count(), 0);
        let a = registry.register::<A>();
        assert_eq!(registry.lookup::<A>(), Some(a));
    }

    #[test]
    fn name_tracks_index() {
        let mut registry = TypeRegistry::new();
        let a = registry.register::<A>();
        assert!(registry.name(a).ends_with("A"));
    }

    #[test]
    fn fills_to_capacity() {
        let mut registry = TypeRegistry::new();
        for _ in 0..TypeRegistry::CAPACITY {
            registry.register_unkeyed("filler");
        }
        assert_eq!(registry.count(), TypeRegistry::CAPACITY);
    }

    #[test]
    #[should_panic(expected = "Type registry is full")]
    fn panics_past_capacity() {
        let mut registry = TypeRegistry::new();
        for _ in 0..TypeRegistry::CAPACITY {
            registry.register_unkeyed("filler");
        }
        registry.register::<A>(); // 256th type
    }
}
