//! # Query, iterating entities by component presence
//!
//! [`World::each`](super::world::World::each) visits every live entity that
//! holds all of the requested component types, in creation order:
//!
//! ```text
//! world.each::<(&mut Position, &Velocity)>(|entity, (pos, vel)| {
//!     pos.0 += vel.0;
//! });
//! ```
//!
//! A query is a tuple of `&T` and `&mut T` parameters. Tuples up to eight
//! elements are supported; a single-component query is written `(&T,)`.
//!
//! ## Why take/restore instead of plain borrows
//!
//! The closure may want `&mut` access to several components of the same
//! entity at once. All of them live behind one `Vec` of boxed slots, and the
//! borrow checker cannot see that slot 0 and slot 3 never alias. Instead of
//! reaching for unsafe, the query temporarily moves the needed boxes out of
//! the entity's slots, hands borrows of the moved boxes to the closure, and
//! moves them back afterwards. The world itself stays mutably borrowed for
//! the whole `each` call, which is what makes the classic ECS footgun of
//! spawning or destroying entities mid-iteration a compile error here.

use std::any::Any;

use super::component::ComponentSlots;
use super::registry::{TypeIndex, TypeRegistry};

/// One element of a query tuple: `&T` for shared access, `&mut T` for
/// exclusive access.
pub trait QueryParam {
    /// What the closure receives for this parameter.
    type Item<'w>;

    /// Owned storage while the component is moved out of its slot.
    type Taken;

    /// Register the component type and return its slot index.
    fn register(registry: &mut TypeRegistry) -> TypeIndex;

    /// Move the component out of the entity's slots. The caller has already
    /// checked presence, so an empty slot is a framework bug.
    fn take(slots: &mut ComponentSlots, index: TypeIndex) -> Self::Taken;

    /// Borrow the item out of the taken storage.
    fn fetch(taken: &mut Self::Taken) -> Self::Item<'_>;

    /// Move the component back into its slot.
    fn restore(taken: Self::Taken, slots: &mut ComponentSlots, index: TypeIndex);
}

impl<'q, T: 'static> QueryParam for &'q T {
    type Item<'w> = &'w T;
    type Taken = Box<dyn Any>;

    fn register(registry: &mut TypeRegistry) -> TypeIndex {
        registry.register::<T>()
    }

    fn take(slots: &mut ComponentSlots, index: TypeIndex) -> Self::Taken {
        slots.take(index).unwrap_or_else(|| {
            panic!(
                "Query take: slot for `{}` is empty",
                std::any::type_name::<T>()
            )
        })
    }

    fn fetch(taken: &mut Self::Taken) -> Self::Item<'_> {
        taken.downcast_ref::<T>().unwrap_or_else(|| {
            panic!(
                "Query fetch: taken box does not hold `{}`",
                std::any::type_name::<T>()
            )
        })
    }

    fn restore(taken: Self::Taken, slots: &mut ComponentSlots, index: TypeIndex) {
        slots.restore(index, taken);
    }
}

impl<'q, T: 'static> QueryParam for &'q mut T {
    type Item<'w> = &'w mut T;
    type Taken = Box<dyn Any>;

    fn register(registry: &mut TypeRegistry) -> TypeIndex {
        registry.register::<T>()
    }

    fn take(slots: &mut ComponentSlots, index: TypeIndex) -> Self::Taken {
        slots.take(index).unwrap_or_else(|| {
            panic!(
                "Query take: slot for `{}` is empty",
                std::any::type_name::<T>()
            )
        })
    }

    fn fetch(taken: &mut Self::Taken) -> Self::Item<'_> {
        taken.downcast_mut::<T>().unwrap_or_else(|| {
            panic!(
                "Query fetch: taken box does not hold `{}`",
                std::any::type_name::<T>()
            )
        })
    }

    fn restore(taken: Self::Taken, slots: &mut ComponentSlots, index: TypeIndex) {
        slots.restore(index, taken);
    }
}

/// A conjunction of [`QueryParam`]s, implemented for tuples up to eight
/// elements. An entity matches when every parameter's slot is occupied.
pub trait Query {
    type Item<'w>;
    type Taken;

    /// Slot indices of every parameter, registering types on first use.
    fn indices(registry: &mut TypeRegistry) -> Vec<TypeIndex>;

    /// Move all matched components out of the entity's slots.
    fn take(slots: &mut ComponentSlots, indices: &[TypeIndex]) -> Self::Taken;

    /// Borrow the item tuple out of the taken storage.
    fn fetch(taken: &mut Self::Taken) -> Self::Item<'_>;

    /// Move all components back into their slots.
    fn restore(taken: Self::Taken, slots: &mut ComponentSlots, indices: &[TypeIndex]);
}

macro_rules! impl_query {
    ($($T:ident),+) => {
        impl<$($T: QueryParam),+> Query for ($($T,)+) {
            type Item<'w> = ($($T::Item<'w>,)+);
            type Taken = ($($T::Taken,)+);

            fn indices(registry: &mut TypeRegistry) -> Vec<TypeIndex> {
                vec![$($T::register(registry)),+]
            }

            #[allow(non_snake_case, unused_assignments)]
            fn take(slots: &mut ComponentSlots, indices: &[TypeIndex]) -> Self::Taken {
                let mut i = 0;
                ($({
                    let $T = $T::take(slots, indices[i]);
                    i += 1;
                    $T
                },)+)
            }

            #[allow(non_snake_case)]
            fn fetch(taken: &mut Self::Taken) -> Self::Item<'_> {
                let ($($T,)+) = taken;
                ($($T::fetch($T),)+)
            }

            #[allow(non_snake_case, unused_assignments)]
            fn restore(taken: Self::Taken, slots: &mut ComponentSlots, indices: &[TypeIndex]) {
                let ($($T,)+) = taken;
                let mut i = 0;
                $(
                    $T::restore($T, slots, indices[i]);
                    i += 1;
                )+
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
impl_query!(A, B, C, D, E);
impl_query!(A, B, C, D, E, F);
impl_query!(A, B, C, D, E, F, G);
impl_query!(A, B, C, D, E, F, G, H);
