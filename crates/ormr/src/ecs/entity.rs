//! # Entity, a generational handle to a bag of components
//!
//! An [`Entity`] does not contain its components; it is a small `Copy` handle
//! the [`World`](super::world::World) resolves to per-entity storage. The
//! handle pairs a slot index with a generation counter:
//!
//! ```text
//! Entity { index: 5, generation: 0 }   original
//! Entity { index: 5, generation: 1 }   after slot 5 was freed and reused
//! ```
//!
//! When an entity is destroyed its slot's generation is bumped, so any handle
//! still floating around in gameplay code goes stale and every lookup through
//! it returns `None` instead of touching whatever now lives in the slot. This
//! replaces the classic engine pattern of handing out raw component pointers
//! that dangle the moment storage is reclaimed.

use std::fmt;

/// Handle to an entity owned by a [`World`](super::world::World).
///
/// Valid only for the world that created it, and only until that world
/// destroys the entity. A stale handle is harmless: lookups fail, they do not
/// alias a recycled slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Entity {
    /// Raw slot index. Diagnostics only.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued. Diagnostics only.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Allocates entity slots and recycles them through a free list.
///
/// ```text
/// generations: [0, 2, 0, 1]   one counter per slot ever allocated
/// free:        [1, 3]         slots available for reuse
/// len:         4              next fresh index when `free` is empty
/// ```
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
    len: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Hand out a handle, reusing a freed slot when one exists.
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            // Generation was already bumped when the slot was freed.
            Entity {
                index,
                generation: self.generations[index as usize],
            }
        } else {
            let index = self.len;
            self.len += 1;
            self.generations.push(0);
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Retire a handle's slot. Returns `false` if the handle was already
    /// stale, in which case nothing changes.
    pub fn free(&mut self, entity: Entity) -> bool {
        let index = entity.index as usize;
        if index < self.generations.len() && self.generations[index] == entity.generation {
            self.generations[index] += 1;
            self.free.push(entity.index);
            true
        } else {
            false
        }
    }

    /// Whether the handle still refers to a live slot.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index as usize;
        index < self.generations.len() && self.generations[index] == entity.generation
    }

    /// Number of currently live slots.
    pub fn alive_count(&self) -> usize {
        self.len as usize - self.free.len()
    }
}
