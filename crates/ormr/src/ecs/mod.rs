//! # Entity-Component-System
//!
//! A deliberately small, single-threaded ECS. Entities are generational
//! handles, components are type-erased boxes in per-entity slot arrays
//! indexed by dense [`TypeIndex`] ids, systems run in registration order,
//! and events dispatch synchronously through typed subscriber lists.
//!
//! ```text
//!                ┌───────────────────────────────┐
//!                │             World             │
//!                │                               │
//!   Entity ────► │  records[index].slots[type]   │ ◄── TypeRegistry
//!                │                               │
//!                │  systems: [S1, S2, ...]       │ ── update/draw in order
//!                │  bus: subscribers per event   │ ── emit / queue
//!                └───────────────────────────────┘
//! ```
//!
//! Start at [`World`].

pub mod component;
pub mod entity;
pub mod event;
pub mod query;
pub mod registry;
pub mod system;
pub mod world;

pub use entity::Entity;
pub use event::Listener;
pub use query::{Query, QueryParam};
pub use registry::{TypeIndex, TypeRegistry};
pub use system::System;
pub use world::World;
