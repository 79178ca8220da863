//! # ormr
//!
//! A minimal real-time game core built around an entity-component-system.
//! It owns no window and no GPU; the host supplies a loop and, if it wants
//! pixels, consumes the [`render::Batch`] that `draw` fills in.
//!
//! ## Quick start
//!
//! ```
//! use ormr::prelude::*;
//!
//! struct Position(Vec2);
//! struct Velocity(Vec2);
//!
//! struct Physics;
//! impl System for Physics {
//!     fn update(&mut self, world: &mut World, delta: Unit) {
//!         world.each::<(&mut Position, &Velocity)>(|_, (position, velocity)| {
//!             position.0 += velocity.0 * delta.secs();
//!         });
//!     }
//! }
//!
//! let mut world = World::new();
//! let e = world.create_entity();
//! world.add(e, Position(Vec2::ZERO));
//! world.add(e, Velocity(Vec2::new(10.0, 0.0)));
//! world.create_system(Physics);
//!
//! world.create();
//! world.update(Unit::from_millis(100));
//! assert_eq!(world.get::<Position>(e).unwrap().0, Vec2::new(1.0, 0.0));
//! world.destroy();
//! ```
//!
//! ## Layout
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`ecs`]    | [`ecs::World`], entities, components, systems, events |
//! | [`time`]   | [`time::Unit`], millisecond durations                 |
//! | [`render`] | [`render::Batch`], backend-agnostic draw commands     |

pub mod ecs;
pub mod prelude;
pub mod render;
pub mod time;
