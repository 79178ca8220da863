//! Coin pickup. A player walks right across a row of coins; a system queues
//! a `Pickup` event and destroys each coin it touches, and a score listener
//! tallies the pickups after the coins are already gone.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example coins
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use ormr::prelude::*;

struct Position(Vec2);
struct Player {
    speed: f32,
}
struct Coin {
    value: u32,
}

struct Pickup {
    coin: Entity,
    value: u32,
}

struct Movement;

impl System for Movement {
    fn update(&mut self, world: &mut World, delta: Unit) {
        let dt = delta.secs();
        world.each::<(&mut Position, &Player)>(|_, (position, player)| {
            position.0.x += player.speed * dt;
        });
    }
}

struct PickupSystem;

impl System for PickupSystem {
    fn update(&mut self, world: &mut World, _delta: Unit) {
        let Some((_, player_position)) = world.first::<Position>() else {
            return;
        };
        let player_x = player_position.0.x;

        let mut picked = Vec::new();
        world.each::<(&Position, &Coin)>(|coin, (position, component)| {
            if (position.0.x - player_x).abs() < 1.0 {
                picked.push((coin, component.value));
            }
        });
        for (coin, value) in picked {
            log::debug!("Picked up {coin:?} worth {value}");
            world.destroy_entity(coin);
            world.queue(Pickup { coin, value });
        }
    }
}

struct ScoreBoard {
    score: u32,
}

impl Listener<Pickup> for ScoreBoard {
    fn receive(&mut self, world: &mut World, event: &Pickup) {
        // Delivered after the reap, so the coin handle is already stale.
        debug_assert!(!world.is_alive(event.coin));
        self.score += event.value;
        println!("score: {}", self.score);
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new();

    let player = world.create_entity();
    world.add(player, Position(Vec2::ZERO));
    world.add(player, Player { speed: 20.0 });

    for i in 1..=5 {
        let coin = world.create_entity();
        world.add(coin, Position(Vec2::new(i as f32 * 8.0, 0.0)));
        world.add(coin, Coin { value: 10 });
    }

    world.create_system(Movement);
    world.create_system(PickupSystem);

    let board = Rc::new(RefCell::new(ScoreBoard { score: 0 }));
    world.subscribe::<Pickup, _>(&board);

    world.create();
    let step = Unit::from_millis(16);
    for _ in 0..150 {
        world.update(step);
    }
    world.destroy();

    println!("final score: {}", board.borrow().score);
}
