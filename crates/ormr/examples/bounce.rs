//! Headless bouncing balls. Runs a fixed-timestep loop for a couple of
//! simulated seconds and prints what each frame would have drawn.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example bounce
//! ```

use ormr::prelude::*;

const FLOOR: f32 = 0.0;
const GRAVITY: f32 = -98.1;

struct Position(Vec2);
struct Velocity(Vec2);
struct Ball {
    radius: f32,
}

struct Physics;

impl System for Physics {
    fn update(&mut self, world: &mut World, delta: Unit) {
        let dt = delta.secs();
        world.each::<(&mut Velocity,)>(|_, (velocity,)| {
            velocity.0.y += GRAVITY * dt;
        });
        world.each::<(&mut Position, &mut Velocity, &Ball)>(|_, (position, velocity, ball)| {
            position.0 += velocity.0 * dt;
            if position.0.y - ball.radius < FLOOR && velocity.0.y < 0.0 {
                position.0.y = FLOOR + ball.radius;
                velocity.0.y = -velocity.0.y * 0.8;
            }
        });
    }

    fn draw(&mut self, world: &mut World, batch: &mut Batch) {
        world.each::<(&Position, &Ball)>(|_, (position, ball)| {
            let half = Vec2::splat(ball.radius);
            batch.rect(position.0 - half, half * 2.0, [0.9, 0.3, 0.2, 1.0]);
        });
    }
}

fn main() {
    env_logger::init();

    let mut world = World::new();
    for i in 0..3 {
        let ball = world.create_entity();
        world.add(ball, Position(Vec2::new(i as f32 * 10.0, 50.0 + i as f32 * 20.0)));
        world.add(ball, Velocity(Vec2::new(5.0, 0.0)));
        world.add(ball, Ball { radius: 2.0 });
    }
    world.create_system(Physics);

    world.create();
    let step = Unit::from_millis(16);
    let mut batch = Batch::new();
    for frame in 0..120 {
        world.update(step);
        world.draw(&mut batch);
        if frame % 30 == 0 {
            println!("frame {frame}: {} draw commands", batch.len());
        }
        batch.clear();
    }
    world.destroy();
}
