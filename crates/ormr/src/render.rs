//! # Draw batch
//!
//! Systems do not talk to a graphics API. Their `draw` hook records
//! [`Command`]s into a [`Batch`] owned by the host loop, which drains the
//! batch into whatever backend it drives (or into nothing, for headless
//! runs and tests). Commands come back out in the order they were recorded.

use glam::Vec2;

/// A recorded draw call. Colors are linear RGBA in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Rect {
        position: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: [f32; 4],
    },
    Text {
        position: Vec2,
        text: String,
        color: [f32; 4],
    },
}

/// An ordered list of draw commands for one frame.
#[derive(Debug, Default)]
pub struct Batch {
    commands: Vec<Command>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&mut self, position: Vec2, size: Vec2, color: [f32; 4]) {
        self.commands.push(Command::Rect {
            position,
            size,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: [f32; 4]) {
        self.commands.push(Command::Line { from, to, color });
    }

    pub fn text(&mut self, position: Vec2, text: impl Into<String>, color: [f32; 4]) {
        self.commands.push(Command::Text {
            position,
            text: text.into(),
            color,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded commands in recording order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Empty the batch, yielding the commands for the backend to consume.
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.commands.drain(..)
    }

    /// Discard all recorded commands, e.g. between frames without a backend.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}
