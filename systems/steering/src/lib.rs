#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure steering system that maps human directional intent to steer commands.
//!
//! The adapter captures which of the four directional signals are asserted
//! during a frame; this system collapses that snapshot into at most one
//! [`Command::Steer`] per tick. The world enforces the no-reversal rule, so
//! the mapping here stays a stateless priority pick.

use light_cycles_core::{Command, Heading, PlayerId};

/// Snapshot of the directional signals asserted during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionalIntent {
    /// Whether the left signal is asserted.
    pub left: bool,
    /// Whether the right signal is asserted.
    pub right: bool,
    /// Whether the up signal is asserted.
    pub up: bool,
    /// Whether the down signal is asserted.
    pub down: bool,
}

impl DirectionalIntent {
    /// Resolves the snapshot into a single heading.
    ///
    /// When several signals are asserted simultaneously the first match wins,
    /// in the order left, right, up, down.
    #[must_use]
    pub fn resolve(self) -> Option<Heading> {
        if self.left {
            Some(Heading::Left)
        } else if self.right {
            Some(Heading::Right)
        } else if self.up {
            Some(Heading::Up)
        } else if self.down {
            Some(Heading::Down)
        } else {
            None
        }
    }
}

/// Pure system that emits steer commands for the human-controlled cycle.
#[derive(Clone, Copy, Debug)]
pub struct Steering {
    player: PlayerId,
}

impl Steering {
    /// Creates a steering system that controls the provided cycle.
    #[must_use]
    pub const fn new(player: PlayerId) -> Self {
        Self { player }
    }

    /// Consumes a frame's intent snapshot and emits at most one command.
    pub fn handle(&self, intent: DirectionalIntent, out: &mut Vec<Command>) {
        if let Some(heading) = intent.resolve() {
            out.push(Command::Steer {
                player: self.player,
                heading,
            });
        }
    }
}

impl Default for Steering {
    fn default() -> Self {
        Self::new(PlayerId::One)
    }
}
