//! Player trait and implementations
//!
//! This module defines the Player trait and provides concrete implementations:
//! - AiPlayer: computer player with perfect memory of revealed symbols
//! - CliPlayer: interactive command-line player
//! - PlayerNode: orchestrator connecting a Player to a GameSession

#![cfg(feature = "std")]

use rand::rngs::SmallRng;

use crate::core::BoardView;
use crate::session::Command;

/// Interface implemented by different player types.
///
/// A Player is responsible for:
/// - Choosing the next command whenever the board accepts input or the game is won
/// - Keeping whatever memory it needs from the boards it is shown
#[async_trait::async_trait]
pub trait Player: Send {
    /// Choose the next command for the given board.
    async fn next_command(
        &mut self,
        board: &BoardView,
        rng: &mut SmallRng,
    ) -> anyhow::Result<Command>;

    /// Inform the player of the board right after its last command took effect.
    fn observe(&mut self, _board: &BoardView) {}
}

pub mod ai;
pub use ai::AiPlayer;

pub mod cli;
pub use cli::CliPlayer;

pub mod node;
pub use node::PlayerNode;
