//! Commonly used types and utilities for ease of import.

pub use crate::{
    Difficulty, GameEngine, GameStatus, RenderDirective, RenderSink, SelectOutcome, Timings,
    TurnPhase, VirtualClock,
};

#[cfg(feature = "std")]
pub use crate::{AiPlayer, CliPlayer, Command, GameSession, Player, PlayerNode, TerminalView};
