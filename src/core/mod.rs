//! Core memory game engine (no_std compatible)
//!
//! Pure game logic: deck generation, shuffle, the turn state machine, scoring
//! and a virtual-clock driver. Depends only on `alloc`, `rand` and `log`, so it
//! can be compiled to WebAssembly or driven by any UI binding.

pub mod card;
pub mod clock;
pub mod common;
pub mod config;
pub mod game;
pub mod render;
pub mod score;
pub mod shuffle;

// Re-export commonly used types
pub use card::{generate_card_pairs, Card, CardId, Symbol};
pub use clock::VirtualClock;
pub use common::{DeferredOutcome, GameError, Rejection, SelectOutcome};
pub use config::*;
pub use game::{
    Deferred, Effect, Epoch, GameEngine, GameStatus, GameSummary, ScheduledTask, TurnPhase,
};
pub use render::{BoardView, CardFace, CardView, Feedback, RenderDirective, RenderSink, Stats};
pub use score::{final_score, format_time, live_score};
pub use shuffle::{shuffle, shuffled};
