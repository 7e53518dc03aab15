//! Common types for the memory game: engine errors and input outcomes.

use super::card::CardId;

/// Errors returned by engine lookups and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No card with this id exists in the current game.
    UnknownCard(CardId),
    /// Difficulty name did not match any level.
    UnknownDifficulty,
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::UnknownCard(id) => write!(f, "No card with id {} in the current game", id),
            GameError::UnknownDifficulty => write!(f, "Difficulty must be one of easy, medium, hard"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// Reason a card selection was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The game has been won; only a new game accepts input.
    Finished,
    /// A pair is being evaluated or the board is settling.
    Locked,
    /// The id does not belong to the current deck.
    UnknownCard,
    /// The card is already the pending first pick.
    AlreadySelected,
    AlreadyMatched,
    AlreadyFaceUp,
    /// Two cards are already face up.
    PairPending,
}

/// Result of a card selection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First card of a pair turned face up.
    Flipped,
    /// Second card turned face up; a move was counted and evaluation scheduled.
    PairFlipped,
    Rejected(Rejection),
}

impl SelectOutcome {
    pub const fn is_accepted(self) -> bool {
        !matches!(self, SelectOutcome::Rejected(_))
    }
}

/// Result of firing a deferred task back into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredOutcome {
    /// The pair matched.
    Matched,
    /// The pair differed and was turned back down.
    Mismatched,
    /// The last pair matched and the game is over.
    Won,
    /// Input was re-enabled.
    Settled,
    /// Issued for a previous game; ignored.
    Stale,
    /// Arrived when the state did not expect it; ignored.
    Invalid,
}
