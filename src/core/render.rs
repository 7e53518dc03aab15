//! Render directives emitted by the engine and the view-facing snapshot types.
//!
//! The engine never draws anything. A view implements [`RenderSink`] and
//! receives [`RenderDirective`]s in the order the engine produced them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use super::card::{Card, CardId, Symbol};
use super::config::Difficulty;
use super::game::TurnPhase;
use super::score::format_time;

/// What side of a card the view should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CardFace {
    FaceDown,
    FaceUp,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct CardView {
    pub id: CardId,
    pub face: CardFace,
    /// `None` while face down so views cannot leak the symbol.
    pub symbol: Option<Symbol>,
    pub interactive: bool,
}

impl CardView {
    pub(crate) fn of(card: &Card, interactive: bool) -> Self {
        let face = if card.is_matched {
            CardFace::Matched
        } else if card.is_flipped {
            CardFace::FaceUp
        } else {
            CardFace::FaceDown
        };
        Self {
            id: card.id,
            face,
            symbol: (face != CardFace::FaceDown).then_some(card.value),
            interactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub elapsed_seconds: u32,
    pub moves: u32,
    pub score: u32,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time: {} | Moves: {} | Score: {}",
            format_time(self.elapsed_seconds),
            self.moves,
            self.score
        )
    }
}

/// Cosmetic pulse shown after a pair resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Match,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    /// Full grid refresh: new layout, lock, or unlock.
    Board { columns: usize, cards: Vec<CardView> },
    /// A single card changed.
    Card(CardView),
    Feedback {
        cards: [CardId; 2],
        kind: Feedback,
        duration: Duration,
    },
    Stats(Stats),
    /// Terminal message; empty clears it.
    Message(String),
}

/// Observer implemented by views.
pub trait RenderSink {
    fn render(&mut self, directive: &RenderDirective);
}

impl RenderSink for Vec<RenderDirective> {
    fn render(&mut self, directive: &RenderDirective) {
        self.push(directive.clone());
    }
}

/// Complete snapshot of what a player can see.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct BoardView {
    pub epoch: u64,
    pub difficulty: Difficulty,
    pub columns: usize,
    pub cards: Vec<CardView>,
    pub stats: Stats,
    pub phase: TurnPhase,
    pub message: String,
}

impl BoardView {
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.cards.len().div_ceil(self.columns)
        }
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, TurnPhase::Idle | TurnPhase::OneFlipped)
    }

    pub fn is_won(&self) -> bool {
        self.phase == TurnPhase::Won
    }

    pub fn card(&self, id: CardId) -> Option<&CardView> {
        self.cards.iter().find(|c| c.id == id)
    }
}
