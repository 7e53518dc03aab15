use alloc::vec::Vec;

use super::config::SYMBOLS;

/// Identifier of a card, unique within one game.
pub type CardId = usize;

/// Opaque face token. Two cards in a deck share each symbol.
pub type Symbol = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub value: Symbol,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub const fn new(id: CardId, value: Symbol) -> Self {
        Self {
            id,
            value,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Face up and still eligible for comparison.
    pub const fn is_pending(&self) -> bool {
        self.is_flipped && !self.is_matched
    }
}

/// Build `2 * pair_count` face-down cards, two per symbol, with ids assigned
/// densely in generation order. Requests beyond the symbol set are clamped.
pub fn generate_card_pairs(pair_count: usize) -> Vec<Card> {
    let pairs = if pair_count > SYMBOLS.len() {
        log::warn!(
            "Requested {} pairs but only {} symbols exist, clamping",
            pair_count,
            SYMBOLS.len()
        );
        SYMBOLS.len()
    } else {
        pair_count
    };

    SYMBOLS[..pairs]
        .iter()
        .flat_map(|&symbol| [symbol, symbol])
        .enumerate()
        .map(|(id, symbol)| Card::new(id, symbol))
        .collect()
}
