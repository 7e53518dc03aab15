use std::collections::HashMap;
use std::vec::Vec;

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::time::{sleep, Duration};

use crate::core::{BoardView, CardFace, CardId, CardView, Epoch, Symbol};
use crate::session::Command;

use super::Player;

/// Computer player that remembers every symbol it has seen face up.
///
/// Strategy: finish a known pair when one is available, otherwise turn an
/// unseen card; after the first pick, take its twin if the twin's position is
/// known.
pub struct AiPlayer {
    memory: HashMap<CardId, Symbol>,
    epoch: Epoch,
    think_time: Duration,
}

impl AiPlayer {
    pub fn new() -> Self {
        Self {
            memory: HashMap::new(),
            epoch: 0,
            think_time: Duration::ZERO,
        }
    }

    /// Pause this long before every pick so a watching human can follow.
    pub fn with_think_time(think_time: Duration) -> Self {
        Self {
            think_time,
            ..Self::new()
        }
    }

    /// Record the symbols visible on `board`. Memory resets with every new game.
    pub fn remember(&mut self, board: &BoardView) {
        if board.epoch != self.epoch {
            self.memory.clear();
            self.epoch = board.epoch;
        }
        for card in &board.cards {
            match (card.face, card.symbol) {
                (CardFace::Matched, _) => {
                    self.memory.remove(&card.id);
                }
                (_, Some(symbol)) => {
                    self.memory.insert(card.id, symbol);
                }
                (_, None) => {}
            }
        }
    }

    /// Symbol remembered for a card, if it has been seen.
    pub fn recall(&self, id: CardId) -> Option<Symbol> {
        self.memory.get(&id).copied()
    }

    /// Pick the next card to flip, or `None` when nothing is face down.
    pub fn choose(&mut self, board: &BoardView, rng: &mut SmallRng) -> Option<CardId> {
        self.remember(board);
        let face_down: Vec<&CardView> = board
            .cards
            .iter()
            .filter(|c| c.face == CardFace::FaceDown)
            .collect();

        let pending = board.cards.iter().find(|c| c.face == CardFace::FaceUp);
        let certain = match pending {
            Some(first) => face_down
                .iter()
                .find(|c| first.symbol.is_some() && self.recall(c.id) == first.symbol)
                .map(|c| c.id),
            None => self.known_pair(&face_down),
        };
        if certain.is_some() {
            return certain;
        }

        let unseen: Vec<CardId> = face_down
            .iter()
            .filter(|c| !self.memory.contains_key(&c.id))
            .map(|c| c.id)
            .collect();
        let pool = if unseen.is_empty() {
            face_down.iter().map(|c| c.id).collect()
        } else {
            unseen
        };
        if pool.is_empty() {
            None
        } else {
            Some(pool[rng.random_range(0..pool.len())])
        }
    }

    fn known_pair(&self, face_down: &[&CardView]) -> Option<CardId> {
        face_down.iter().enumerate().find_map(|(i, card)| {
            let symbol = self.recall(card.id)?;
            face_down[i + 1..]
                .iter()
                .any(|other| self.recall(other.id) == Some(symbol))
                .then_some(card.id)
        })
    }
}

impl Default for AiPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Player for AiPlayer {
    async fn next_command(
        &mut self,
        board: &BoardView,
        rng: &mut SmallRng,
    ) -> anyhow::Result<Command> {
        if board.is_won() {
            return Ok(Command::Quit);
        }
        if !self.think_time.is_zero() {
            sleep(self.think_time).await;
        }
        match self.choose(board, rng) {
            Some(id) => Ok(Command::Select(id)),
            None => {
                log::warn!("No face-down card left to pick, quitting");
                Ok(Command::Quit)
            }
        }
    }

    fn observe(&mut self, board: &BoardView) {
        self.remember(board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Difficulty, Stats, TurnPhase};
    use rand::SeedableRng;

    fn card(id: CardId, face: CardFace, symbol: Option<Symbol>) -> CardView {
        CardView {
            id,
            face,
            symbol,
            interactive: face == CardFace::FaceDown,
        }
    }

    fn board(epoch: Epoch, cards: Vec<CardView>, phase: TurnPhase) -> BoardView {
        BoardView {
            epoch,
            difficulty: Difficulty::Easy,
            columns: 4,
            cards,
            stats: Stats::default(),
            phase,
            message: String::new(),
        }
    }

    #[test]
    fn completes_pair_when_twin_is_known() {
        let mut ai = AiPlayer::new();
        let mut rng = SmallRng::seed_from_u64(1);
        // card 3 was seen earlier showing the same symbol as card 0
        ai.remember(&board(
            1,
            vec![
                card(0, CardFace::FaceDown, None),
                card(1, CardFace::FaceDown, None),
                card(2, CardFace::FaceDown, None),
                card(3, CardFace::FaceUp, Some("🎮")),
            ],
            TurnPhase::Evaluating,
        ));
        let now = board(
            1,
            vec![
                card(0, CardFace::FaceUp, Some("🎮")),
                card(1, CardFace::FaceDown, None),
                card(2, CardFace::FaceDown, None),
                card(3, CardFace::FaceDown, None),
            ],
            TurnPhase::OneFlipped,
        );
        assert_eq!(ai.choose(&now, &mut rng), Some(3));
    }

    #[test]
    fn starts_with_known_pair() {
        let mut ai = AiPlayer::new();
        let mut rng = SmallRng::seed_from_u64(1);
        ai.memory.insert(1, "🎯");
        ai.memory.insert(2, "🎯");
        ai.epoch = 1;
        let now = board(
            1,
            (0..4).map(|id| card(id, CardFace::FaceDown, None)).collect(),
            TurnPhase::Idle,
        );
        assert_eq!(ai.choose(&now, &mut rng), Some(1));
    }

    #[test]
    fn memory_resets_on_new_epoch() {
        let mut ai = AiPlayer::new();
        ai.remember(&board(
            1,
            vec![card(0, CardFace::FaceUp, Some("🎮"))],
            TurnPhase::OneFlipped,
        ));
        assert_eq!(ai.recall(0), Some("🎮"));
        ai.remember(&board(
            2,
            vec![card(0, CardFace::FaceDown, None)],
            TurnPhase::Idle,
        ));
        assert_eq!(ai.recall(0), None);
    }

    #[test]
    fn prefers_unseen_cards() {
        let mut ai = AiPlayer::new();
        let mut rng = SmallRng::seed_from_u64(5);
        ai.memory.insert(0, "🎮");
        ai.memory.insert(1, "🎯");
        ai.epoch = 1;
        let now = board(
            1,
            (0..4).map(|id| card(id, CardFace::FaceDown, None)).collect(),
            TurnPhase::Idle,
        );
        for _ in 0..20 {
            let pick = ai.choose(&now, &mut rng).unwrap();
            assert!(pick == 2 || pick == 3);
        }
    }
}
