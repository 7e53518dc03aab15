use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::mem;
use core::time::Duration;
use rand::Rng;

use super::{
    card::{generate_card_pairs, Card, CardId},
    common::{DeferredOutcome, GameError, Rejection, SelectOutcome},
    config::{Difficulty, Timings},
    render::{BoardView, CardView, Feedback, RenderDirective, Stats},
    score::{final_score, format_time, live_score},
    shuffle::shuffle,
};

/// Generation counter identifying one game. Deferred work carries the epoch
/// it was issued under and is dropped once a newer game has started.
pub type Epoch = u64;

/// Lifecycle of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    /// Dealt, waiting for the first flip. Timer not running.
    Ready,
    Active,
    Won,
}

/// Where the turn state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    Idle,
    OneFlipped,
    /// Two cards face up, waiting for the evaluation delay.
    Evaluating,
    /// Pair resolved, input still locked until the settle delay elapses.
    Settling,
    Won,
}

/// Continuations the engine asks its driver to run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    Evaluate,
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub epoch: Epoch,
    pub kind: Deferred,
    pub delay: Duration,
}

/// Side effects produced by a transition, drained by the driver with
/// [`GameEngine::take_effects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Render(RenderDirective),
    Schedule(ScheduledTask),
    /// Start a repeating tick calling [`GameEngine::tick`] with `epoch`.
    StartTimer { epoch: Epoch, interval: Duration },
    /// Cancel the running tick, if any.
    StopTimer,
}

/// Outcome of a won game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSummary {
    pub difficulty: Difficulty,
    pub moves: u32,
    pub elapsed_seconds: u32,
    pub score: u32,
}

/// Memory game state machine.
///
/// All state lives here and changes only through the input methods
/// ([`select_card`](Self::select_card), [`start_new_game`](Self::start_new_game),
/// [`set_difficulty`](Self::set_difficulty)) and the driver callbacks
/// ([`run_deferred`](Self::run_deferred), [`tick`](Self::tick)).
#[derive(Debug, Clone)]
pub struct GameEngine {
    difficulty: Difficulty,
    timings: Timings,
    epoch: Epoch,
    cards: Vec<Card>,
    flipped: Vec<CardId>,
    is_locked: bool,
    moves: u32,
    elapsed_seconds: u32,
    score: u32,
    status: GameStatus,
    timer_running: bool,
    summary: Option<GameSummary>,
    message: String,
    outbox: Vec<Effect>,
}

impl GameEngine {
    /// Create an engine and deal the first game.
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, timings: Timings, rng: &mut R) -> Self {
        let mut engine = Self {
            difficulty,
            timings,
            epoch: 0,
            cards: Vec::new(),
            flipped: Vec::with_capacity(2),
            is_locked: false,
            moves: 0,
            elapsed_seconds: 0,
            score: 0,
            status: GameStatus::Ready,
            timer_running: false,
            summary: None,
            message: String::new(),
            outbox: Vec::new(),
        };
        engine.start_new_game(rng);
        engine
    }

    /// Abandon the current game and deal a fresh shuffled deck.
    pub fn start_new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.stop_timer();
        self.epoch = self.epoch.wrapping_add(1);

        let mut cards = generate_card_pairs(self.difficulty.pair_count());
        shuffle(&mut cards, rng);
        self.cards = cards;
        self.flipped.clear();
        self.is_locked = false;
        self.moves = 0;
        self.elapsed_seconds = 0;
        self.score = 0;
        self.status = GameStatus::Ready;
        self.summary = None;
        self.message.clear();

        log::info!(
            "New {} game (epoch {}) with {} cards",
            self.difficulty,
            self.epoch,
            self.cards.len()
        );
        self.emit_board();
        self.emit_stats();
        self.emit(Effect::Render(RenderDirective::Message(String::new())));
    }

    /// Switch level; always starts a new game.
    pub fn set_difficulty<R: Rng + ?Sized>(&mut self, difficulty: Difficulty, rng: &mut R) {
        self.difficulty = difficulty;
        self.start_new_game(rng);
    }

    /// Handle a card selection event. Invalid or out-of-turn selections are
    /// rejected without touching state.
    pub fn select_card(&mut self, id: CardId) -> SelectOutcome {
        if self.status == GameStatus::Won {
            return self.reject(id, Rejection::Finished);
        }
        if self.is_locked {
            return self.reject(id, Rejection::Locked);
        }
        let Some(idx) = self.index_of(id) else {
            log::error!("Selection of card {} which is not in the current deck", id);
            return SelectOutcome::Rejected(Rejection::UnknownCard);
        };
        // a repeated pick of the pending card must not queue twice
        if self.flipped.contains(&id) {
            return self.reject(id, Rejection::AlreadySelected);
        }
        if self.cards[idx].is_matched {
            return self.reject(id, Rejection::AlreadyMatched);
        }
        if self.cards[idx].is_flipped {
            return self.reject(id, Rejection::AlreadyFaceUp);
        }
        if self.flipped.len() >= 2 {
            return self.reject(id, Rejection::PairPending);
        }

        if self.flipped.is_empty() && self.status == GameStatus::Ready {
            self.status = GameStatus::Active;
            self.start_timer();
        }

        self.cards[idx].is_flipped = true;
        self.flipped.push(id);
        self.emit_card(idx);

        if self.flipped.len() < 2 {
            return SelectOutcome::Flipped;
        }

        self.moves += 1;
        self.recompute_score();
        self.emit_stats();
        self.is_locked = true;
        self.emit_board();
        self.schedule(Deferred::Evaluate, self.timings.evaluation_delay);
        SelectOutcome::PairFlipped
    }

    /// Run a continuation previously requested through [`Effect::Schedule`].
    pub fn run_deferred(&mut self, task: ScheduledTask) -> DeferredOutcome {
        if task.epoch != self.epoch {
            log::debug!(
                "Dropping {:?} from epoch {} (current {})",
                task.kind,
                task.epoch,
                self.epoch
            );
            return DeferredOutcome::Stale;
        }
        match task.kind {
            Deferred::Evaluate => self.evaluate(),
            Deferred::Settle => self.settle(),
        }
    }

    /// One timer tick. Returns whether the clock advanced.
    pub fn tick(&mut self, epoch: Epoch) -> bool {
        if epoch != self.epoch || self.status != GameStatus::Active {
            log::debug!("Ignoring tick for epoch {} ({:?})", epoch, self.status);
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        self.recompute_score();
        self.emit_stats();
        true
    }

    fn evaluate(&mut self) -> DeferredOutcome {
        let [a, b] = match self.flipped.as_slice() {
            [a, b] if self.is_locked => [*a, *b],
            other => {
                log::error!(
                    "Evaluation fired with {} flipped cards (locked: {})",
                    other.len(),
                    self.is_locked
                );
                return DeferredOutcome::Invalid;
            }
        };
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            log::error!("Flipped cards {} and {} are not in the deck", a, b);
            return DeferredOutcome::Invalid;
        };

        let matched = self.cards[ia].value == self.cards[ib].value;
        for idx in [ia, ib] {
            if matched {
                self.cards[idx].is_matched = true;
            } else {
                self.cards[idx].is_flipped = false;
            }
        }
        self.flipped.clear();

        let kind = if matched {
            Feedback::Match
        } else {
            Feedback::Mismatch
        };
        self.emit(Effect::Render(RenderDirective::Feedback {
            cards: [a, b],
            kind,
            duration: self.timings.feedback_duration,
        }));
        self.emit_card(ia);
        self.emit_card(ib);

        let won = self.check_win();
        self.schedule(Deferred::Settle, self.timings.settle_delay);

        if won {
            DeferredOutcome::Won
        } else if matched {
            DeferredOutcome::Matched
        } else {
            DeferredOutcome::Mismatched
        }
    }

    fn settle(&mut self) -> DeferredOutcome {
        if !self.is_locked || !self.flipped.is_empty() {
            log::error!(
                "Settle fired while unlocked or with {} cards pending",
                self.flipped.len()
            );
            return DeferredOutcome::Invalid;
        }
        self.is_locked = false;
        self.emit_board();
        DeferredOutcome::Settled
    }

    fn check_win(&mut self) -> bool {
        if self.status == GameStatus::Won || !self.cards.iter().all(|c| c.is_matched) {
            return false;
        }
        self.stop_timer();
        self.status = GameStatus::Won;
        self.score = final_score(self.pair_count(), self.moves, self.elapsed_seconds);
        self.summary = Some(GameSummary {
            difficulty: self.difficulty,
            moves: self.moves,
            elapsed_seconds: self.elapsed_seconds,
            score: self.score,
        });
        self.message = format!(
            "You won! Time: {}, Moves: {}, Score: {}",
            format_time(self.elapsed_seconds),
            self.moves,
            self.score
        );
        log::info!(
            "Game {} won in {} moves, {}s, score {}",
            self.epoch,
            self.moves,
            self.elapsed_seconds,
            self.score
        );
        self.emit_stats();
        self.emit(Effect::Render(RenderDirective::Message(self.message.clone())));
        true
    }

    fn reject(&self, id: CardId, reason: Rejection) -> SelectOutcome {
        log::debug!("Ignoring selection of card {}: {:?}", id, reason);
        SelectOutcome::Rejected(reason)
    }

    fn recompute_score(&mut self) {
        self.score = live_score(self.pair_count(), self.moves, self.elapsed_seconds);
    }

    fn start_timer(&mut self) {
        self.timer_running = true;
        self.emit(Effect::StartTimer {
            epoch: self.epoch,
            interval: self.timings.tick_interval,
        });
    }

    fn stop_timer(&mut self) {
        if mem::replace(&mut self.timer_running, false) {
            self.emit(Effect::StopTimer);
        }
    }

    fn schedule(&mut self, kind: Deferred, delay: Duration) {
        self.emit(Effect::Schedule(ScheduledTask {
            epoch: self.epoch,
            kind,
            delay,
        }));
    }

    fn emit(&mut self, effect: Effect) {
        self.outbox.push(effect);
    }

    fn emit_card(&mut self, idx: usize) {
        let view = self.view_of(&self.cards[idx]);
        self.emit(Effect::Render(RenderDirective::Card(view)));
    }

    fn emit_board(&mut self) {
        let directive = RenderDirective::Board {
            columns: self.difficulty.grid_columns(),
            cards: self.card_views(),
        };
        self.emit(Effect::Render(directive));
    }

    fn emit_stats(&mut self) {
        let stats = self.stats();
        self.emit(Effect::Render(RenderDirective::Stats(stats)));
    }

    fn index_of(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    fn view_of(&self, card: &Card) -> CardView {
        let interactive = !self.is_locked
            && self.status != GameStatus::Won
            && !card.is_flipped
            && !card.is_matched;
        CardView::of(card, interactive)
    }

    /// Drain the effects produced since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.outbox)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Cards in dealt order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Result<&Card, GameError> {
        self.cards
            .iter()
            .find(|c| c.id == id)
            .ok_or(GameError::UnknownCard(id))
    }

    /// Ids of the face-up cards awaiting comparison, in selection order.
    pub fn flipped(&self) -> &[CardId] {
        &self.flipped
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn summary(&self) -> Option<GameSummary> {
        self.summary
    }

    /// Win text, empty while the game is not won.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn phase(&self) -> TurnPhase {
        if self.status == GameStatus::Won {
            TurnPhase::Won
        } else if self.is_locked {
            if self.flipped.len() == 2 {
                TurnPhase::Evaluating
            } else {
                TurnPhase::Settling
            }
        } else if self.flipped.len() == 1 {
            TurnPhase::OneFlipped
        } else {
            TurnPhase::Idle
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            elapsed_seconds: self.elapsed_seconds,
            moves: self.moves,
            score: self.score,
        }
    }

    pub fn card_views(&self) -> Vec<CardView> {
        self.cards.iter().map(|c| self.view_of(c)).collect()
    }

    pub fn board_view(&self) -> BoardView {
        BoardView {
            epoch: self.epoch,
            difficulty: self.difficulty,
            columns: self.difficulty.grid_columns(),
            cards: self.card_views(),
            stats: self.stats(),
            phase: self.phase(),
            message: self.message.clone(),
        }
    }
}
