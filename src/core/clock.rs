//! Deterministic driver over a virtual millisecond clock.
//!
//! Plays the role of the async session without a runtime: scheduled tasks and
//! timer ticks are queued by due time and fired in order as the clock is
//! advanced. Used by the simulator and by tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::time::Duration;
use rand::Rng;

use super::{
    card::CardId,
    common::SelectOutcome,
    config::Difficulty,
    game::{Effect, Epoch, GameEngine, ScheduledTask},
    render::{RenderDirective, RenderSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Deferred(ScheduledTask),
    Tick(Epoch),
}

/// Due time in ms plus insertion sequence, so simultaneous wakes keep order.
type Slot = (u64, u64);

#[derive(Debug, Clone, Copy)]
struct TimerState {
    slot: Slot,
    interval_ms: u64,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub struct VirtualClock<S: RenderSink = Vec<RenderDirective>> {
    engine: GameEngine,
    view: S,
    now: u64,
    seq: u64,
    queue: BTreeMap<Slot, Wake>,
    timer: Option<TimerState>,
}

impl<S: RenderSink> VirtualClock<S> {
    /// Wrap an engine, forwarding any effects it already produced.
    pub fn new(engine: GameEngine, view: S) -> Self {
        let mut clock = Self {
            engine,
            view,
            now: 0,
            seq: 0,
            queue: BTreeMap::new(),
            timer: None,
        };
        clock.flush();
        clock
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn view(&self) -> &S {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut S {
        &mut self.view
    }

    pub fn into_parts(self) -> (GameEngine, S) {
        (self.engine, self.view)
    }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> u64 {
        self.now
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Deferred tasks still queued, stale ones included.
    pub fn pending_tasks(&self) -> usize {
        self.queue
            .values()
            .filter(|w| matches!(w, Wake::Deferred(_)))
            .count()
    }

    pub fn select(&mut self, id: CardId) -> SelectOutcome {
        let outcome = self.engine.select_card(id);
        self.flush();
        outcome
    }

    pub fn new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.engine.start_new_game(rng);
        self.flush();
    }

    pub fn set_difficulty<R: Rng + ?Sized>(&mut self, difficulty: Difficulty, rng: &mut R) {
        self.engine.set_difficulty(difficulty, rng);
        self.flush();
    }

    /// Move the clock forward, firing everything due on the way.
    pub fn advance(&mut self, by: Duration) {
        let target = self.now.saturating_add(millis(by));
        while self.fire_next(target) {}
        self.now = target;
    }

    /// Fire wakes in due order until no deferred task is left. Timer ticks
    /// falling in between fire too.
    pub fn run_until_settled(&mut self) {
        while self.pending_tasks() > 0 {
            if !self.fire_next(u64::MAX) {
                break;
            }
        }
    }

    fn fire_next(&mut self, limit: u64) -> bool {
        let Some((slot, wake)) = self.queue.pop_first() else {
            return false;
        };
        if slot.0 > limit {
            self.queue.insert(slot, wake);
            return false;
        }
        self.now = slot.0;

        match wake {
            Wake::Deferred(task) => {
                self.engine.run_deferred(task);
            }
            Wake::Tick(epoch) => {
                let rearm = self
                    .timer
                    .filter(|t| t.slot == slot)
                    .map(|t| t.interval_ms);
                if let Some(interval_ms) = rearm {
                    let next = self.push(self.now + interval_ms, Wake::Tick(epoch));
                    self.timer = Some(TimerState {
                        slot: next,
                        interval_ms,
                    });
                }
                self.engine.tick(epoch);
            }
        }
        self.flush();
        true
    }

    fn push(&mut self, due: u64, wake: Wake) -> Slot {
        let slot = (due, self.seq);
        self.seq += 1;
        self.queue.insert(slot, wake);
        slot
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.queue.remove(&timer.slot);
        }
    }

    fn flush(&mut self) {
        for effect in self.engine.take_effects() {
            match effect {
                Effect::Render(directive) => self.view.render(&directive),
                Effect::Schedule(task) => {
                    let due = self.now.saturating_add(millis(task.delay));
                    self.push(due, Wake::Deferred(task));
                }
                Effect::StartTimer { epoch, interval } => {
                    self.stop_timer();
                    let interval_ms = millis(interval).max(1);
                    let slot = self.push(self.now + interval_ms, Wake::Tick(epoch));
                    self.timer = Some(TimerState { slot, interval_ms });
                }
                Effect::StopTimer => self.stop_timer(),
            }
        }
    }
}
