#![cfg(feature = "std")]

use std::boxed::Box;
use std::vec::Vec;

use rand::rngs::SmallRng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Duration, Instant, MissedTickBehavior};

use crate::core::{
    BoardView, CardId, Difficulty, Effect, Epoch, GameEngine, RenderSink, ScheduledTask, Timings,
};

/// Input events accepted by a [`GameSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(CardId),
    NewGame,
    SetDifficulty(Difficulty),
    Quit,
}

/// Board state published after every processed event. `handled` counts the
/// commands processed so far, letting a player tell when its own command has
/// taken effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub handled: u64,
    pub board: BoardView,
}

#[derive(Debug, Clone, Copy)]
enum Wake {
    Deferred(ScheduledTask),
    Tick(Epoch),
}

/// Cancellable handle to the repeating tick task.
#[derive(Default)]
struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    fn start(&mut self, epoch: Epoch, period: Duration, wakes: mpsc::UnboundedSender<Wake>) {
        self.stop();
        self.task = Some(tokio::spawn(async move {
            // first tick one full period after start
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if wakes.send(Wake::Tick(epoch)).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stopping an already stopped timer is a no-op.
    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

/// Real-time driver for a [`GameEngine`].
///
/// Commands and wake-ups (timer ticks, deferred evaluation and settle tasks)
/// are handled one at a time to completion. Deferred work is carried out by
/// spawned sleep tasks that post back through a channel; on reset those tasks
/// are aborted and anything already in flight is dropped by the engine's
/// epoch check.
pub struct GameSession {
    engine: GameEngine,
    rng: SmallRng,
    view: Box<dyn RenderSink + Send>,
    wake_tx: mpsc::UnboundedSender<Wake>,
    wake_rx: mpsc::UnboundedReceiver<Wake>,
    timer: TimerHandle,
    pending: Vec<JoinHandle<()>>,
    snapshots: watch::Sender<Snapshot>,
    handled: u64,
}

impl GameSession {
    pub fn new(
        difficulty: Difficulty,
        timings: Timings,
        mut rng: SmallRng,
        view: Box<dyn RenderSink + Send>,
    ) -> Self {
        let engine = GameEngine::new(difficulty, timings, &mut rng);
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(Snapshot {
            handled: 0,
            board: engine.board_view(),
        });
        let mut session = Self {
            engine,
            rng,
            view,
            wake_tx,
            wake_rx,
            timer: TimerHandle::default(),
            pending: Vec::new(),
            snapshots,
            handled: 0,
        };
        session.flush();
        session
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Process one command. Returns `false` once the session should end.
    pub fn handle(&mut self, command: Command) -> bool {
        let keep_going = match command {
            Command::Select(id) => {
                let outcome = self.engine.select_card(id);
                log::trace!("select {} -> {:?}", id, outcome);
                true
            }
            Command::NewGame => {
                self.cancel_pending();
                self.engine.start_new_game(&mut self.rng);
                true
            }
            Command::SetDifficulty(difficulty) => {
                self.cancel_pending();
                self.engine.set_difficulty(difficulty, &mut self.rng);
                true
            }
            Command::Quit => false,
        };
        self.handled += 1;
        self.flush();
        self.publish();
        keep_going
    }

    /// Wait for the next timer tick or deferred task and apply it.
    pub async fn step(&mut self) -> anyhow::Result<()> {
        let wake = self
            .wake_rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Wake channel closed"))?;
        self.wake(wake);
        Ok(())
    }

    /// Event loop: runs until `Quit` or until every command sender is gone.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(wake) = self.wake_rx.recv() => self.wake(wake),
            }
        }
        self.cancel_pending();
        self.timer.stop();
        Ok(())
    }

    fn wake(&mut self, wake: Wake) {
        match wake {
            Wake::Deferred(task) => {
                let outcome = self.engine.run_deferred(task);
                log::trace!("{:?} -> {:?}", task.kind, outcome);
            }
            Wake::Tick(epoch) => {
                self.engine.tick(epoch);
            }
        }
        self.flush();
        self.publish();
    }

    fn flush(&mut self) {
        for effect in self.engine.take_effects() {
            match effect {
                Effect::Render(directive) => self.view.render(&directive),
                Effect::Schedule(task) => {
                    let wakes = self.wake_tx.clone();
                    self.pending.retain(|handle| !handle.is_finished());
                    self.pending.push(tokio::spawn(async move {
                        sleep(task.delay).await;
                        let _ = wakes.send(Wake::Deferred(task));
                    }));
                }
                Effect::StartTimer { epoch, interval } => {
                    self.timer.start(epoch, interval, self.wake_tx.clone());
                }
                Effect::StopTimer => self.timer.stop(),
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(Snapshot {
            handled: self.handled,
            board: self.engine.board_view(),
        });
    }

    fn cancel_pending(&mut self) {
        for task in self.pending.drain(..) {
            task.abort();
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.cancel_pending();
        self.timer.stop();
    }
}
