#![cfg(feature = "std")]

use std::boxed::Box;

use rand::rngs::SmallRng;
use tokio::sync::{mpsc, watch};

use crate::{
    player::Player,
    session::{Command, GameSession, Snapshot},
};

/// Connects a [`Player`] to a [`GameSession`].
///
/// The player runs in its own task and only sees the board when it accepts
/// input (or the game is won), so it never issues commands during an
/// evaluation window. The session keeps processing timer ticks while the
/// player thinks.
pub struct PlayerNode {
    player: Box<dyn Player>,
    session: GameSession,
}

impl PlayerNode {
    pub fn new(player: Box<dyn Player>, session: GameSession) -> Self {
        Self { player, session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Play until the player quits. Returns the session for inspection.
    pub async fn run(self, rng: SmallRng) -> anyhow::Result<GameSession> {
        let Self {
            player,
            mut session,
        } = self;
        let (commands_tx, commands_rx) = mpsc::channel(8);
        let snapshots = session.subscribe();

        let driver = tokio::spawn(drive_player(player, snapshots, commands_tx, rng));
        session.run(commands_rx).await?;
        driver.await??;
        Ok(session)
    }
}

async fn drive_player(
    mut player: Box<dyn Player>,
    mut snapshots: watch::Receiver<Snapshot>,
    commands: mpsc::Sender<Command>,
    mut rng: SmallRng,
) -> anyhow::Result<()> {
    let mut sent: u64 = 0;
    loop {
        let board = snapshots
            .wait_for(|s| s.handled >= sent && (s.board.accepts_input() || s.board.is_won()))
            .await?
            .board
            .clone();

        let command = player.next_command(&board, &mut rng).await?;
        if commands.send(command).await.is_err() {
            log::debug!("Session closed before {:?} was delivered", command);
            break;
        }
        sent += 1;
        if command == Command::Quit {
            break;
        }

        let after = snapshots
            .wait_for(|s| s.handled >= sent)
            .await?
            .board
            .clone();
        player.observe(&after);
    }
    Ok(())
}
