use clap::{Parser, Subcommand};
use memory_match::{
    format_time, init_logging, AiPlayer, CliPlayer, Difficulty, GameSession, Player, PlayerNode,
    TerminalView, Timings,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Memory match card game in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game yourself.
    Play {
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        #[arg(long, help = "Fix RNG seed for reproducible decks (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Watch the computer play one game.
    Auto {
        #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 400, help = "Pause before each pick, in milliseconds")]
        think_ms: u64,
    },
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    if let Some(s) = seed {
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    }
}

async fn run(
    player: Box<dyn Player>,
    difficulty: Difficulty,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (deck will be reproducible)", s);
    }
    let deck_rng = seeded_rng(seed);
    let player_rng = seeded_rng(seed.map(|s| s.wrapping_add(1)));

    let session = GameSession::new(
        difficulty,
        Timings::standard(),
        deck_rng,
        Box::new(TerminalView::new()),
    );
    let node = PlayerNode::new(player, session);
    let session = node.run(player_rng).await?;

    match session.engine().summary() {
        Some(summary) => println!(
            "\nLast game: {} in {}, {} moves, score {}",
            summary.difficulty,
            format_time(summary.elapsed_seconds),
            summary.moves,
            summary.score
        ),
        None => println!("\nGame abandoned."),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { difficulty, seed } => {
            println!("Starting a {} game. Type 'help' for commands.", difficulty);
            run(Box::new(CliPlayer::new()), difficulty, seed).await
        }
        Commands::Auto {
            difficulty,
            seed,
            think_ms,
        } => {
            println!("Computer playing a {} game...", difficulty);
            let ai = AiPlayer::with_think_time(Duration::from_millis(think_ms));
            run(Box::new(ai), difficulty, seed).await
        }
    }
}
