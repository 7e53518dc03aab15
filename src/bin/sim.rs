use std::time::Duration;

use memory_match::{
    AiPlayer, Difficulty, GameEngine, RenderDirective, RenderSink, Timings, VirtualClock,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Virtual time the computer spends on each pick.
const THINK_TIME: Duration = Duration::from_millis(700);
const MAX_PICKS: usize = 500;

struct Discard;

impl RenderSink for Discard {
    fn render(&mut self, _directive: &RenderDirective) {}
}

fn main() -> anyhow::Result<()> {
    memory_match::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <seed> [easy|medium|hard]", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let difficulty: Difficulty = match args.get(2) {
        Some(level) => level.parse::<Difficulty>().map_err(|e| anyhow::anyhow!("{}", e))?,
        None => Difficulty::default(),
    };

    let mut deck_rng = SmallRng::seed_from_u64(seed);
    let mut ai_rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
    let engine = GameEngine::new(difficulty, Timings::standard(), &mut deck_rng);
    let mut clock = VirtualClock::new(engine, Discard);
    let mut ai = AiPlayer::new();

    let mut picks = 0;
    while !clock.engine().board_view().is_won() {
        if picks >= MAX_PICKS {
            anyhow::bail!("No win after {} picks", picks);
        }
        clock.advance(THINK_TIME);
        let board = clock.engine().board_view();
        let Some(id) = ai.choose(&board, &mut ai_rng) else {
            anyhow::bail!("No card left to pick");
        };
        clock.select(id);
        ai.remember(&clock.engine().board_view());
        clock.run_until_settled();
        picks += 1;
    }

    let summary = clock.engine().summary();
    let result = json!({
        "seed": seed,
        "difficulty": difficulty,
        "won": summary.is_some(),
        "picks": picks,
        "moves": summary.map(|s| s.moves),
        "elapsed_seconds": summary.map(|s| s.elapsed_seconds),
        "score": summary.map(|s| s.score),
        "virtual_ms": clock.now_ms(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
