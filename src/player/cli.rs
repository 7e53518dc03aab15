#![cfg(feature = "std")]

use std::io::{self, Write};
use std::string::String;

use rand::rngs::SmallRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::core::{BoardView, Difficulty, GameError};
use crate::session::Command;

use super::Player;

/// Human player typing commands on stdin.
pub struct CliPlayer {
    lines: Lines<BufReader<Stdin>>,
}

impl CliPlayer {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a grid index as a coordinate such as `B3`.
pub fn coord_to_string(index: usize, columns: usize) -> String {
    let col = (b'A' + (index % columns) as u8) as char;
    format!("{}{}", col, index / columns + 1)
}

/// Parse a coordinate such as `B3` into a row-major grid index.
pub fn parse_coord(input: &str, columns: usize, rows: usize) -> Result<usize, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A1)".to_string());
    }
    let last_col = (b'A' + columns.saturating_sub(1) as u8) as char;
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-{}", col_ch, last_col));
    }
    let col = (col_ch as u8).wrapping_sub(b'A') as usize;
    if col >= columns {
        return Err(format!("Column '{}' out of bounds - must be A-{}", col_ch, last_col));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, rows))?;
    if row == 0 || row > rows {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, rows));
    }
    Ok((row - 1) * columns + col)
}

/// Parse one line of player input against the current board.
pub fn parse_command(input: &str, board: &BoardView) -> Result<Command, String> {
    let input = input.trim();
    let mut words = input.split_whitespace();
    match words.next().map(|w| w.to_ascii_lowercase()).as_deref() {
        None => Err("Empty input".to_string()),
        Some("q" | "quit") => Ok(Command::Quit),
        Some("n" | "new") => Ok(Command::NewGame),
        Some("d" | "difficulty") => {
            let level = words
                .next()
                .ok_or("Missing level - use easy, medium or hard")?;
            level
                .parse::<Difficulty>()
                .map(Command::SetDifficulty)
                .map_err(|e: GameError| e.to_string())
        }
        Some(_) if board.is_won() => {
            Err("Game over - 'n' for a new game, 'd <level>' or 'q' to quit".to_string())
        }
        Some(_) => {
            let index = parse_coord(input, board.columns, board.rows())?;
            board
                .cards
                .get(index)
                .map(|card| Command::Select(card.id))
                .ok_or_else(|| format!("No card at {}", input.to_ascii_uppercase()))
        }
    }
}

fn print_help() {
    std::println!("\n╔════════════════════════════════════════════════════════╗");
    std::println!("║                        HELP                            ║");
    std::println!("╠════════════════════════════════════════════════════════╣");
    std::println!("║ <COLUMN><ROW>   flip the card there, e.g. A1 or C3     ║");
    std::println!("║ n               start a new game                       ║");
    std::println!("║ d <level>       switch to easy, medium or hard         ║");
    std::println!("║ q               quit                                   ║");
    std::println!("║                                                        ║");
    std::println!("║ Board symbols:                                         ║");
    std::println!("║   [??] = face down                                     ║");
    std::println!("║   [🎮] = face up, waiting for its pair                 ║");
    std::println!("║    🎮  = matched                                       ║");
    std::println!("╚════════════════════════════════════════════════════════╝\n");
}

#[async_trait::async_trait]
impl Player for CliPlayer {
    async fn next_command(
        &mut self,
        board: &BoardView,
        _rng: &mut SmallRng,
    ) -> anyhow::Result<Command> {
        loop {
            if board.is_won() {
                std::print!("\nPlay again? ('n' new game, 'd <level>', 'q' quit): ");
            } else {
                std::print!("\nPick a card (or 'help'): ");
            }
            io::stdout().flush()?;

            let Some(line) = self.lines.next_line().await? else {
                // stdin closed
                return Ok(Command::Quit);
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case("help") || line == "?" {
                print_help();
                continue;
            }
            match parse_command(line, board) {
                Ok(command) => return Ok(command),
                Err(e) => std::println!("✗ {}", e),
            }
        }
    }
}
