use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use super::common::GameError;

/// Symbols available for card faces, in the order pairs are drawn.
pub const SYMBOLS: [&str; 12] = [
    "🎮", "🎯", "🎨", "🎭", "🎪", "🎬", "🎤", "🎧", "🎸", "🎺", "🎻", "🥁",
];

pub const BASE_POINTS_PER_PAIR: u32 = 100;
pub const TIME_PENALTY_PER_SECOND: u32 = 2;
pub const MOVE_PENALTY: u32 = 5;
/// Seconds under which a win still earns a time bonus.
pub const TIME_BONUS_WINDOW_SECS: u32 = 300;
pub const TIME_BONUS_PER_SECOND: u32 = 3;
pub const EFFICIENCY_BONUS_PER_MOVE: u32 = 10;

/// Static description of a difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyConfig {
    pub pair_count: usize,
    pub display_name: &'static str,
    pub grid_columns: usize,
}

impl DifficultyConfig {
    pub const fn new(pair_count: usize, display_name: &'static str, grid_columns: usize) -> Self {
        Self {
            pair_count,
            display_name,
            grid_columns,
        }
    }

    pub const fn card_count(&self) -> usize {
        self.pair_count * 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(clap::ValueEnum, serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

pub const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

impl Difficulty {
    pub const fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig::new(4, "Easy", 4),
            Difficulty::Medium => DifficultyConfig::new(8, "Medium", 4),
            Difficulty::Hard => DifficultyConfig::new(12, "Hard", 6),
        }
    }

    pub const fn pair_count(self) -> usize {
        self.config().pair_count
    }

    pub const fn grid_columns(self) -> usize {
        self.config().grid_columns
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().display_name)
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DIFFICULTIES
            .iter()
            .copied()
            .find(|d| d.config().display_name.eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

/// Delays used for deferred work. The evaluation and settle delays gate input;
/// the feedback duration is cosmetic and only forwarded to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub evaluation_delay: Duration,
    pub feedback_duration: Duration,
    pub settle_delay: Duration,
    pub tick_interval: Duration,
}

impl Timings {
    pub const fn standard() -> Self {
        Self {
            evaluation_delay: Duration::from_millis(1000),
            feedback_duration: Duration::from_millis(500),
            settle_delay: Duration::from_millis(300),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::standard()
    }
}
