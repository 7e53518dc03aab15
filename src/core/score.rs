//! Score formulas. Live score is a pure function of the counters; the final
//! score adds time and efficiency bonuses that the live score never shows.

use alloc::format;
use alloc::string::String;

use super::config::{
    BASE_POINTS_PER_PAIR, EFFICIENCY_BONUS_PER_MOVE, MOVE_PENALTY, TIME_BONUS_PER_SECOND,
    TIME_BONUS_WINDOW_SECS, TIME_PENALTY_PER_SECOND,
};

fn base_minus_penalties(pair_count: usize, moves: u32, elapsed_seconds: u32) -> i64 {
    pair_count as i64 * i64::from(BASE_POINTS_PER_PAIR)
        - i64::from(elapsed_seconds) * i64::from(TIME_PENALTY_PER_SECOND)
        - i64::from(moves) * i64::from(MOVE_PENALTY)
}

fn clamp_score(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Score shown while playing. Zero until the first move completes.
pub fn live_score(pair_count: usize, moves: u32, elapsed_seconds: u32) -> u32 {
    if moves == 0 {
        return 0;
    }
    clamp_score(base_minus_penalties(pair_count, moves, elapsed_seconds))
}

/// Score awarded on a win.
pub fn final_score(pair_count: usize, moves: u32, elapsed_seconds: u32) -> u32 {
    let time_bonus = i64::from(TIME_BONUS_WINDOW_SECS.saturating_sub(elapsed_seconds))
        * i64::from(TIME_BONUS_PER_SECOND);
    let efficiency_bonus = (pair_count as i64 * 2 - i64::from(moves)).max(0)
        * i64::from(EFFICIENCY_BONUS_PER_MOVE);
    clamp_score(base_minus_penalties(pair_count, moves, elapsed_seconds) + time_bonus + efficiency_bonus)
}

/// `MM:SS`, minutes growing past two digits when needed.
pub fn format_time(elapsed_seconds: u32) -> String {
    format!("{:02}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60)
}
