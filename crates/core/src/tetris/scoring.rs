//! Scoring module - line clear points, level progression, gravity

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LEVEL_LINE_WEIGHT, LEVEL_SCORE_STEP,
    LINE_SCORES,
};

/// Points for clearing `lines` rows in one lock at `level`.
///
/// Clears beyond four rows score as a four-row clear.
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    let base = LINE_SCORES[lines.min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level)
}

/// Level after a lock that cleared `lines` rows.
///
/// `score_before` is the score before this lock's award was added, so a big
/// clear shows up in the level one lock later.
pub fn calculate_level(score_before: u32, lines: u32) -> u32 {
    score_before.saturating_add(lines.saturating_mul(LEVEL_LINE_WEIGHT)) / LEVEL_SCORE_STEP + 1
}

/// Gravity interval for a level (in milliseconds)
/// Starts at 800ms on level 1, 50ms faster per level, never below 100ms
pub fn drop_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(speedup)
        .max(DROP_INTERVAL_MIN_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(0, 1), 0);
        assert_eq!(calculate_line_score(1, 1), 100);
        assert_eq!(calculate_line_score(2, 1), 300);
        assert_eq!(calculate_line_score(3, 1), 500);
        assert_eq!(calculate_line_score(4, 1), 800);
    }

    #[test]
    fn test_line_score_scales_with_level() {
        assert_eq!(calculate_line_score(4, 3), 2400);
        assert_eq!(calculate_line_score(1, 5), 500);
    }

    #[test]
    fn test_line_score_caps_at_tetris() {
        assert_eq!(calculate_line_score(6, 1), 800);
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(calculate_level(0, 1), 1);
        assert_eq!(calculate_level(0, 4), 1);
        assert_eq!(calculate_level(900, 1), 2);
        assert_eq!(calculate_level(2500, 4), 3);
    }

    #[test]
    fn test_drop_interval() {
        assert_eq!(drop_interval_ms(1), 800);
        assert_eq!(drop_interval_ms(2), 750);
        assert_eq!(drop_interval_ms(5), 600);
        assert_eq!(drop_interval_ms(15), 100);
        assert_eq!(drop_interval_ms(40), 100);
        assert_eq!(drop_interval_ms(0), 800);
    }
}
