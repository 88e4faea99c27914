//! Scoring and leveling

use std::time::Duration;

/// Points for every piece that locks
pub const POINTS_PER_LOCK: u64 = 10;
/// Multiplied by the square of the number of lines cleared at once
pub const POINTS_PER_LINE_SQUARED: u64 = 100;
/// Level goes up once the score passes `level * LEVEL_UP_SCORE`
pub const LEVEL_UP_SCORE: u64 = 1000;

pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);
const DROP_INTERVAL_STEP: Duration = Duration::from_millis(100);

/// Scoring calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starts at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
    /// Time between gravity steps at this level
    pub drop_interval: Duration,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            drop_interval: INITIAL_DROP_INTERVAL,
        }
    }

    /// Score a locked piece that cleared `lines` rows.
    /// Returns true if this lock raised the level
    pub fn add_lock(&mut self, lines: usize) -> bool {
        let lines = lines as u64;
        self.points += lines * lines * POINTS_PER_LINE_SQUARED + POINTS_PER_LOCK;
        self.lines += lines as u32;

        if self.points > u64::from(self.level) * LEVEL_UP_SCORE {
            self.level += 1;
            self.drop_interval = Self::drop_interval_for(self.level);
            return true;
        }
        false
    }

    /// Gravity interval: 100ms faster per level, never below the minimum
    pub fn drop_interval_for(level: u32) -> Duration {
        let speedup = DROP_INTERVAL_STEP * level.saturating_sub(1);
        INITIAL_DROP_INTERVAL
            .saturating_sub(speedup)
            .max(MIN_DROP_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lock() {
        let mut score = Score::new();
        assert!(!score.add_lock(0));
        assert_eq!(score.points, 10);
        assert_eq!(score.lines, 0);
    }

    #[test]
    fn test_line_clears_are_quadratic() {
        let mut score = Score::new();
        score.add_lock(1);
        assert_eq!(score.points, 110);

        let mut score = Score::new();
        score.add_lock(3);
        assert_eq!(score.points, 910);
        assert_eq!(score.lines, 3);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        // 1610 > 1000
        assert!(score.add_lock(4));
        assert_eq!(score.level, 2);
        assert_eq!(score.drop_interval, Duration::from_millis(900));
    }

    #[test]
    fn test_exactly_threshold_does_not_level() {
        let mut score = Score::new();
        score.points = 990;
        assert!(!score.add_lock(0));
        assert_eq!(score.points, 1000);
        assert_eq!(score.level, 1);
        assert!(score.add_lock(0));
        assert_eq!(score.level, 2);
    }

    #[test]
    fn test_one_level_per_lock() {
        let mut score = Score::new();
        score.points = 5000;
        score.add_lock(0);
        assert_eq!(score.level, 2);
    }

    #[test]
    fn test_drop_interval_floor() {
        assert_eq!(Score::drop_interval_for(1), Duration::from_millis(1000));
        assert_eq!(Score::drop_interval_for(5), Duration::from_millis(600));
        assert_eq!(Score::drop_interval_for(10), Duration::from_millis(100));
        assert_eq!(Score::drop_interval_for(25), Duration::from_millis(100));
    }
}
