//! Short-lived visual effects driven by game events
//!
//! Rows are removed from the board immediately; these only decide what
//! extra highlighting the renderer draws for a little while afterwards.

use crate::game::GameEvent;
use std::time::{Duration, Instant};

/// How long a cleared row flashes
pub const LINE_FLASH: Duration = Duration::from_millis(300);
/// Delay between flashes of rows cleared together
pub const LINE_FLASH_STAGGER: Duration = Duration::from_millis(50);
/// How long a landed cell sparkles
pub const SPARKLE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
struct Window {
    starts: Instant,
    ends: Instant,
}

impl Window {
    fn new(starts: Instant, length: Duration) -> Self {
        Self {
            starts,
            ends: starts + length,
        }
    }

    fn contains(&self, now: Instant) -> bool {
        self.starts <= now && now < self.ends
    }
}

/// Active effects
#[derive(Debug, Default)]
pub struct Effects {
    flashes: Vec<(usize, Window)>,
    sparkles: Vec<((usize, usize), Window)>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule effects for an engine event
    pub fn handle(&mut self, event: &GameEvent, now: Instant) {
        match event {
            GameEvent::LinesCleared(rows) => {
                let mut starts = now;
                for &row in rows {
                    self.flashes.push((row, Window::new(starts, LINE_FLASH)));
                    starts += LINE_FLASH_STAGGER;
                }
            }
            GameEvent::Landed(cells) => {
                let window = Window::new(now, SPARKLE);
                self.sparkles
                    .extend(cells.iter().map(|&cell| (cell, window)));
            }
            GameEvent::GameOver => self.clear(),
            GameEvent::LevelUp(_) => {}
        }
    }

    /// Drop finished effects
    pub fn prune(&mut self, now: Instant) {
        self.flashes.retain(|(_, window)| now < window.ends);
        self.sparkles.retain(|(_, window)| now < window.ends);
    }

    pub fn clear(&mut self) {
        self.flashes.clear();
        self.sparkles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty() && self.sparkles.is_empty()
    }

    pub fn is_row_flashing(&self, row: usize, now: Instant) -> bool {
        self.flashes
            .iter()
            .any(|(r, window)| *r == row && window.contains(now))
    }

    pub fn is_sparkling(&self, row: usize, col: usize, now: Instant) -> bool {
        self.sparkles
            .iter()
            .any(|(cell, window)| *cell == (row, col) && window.contains(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_flashes_are_staggered() {
        let now = Instant::now();
        let mut effects = Effects::new();
        effects.handle(&GameEvent::LinesCleared(vec![19, 17]), now);

        assert!(effects.is_row_flashing(19, now));
        assert!(!effects.is_row_flashing(17, now));
        assert!(effects.is_row_flashing(17, now + LINE_FLASH_STAGGER));
        assert!(!effects.is_row_flashing(19, now + LINE_FLASH));
        assert!(effects.is_row_flashing(17, now + LINE_FLASH));
        assert!(!effects.is_row_flashing(18, now));
    }

    #[test]
    fn test_sparkles_expire() {
        let now = Instant::now();
        let mut effects = Effects::new();
        effects.handle(&GameEvent::Landed(vec![(19, 4), (19, 5)]), now);
        assert!(effects.is_sparkling(19, 4, now));
        assert!(!effects.is_sparkling(18, 4, now));

        effects.prune(now + SPARKLE);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_prune_keeps_pending_flash() {
        let now = Instant::now();
        let mut effects = Effects::new();
        effects.handle(&GameEvent::LinesCleared(vec![10, 9, 8]), now);
        effects.prune(now + LINE_FLASH);
        assert!(!effects.is_empty());
        assert!(effects.is_row_flashing(8, now + LINE_FLASH));
        effects.prune(now + LINE_FLASH + LINE_FLASH_STAGGER * 2);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_game_over_clears_effects() {
        let now = Instant::now();
        let mut effects = Effects::new();
        effects.handle(&GameEvent::Landed(vec![(0, 0)]), now);
        effects.handle(&GameEvent::GameOver, now);
        assert!(effects.is_empty());
    }
}
