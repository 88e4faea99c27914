//! Core game state and logic

use crate::bag::Bag;
use crate::board::Board;
use crate::piece::{HeldPiece, Piece};
use crate::score::Score;
use crate::tetromino::TetrominoType;
use std::time::Duration;
use tracing::{debug, info};

/// Lock delay settings
pub const LOCK_DELAY: Duration = Duration::from_millis(500);
pub const MAX_LOCK_MOVES: u8 = 15;

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Whether the current piece is still falling or resting on something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Falling,
    Locking {
        /// Time spent resting so far
        elapsed: Duration,
        /// Successful moves and rotations made while resting
        moves: u8,
    },
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateClockwise,
    HardDrop,
    Hold,
    TogglePause,
    Start,
}

/// Things the renderer may want to animate. Gameplay never waits on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Board cells (row, col) written by a locking piece
    Landed(Vec<(usize, usize)>),
    /// Rows removed by a line clear, bottom to top
    LinesCleared(Vec<usize>),
    LevelUp(u32),
    GameOver,
}

/// The main game struct
pub struct Game {
    board: Board,
    /// Current falling piece
    current_piece: Option<Piece>,
    /// Held piece (can swap once per lock)
    hold_piece: Option<HeldPiece>,
    next_piece: TetrominoType,
    next_next_piece: TetrominoType,
    can_hold: bool,
    bag: Bag,
    score: Score,
    state: GameState,
    lock: LockState,
    /// Time accumulated towards the next gravity step
    drop_timer: Duration,
    /// Pending notifications for the renderer
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game waiting for `start`
    pub fn new() -> Self {
        Self::with_bag(Bag::new())
    }

    /// Create a game with a reproducible piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_bag(Bag::with_seed(seed))
    }

    fn with_bag(mut bag: Bag) -> Self {
        let next_piece = bag.next();
        let next_next_piece = bag.next();
        Self {
            board: Board::new(),
            current_piece: None,
            hold_piece: None,
            next_piece,
            next_next_piece,
            can_hold: true,
            bag,
            score: Score::new(),
            state: GameState::NotStarted,
            lock: LockState::Falling,
            drop_timer: Duration::ZERO,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn hold_piece(&self) -> Option<&HeldPiece> {
        self.hold_piece.as_ref()
    }

    pub fn next_piece(&self) -> TetrominoType {
        self.next_piece
    }

    pub fn next_next_piece(&self) -> TetrominoType {
        self.next_next_piece
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    pub fn is_locking(&self) -> bool {
        matches!(self.lock, LockState::Locking { .. })
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process an action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Start => {
                self.start();
            }
            Action::TogglePause => self.toggle_pause(),
            _ if self.state != GameState::Running => {}
            Action::MoveLeft => {
                self.move_horizontal(-1);
            }
            Action::MoveRight => {
                self.move_horizontal(1);
            }
            Action::SoftDrop => self.soft_gravity_step(),
            Action::RotateClockwise => {
                self.rotate();
            }
            Action::HardDrop => self.hard_drop(),
            Action::Hold => {
                self.hold();
            }
        }
    }

    /// Begin a fresh game. Only allowed before the first game or after game over
    pub fn start(&mut self) -> bool {
        if !matches!(self.state, GameState::NotStarted | GameState::GameOver) {
            return false;
        }

        self.board = Board::new();
        self.score = Score::new();
        self.hold_piece = None;
        self.can_hold = true;
        self.lock = LockState::Falling;
        self.drop_timer = Duration::ZERO;
        self.events.clear();

        self.bag.reset();
        self.next_piece = self.bag.next();
        self.next_next_piece = self.bag.next();

        self.state = GameState::Running;
        info!("Game started");
        self.spawn();
        true
    }

    /// Promote the preview queue and put the new piece at the top
    fn spawn(&mut self) {
        let piece = Piece::new(self.next_piece);
        self.next_piece = self.next_next_piece;
        self.next_next_piece = self.bag.next();

        let topped_out = self.board.collides(&piece);
        self.current_piece = Some(piece);
        if topped_out {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        self.events.push(GameEvent::GameOver);
        info!(
            score = self.score.points,
            level = self.score.level,
            lines = self.score.lines,
            "Game over"
        );
    }

    /// Advance the clock (call every frame)
    pub fn tick(&mut self, delta: Duration) {
        if self.state != GameState::Running {
            return;
        }

        self.drop_timer += delta;
        if let LockState::Locking { elapsed, .. } = &mut self.lock {
            *elapsed += delta;
        }

        if self.drop_timer > self.score.drop_interval {
            self.soft_gravity_step();
        }
    }

    /// Move the piece down one row, or count towards locking it
    pub fn soft_gravity_step(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };

        if piece.move_down(&self.board) {
            self.lock = LockState::Falling;
        } else {
            if self.lock == LockState::Falling {
                self.lock = LockState::Locking {
                    elapsed: Duration::ZERO,
                    moves: 0,
                };
            }
            if let LockState::Locking { elapsed, moves } = self.lock {
                if elapsed >= LOCK_DELAY || moves >= MAX_LOCK_MOVES {
                    self.finalize();
                }
            }
        }
        self.drop_timer = Duration::ZERO;
    }

    /// Shift the piece one column (`dir` is -1 or 1)
    pub fn move_horizontal(&mut self, dir: i32) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };

        let moved = match dir.signum() {
            -1 => piece.move_left(&self.board),
            1 => piece.move_right(&self.board),
            _ => false,
        };
        if moved {
            self.count_lock_move();
        }
        moved
    }

    /// Rotate clockwise without kicks
    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        let Some(piece) = &mut self.current_piece else {
            return false;
        };

        let rotated = piece.rotate(&self.board);
        if rotated {
            self.count_lock_move();
        }
        rotated
    }

    fn count_lock_move(&mut self) {
        if let LockState::Locking { moves, .. } = &mut self.lock {
            *moves = moves.saturating_add(1);
        }
    }

    /// Drop to the bottom and lock immediately
    pub fn hard_drop(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };

        let distance = piece.hard_drop(&self.board);
        debug!(distance, "Hard drop");
        self.finalize();
    }

    /// Swap the current piece into the hold slot (once per lock)
    pub fn hold(&mut self) -> bool {
        if self.state != GameState::Running || !self.can_hold {
            return false;
        }
        let Some(current) = self.current_piece.take() else {
            return false;
        };

        self.can_hold = false;
        self.lock = LockState::Falling;
        self.drop_timer = Duration::ZERO;

        match self.hold_piece.replace(current.to_held()) {
            None => {
                debug!(held = ?current.piece_type, "Hold");
                self.spawn();
            }
            Some(held) => {
                debug!(held = ?current.piece_type, swapped_in = ?held.piece_type, "Hold swap");
                let piece = Piece::from_held(held);
                let topped_out = self.board.collides(&piece);
                self.current_piece = Some(piece);
                if topped_out {
                    self.game_over();
                }
            }
        }
        true
    }

    /// Where the current piece would land, without touching game state
    pub fn ghost_position(&self) -> Option<Piece> {
        self.current_piece
            .as_ref()
            .map(|piece| piece.ghost(&self.board))
    }

    /// Pause or resume. Timers do not run while paused
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            other => other,
        };
    }

    /// Lock the current piece, clear lines, score and spawn the next one
    fn finalize(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        let landed = self.board.merge(&piece);
        self.events.push(GameEvent::Landed(landed));

        let cleared = self.board.clear_full_lines();
        let lines = cleared.count();
        if lines > 0 {
            debug!(lines, rows = ?cleared.rows, "Lines cleared");
            self.events.push(GameEvent::LinesCleared(cleared.rows));
        }

        if self.score.add_lock(lines) {
            info!(level = self.score.level, "Level up");
            self.events.push(GameEvent::LevelUp(self.score.level));
        }

        self.lock = LockState::Falling;
        self.drop_timer = Duration::ZERO;
        self.can_hold = true;
        self.spawn();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
