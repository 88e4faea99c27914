//! Terminal UI rendering with ratatui

use crate::board::{Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::effects::Effects;
use crate::game::{Game, GameState};
use crate::settings::Settings;
use crate::tetromino::{Shape, TetrominoType};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;

const EMPTY: &str = "  ";

/// Total width needed: hold(12) + board(22) + next/stats(16) = 50
const GAME_WIDTH: u16 = 50;
/// Board(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

/// Render one frame of the game
pub fn render_game(frame: &mut Frame, game: &Game, effects: &Effects, settings: &Settings, now: Instant) {
    let area = frame.area();
    let (block_char, _) = settings.visual.block_chars();
    let started = game.state() != GameState::NotStarted;

    // Center the game area
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Create main layout: hold | board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Hold box
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(16), // Next queue + stats
        ])
        .split(game_area);

    render_hold(frame, main_layout[0], game, block_char);
    render_board(frame, main_layout[1], game, effects, settings, now);

    // Right side: next queue and stats
    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Next + next-next
            Constraint::Min(8),    // Stats
        ])
        .split(main_layout[2]);

    let queue = if started {
        vec![game.next_piece(), game.next_next_piece()]
    } else {
        Vec::new()
    };
    render_next_queue(frame, right_layout[0], &queue, block_char);
    render_stats(frame, right_layout[1], game);

    // Overlays, hinting at the first configured key
    let keys = &settings.keys;
    let hint = |bound: &[String], line: fn(String) -> String| key_label(bound).map(line).unwrap_or_default();
    match game.state() {
        GameState::NotStarted => render_overlay(
            frame,
            area,
            "BLOCKDROP",
            &hint(&keys.start, |key| format!("Press {} to start", key)),
        ),
        GameState::Paused => render_overlay(
            frame,
            area,
            "PAUSED",
            &hint(&keys.pause, |key| format!("Press {} to resume", key)),
        ),
        GameState::GameOver => render_overlay(
            frame,
            area,
            "GAME OVER",
            &hint(&keys.start, |key| format!("{} to play again", key)),
        ),
        GameState::Running => {}
    }
}

/// Display name of the first key in a binding, e.g. "Q" or "Enter"
fn key_label(bound: &[String]) -> Option<String> {
    let key = bound.first()?;
    let mut chars = key.chars();
    Some(match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().to_string(),
        _ => key.clone(),
    })
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the hold piece box
fn render_hold(frame: &mut Frame, area: Rect, game: &Game, block_char: &'static str) {
    // Dim the held piece while it cannot be swapped back
    let border = if game.can_hold() { Color::Gray } else { Color::DarkGray };
    let block = Block::default()
        .title(" HOLD ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(held) = game.hold_piece() {
        render_mini_piece(frame, inner, held.piece_type, &held.shape, block_char);
    }
}

/// Render the next piece queue
fn render_next_queue(frame: &mut Frame, area: Rect, queue: &[TetrominoType], block_char: &'static str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if queue.is_empty() {
        return;
    }

    let piece_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); queue.len()])
        .split(inner);

    for (piece_area, &piece_type) in piece_areas.iter().zip(queue) {
        render_mini_piece(frame, *piece_area, piece_type, &piece_type.shape(), block_char);
    }
}

/// Lines for a small piece preview (hold and next boxes)
fn mini_piece_lines(piece_type: TetrominoType, shape: &Shape, block_char: &'static str) -> Vec<Line<'static>> {
    let color = piece_type.color();
    let cells: Vec<_> = shape.cells().collect();
    (0..shape.height() as i32)
        .map(|dy| {
            let spans: Vec<_> = (0..shape.width() as i32)
                .map(|dx| {
                    if cells.contains(&(dx, dy)) {
                        Span::styled(block_char, Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Render a small piece preview
fn render_mini_piece(
    frame: &mut Frame,
    area: Rect,
    piece_type: TetrominoType,
    shape: &Shape,
    block_char: &'static str,
) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let paragraph =
        Paragraph::new(mini_piece_lines(piece_type, shape, block_char)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the game board
fn render_board(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    effects: &Effects,
    settings: &Settings,
    now: Instant,
) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let show_effects = settings.visual.effects;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current: Vec<(i32, i32)> = game
        .current_piece()
        .map(|piece| piece.block_positions().collect())
        .unwrap_or_default();
    let current_color = game.current_piece().map(|piece| piece.piece_type.color());
    let ghost: Vec<(i32, i32)> = if settings.visual.show_ghost && game.state() == GameState::Running {
        game.ghost_position()
            .map(|piece| piece.block_positions().collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT);
    for row in 0..BOARD_HEIGHT {
        let flashing = show_effects && effects.is_row_flashing(row, now);
        let mut spans = Vec::with_capacity(BOARD_WIDTH);

        for col in 0..BOARD_WIDTH {
            let pos = (row as i32, col as i32);
            let (text, style) = match (current_color, game.board().get(pos.0, pos.1)) {
                _ if flashing => (block_char, Style::default().fg(Color::White).bold()),
                (Some(color), _) if current.contains(&pos) => (block_char, Style::default().fg(color)),
                (_, Some(Cell::Filled(piece_type))) => {
                    let style = if show_effects && effects.is_sparkling(row, col, now) {
                        Style::default().fg(Color::White).bold()
                    } else {
                        Style::default().fg(piece_type.color())
                    };
                    (block_char, style)
                }
                (Some(color), _) if ghost.contains(&pos) => (ghost_char, Style::default().fg(color).dim()),
                _ => (EMPTY, Style::default()),
            };
            spans.push(Span::styled(text, style));
        }

        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = game.score();
    let stat = |label: &'static str, value: String, color: Color| {
        [
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
        ]
    };

    let mut lines = Vec::new();
    lines.extend(stat("SCORE", score.points.to_string(), Color::Yellow));
    lines.push(Line::raw(""));
    lines.extend(stat("LEVEL", score.level.to_string(), Color::Cyan));
    lines.push(Line::raw(""));
    lines.extend(stat("LINES", score.lines.to_string(), Color::Green));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for start/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(game: &Game) -> String {
        screen_text_with(game, &Settings::default())
    }

    fn screen_text_with(game: &Game, settings: &Settings) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let effects = Effects::new();
        terminal
            .draw(|frame| render_game(frame, game, &effects, settings, Instant::now()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_center_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(center_rect(area, 50, 22), Rect::new(25, 9, 50, 22));
        // Smaller than requested: clamp
        let small = Rect::new(0, 0, 10, 5);
        assert_eq!(center_rect(small, 50, 22), Rect::new(0, 0, 10, 5));
    }

    #[test]
    fn test_mini_piece_lines() {
        let lines = mini_piece_lines(TetrominoType::T, &TetrominoType::T.shape(), "██");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[1].spans[0].content, EMPTY);
        assert_eq!(lines[1].spans[1].content, "██");
    }

    #[test]
    fn test_start_screen() {
        let game = Game::with_seed(1);
        let text = screen_text(&game);
        assert!(text.contains("HOLD"));
        // Below the overlay
        assert!(text.contains("LINES"));
        assert!(text.contains("Press Enter to start"));
    }

    #[test]
    fn test_running_screen_has_no_overlay() {
        let mut game = Game::with_seed(1);
        game.start();
        let text = screen_text(&game);
        assert!(text.contains("NEXT"));
        assert!(text.contains("SCORE"));
        assert!(!text.contains("PAUSED"));
        assert!(text.contains("██"));
    }

    #[test]
    fn test_key_label() {
        assert_eq!(key_label(&["q".to_string(), "p".to_string()]), Some("Q".to_string()));
        assert_eq!(key_label(&["Enter".to_string()]), Some("Enter".to_string()));
        assert_eq!(key_label(&[]), None);
    }

    #[test]
    fn test_overlays_follow_rebound_keys() {
        let mut settings = Settings::default();
        settings.keys.start = vec!["s".to_string()];
        settings.keys.pause = vec!["Tab".to_string()];

        let mut game = Game::with_seed(1);
        assert!(screen_text_with(&game, &settings).contains("Press S to start"));

        game.start();
        game.toggle_pause();
        let text = screen_text_with(&game, &settings);
        assert!(text.contains("Press Tab to resume"));
        assert!(!text.contains("Press Q"));
    }

    #[test]
    fn test_default_pause_hint() {
        let mut game = Game::with_seed(1);
        game.start();
        game.toggle_pause();
        assert!(screen_text(&game).contains("Press Q to resume"));
    }
}
