//! BLOCKDROP - a falling-block puzzle for the terminal

use anyhow::{Context, Result};
use blockdrop::effects::Effects;
use blockdrop::game::Game;
use blockdrop::input::{Command, KeyBindings, KEYBOARD_ENHANCEMENT};
use blockdrop::settings::Settings;
use blockdrop::ui;
use crossterm::{
    event::{self, Event, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the blockdrop temp directory, creating it if needed
fn blockdrop_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockdrop");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: could not create {}: {}", dir.display(), e);
    }
    dir
}

fn main() -> Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = blockdrop_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Log to a file; stdout belongs to the UI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockdrop=info")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKDROP starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    // Needed for Shift and other bare modifier keys to arrive as key events
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    tracing::info!(keyboard_enhanced, "Terminal keyboard protocol");

    let result = enter_screen(keyboard_enhanced)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal"))
        .and_then(|mut terminal| {
            terminal.clear()?;
            run_app(&mut terminal, &settings).context("Game loop failed")
        });

    // Restore terminal even if setup or the game loop failed
    let restored = restore_terminal(keyboard_enhanced);

    // Write the settings back so there is a file to edit
    if let Err(e) = settings.save() {
        tracing::warn!("{:#}", e);
    }

    let game = result?;
    restored?;
    let score = game.score();
    println!("\nThanks for playing BLOCKDROP!");
    println!("Final Score: {}", score.points);
    println!("Level: {} | Lines: {}", score.level, score.lines);
    Ok(())
}

fn enter_screen(keyboard_enhanced: bool) -> Result<()> {
    execute!(stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    if keyboard_enhanced {
        execute!(stdout(), PushKeyboardEnhancementFlags(KEYBOARD_ENHANCEMENT))
            .context("Failed to enable keyboard enhancement")?;
    }
    Ok(())
}

/// Undo everything `enter_screen` and raw mode did. Every step runs even
/// if an earlier one fails; the first error is returned
fn restore_terminal(keyboard_enhanced: bool) -> Result<()> {
    let popped = if keyboard_enhanced {
        execute!(stdout(), PopKeyboardEnhancementFlags).context("Failed to disable keyboard enhancement")
    } else {
        Ok(())
    };
    let left = execute!(stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen");
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    popped.and(left).and(raw)
}

/// Frame loop: input between frames, then tick, then draw
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Game> {
    let bindings = KeyBindings::from_settings(settings);
    let mut game = Game::new();
    let mut effects = Effects::new();
    let mut last_frame = Instant::now();

    loop {
        // Handle all pending input before advancing time
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match bindings.command_for(key) {
                    Some(Command::Quit) => {
                        tracing::info!("Quit requested");
                        return Ok(game);
                    }
                    Some(Command::Game(action)) => game.apply(action),
                    None => {}
                }
            }
        }

        let now = Instant::now();
        game.tick(now.duration_since(last_frame));
        last_frame = now;

        for event in game.drain_events() {
            effects.handle(&event, now);
        }
        effects.prune(now);

        terminal.draw(|frame| ui::render_game(frame, &game, &effects, settings, now))?;

        // Sleep out the rest of the frame, waking early for input
        let elapsed = now.elapsed();
        if elapsed < FRAME_DURATION {
            event::poll(FRAME_DURATION - elapsed)?;
        }
    }
}
