//! PIN Keypad TUI Example
//!
//! Unlock with 1234. Any other PIN shakes the indicators and shows an
//! error for a moment.
//!
//! Run with: cargo run --example keypad_tui -- --face-id --theme dark
//!
//! Keys: digits, Backspace/Delete, `f` for the biometric button, Esc to quit.
//! The mouse works too.

use std::cell::Cell;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pin_keypad::prelude::*;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color as TuiColor, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing_subscriber::EnvFilter;

const CORRECT_PIN: &str = "1234";
const ERROR_TEXT: &str = "You entered an invalid PIN";
const ERROR_HOLD: Duration = Duration::from_millis(1500);
const FRAME: Duration = Duration::from_millis(16);
const WIDGET_WIDTH: u16 = 32;
const WIDGET_HEIGHT: u16 = 16;

#[derive(Parser, Debug)]
#[command(name = "keypad_tui", about = "PIN keypad demo")]
struct Args {
    /// JSON keypad config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of digits in a PIN
    #[arg(long)]
    pin_length: Option<usize>,

    /// Color theme (light or dark)
    #[arg(long)]
    theme: Option<Theme>,

    /// Show the biometric button
    #[arg(long)]
    face_id: bool,

    /// Write debug logs to this file
    #[arg(long)]
    log: Option<PathBuf>,
}

/// Result of the last completed PIN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unlocked,
    Rejected,
    Biometric,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("pin_keypad=trace")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let config = build_config(&args)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn build_config(args: &Args) -> KeypadResult<KeypadConfig> {
    let mut config = match &args.config {
        Some(path) => KeypadConfig::load(path)?,
        None => KeypadConfig::new()
            .with_theme(Theme::Dark)
            .with_dot_color(Color::hex("#0062cc")?)
            .with_grid_gap(14)
            .with_text_size(25),
    };
    if let Some(pin_length) = args.pin_length {
        config.pin_length = pin_length;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if args.face_id {
        config.uses_face_id = true;
    }
    Ok(config)
}

/// Centers the widget in the frame
fn widget_area(frame: Rect) -> Rect {
    let width = WIDGET_WIDTH.min(frame.width);
    let height = WIDGET_HEIGHT.min(frame.height.saturating_sub(1));
    Rect {
        x: frame.x + (frame.width - width) / 2,
        y: frame.y + (frame.height.saturating_sub(1) - height) / 2,
        width,
        height,
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: KeypadConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome: Rc<Cell<Option<Outcome>>> = Rc::new(Cell::new(None));

    let on_entered = Rc::clone(&outcome);
    let on_face_id = Rc::clone(&outcome);
    let mut keypad = Keypad::new(config, move |pin: &str| {
        on_entered.set(Some(if pin == CORRECT_PIN {
            Outcome::Unlocked
        } else {
            Outcome::Rejected
        }));
    })
    .with_error_message(|| ViewNode::text_node(ERROR_TEXT))
    .with_face_id_handler(move || on_face_id.set(Some(Outcome::Biometric)));

    let input_handler = InputHandler::new();
    let mut error_left: Option<Duration> = None;
    let mut last_frame = Instant::now();
    let mut area = Rect::default();

    loop {
        terminal.draw(|f| {
            let frame = f.area();
            area = widget_area(frame);
            f.render_widget(KeypadWidget::new(&keypad), area);

            let status = match outcome.get() {
                Some(Outcome::Unlocked) => "Unlocked",
                Some(Outcome::Rejected) => "Try again",
                Some(Outcome::Biometric) => "Biometric requested",
                None => "Enter your PIN",
            };
            let status_area = Rect {
                y: frame.y + frame.height.saturating_sub(1),
                height: 1,
                ..frame
            };
            f.render_widget(
                Paragraph::new(status)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TuiColor::DarkGray)),
                status_area,
            );
        })?;

        if event::poll(FRAME)? {
            let action = match event::read()? {
                Event::Key(key) => input_handler.handle_key(key),
                Event::Mouse(mouse) => input_handler.handle_mouse(mouse, area),
                _ => KeyAction::None,
            };
            match action {
                KeyAction::Press(key) => keypad.press_key(key),
                KeyAction::Quit => break,
                KeyAction::None => {}
            }
        }

        // A rejected PIN raises the error flag until the hold expires
        if outcome.get() == Some(Outcome::Rejected) && error_left.is_none() {
            keypad.set_errored(true);
            error_left = Some(ERROR_HOLD);
        }

        let now = Instant::now();
        let dt = now - last_frame;
        last_frame = now;
        keypad.tick(dt);

        if let Some(left) = error_left {
            if dt >= left {
                keypad.set_errored(false);
                outcome.set(None);
                error_left = None;
            } else {
                error_left = Some(left - dt);
            }
        }
    }

    Ok(())
}
