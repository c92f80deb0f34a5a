mod config;
mod flavor;

use anyhow::{Context, Result};
use clap::Parser;
use config::TuiConfig;
use keymaze_core::{Direction, GameState, GridEngine, Outcome, Position, Tile};
use rand::rngs::ThreadRng;
use ratatui::{
    crossterm::{
        self,
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with frame timing and engine settings
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log level, overriding the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Frame length in milliseconds, overriding the config file
    #[arg(long)]
    frame_millis: Option<u64>,
}

struct App {
    /// The simulation engine.
    engine: GridEngine,
    /// Status line picked for the latest notable outcome.
    message: Option<&'static str>,
    rng: ThreadRng,
    should_quit: bool,
}

impl App {
    fn new(config: &TuiConfig) -> Self {
        App {
            engine: GridEngine::builtin(config.engine.clone()),
            message: Some("Collect every key, then reach the door."),
            rng: rand::rng(),
            should_quit: false,
        }
    }

    fn on_move(&mut self, direction: Direction) {
        let outcomes = self.engine.try_move(direction);
        for outcome in outcomes {
            self.announce(outcome);
        }
    }

    /// Handles one frame of the simulation.
    fn tick(&mut self) {
        let outcome = self.engine.tick();
        self.announce(outcome);
    }

    fn announce(&mut self, outcome: Outcome) {
        if let Some(line) = flavor::message_for(outcome, &mut self.rng) {
            self.message = Some(line);
        }
    }

    fn restart(&mut self) {
        self.engine.reset();
        self.message = None;
    }

    fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Maps arrow keys and WASD to move intents.
fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TuiConfig::from_file(path)?,
        None => TuiConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(frame_millis) = args.frame_millis {
        config.frame_millis = frame_millis;
    }
    config.validate().context("Invalid configuration")?;

    init_logging(args.log_file.as_deref(), &config.log_level)?;
    info!(?config, "starting keymaze");

    let mut terminal = setup_terminal()?;
    let mut app = App::new(&config);
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(config.frame_millis));
    restore_terminal(&mut terminal)?;

    info!("keymaze closed");
    result
}

/// Installs a file-backed subscriber. Without a log file nothing is recorded.
fn init_logging(log_file: Option<&Path>, level: &str) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keymaze_core={level},keymaze_tui={level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the frame loop: input is handled as it arrives, the engine ticks once per frame.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    frame_rate: Duration,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = frame_rate
            .checked_sub(last_frame.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Char('r') => app.restart(),
                        code => match direction_for(code) {
                            Some(direction) => app.on_move(direction),
                            None => debug!(?code, "unbound key ignored"),
                        },
                    }
                }
            }
        }

        if last_frame.elapsed() >= frame_rate {
            app.tick();
            last_frame = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Map
            Constraint::Length(3), // Keys and status
            Constraint::Length(3), // Message
            Constraint::Length(2), // Help
        ])
        .split(frame.area());

    render_map(frame, main_layout[0], app.engine.state());
    render_status(frame, main_layout[1], &app.engine);

    let message = Paragraph::new(app.message.unwrap_or(""))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Message"));
    frame.render_widget(message, main_layout[2]);

    let help_text = Paragraph::new("Arrows/WASD move, 'r' restarts, 'q' or 'Esc' quits.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[3]);
}

fn render_status(frame: &mut Frame, area: Rect, engine: &GridEngine) {
    let state = engine.state();
    let mut spans = vec![Span::raw(format!(
        "Keys: {}/{}  ",
        state.keys_collected, state.total_keys
    ))];
    spans.push(if state.door.open {
        Span::styled("Door open", Style::default().fg(Color::Green).bold())
    } else {
        Span::styled("Door locked", Style::default().fg(Color::Red))
    });
    if let Some(pending) = engine.pending_reset() {
        spans.push(Span::raw(format!(
            "  Resetting ({:?}) in {} frames",
            pending.reason, pending.frames_left
        )));
    }

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

/// Picks the glyph for one cell; moving things are drawn over static ones.
fn cell_span(state: &GameState, pos: Position) -> Span<'static> {
    if state.player == pos {
        Span::styled("@", Style::default().fg(Color::Cyan).bold())
    } else if state.enemy_at(pos).is_some() {
        Span::styled("E", Style::default().fg(Color::Red).bold())
    } else if state.block_at(pos).is_some() {
        Span::styled("B", Style::default().fg(Color::Magenta))
    } else if state.is_door(pos) {
        if state.door.open {
            Span::styled("+", Style::default().fg(Color::Green))
        } else {
            Span::styled("|", Style::default().fg(Color::Yellow))
        }
    } else if state.uncollected_key_at(pos).is_some() {
        Span::styled("k", Style::default().fg(Color::Yellow))
    } else {
        match state.terrain[pos] {
            Tile::Wall => Span::styled("#", Style::default().fg(Color::DarkGray)),
            Tile::Floor => Span::raw(" "),
        }
    }
}

/// Renders the maze onto the frame.
fn render_map(frame: &mut Frame, area: Rect, state: &GameState) {
    let lines: Vec<Line> = (0..state.height())
        .map(|y| {
            let spans: Vec<Span> = (0..state.width())
                .map(|x| cell_span(state, Position { x, y }))
                .collect();
            Line::from(spans)
        })
        .collect();

    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Keymaze").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(map_paragraph, area);
}
