use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal,
};
use ratatui::prelude::*;
use std::{io, path::PathBuf, time::Duration, time::Instant};

use bracket_board::config::{BracketConfig, Sources};
use bracket_board::pipeline::{load_bracket, Bracket, ResizeDebounce};
use bracket_board::render::text::{invite_text, priority_text, recipe_text};
use bracket_board::render::tui::{
    draw_bracket, draw_footer, draw_header, draw_popup, frame_areas, selectable_targets, Selectable,
    TerminalGuard, UNITS_PER_COLUMN, UNITS_PER_ROW,
};
use bracket_board::resources::Auxiliary;
use bracket_board::Size;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Idle poll interval when no resize is pending.
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "bracket-tui", about = "Interactive terminal bracket viewer")]
struct Cli {
    /// JSON config file with `layout` and `sources` sections
    #[arg(long)]
    config: Option<PathBuf>,
    /// Match-results CSV (path or URL)
    #[arg(long)]
    matches: Option<String>,
    /// Recipe book JSON (path or URL)
    #[arg(long)]
    recipes: Option<String>,
    /// Invite list JSON (path or URL)
    #[arg(long)]
    invites: Option<String>,
    /// Tab-delimited priority list (path or URL)
    #[arg(long)]
    priority: Option<String>,
    /// Directory for the log file
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

struct Popup {
    title: String,
    body: String,
}

struct App {
    bracket: Bracket,
    aux: Auxiliary,
    targets: Vec<Selectable>,
    selected: usize,
    popup: Option<Popup>,
}

impl App {
    fn new(bracket: Bracket, aux: Auxiliary) -> Self {
        let targets = selectable_targets(&bracket);
        Self {
            bracket,
            aux,
            targets,
            selected: 0,
            popup: None,
        }
    }

    fn selected_target(&self) -> Option<&Selectable> {
        self.targets.get(self.selected)
    }

    fn step(&mut self, forward: bool) {
        if self.targets.is_empty() {
            return;
        }
        let n = self.targets.len();
        self.selected = if forward {
            (self.selected + 1) % n
        } else {
            (self.selected + n - 1) % n
        };
    }

    fn open_recipe(&mut self) {
        if let Some(value) = self.selected_target().and_then(|t| t.value.as_deref()) {
            let view = self.aux.recipes.view(value);
            self.popup = Some(Popup {
                title: "Recipe".to_string(),
                body: recipe_text(&view),
            });
        }
    }

    fn open_invite(&mut self) {
        let Some(key) = self.selected_target().filter(|t| t.invite).map(|t| t.key) else {
            return;
        };
        if let Some(invite) = self.aux.invites.get(key) {
            self.popup = Some(Popup {
                title: "Invite".to_string(),
                body: invite_text(invite),
            });
        }
    }

    fn toggle_priority(&mut self) {
        if self.popup.as_ref().map(|p| p.title.as_str()) == Some("Priority") {
            self.popup = None;
            return;
        }
        let body = if self.aux.priority.is_empty() {
            "No priority list loaded.".to_string()
        } else {
            priority_text(&self.aux.priority)
        };
        self.popup = Some(Popup {
            title: "Priority".to_string(),
            body,
        });
    }
}

fn viewport(cols: u16, rows: u16) -> Size {
    Size::new(
        f32::from(cols) * UNITS_PER_COLUMN,
        f32::from(rows) * UNITS_PER_ROW,
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Log to a file; the terminal belongs to the UI
    let logs_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("bracket-board"));
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "bracket-tui.log");
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = BracketConfig::load(cli.config.as_deref())?;
    let sources = config
        .sources
        .overridden_by(Sources {
            matches: cli.matches,
            recipes: cli.recipes,
            invites: cli.invites,
            priority: cli.priority,
        })
        .with_env_defaults();
    let debounce_window = config.layout.resize_debounce();

    // Resources are awaited before the first frame
    let (cols, rows) = terminal::size()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let (bracket, aux, _err) =
        runtime.block_on(load_bracket(&sources, config.layout, viewport(cols, rows)));
    let mut app = App::new(bracket, aux);

    // Setup terminal; the guard restores it on every exit path
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    run(&mut terminal, &mut app, debounce_window)
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    debounce_window: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut debounce = ResizeDebounce::new(debounce_window);

    loop {
        let timeout = debounce.remaining(Instant::now()).unwrap_or(TICK).min(TICK);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Esc => app.popup = None,
                    KeyCode::Down | KeyCode::Right | KeyCode::Tab => app.step(true),
                    KeyCode::Up | KeyCode::Left | KeyCode::BackTab => app.step(false),
                    KeyCode::Enter => app.open_recipe(),
                    KeyCode::Char('i') => app.open_invite(),
                    KeyCode::Char('p') => app.toggle_priority(),
                    _ => {}
                },
                Event::Resize(cols, rows) => debounce.push(viewport(cols, rows), Instant::now()),
                _ => {}
            }
        }

        if let Some(size) = debounce.poll(Instant::now()) {
            app.bracket.resize(size);
        }

        terminal.draw(|f| {
            let [header, body, footer] = frame_areas(f.size());
            draw_header(f, header, "BRACKET", app.bracket.status());
            draw_bracket(f, body, &app.bracket, app.selected_target());
            draw_footer(f, footer);
            if let Some(popup) = &app.popup {
                draw_popup(f, body, &popup.title, &popup.body);
            }
        })?;
    }

    Ok(())
}
