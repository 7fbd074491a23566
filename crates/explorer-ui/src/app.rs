//! Main application state and TUI event loop for the CORD-19 explorer.
//!
//! [`App`] owns the theme, the dataset cache, the dashboard session and the
//! snapshot rendered on every frame. Filter edits arrive as key events and
//! are applied synchronously before the next draw.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame, Terminal,
};

use explorer_core::error::{ExplorerError, Result};
use explorer_runtime::dataset_cache::DatasetCache;
use explorer_runtime::session::{DashboardSession, DashboardSnapshot};

use crate::components::Header;
use crate::dashboard_view::{self, FilterFocus};
use crate::themes::Theme;

const TICK_RATE: Duration = Duration::from_millis(250);
/// How often the data file is checked for modification.
const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

pub struct App {
    theme: Theme,
    data_path: PathBuf,
    cache: DatasetCache,
    session: Option<DashboardSession>,
    snapshot: Option<DashboardSnapshot>,
    /// User-facing message for the last failed load.
    error: Option<String>,
    focus: FilterFocus,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, data_path: impl Into<PathBuf>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            data_path: data_path.into(),
            cache: DatasetCache::new(),
            session: None,
            snapshot: None,
            error: None,
            focus: FilterFocus::FromYear,
            should_quit: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus(&self) -> FilterFocus {
        self.focus
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Load or refresh the dataset. With `force` the file is read again even
    /// if it has not changed. A failure replaces the dashboard with the error
    /// panel until a later load succeeds.
    pub fn load(&mut self, force: bool) {
        let result = match self.session.as_mut() {
            Some(session) => session.reload(&mut self.cache, &self.data_path, force),
            None => {
                if force {
                    self.cache.invalidate();
                }
                DashboardSession::open(&mut self.cache, &self.data_path).map(|session| {
                    self.session = Some(session);
                    true
                })
            }
        };

        match result {
            Ok(changed) => {
                if changed || self.error.is_some() || self.snapshot.is_none() {
                    tracing::info!(path = %self.data_path.display(), "dataset loaded");
                    self.error = None;
                    self.refresh_snapshot();
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load dataset");
                self.error = Some(e.user_message());
            }
        }
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot = self.session.as_ref().map(DashboardSession::snapshot);
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press. Filter edits recompute the snapshot immediately.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.load(true);
                return;
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            _ => {}
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let edited = match key.code {
            KeyCode::Left => {
                adjust(session, self.focus, false);
                true
            }
            KeyCode::Right => {
                adjust(session, self.focus, true);
                true
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                session.toggle_sample();
                true
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                session.toggle_summary();
                true
            }
            _ => false,
        };
        if edited {
            tracing::debug!(focus = ?self.focus, "filters changed");
            self.refresh_snapshot();
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn draw(&self, frame: &mut Frame) {
        let [header_area, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let source = self.data_path.display().to_string();
        let papers = self.snapshot.as_ref().map(|s| s.total_papers);
        frame.render_widget(
            Paragraph::new(Text::from(
                Header::new(&source, papers, &self.theme)
                    .with_age(self.cache.cache_age())
                    .to_lines(),
            )),
            header_area,
        );

        match (&self.error, &self.snapshot) {
            (Some(message), _) => dashboard_view::render_error(frame, body, message, &self.theme),
            (None, Some(snapshot)) => {
                dashboard_view::render_dashboard(frame, body, snapshot, self.focus, &self.theme)
            }
            (None, None) => {
                dashboard_view::render_error(frame, body, "No data loaded yet", &self.theme)
            }
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Tab", self.theme.info),
                Span::styled(" focus  ", self.theme.dim),
                Span::styled("←/→", self.theme.info),
                Span::styled(" adjust  ", self.theme.dim),
                Span::styled("s", self.theme.info),
                Span::styled(" sample  ", self.theme.dim),
                Span::styled("d", self.theme.info),
                Span::styled(" summary  ", self.theme.dim),
                Span::styled("r", self.theme.info),
                Span::styled(" reload  ", self.theme.dim),
                Span::styled("q", self.theme.info),
                Span::styled(" quit", self.theme.dim),
            ])),
            footer,
        );
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Keys are polled with a 250 ms timeout; the data file is re-checked
    /// every two seconds and re-read only when its modification time moved.
    pub fn run(mut self) -> Result<()> {
        if self.snapshot.is_none() && self.error.is_none() {
            self.load(false);
        }

        enable_raw_mode().map_err(terminal_error)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(terminal_error)?;

        let mut last_refresh = Instant::now();
        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.draw(frame)) {
                break Err(e);
            }

            match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            if last_refresh.elapsed() >= REFRESH_INTERVAL {
                self.load(false);
                last_refresh = Instant::now();
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode().map_err(terminal_error)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
        terminal.show_cursor().map_err(terminal_error)?;

        result.map_err(terminal_error)
    }
}

fn terminal_error(err: io::Error) -> ExplorerError {
    ExplorerError::Terminal(err.to_string())
}

/// Move the focused control one step.
fn adjust(session: &mut DashboardSession, focus: FilterFocus, forward: bool) {
    let step = if forward { 1 } else { -1 };
    match focus {
        FilterFocus::FromYear => session.shift_from_year(step),
        FilterFocus::ToYear => session.shift_to_year(step),
        FilterFocus::Journal => session.cycle_journal(forward),
        FilterFocus::SampleRows => session.shift_sample_rows(i64::from(step)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
