use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    model::{
        cli::RunConfig,
        session::{Pane, Session},
    },
    ui::{bottom, top},
};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<Term> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("create terminal")?;
    Ok(terminal)
}

/// Back to a normal terminal. Runs before any error is surfaced, so failures
/// here are swallowed rather than masking the real one.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

/// Paint both panes and the divider. The split sits at mid-height and moves
/// with the terminal on resize.
pub fn draw_frame(frame: &mut Frame, session: &mut Session, config: &RunConfig, lines_read: u64) {
    let area = frame.area();
    session.view.width = area.width;
    session.view.height = area.height;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height / 2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    top::draw_top(frame, chunks[0], session, config, lines_read);
    draw_divider(frame, chunks[1], session.view.pane);
    bottom::draw_bottom(frame, chunks[2], session);
}

/// The half of the divider on the active pane's side lights up.
fn draw_divider(frame: &mut Frame, area: Rect, pane: Pane) {
    let half = area.width as usize / 2;
    let rest = area.width as usize - half;
    let active = Style::default().fg(Color::Green);
    let idle = Style::default();
    let (left, right) = match pane {
        Pane::Top => (active, idle),
        Pane::Bottom => (idle, active),
    };
    let line = Line::from(vec![
        Span::styled("-".repeat(half), left),
        Span::styled("-".repeat(rest), right),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
