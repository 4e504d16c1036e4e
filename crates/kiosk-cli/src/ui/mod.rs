//! TUI rendering: picks a body by gate view.

pub mod form;
pub mod notice;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::{
  app::{App, Focus},
  form::FormPhase,
  gate::GateView,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  let view = app.view();
  draw_header(f, rows[0]);
  match &view {
    GateView::Checking => notice::draw_checking(f, rows[1]),
    GateView::Blocked(copy) => notice::draw_error(f, rows[1], copy),
    GateView::Form { banner } => form::draw(f, rows[1], app, banner.as_deref()),
  }
  draw_status(f, rows[2], app, &view);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let time = Local::now().format("%H:%M").to_string();

  let left = Span::styled(
    " How was your visit?",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{time} "), Style::default().fg(Color::Gray));

  // Simple left-right header: pad the middle.
  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App, view: &GateView) {
  let (mode_label, hints) = match view {
    GateView::Checking => ("CHECKING", "q quit"),
    GateView::Blocked(_) => ("UNAVAILABLE", "q quit"),
    GateView::Form { .. } => match (&app.form.phase, app.focus) {
      (FormPhase::Submitting, _) => ("SENDING", "please wait"),
      (FormPhase::Submitted, _) => ("THANK YOU", "Enter/n submit another  q quit"),
      (_, Focus::Comment) => ("COMMENT", "Type your comment  Esc/Enter done"),
      _ => (
        "FEEDBACK",
        "1-5/←→ rate  ↑↓ reasons  Space toggle  c comment  Enter submit  q quit",
      ),
    },
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
