//! The feedback form pane.

use kiosk_core::feedback::{Rating, ReasonKind, reason_kind};
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
  app::{App, Focus},
  form::FormPhase,
};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the form into `area`, with the location banner if one resolved.
pub fn draw(f: &mut Frame, area: Rect, app: &App, banner: Option<&str>) {
  if app.form.phase == FormPhase::Submitted {
    draw_thanks(f, area);
    return;
  }

  let [banner_area, rating_area, reasons_area, comment_area, message_area] =
    Layout::vertical([
      Constraint::Length(1),
      Constraint::Length(4),
      Constraint::Min(13),
      Constraint::Length(3),
      Constraint::Length(1),
    ])
    .areas(area);

  if let Some(label) = banner {
    f.render_widget(
      Paragraph::new(Line::from(vec![
        Span::styled(" ✓ ", Style::default().fg(Color::Green)),
        Span::raw("You are rating "),
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
      ])),
      banner_area,
    );
  }

  draw_ratings(f, rating_area, app);
  draw_reasons(f, reasons_area, app);
  draw_comment(f, comment_area, app);
  draw_message(f, message_area, app);
}

// ─── Panes ────────────────────────────────────────────────────────────────────

fn pane(title: &str, focused: bool) -> Block<'_> {
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border))
}

fn draw_ratings(f: &mut Frame, area: Rect, app: &App) {
  let block = pane("Rate your experience", app.focus == Focus::Rating);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let cells = Layout::horizontal([Constraint::Ratio(1, 5); 5]).split(inner);
  for (i, rating) in Rating::ALL.iter().enumerate() {
    let selected = app.form.rating == Some(*rating);
    let style = if selected {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };
    let lines = vec![
      Line::from(format!("{} {}", i + 1, rating.emoji())),
      Line::from(rating.caption()),
    ];
    f.render_widget(
      Paragraph::new(lines)
        .style(style)
        .alignment(ratatui::layout::Alignment::Center),
      cells[i],
    );
  }
}

fn section_heading(kind: ReasonKind) -> Line<'static> {
  let (text, color) = match kind {
    ReasonKind::Positive => (" ✅ Positive Feedback", Color::Green),
    ReasonKind::Negative => (" ⚠️ Areas to Improve", Color::Yellow),
  };
  Line::from(Span::styled(
    text,
    Style::default().fg(color).add_modifier(Modifier::BOLD),
  ))
}

fn draw_reasons(f: &mut Frame, area: Rect, app: &App) {
  let block = pane("What stood out?", app.focus == Focus::Reasons);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let options = app.form.reason_options();
  if options.is_empty() {
    f.render_widget(
      Paragraph::new("Choose a rating first.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  // One list, split into sections wherever the vocabulary half changes.
  let mut lines: Vec<Line> = Vec::new();
  let mut section = None;
  for (i, reason) in options.iter().enumerate() {
    let kind = reason_kind(reason);
    if kind != section {
      section = kind;
      if let Some(kind) = kind {
        lines.push(section_heading(kind));
      }
    }
    let mark = if app.form.is_selected(reason) { "[x]" } else { "[ ]" };
    let style = if app.focus == Focus::Reasons && i == app.reason_cursor {
      Style::default().add_modifier(Modifier::REVERSED)
    } else {
      Style::default()
    };
    lines.push(Line::from(Span::styled(format!("   {mark} {reason}"), style)));
  }
  f.render_widget(Paragraph::new(lines), inner);
}

fn draw_comment(f: &mut Frame, area: Rect, app: &App) {
  let editing = app.focus == Focus::Comment;
  let block = pane("Anything else? (c to type)", editing);
  let text = if app.form.comment.is_empty() && !editing {
    Span::styled("Optional", Style::default().fg(Color::DarkGray))
  } else if editing {
    Span::raw(format!("{}▏", app.form.comment))
  } else {
    Span::raw(app.form.comment.as_str())
  };
  f.render_widget(
    Paragraph::new(Line::from(text))
      .block(block)
      .wrap(Wrap { trim: false }),
    area,
  );
}

fn draw_message(f: &mut Frame, area: Rect, app: &App) {
  let line = match &app.form.phase {
    FormPhase::Submitting => Line::from(Span::styled(
      " Sending…",
      Style::default().fg(Color::Yellow),
    )),
    FormPhase::Failed(msg) => Line::from(Span::styled(
      format!(" {msg}"),
      Style::default().fg(Color::Red),
    )),
    _ if app.form.rating.is_none() => Line::from(Span::styled(
      " Pick a rating to continue.",
      Style::default().fg(Color::DarkGray),
    )),
    _ => Line::from(""),
  };
  f.render_widget(Paragraph::new(line), area);
}

fn draw_thanks(f: &mut Frame, area: Rect) {
  let lines = vec![
    Line::from(""),
    Line::from(Span::styled(
      "Thank you for your feedback!",
      Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from(Span::styled(
      "Press Enter to submit another response.",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  f.render_widget(
    Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
    area,
  );
}
