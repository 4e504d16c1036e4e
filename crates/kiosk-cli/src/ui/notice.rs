//! Full-body notices shown instead of the form.

use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::copy::ErrorCopy;

/// A box of `width` x `height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  cell
}

/// Non-blocking progress line while the gate check runs.
pub fn draw_checking(f: &mut Frame, area: Rect) {
  let area = centered(area, 40, 1);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Checking this location…",
      Style::default().fg(Color::DarkGray),
    )]))
    .alignment(Alignment::Center),
    area,
  );
}

/// Blocking error card.
pub fn draw_error(f: &mut Frame, area: Rect, copy: &ErrorCopy) {
  let card = centered(area, area.width.min(64), 9);
  let block = Block::default()
    .title(format!(" {} ", copy.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(card);
  f.render_widget(block, card);

  let mut lines = vec![Line::from(""), Line::from(copy.body)];
  if let Some(support) = &copy.support {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      support.as_str(),
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
    )));
  }
  f.render_widget(
    Paragraph::new(lines)
      .alignment(Alignment::Center)
      .wrap(Wrap { trim: true }),
    inner,
  );
}
