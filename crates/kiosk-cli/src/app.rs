//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kiosk_core::{feedback::Rating, refid::RefId};
use tokio::task::JoinHandle;

use crate::{
  client::{ApiClient, SubmitOutcome},
  form::{FeedbackForm, FormPhase, KioskContext},
  gate::{Gate, GateCheck, GatePolicy, GateView},
};

// ─── Focus ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Rating,
  Reasons,
  /// Typing into the comment box; printable keys go into the text.
  Comment,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub gate: Gate,

  pub policy: GatePolicy,

  /// Support contact shown on the error card.
  pub support: Option<String>,

  pub form: FeedbackForm,

  pub focus: Focus,

  /// Cursor within the reasons offered for the current rating.
  pub reason_cursor: usize,

  /// Attached to every submission.
  pub context: KioskContext,

  /// The background gate check, until it reports.
  check: Option<GateCheck>,

  /// The in-flight submission, if any.
  pending: Option<JoinHandle<SubmitOutcome>>,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(
    client: ApiClient,
    policy: GatePolicy,
    context: KioskContext,
    support: Option<String>,
  ) -> Self {
    Self {
      gate: Gate::Loading,
      policy,
      support,
      form: FeedbackForm::default(),
      focus: Focus::Rating,
      reason_cursor: 0,
      context,
      check: None,
      pending: None,
      client: Arc::new(client),
    }
  }

  /// Kick off the one gate check for this session.
  pub fn start_gate_check(&mut self) {
    let ref_id: Option<RefId> = self.context.ref_id.clone();
    self.check = Some(GateCheck::spawn(self.client.clone(), ref_id));
  }

  /// Drop the gate check; a late answer is discarded.
  pub fn cancel_gate_check(&mut self) { self.check = None; }

  pub fn view(&self) -> GateView { self.gate.view(self.policy, self.support.as_deref()) }

  fn form_visible(&self) -> bool { matches!(self.view(), GateView::Form { .. }) }

  // ── Background work ───────────────────────────────────────────────────────

  /// Pick up finished background work. Called once per frame.
  pub async fn tick(&mut self) {
    if let Some(check) = self.check.as_mut()
      && let Some(gate) = check.try_take()
    {
      tracing::info!(?gate, "gate resolved");
      self.gate = gate;
      self.check = None;
    }

    if self.pending.as_ref().is_some_and(JoinHandle::is_finished)
      && let Some(handle) = self.pending.take()
    {
      let outcome = handle
        .await
        .unwrap_or_else(|e| SubmitOutcome::Network(e.to_string()));
      self.form.apply(outcome);
      if self.form.phase == FormPhase::Submitted {
        self.focus = Focus::Rating;
        self.reason_cursor = 0;
      }
    }
  }

  fn submit(&mut self) {
    if !self.form.can_submit() || self.pending.is_some() {
      return;
    }
    let body = self.form.to_submission(&self.context);
    let client = self.client.clone();
    self.form.phase = FormPhase::Submitting;
    self.pending = Some(tokio::spawn(async move { client.submit_feedback(&body).await }));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.cancel_gate_check();
      return false;
    }

    if self.focus == Focus::Comment {
      self.handle_comment_key(key);
      return true;
    }

    if key.code == KeyCode::Char('q') {
      self.cancel_gate_check();
      return false;
    }

    if !self.form_visible() {
      return true;
    }

    match self.form.phase {
      FormPhase::Submitting => {}
      FormPhase::Submitted => {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('n')) {
          self.form.reset();
        }
      }
      FormPhase::Editing | FormPhase::Failed(_) => self.handle_form_key(key),
    }
    true
  }

  fn handle_comment_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Rating,
      KeyCode::Backspace => {
        self.form.comment.pop();
      }
      KeyCode::Char(c) => self.form.comment.push(c),
      _ => {}
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    match key.code {
      // Rating
      KeyCode::Char(c @ '1'..='5') => {
        let idx = c as usize - '1' as usize;
        self.form.select_rating(Rating::ALL[idx]);
        self.reason_cursor = 0;
      }
      KeyCode::Left | KeyCode::Right => {
        let cur = self
          .form
          .rating
          .and_then(|r| Rating::ALL.iter().position(|x| *x == r));
        let next = match (key.code, cur) {
          (_, None) => 0,
          (KeyCode::Left, Some(i)) => i.saturating_sub(1),
          (_, Some(i)) => (i + 1).min(Rating::ALL.len() - 1),
        };
        self.form.select_rating(Rating::ALL[next]);
        self.reason_cursor = 0;
      }

      // Reasons
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.form.reason_options().len();
        if self.focus == Focus::Rating && len > 0 {
          self.focus = Focus::Reasons;
        } else if self.reason_cursor + 1 < len {
          self.reason_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.reason_cursor > 0 {
          self.reason_cursor -= 1;
        } else {
          self.focus = Focus::Rating;
        }
      }
      KeyCode::Char(' ') => {
        if self.focus == Focus::Reasons
          && let Some(reason) = self.form.reason_options().get(self.reason_cursor).copied()
        {
          self.form.toggle_reason(reason);
        }
      }

      // Comment
      KeyCode::Char('c') => self.focus = Focus::Comment,

      // Submit
      KeyCode::Enter | KeyCode::Char('s') => self.submit(),

      _ => {}
    }
  }
}
