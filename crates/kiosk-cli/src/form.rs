//! The survey form: answers being collected and where submission stands.

use chrono::{Local, SecondsFormat, Timelike, Utc};
use kiosk_core::{
  feedback::{NewFeedback, Rating, all_reasons},
  refid::RefId,
};

use crate::{
  client::SubmitOutcome,
  copy::{NETWORK_FAILURE_MESSAGE, submit_failure_message},
};

/// Fixed facts about this kiosk, attached to every submission.
#[derive(Debug, Clone, Default)]
pub struct KioskContext {
  pub solution:    Option<String>,
  pub device_id:   Option<String>,
  pub location:    Option<String>,
  pub washroom_id: Option<String>,
  pub browser:     Option<String>,
  pub ref_id:      Option<RefId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
  Editing,
  Submitting,
  /// Last attempt failed; answers are kept.
  Failed(String),
  /// Stored. Answers were cleared.
  Submitted,
}

#[derive(Debug, Clone)]
pub struct FeedbackForm {
  pub rating:  Option<Rating>,
  pub reasons: Vec<String>,
  pub comment: String,
  pub phase:   FormPhase,
}

impl Default for FeedbackForm {
  fn default() -> Self {
    Self {
      rating:  None,
      reasons: Vec::new(),
      comment: String::new(),
      phase:   FormPhase::Editing,
    }
  }
}

impl FeedbackForm {
  /// Reasons on offer: the whole vocabulary once a rating is chosen,
  /// nothing before.
  pub fn reason_options(&self) -> Vec<&'static str> {
    match self.rating {
      None => Vec::new(),
      Some(_) => all_reasons().collect(),
    }
  }

  /// Changing the rating keeps the reasons already picked.
  pub fn select_rating(&mut self, rating: Rating) {
    self.rating = Some(rating);
    if matches!(self.phase, FormPhase::Failed(_)) {
      self.phase = FormPhase::Editing;
    }
  }

  pub fn toggle_reason(&mut self, reason: &str) {
    if let Some(pos) = self.reasons.iter().position(|r| r == reason) {
      self.reasons.remove(pos);
    } else {
      self.reasons.push(reason.to_owned());
    }
  }

  pub fn is_selected(&self, reason: &str) -> bool { self.reasons.iter().any(|r| r == reason) }

  pub fn can_submit(&self) -> bool {
    self.rating.is_some() && !matches!(self.phase, FormPhase::Submitting | FormPhase::Submitted)
  }

  /// Build the request body from the current answers.
  pub fn to_submission(&self, ctx: &KioskContext) -> NewFeedback {
    let comment = self.comment.trim();
    NewFeedback {
      solution:           ctx.solution.clone(),
      rating:             self.rating.map(|r| r.as_str().to_owned()),
      reasons:            self.reasons.clone(),
      additional_comment: (!comment.is_empty()).then(|| comment.to_owned()),
      device_id:          ctx.device_id.clone(),
      location:           ctx.location.clone(),
      washroom_id:        ctx.washroom_id.clone(),
      browser:            ctx.browser.clone(),
      hour_of_day:        Some(i64::from(Local::now().hour())),
      ref_id:             ctx.ref_id.as_ref().map(|r| r.as_str().to_owned()),
      timestamp:          Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
  }

  /// Record a submission result. Only success clears the answers.
  pub fn apply(&mut self, outcome: SubmitOutcome) {
    match outcome {
      SubmitOutcome::Accepted { id } => {
        tracing::info!(%id, "feedback submitted");
        *self = Self {
          phase: FormPhase::Submitted,
          ..Self::default()
        };
      }
      SubmitOutcome::Rejected { code, message } => {
        tracing::warn!(%code, message = message.as_deref().unwrap_or_default(), "feedback rejected");
        self.phase = FormPhase::Failed(submit_failure_message(&code).to_owned());
      }
      SubmitOutcome::Network(reason) => {
        tracing::warn!(%reason, "feedback not delivered");
        self.phase = FormPhase::Failed(NETWORK_FAILURE_MESSAGE.to_owned());
      }
    }
  }

  /// Start over for the next visitor.
  pub fn reset(&mut self) { *self = Self::default(); }
}
