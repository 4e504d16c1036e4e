//! The validation gate: decides whether the kiosk form may be shown.
//!
//! The check runs once per session in a background task. It is tied to a
//! [`CancellationToken`]; once cancelled the task finishes without reporting,
//! so a late answer can never overwrite the gate.

use std::sync::Arc;

use kiosk_core::{
  outcome::{Asset, ErrorCode},
  refid::RefId,
  wire::Envelope,
};
use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
  client::ApiClient,
  copy::{ErrorCopy, error_copy},
};

// ─── State ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
  Loading,
  Ready(Asset),
  Blocked { code: String },
}

impl Gate {
  fn blocked(code: ErrorCode) -> Self {
    Self::Blocked {
      code: code.as_str().to_owned(),
    }
  }

  /// Interpret a validation envelope.
  ///
  /// A not-ok envelope without a code reads as `INVALID_REFID`, and so does
  /// an ok envelope that carries no asset.
  pub fn from_envelope(env: Envelope<Asset>) -> Self {
    match env {
      Envelope {
        ok: true,
        data: Some(asset),
        ..
      } => Self::Ready(asset),
      Envelope { ok: false, code, .. } if !code.is_empty() => Self::Blocked { code },
      _ => Self::blocked(ErrorCode::InvalidRefid),
    }
  }

  /// What to render for this state.
  pub fn view(&self, policy: GatePolicy, support: Option<&str>) -> GateView {
    if !policy.require_ref {
      let banner = match self {
        Self::Ready(asset) => Some(asset.display_label().to_owned()),
        _ => None,
      };
      return GateView::Form { banner };
    }
    match self {
      Self::Loading => GateView::Checking,
      Self::Ready(asset) => GateView::Form {
        banner: Some(asset.display_label().to_owned()),
      },
      Self::Blocked { code } => GateView::Blocked(error_copy(code, support)),
    }
  }
}

/// Whether a verified reference is mandatory for this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
  pub require_ref: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
  /// Non-blocking progress indicator.
  Checking,
  /// The form, with an optional "you are rating …" banner.
  Form { banner: Option<String> },
  /// Blocking error card; the form is not rendered.
  Blocked(ErrorCopy),
}

// ─── Resolution ───────────────────────────────────────────────────────────────

/// Extract the reference token from a kiosk page URL.
pub fn ref_id_from_page_url(page_url: &str) -> Option<RefId> {
  let url = reqwest::Url::parse(page_url).ok()?;
  RefId::from_query_pairs(url.query_pairs())
}

/// Run the check. Returns `None` if `cancel` fired first.
pub async fn resolve_gate(
  client: &ApiClient,
  ref_id: Option<&RefId>,
  cancel: &CancellationToken,
) -> Option<Gate> {
  let Some(ref_id) = ref_id else {
    tracing::info!("no reference token on page url");
    return Some(Gate::blocked(ErrorCode::MissingRefid));
  };

  tokio::select! {
    biased;
    _ = cancel.cancelled() => {
      tracing::debug!("gate check cancelled");
      None
    }
    res = client.validate_ref(ref_id) => Some(match res {
      Ok(env) => Gate::from_envelope(env),
      Err(e) => {
        tracing::warn!(error = %e, ref_id = %ref_id.masked(), "gate check failed");
        Gate::blocked(ErrorCode::Network)
      }
    }),
  }
}

/// Handle on the in-flight background check.
///
/// Dropping it cancels the check.
pub struct GateCheck {
  rx:     Option<oneshot::Receiver<Gate>>,
  _guard: DropGuard,
}

impl GateCheck {
  pub fn spawn(client: Arc<ApiClient>, ref_id: Option<RefId>) -> Self {
    let token = CancellationToken::new();
    let (tx, rx) = oneshot::channel();
    let child = token.clone();
    tokio::spawn(async move {
      if let Some(gate) = resolve_gate(&client, ref_id.as_ref(), &child).await
        && !child.is_cancelled()
      {
        let _ = tx.send(gate);
      }
    });
    Self {
      rx:     Some(rx),
      _guard: token.drop_guard(),
    }
  }

  /// The resolved gate, exactly once, if it has arrived.
  pub fn try_take(&mut self) -> Option<Gate> {
    let rx = self.rx.as_mut()?;
    match rx.try_recv() {
      Ok(gate) => {
        self.rx = None;
        Some(gate)
      }
      Err(oneshot::error::TryRecvError::Empty) => None,
      Err(oneshot::error::TryRecvError::Closed) => {
        self.rx = None;
        None
      }
    }
  }
}
