//! User-facing wording. Codes never reach the screen directly.

use kiosk_core::outcome::ErrorCode;

/// What the blocking error card says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCopy {
  pub title:   &'static str,
  pub body:    &'static str,
  pub support: Option<String>,
}

const TITLE: &str = "We couldn't load this feedback form";

const DEFAULT_BODY: &str =
  "Something went wrong while checking this location. Please try again in a moment.";

fn body_for(code: &str) -> &'static str {
  let Ok(code) = code.parse::<ErrorCode>() else {
    return DEFAULT_BODY;
  };
  match code {
    ErrorCode::MissingRefid => {
      "This link is missing its location code. Please scan the QR code posted at this location."
    }
    ErrorCode::InvalidRefid => {
      "We don't recognise this location code. Please scan the QR code posted at this location."
    }
    ErrorCode::IdMismatch => {
      "This location code doesn't match our records. Please scan the QR code again."
    }
    ErrorCode::Upstream => {
      "Our location directory is having trouble right now. Please try again shortly."
    }
    ErrorCode::Timeout => {
      "Checking this location took too long. Please try again in a few seconds."
    }
    ErrorCode::Network => {
      "We couldn't reach the feedback service. Please check the connection and try again."
    }
    ErrorCode::ValidatorUnavailable => {
      "Location checking is switched off on the server. Please let the site team know."
    }
    ErrorCode::Exception => {
      "Something unexpected happened while checking this location. Please try again."
    }
    ErrorCode::DbNotReady | ErrorCode::ServerError | ErrorCode::BadRequest => DEFAULT_BODY,
  }
}

/// Copy for a gate error `code`. Unknown codes get the default body.
pub fn error_copy(code: &str, support: Option<&str>) -> ErrorCopy {
  ErrorCopy {
    title:   TITLE,
    body:    body_for(code),
    support: support.map(|s| format!("Need help? Contact {s}.")),
  }
}

/// Inline message after a submission the server refused.
pub fn submit_failure_message(code: &str) -> &'static str {
  match code.parse::<ErrorCode>() {
    Ok(ErrorCode::DbNotReady) => {
      "We're still getting ready. Please wait a moment and submit again."
    }
    Ok(ErrorCode::ServerError) => "We couldn't save your feedback. Please try again.",
    Ok(ErrorCode::MissingRefid) => {
      "This form isn't linked to a location. Please scan the QR code posted here."
    }
    _ => "Your feedback wasn't sent. Please try again.",
  }
}

/// Inline message after a submission that never got an answer.
pub const NETWORK_FAILURE_MESSAGE: &str =
  "Couldn't reach the server. Your answers are kept; please try again.";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_gate_code_has_its_own_body() {
    let codes = [
      "MISSING_REFID",
      "INVALID_REFID",
      "ID_MISMATCH",
      "UPSTREAM",
      "TIMEOUT",
      "EXCEPTION",
      "NETWORK",
      "VALIDATOR_UNAVAILABLE",
    ];
    let bodies: std::collections::HashSet<_> =
      codes.iter().map(|c| error_copy(c, None).body).collect();
    assert_eq!(bodies.len(), codes.len());
    assert!(!bodies.contains(DEFAULT_BODY));
  }

  #[test]
  fn unknown_code_falls_back_to_default() {
    let copy = error_copy("SOMETHING_NEW", None);
    assert_eq!(copy.title, TITLE);
    assert_eq!(copy.body, DEFAULT_BODY);
    assert_eq!(error_copy("", None).body, DEFAULT_BODY);
  }

  #[test]
  fn support_contact_is_included_when_configured() {
    let copy = error_copy("TIMEOUT", Some("facilities@example.com"));
    assert_eq!(
      copy.support.as_deref(),
      Some("Need help? Contact facilities@example.com.")
    );
    assert!(error_copy("TIMEOUT", None).support.is_none());
  }

  #[test]
  fn submit_messages_never_echo_the_code() {
    for code in ["DB_NOT_READY", "SERVER_ERROR", "MISSING_REFID", "WHATEVER"] {
      assert!(!submit_failure_message(code).contains(code));
    }
  }
}
