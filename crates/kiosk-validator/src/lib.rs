//! Reference-token validation against the upstream asset directory.
//!
//! [`RefValidator::validate`] never fails: every problem (blank token, slow or
//! broken upstream, a record for the wrong id) comes back as a tagged
//! [`ValidationOutcome::Error`](kiosk_core::outcome::ValidationOutcome).
//! Outcomes are memoised through any [`OutcomeCache`](kiosk_core::cache::OutcomeCache);
//! [`LruOutcomeCache`] is the in-process default.

pub mod cache;
pub mod error;
pub mod upstream;
pub mod validator;

pub use cache::LruOutcomeCache;
pub use error::BuildError;
pub use validator::{RefValidator, ValidatorConfig};
