//! Core types and trait definitions for the kiosk feedback service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The validator, API, store and terminal client all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cache;
pub mod error;
pub mod feedback;
pub mod outcome;
pub mod policy;
pub mod refid;
pub mod store;
pub mod wire;

pub use error::{Error, Result};
