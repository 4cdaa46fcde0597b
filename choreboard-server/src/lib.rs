//! Choreboard server library.
//!
//! Exposes the HTTP API, configuration, and document store for use in
//! tests and embedding. The server owns routing, persistence, and
//! identifier generation; the due-date logic lives in `choreboard-model`.

pub mod api;
pub mod config;
pub mod store;
