//! API client library for the CoWIN public appointment service.
//!
//! Covers the three read-only endpoints the alert loop needs: the state
//! list, the district list of a state and the weekly session calendar of
//! a district.

mod api;
mod client;
mod error;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CowinApi, LocalCowinApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CowinClient, CowinClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::TransportError;
pub use params::{SearchWindow, WINDOW_LENGTH_DAYS};
pub use types::{Center, District, Session, State};
