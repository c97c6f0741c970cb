//! `CowinApi` trait definition.
#![allow(clippy::future_not_send)]

use chrono::NaiveDate;

use super::error::TransportError;
use super::types::{Center, District, State};

/// CoWIN API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CowinApi: Send)]
pub trait LocalCowinApi {
    /// Lists every state known to the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the body cannot be decoded.
    async fn list_states(&self) -> Result<Vec<State>, TransportError>;

    /// Lists the districts of a state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the body cannot be decoded.
    async fn list_districts(&self, state_id: u32) -> Result<Vec<District>, TransportError>;

    /// Fetches the centers of a district with their sessions for the
    /// 7-day window starting at `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 2xx,
    /// or the body cannot be decoded.
    async fn calendar_by_district(
        &self,
        district_id: u32,
        date: NaiveDate,
    ) -> Result<Vec<Center>, TransportError>;
}
