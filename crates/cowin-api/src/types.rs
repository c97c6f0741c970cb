//! CoWIN API response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// --- Location ---

/// Response from `v2/admin/location/states`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatesResponse {
    /// States (absent list decodes as empty).
    #[serde(default)]
    pub states: Vec<State>,
}

/// A state entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct State {
    /// State ID used by the district endpoint.
    pub state_id: u32,
    /// Human-readable name (e.g. "West Bengal").
    pub state_name: String,
}

/// Response from `v2/admin/location/districts/{state_id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DistrictsResponse {
    /// Districts (absent list decodes as empty).
    #[serde(default)]
    pub districts: Vec<District>,
}

/// A district entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct District {
    /// District ID used by the calendar endpoint.
    pub district_id: u32,
    /// Human-readable name (e.g. "Kolkata").
    pub district_name: String,
}

// --- Calendar ---

/// Response from `v2/appointment/sessions/public/calendarByDistrict`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CalendarResponse {
    /// Centers with sessions in the requested window.
    #[serde(default)]
    pub centers: Vec<Center>,
}

/// A vaccination center with its sessions.
///
/// Only the fields the filter reads are typed; everything else the
/// service returns is kept verbatim in `extra` and written back out.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Center {
    /// Center ID.
    pub center_id: u64,
    /// Center name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Sessions in upstream order.
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Remaining upstream fields (pincode, fee type, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One bookable session of a center.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    /// Doses still bookable.
    pub available_capacity: u32,
    /// Minimum age allowed to book.
    pub min_age_limit: u32,
    /// Remaining upstream fields (session ID, date, vaccine, slots, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
