//! Eligibility filter over upstream centers.

use cowin_api::{Center, Session};

/// Eligibility criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Sessions with a higher minimum age are skipped.
    min_age: u32,
    /// Lowercase address substrings; empty means any address.
    address_contains: Vec<String>,
}

impl FilterConfig {
    /// Creates a filter. Substrings are case-folded and empty ones dropped;
    /// whitespace is kept as configured.
    #[must_use]
    pub fn new<I, S>(min_age: u32, address_contains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let address_contains = address_contains
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            min_age,
            address_contains,
        }
    }

    /// Configured minimum age.
    #[must_use]
    pub const fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Configured address substrings (lowercase).
    #[must_use]
    pub fn address_contains(&self) -> &[String] {
        &self.address_contains
    }

    /// Returns `true` if `address` passes the address gate.
    #[must_use]
    pub fn address_matches(&self, address: &str) -> bool {
        if self.address_contains.is_empty() {
            return true;
        }
        let address = address.to_lowercase();
        self.address_contains
            .iter()
            .any(|needle| address.contains(needle.as_str()))
    }
}

/// Returns `true` if the session has capacity and admits `min_age`.
#[must_use]
pub const fn is_eligible(session: &Session, min_age: u32) -> bool {
    session.available_capacity > 0 && session.min_age_limit <= min_age
}

/// Reduces `centers` to those with at least one eligible session.
///
/// Each returned center is a copy carrying only its eligible sessions, in
/// upstream order. Center order is preserved; the input is not modified.
#[must_use]
pub fn filter_centers(centers: &[Center], config: &FilterConfig) -> Vec<Center> {
    centers
        .iter()
        .filter(|center| config.address_matches(&center.address))
        .filter_map(|center| {
            let sessions: Vec<Session> = center
                .sessions
                .iter()
                .filter(|s| is_eligible(s, config.min_age))
                .cloned()
                .collect();
            if sessions.is_empty() {
                return None;
            }
            Some(Center {
                sessions,
                ..center.clone()
            })
        })
        .collect()
}
