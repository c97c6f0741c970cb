//! Resolves configured state and district names to upstream IDs.
#![allow(clippy::future_not_send)]

use cowin_api::LocalCowinApi;
use tracing::instrument;

use super::error::LookupError;
use super::settings::Region;

/// Region with the IDs the calendar endpoint needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    /// Region as configured.
    pub region: Region,
    /// Upstream state ID.
    pub state_id: u32,
    /// Upstream district ID.
    pub district_id: u32,
}

/// Case-insensitive exact name comparison.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Resolves a state name to its ID.
///
/// The first entry whose name equals `state_name` ignoring case wins.
///
/// # Errors
///
/// - `LookupError::StateNotFound` if no entry matches (including an empty list).
/// - `LookupError::Transport` if the upstream call fails.
#[instrument(skip(api))]
pub async fn resolve_state_id(
    api: &impl LocalCowinApi,
    state_name: &str,
) -> Result<u32, LookupError> {
    let states = api.list_states().await?;
    tracing::debug!(count = states.len(), "States fetched");

    states
        .iter()
        .find(|s| same_name(&s.state_name, state_name))
        .map(|s| s.state_id)
        .ok_or_else(|| LookupError::StateNotFound(String::from(state_name)))
}

/// Resolves a district name of a state to its ID.
///
/// # Errors
///
/// - `LookupError::DistrictNotFound` if no entry matches (including an empty list).
/// - `LookupError::Transport` if the upstream call fails.
#[instrument(skip(api))]
pub async fn resolve_district_id(
    api: &impl LocalCowinApi,
    state_id: u32,
    district_name: &str,
) -> Result<u32, LookupError> {
    let districts = api.list_districts(state_id).await?;
    tracing::debug!(count = districts.len(), "Districts fetched");

    districts
        .iter()
        .find(|d| same_name(&d.district_name, district_name))
        .map(|d| d.district_id)
        .ok_or_else(|| LookupError::DistrictNotFound {
            state_id,
            name: String::from(district_name),
        })
}

/// Resolves both IDs of `region`, state first.
///
/// # Errors
///
/// Returns the first error of [`resolve_state_id`] or [`resolve_district_id`].
pub async fn resolve_region(
    api: &impl LocalCowinApi,
    region: &Region,
) -> Result<ResolvedRegion, LookupError> {
    let state_id = resolve_state_id(api, &region.state_name).await?;
    let district_id = resolve_district_id(api, state_id, &region.district_name).await?;

    tracing::info!(
        state = %region.state_name,
        state_id,
        district = %region.district_name,
        district_id,
        "Region resolved"
    );

    Ok(ResolvedRegion {
        region: region.clone(),
        state_id,
        district_id,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use chrono::NaiveDate;
    use cowin_api::{Center, District, State, TransportError};

    use super::*;

    /// In-memory API returning fixed location lists.
    struct FakeApi {
        states: Vec<State>,
        districts: Vec<District>,
    }

    impl FakeApi {
        fn west_bengal() -> Self {
            Self {
                states: vec![
                    State {
                        state_id: 9,
                        state_name: String::from("Delhi"),
                    },
                    State {
                        state_id: 36,
                        state_name: String::from("West Bengal"),
                    },
                ],
                districts: vec![
                    District {
                        district_id: 721,
                        district_name: String::from("Howrah"),
                    },
                    District {
                        district_id: 725,
                        district_name: String::from("Kolkata"),
                    },
                ],
            }
        }
    }

    impl LocalCowinApi for FakeApi {
        async fn list_states(&self) -> Result<Vec<State>, TransportError> {
            Ok(self.states.clone())
        }

        async fn list_districts(&self, _state_id: u32) -> Result<Vec<District>, TransportError> {
            Ok(self.districts.clone())
        }

        async fn calendar_by_district(
            &self,
            _district_id: u32,
            _date: NaiveDate,
        ) -> Result<Vec<Center>, TransportError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_state_match_ignores_case() {
        // Arrange
        let api = FakeApi::west_bengal();

        // Act
        let state_id = resolve_state_id(&api, "west bengal").await.unwrap();

        // Assert
        assert_eq!(state_id, 36);
    }

    #[tokio::test]
    async fn test_state_substring_is_not_a_match() {
        // Arrange
        let api = FakeApi::west_bengal();

        // Act
        let result = resolve_state_id(&api, "Bengal").await;

        // Assert
        assert!(matches!(result, Err(LookupError::StateNotFound(name)) if name == "Bengal"));
    }

    #[tokio::test]
    async fn test_empty_state_list_is_not_found() {
        // Arrange
        let api = FakeApi {
            states: Vec::new(),
            districts: Vec::new(),
        };

        // Act
        let result = resolve_state_id(&api, "Delhi").await;

        // Assert
        assert!(matches!(result, Err(LookupError::StateNotFound(_))));
    }

    #[tokio::test]
    async fn test_district_match_ignores_case() {
        // Arrange
        let api = FakeApi::west_bengal();

        // Act
        let district_id = resolve_district_id(&api, 36, "KOLKATA").await.unwrap();

        // Assert
        assert_eq!(district_id, 725);
    }

    #[tokio::test]
    async fn test_unknown_district_is_not_found() {
        // Arrange
        let api = FakeApi::west_bengal();

        // Act
        let result = resolve_district_id(&api, 36, "Darjeeling").await;

        // Assert
        assert!(matches!(
            result,
            Err(LookupError::DistrictNotFound { state_id: 36, .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_region_chains_both_lookups() {
        // Arrange
        let api = FakeApi::west_bengal();
        let region = Region {
            state_name: String::from("West Bengal"),
            district_name: String::from("Kolkata"),
        };

        // Act
        let resolved = resolve_region(&api, &region).await.unwrap();

        // Assert
        assert_eq!(resolved.state_id, 36);
        assert_eq!(resolved.district_id, 725);
        assert_eq!(resolved.region, region);
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        let client = cowin_api::CowinClient::builder()
            .base_url(format!("{}/api/", mock_server.uri()).parse().unwrap())
            .build()
            .unwrap();

        // Act
        let result = resolve_state_id(&client, "West Bengal").await;

        // Assert
        assert!(matches!(
            result,
            Err(LookupError::Transport(TransportError::Status { status: 500, .. }))
        ));
    }
}
