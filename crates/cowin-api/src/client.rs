//! `CowinClient` - CoWIN API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalCowinApi;
use super::error::TransportError;
use super::params::format_wire_date;
use super::types::{CalendarResponse, Center, District, DistrictsResponse, State, StatesResponse};

/// Default base URL of the public API.
pub const DEFAULT_BASE_URL: &str = "https://cdn-api.co-vin.in/api/";

/// Browser-like User-Agent.
///
/// The CDN in front of the API rejects the default `reqwest` identifier.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/90.0.4430.93 Safari/537.36";

/// Number of body characters kept in status errors and trace logs.
const BODY_PREVIEW_CHARS: usize = 500;

/// CoWIN API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CowinClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
}

/// Builder for `CowinClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CowinClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl CowinClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (default: [`DEFAULT_USER_AGENT`]).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a per-request timeout (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - The default base URL cannot be parsed.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CowinClient> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en_US"));

        let mut builder = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("failed to build HTTP client")?;

        Ok(CowinClient {
            http_client,
            base_url,
        })
    }
}

impl CowinClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CowinClientBuilder {
        CowinClientBuilder::new()
    }

    /// Returns the base URL requests are joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request and decodes the JSON body.
    ///
    /// No retry: any failure is returned to the caller as is.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|source| TransportError::Url {
                endpoint: String::from(path),
                source,
            })?;

        let request = self
            .http_client
            .get(url)
            .query(query)
            .build()
            .map_err(|source| TransportError::Request {
                endpoint: String::from(path),
                source,
            })?;

        tracing::debug!(url = %request.url(), "CoWIN API request");

        let response = self.http_client.execute(request).await.map_err(|source| {
            TransportError::Request {
                endpoint: String::from(path),
                source,
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Request {
                endpoint: String::from(path),
                source,
            })?;

        tracing::debug!(%status, body_len = body.len(), "Response body received");
        tracing::trace!(body_preview = %preview(&body), "Response body preview");

        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: String::from(path),
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| TransportError::Decode {
            endpoint: String::from(path),
            source,
        })
    }
}

/// Leading part of a response body.
fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

impl LocalCowinApi for CowinClient {
    #[instrument(skip_all)]
    async fn list_states(&self) -> Result<Vec<State>, TransportError> {
        let response: StatesResponse = self.get_json("v2/admin/location/states", &[]).await?;
        Ok(response.states)
    }

    #[instrument(skip_all, fields(state_id = state_id))]
    async fn list_districts(&self, state_id: u32) -> Result<Vec<District>, TransportError> {
        let path = format!("v2/admin/location/districts/{state_id}");
        let response: DistrictsResponse = self.get_json(&path, &[]).await?;
        Ok(response.districts)
    }

    #[instrument(skip_all, fields(district_id = district_id, date = %date))]
    async fn calendar_by_district(
        &self,
        district_id: u32,
        date: NaiveDate,
    ) -> Result<Vec<Center>, TransportError> {
        let query = [
            ("district_id", district_id.to_string()),
            ("date", format_wire_date(date)),
        ];
        let response: CalendarResponse = self
            .get_json(
                "v2/appointment/sessions/public/calendarByDistrict",
                &query,
            )
            .await?;
        Ok(response.centers)
    }
}
