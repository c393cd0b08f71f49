//! API client for the calculation service
//!
//! Every call is a JSON `GET`. Query parameters with no value (or an empty
//! one) are dropped rather than sent as `key=`. Non-2xx responses become a
//! single [`ApiError::Status`] carrying the status line and whatever body
//! text could be read. Requests tied to a [`CancellationToken`] fail with
//! [`ApiError::Cancelled`] once the token fires; callers drop those silently.

use career_calc_types::{
    AreasResponse, CalculationResult, FilterCriteria, HealthResponse, OccupationsResponse,
    StatesResponse,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

/// Header carrying the optional API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Query parameters: `None` and empty values are omitted.
pub type QueryParams<'a> = &'a [(&'a str, Option<String>)];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure: DNS, refused connection, TLS, reset.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("{}", status_message(.status, .status_text, .body))]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Superseded by a newer request. Never shown to the user.
    #[error("request cancelled")]
    Cancelled,

    /// Success status but the body was not the JSON we expected.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    fn from_status(status: StatusCode, body: String) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

fn status_message(status: &u16, status_text: &str, body: &str) -> String {
    format!("API {} {} {}", status, status_text, body.trim())
        .trim()
        .to_string()
}

/// Serialize query parameters, skipping `None` and empty strings.
pub fn build_query(params: QueryParams<'_>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            query.append_pair(key, value);
        }
    }
    query.finish()
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` may carry trailing slashes; they are stripped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for `path` plus the non-empty `params`.
    pub fn url_for(&self, path: &str, params: QueryParams<'_>) -> String {
        let query = build_query(params);
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        }
    }

    /// GET `path` and decode the JSON body.
    ///
    /// With a `cancel` token, the request is abandoned as soon as the token
    /// fires and the call returns [`ApiError::Cancelled`], regardless of
    /// whether a response was already on its way.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: QueryParams<'_>,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, ApiError> {
        let url = self.url_for(path, params);

        match cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(ApiError::Cancelled);
                }
                token
                    .run_until_cancelled(self.fetch_json(&url))
                    .await
                    .unwrap_or(Err(ApiError::Cancelled))
            }
            None => self.fetch_json(&url).await,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");

        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, body));
        }

        response.json::<T>().await.map_err(ApiError::from_transport)
    }

    // =========================================================================
    // ENDPOINTS
    // =========================================================================

    pub async fn calculate(
        &self,
        filters: &FilterCriteria,
        cancel: Option<&CancellationToken>,
    ) -> Result<CalculationResult, ApiError> {
        let params = filters.calculate_params();
        self.get_json("/api/calculate", &params, cancel).await
    }

    pub async fn occupations(&self) -> Result<Vec<String>, ApiError> {
        let response: OccupationsResponse = self.get_json("/api/occupations", &[], None).await?;
        Ok(response.occupations)
    }

    pub async fn states(&self) -> Result<Vec<String>, ApiError> {
        let response: StatesResponse = self.get_json("/api/states", &[], None).await?;
        Ok(response.states)
    }

    pub async fn areas_by_state(
        &self,
        state: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, ApiError> {
        let params = [("state", Some(state.to_string()))];
        let response: AreasResponse = self
            .get_json("/api/areas-by-state", &params, Some(cancel))
            .await?;
        Ok(response.areas)
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json("/api/health", &[], None).await
    }
}
