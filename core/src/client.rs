//! Request builder and executor for the RocketReach API.
//!
//! # Design
//! `RocketReachClient` holds the base URL, the API key and a `Transport`; it
//! carries no mutable state between calls. Each remote operation is split
//! into a `build_*` method that produces an `HttpRequest` and an executing
//! method that sends it and returns the parsed `ApiResponse`. The `build_*`
//! half is pure, so request shapes are testable without a network.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{ApiResponse, HttpMethod, HttpRequest, API_KEY_HEADER};
use crate::params::{query_pairs, BulkLookupBody, BulkLookupOptions, Params};
use crate::transport::{Transport, UreqTransport};

pub(crate) const ACCOUNT: &str = "/account/";
pub(crate) const ACCOUNT_KEY: &str = "/account/key/";
pub(crate) const PERSON_LOOKUP: &str = "/person/lookup";
pub(crate) const PERSON_CHECK_STATUS: &str = "/person/checkStatus";
pub(crate) const PERSON_SEARCH: &str = "/person/search";
pub(crate) const COMPANY_LOOKUP: &str = "/company/lookup/";
pub(crate) const COMPANY_SEARCH: &str = "/searchCompany";
pub(crate) const BULK_LOOKUP: &str = "/bulkLookup";
pub(crate) const NPI_SEARCH: &str = "/npi/search";
pub(crate) const PROFILE_COMPANY_LOOKUP: &str = "/profile-company/lookup";

/// Synchronous client for the RocketReach API.
///
/// Immutable after construction and safe to share between threads; the
/// transport owns any connection pooling.
#[derive(Clone)]
pub struct RocketReachClient<T: Transport = UreqTransport> {
    base_url: String,
    api_key: String,
    transport: T,
}

impl<T: Transport> std::fmt::Debug for RocketReachClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocketReachClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl RocketReachClient<UreqTransport> {
    /// Client for the production API using default settings.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidConfig` if the key is empty or cannot be
    /// sent as a header value.
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig {
            api_key: api_key.to_string(),
            ..ClientConfig::default()
        })
    }

    /// Client for an alternate host, e.g. a local mock server.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidConfig` on an invalid key or URL.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    /// # Errors
    /// Returns `ApiError::InvalidConfig` if the configuration does not validate.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let transport = UreqTransport::new(Duration::from_secs(config.timeout_secs));
        Ok(Self::assemble(config, transport))
    }

    /// Client configured from `ROCKETREACH_*` environment variables.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidConfig` if the key is unset or a value is invalid.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::load()?)
    }
}

impl<T: Transport> RocketReachClient<T> {
    /// Client that sends every request through `transport`.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidConfig` on an invalid key or URL.
    pub fn with_transport(api_key: &str, base_url: &str, transport: T) -> Result<Self, ApiError> {
        let config = ClientConfig {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        config.validate()?;
        Ok(Self::assemble(&config, transport))
    }

    fn assemble(config: &ClientConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Request construction
    // -----------------------------------------------------------------------

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![(API_KEY_HEADER.to_string(), self.api_key.clone())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            query,
            headers,
            body,
        }
    }

    fn get(&self, path: &str, params: &Params) -> HttpRequest {
        self.request(HttpMethod::Get, path, query_pairs(params), None)
    }

    fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, path, Vec::new(), Some(body)))
    }

    pub fn build_get_account(&self) -> HttpRequest {
        self.get(ACCOUNT, &Params::new())
    }

    pub fn build_create_api_key(&self) -> HttpRequest {
        self.request(HttpMethod::Post, ACCOUNT_KEY, Vec::new(), None)
    }

    pub fn build_lookup_person(&self, params: &Params) -> HttpRequest {
        self.get(PERSON_LOOKUP, params)
    }

    pub fn build_check_person_status(&self, params: &Params) -> HttpRequest {
        self.get(PERSON_CHECK_STATUS, params)
    }

    pub fn build_search_people(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.post_json(PERSON_SEARCH, params)
    }

    pub fn build_lookup_company(&self, params: &Params) -> HttpRequest {
        self.get(COMPANY_LOOKUP, params)
    }

    pub fn build_search_companies(&self, params: &Params) -> Result<HttpRequest, ApiError> {
        self.post_json(COMPANY_SEARCH, params)
    }

    pub fn build_bulk_lookup(
        &self,
        queries: &[Value],
        options: &BulkLookupOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = BulkLookupBody {
            queries,
            profile_list: &options.profile_list,
            webhook_id: options.webhook_id.as_deref(),
        };
        self.post_json(BULK_LOOKUP, &body)
    }

    pub fn build_get_npi_contact(&self, params: &Params) -> HttpRequest {
        self.get(NPI_SEARCH, params)
    }

    pub fn build_lookup_profile_company(&self, params: &Params) -> HttpRequest {
        self.get(PROFILE_COMPANY_LOOKUP, params)
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Execute a built request and parse its JSON body.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and undecodable bodies are
    /// returned as-is; the status code is never interpreted further.
    pub fn send(&self, request: &HttpRequest) -> Result<ApiResponse, ApiError> {
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            query_pairs = request.query.len(),
            "sending request"
        );
        let response = self.transport.execute(request).map_err(|e| {
            warn!(url = %request.url, error = %e, "transport failure");
            e
        })?;
        debug!(
            status = response.status,
            url = %request.url,
            content_type = response.header("content-type").unwrap_or(""),
            "received response"
        );
        if !(200..300).contains(&response.status) {
            warn!(status = response.status, url = %request.url, "request was not successful");
        }
        ApiResponse::from_http(response)
    }

    /// Account details for the API key in use.
    ///
    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn get_account(&self) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_get_account())
    }

    /// Rotate the API key.
    ///
    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn create_api_key(&self) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_create_api_key())
    }

    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn lookup_person(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_lookup_person(params))
    }

    /// Poll the status of previously started lookups (`ids`).
    ///
    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn check_person_status(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_check_person_status(params))
    }

    /// # Errors
    /// Propagates serialization, transport and HTTP failures.
    pub fn search_people(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_search_people(params)?)
    }

    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn lookup_company(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_lookup_company(params))
    }

    /// # Errors
    /// Propagates serialization, transport and HTTP failures.
    pub fn search_companies(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_search_companies(params)?)
    }

    /// Queue a batch of person lookups.
    ///
    /// # Errors
    /// Propagates serialization, transport and HTTP failures.
    pub fn bulk_lookup(
        &self,
        queries: &[Value],
        options: &BulkLookupOptions,
    ) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_bulk_lookup(queries, options)?)
    }

    /// Look up a healthcare provider by NPI number.
    ///
    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn get_npi_contact(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_get_npi_contact(params))
    }

    /// # Errors
    /// Propagates transport and HTTP failures.
    pub fn lookup_profile_company(&self, params: &Params) -> Result<ApiResponse, ApiError> {
        self.send(&self.build_lookup_profile_company(params))
    }
}
