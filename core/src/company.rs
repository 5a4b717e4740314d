//! Company convenience accessors and search-query builders.
//!
//! Each accessor performs one company lookup and extracts a single field.
//! A missing, null or wrongly typed field becomes `ApiError::NotAvailable`
//! with a fixed message; lookup failures themselves pass through unchanged.

use serde_json::{json, Value};
use tracing::debug;

use crate::client::RocketReachClient;
use crate::error::ApiError;
use crate::http::ApiResponse;
use crate::params::{params, Params};
use crate::transport::Transport;

/// Distance unit used by `search_companies_by_location`.
pub const DEFAULT_DISTANCE_UNIT: &str = "mi";

const NO_TECH_STACK: &str = "No tech stack information available";
const NO_COMPETITORS: &str = "No competitor information available";
const NO_INDUSTRIES: &str = "No industry information available";
const NO_GROWTH: &str = "No growth information available";
const NO_FUNDING: &str = "No funding information available";
const NO_EMPLOYEE_COUNT: &str = "No employee count information available";

/// `{query: {techstack: [...]}}`
pub fn tech_query<S: AsRef<str>>(technologies: &[S]) -> Params {
    let techstack: Vec<&str> = technologies.iter().map(AsRef::as_ref).collect();
    params(json!({ "query": { "techstack": techstack } }))
}

/// Employee-count range. The API expects each bound as a one-element list of strings.
pub fn size_query(min: u64, max: u64) -> Params {
    params(json!({
        "query": {
            "company_size_min": [min.to_string()],
            "company_size_max": [max.to_string()],
        }
    }))
}

/// Revenue range, encoded like `size_query`.
pub fn revenue_query(min: u64, max: u64) -> Params {
    params(json!({
        "query": {
            "company_revenue_min": [min.to_string()],
            "company_revenue_max": [max.to_string()],
        }
    }))
}

/// Proximity expression understood by the search endpoint: `"<location>"::~<radius><unit>`.
pub fn location_expression(location: &str, radius: u32, unit: &str) -> String {
    format!("\"{location}\"::~{radius}{unit}")
}

pub fn location_query(location: &str, radius: u32, unit: &str) -> Params {
    params(json!({ "query": { "location": [location_expression(location, radius, unit)] } }))
}

fn list_field(
    response: &ApiResponse,
    name: &str,
    missing: &'static str,
) -> Result<Vec<Value>, ApiError> {
    match response.field(name) {
        Some(Value::Array(items)) => Ok(items.clone()),
        _ => {
            debug!(field = name, "field missing from company record");
            Err(ApiError::NotAvailable(missing))
        }
    }
}

impl<T: Transport> RocketReachClient<T> {
    fn lookup_domain(&self, domain: &str) -> Result<ApiResponse, ApiError> {
        self.lookup_company(&params(json!({ "domain": domain })))
    }

    /// # Errors
    /// Lookup failures pass through; a missing `techstack` list is `NotAvailable`.
    pub fn get_company_tech_stack(&self, domain: &str) -> Result<Vec<Value>, ApiError> {
        list_field(&self.lookup_domain(domain)?, "techstack", NO_TECH_STACK)
    }

    /// # Errors
    /// Lookup failures pass through; a missing `competitors` list is `NotAvailable`.
    pub fn get_company_competitors(&self, domain: &str) -> Result<Vec<Value>, ApiError> {
        list_field(&self.lookup_domain(domain)?, "competitors", NO_COMPETITORS)
    }

    /// # Errors
    /// Lookup failures pass through; a missing `industries` list is `NotAvailable`.
    pub fn get_company_industries(&self, domain: &str) -> Result<Vec<Value>, ApiError> {
        list_field(&self.lookup_domain(domain)?, "industries", NO_INDUSTRIES)
    }

    /// # Errors
    /// Lookup failures pass through; a missing `company_growth` list is `NotAvailable`.
    pub fn get_company_growth(&self, domain: &str) -> Result<Vec<Value>, ApiError> {
        list_field(&self.lookup_domain(domain)?, "company_growth", NO_GROWTH)
    }

    /// # Errors
    /// Lookup failures pass through; a missing `funding_investors` list is `NotAvailable`.
    pub fn get_company_funding(&self, domain: &str) -> Result<Vec<Value>, ApiError> {
        list_field(&self.lookup_domain(domain)?, "funding_investors", NO_FUNDING)
    }

    /// Headcount as reported by the API, in whatever shape it arrives.
    ///
    /// # Errors
    /// Lookup failures pass through; a null or missing `num_employees` is `NotAvailable`.
    pub fn get_company_size(&self, domain: &str) -> Result<Value, ApiError> {
        let response = self.lookup_domain(domain)?;
        response.field("num_employees").cloned().ok_or_else(|| {
            debug!(field = "num_employees", "field missing from company record");
            ApiError::NotAvailable(NO_EMPLOYEE_COUNT)
        })
    }

    /// `true` when the company record carries a non-null `ticker_symbol`.
    ///
    /// # Errors
    /// Only lookup failures; an absent ticker is `Ok(false)`.
    pub fn is_publicly_traded(&self, domain: &str) -> Result<bool, ApiError> {
        Ok(self.lookup_domain(domain)?.field("ticker_symbol").is_some())
    }

    /// # Errors
    /// Propagates `search_companies` failures.
    pub fn search_companies_by_tech<S: AsRef<str>>(
        &self,
        technologies: &[S],
    ) -> Result<ApiResponse, ApiError> {
        self.search_companies(&tech_query(technologies))
    }

    /// # Errors
    /// Propagates `search_companies` failures.
    pub fn search_companies_by_size(&self, min: u64, max: u64) -> Result<ApiResponse, ApiError> {
        self.search_companies(&size_query(min, max))
    }

    /// # Errors
    /// Propagates `search_companies` failures.
    pub fn search_companies_by_revenue(&self, min: u64, max: u64) -> Result<ApiResponse, ApiError> {
        self.search_companies(&revenue_query(min, max))
    }

    /// Companies within `radius` miles of `location`.
    ///
    /// # Errors
    /// Propagates `search_companies` failures.
    pub fn search_companies_by_location(
        &self,
        location: &str,
        radius: u32,
    ) -> Result<ApiResponse, ApiError> {
        self.search_companies_by_location_in(location, radius, DEFAULT_DISTANCE_UNIT)
    }

    /// Like `search_companies_by_location` with an explicit unit (`"mi"`, `"km"`).
    ///
    /// # Errors
    /// Propagates `search_companies` failures.
    pub fn search_companies_by_location_in(
        &self,
        location: &str,
        radius: u32,
        unit: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.search_companies(&location_query(location, radius, unit))
    }
}
