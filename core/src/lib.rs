//! Synchronous client for the RocketReach contact-data API.
//!
//! # Overview
//! Builds `HttpRequest` values for every remote operation, attaches the
//! `Api-Key` header, executes them through a `Transport` and returns the
//! parsed JSON as an `ApiResponse`. A handful of convenience accessors pull a
//! single field out of a company record, and the org helpers group employee
//! search results into a level/department hierarchy.
//!
//! # Design
//! - `RocketReachClient` is immutable; it holds the base URL, the key and the
//!   transport, nothing else.
//! - Every pass-through operation has a pure `build_*` twin so request shapes
//!   can be checked without I/O.
//! - Request parameters are free-form JSON maps forwarded verbatim.
//! - Transport failures and missing-field failures are separate `ApiError`
//!   tiers.

pub mod client;
pub mod company;
pub mod config;
pub mod error;
pub mod http;
pub mod org;
pub mod params;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::RocketReachClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse, API_KEY_HEADER};
pub use org::{Hierarchy, ManagementLevel, OrgChart};
pub use params::{params, BulkLookupOptions, Params, DEFAULT_PROFILE_LIST};
pub use transport::{Transport, UreqTransport};
