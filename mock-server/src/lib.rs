//! In-memory stand-in for the RocketReach v2 API.
//!
//! Serves the same paths as the real API from a seeded `Directory` so the
//! client can be exercised end to end without credentials or network access.
//! Every route requires the `Api-Key` header to equal [`API_KEY`].

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Key accepted by the mock.
pub const API_KEY: &str = "test-api-key";

const DEFAULT_PAGE_SIZE: usize = 10;

/// Seed data served by the mock.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Directory {
    /// Company records keyed by domain.
    pub companies: HashMap<String, Value>,
    /// Person profiles.
    pub people: Vec<Value>,
    /// Healthcare provider records keyed by NPI number.
    pub npi: HashMap<String, Value>,
}

impl Directory {
    /// A small, fixed dataset: one well-documented company, one sparse one.
    pub fn sample() -> Self {
        let mut companies = HashMap::new();
        companies.insert(
            "acme.com".to_string(),
            json!({
                "id": 100,
                "name": "Acme Corp",
                "domain": "acme.com",
                "techstack": ["Rust", "PostgreSQL", "Kubernetes"],
                "competitors": ["Globex", "Initech"],
                "industries": ["Software", "Manufacturing"],
                "company_growth": [
                    {"year": 2023, "num_employees": 80},
                    {"year": 2024, "num_employees": 120}
                ],
                "funding_investors": ["Road Runner Capital"],
                "num_employees": 120,
                "revenue": 25_000_000,
                "location": "Austin, TX",
                "ticker_symbol": "ACME",
            }),
        );
        companies.insert(
            "globex.com".to_string(),
            json!({
                "id": 200,
                "name": "Globex",
                "domain": "globex.com",
                "techstack": ["Java"],
                "revenue": 5_000_000,
                "location": "Springfield, OR",
                "ticker_symbol": null,
            }),
        );

        let people = vec![
            person(1, "Ada Park", "CEO", "Executive", "acme.com", Some("C-Level")),
            person(2, "Grace Hall", "CFO", "Executive", "acme.com", Some("C-Level")),
            person(3, "Linus Ortiz", "VP of Engineering", "Engineering", "acme.com", Some("VP")),
            person(4, "Margaret Chen", "Director of Engineering", "Engineering", "acme.com", Some("Director")),
            person(5, "Ken Adams", "Engineering Manager", "Engineering", "acme.com", Some("Manager")),
            person(6, "Dennis Ruiz", "Software Engineer", "Engineering", "acme.com", Some("Individual Contributor")),
            person(7, "Barbara Lee", "Account Executive", "Sales", "acme.com", Some("Individual Contributor")),
            // No level on record: level filters let this profile through.
            person(8, "Hank Scorpio", "Software Engineer", "Engineering", "globex.com", None),
        ];

        let mut npi = HashMap::new();
        npi.insert(
            "1234567890".to_string(),
            json!({"npi": "1234567890", "name": "Dr. Jane Doe", "emails": ["jane@clinic.example"]}),
        );

        Self {
            companies,
            people,
            npi,
        }
    }
}

fn person(
    id: u64,
    name: &str,
    title: &str,
    department: &str,
    domain: &str,
    level: Option<&str>,
) -> Value {
    let mut profile = json!({
        "id": id,
        "name": name,
        "current_title": title,
        "department": department,
        "current_employer_domain": domain,
        "linkedin_url": format!("https://www.linkedin.com/in/person-{id}"),
        "status": "complete",
    });
    if let Some(level) = level {
        profile["management_level"] = json!(level);
    }
    profile
}

/// Read-only after seeding, so handlers share it without a lock.
pub type Db = Arc<Directory>;

pub fn app() -> Router {
    app_with(Directory::sample())
}

pub fn app_with(directory: Directory) -> Router {
    let db: Db = Arc::new(directory);
    Router::new()
        .route("/account/", get(get_account))
        .route("/account/key/", post(create_api_key))
        .route("/person/lookup", get(lookup_person))
        .route("/person/checkStatus", get(check_person_status))
        .route("/person/search", post(search_people))
        .route("/company/lookup/", get(lookup_company))
        .route("/searchCompany", post(search_companies))
        .route("/bulkLookup", post(bulk_lookup))
        .route("/npi/search", get(npi_search))
        .route("/profile-company/lookup", get(lookup_profile_company))
        .layer(middleware::from_fn(require_api_key))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_api_key(request: Request, next: Next) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get("Api-Key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == API_KEY);
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without a valid key");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

fn id_matches(value: &Value, id: &str) -> bool {
    match value {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}

fn str_field<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get(name).and_then(Value::as_str)
}

/// First member of `query[name]` parsed as a number. Range filters arrive as
/// single-element string arrays.
fn filter_number(query: &Value, name: &str) -> Option<u64> {
    query
        .get(name)
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|v| match v {
            Value::String(s) => s.parse().ok(),
            other => other.as_u64(),
        })
}

/// `min..=max` check against a numeric company field. Companies without the
/// field only pass when neither bound is set.
fn in_range(company: &Value, field: &str, min: Option<u64>, max: Option<u64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    company
        .get(field)
        .and_then(Value::as_u64)
        .is_some_and(|n| min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m))
}

/// The quoted place name of a `"<place>"::~<radius><unit>` expression. Plain
/// strings are taken as the place itself. The mock ignores the radius.
fn location_place(expression: &str) -> &str {
    let place = expression.split("::~").next().unwrap_or(expression);
    place.trim_matches('"')
}

/// String members of `query[name]`, or `None` when the filter is absent.
fn filter_values(query: &Value, name: &str) -> Option<Vec<String>> {
    query.get(name).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}

fn page(items: Vec<Value>, page_size: usize, key: &str) -> Value {
    let total = items.len();
    let shown: Vec<Value> = items.into_iter().take(page_size).collect();
    let next = shown.len() + 1;
    json!({
        key: shown,
        "pagination": {"start": 1, "next": next, "total": total},
    })
}

async fn get_account() -> Json<Value> {
    Json(json!({
        "id": 1,
        "email": "owner@example.com",
        "state": "registered",
        "plan": {"name": "Ultimate", "lookup_credit_balance": 1000},
    }))
}

async fn create_api_key() -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({"api_key": Uuid::new_v4().simple().to_string()})),
    )
}

async fn lookup_person(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let directory = &*db;
    let found = if let Some(id) = params.get("id") {
        directory
            .people
            .iter()
            .find(|p| p.get("id").is_some_and(|v| id_matches(v, id)))
    } else if let Some(name) = params.get("name") {
        let employer = params.get("current_employer");
        directory.people.iter().find(|p| {
            str_field(p, "name") == Some(name.as_str())
                && employer.map_or(true, |e| str_field(p, "current_employer_domain") == Some(e.as_str()))
        })
    } else {
        return Err(StatusCode::BAD_REQUEST);
    };
    found.cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn check_person_status(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    let directory = &*db;
    let statuses = params
        .iter()
        .filter(|(k, _)| k == "ids")
        .map(|(_, id)| {
            let known = directory
                .people
                .iter()
                .any(|p| p.get("id").is_some_and(|v| id_matches(v, id)));
            let status = if known { "complete" } else { "failed" };
            json!({"id": id, "status": status})
        })
        .collect();
    Json(statuses)
}

async fn search_people(State(db): State<Db>, Json(body): Json<Value>) -> Json<Value> {
    let directory = &*db;
    let query = body.get("query").cloned().unwrap_or(Value::Null);
    let employers = filter_values(&query, "current_employer");
    let departments = filter_values(&query, "department");
    let levels = filter_values(&query, "management_levels");
    let page_size = body
        .get("page_size")
        .and_then(Value::as_u64)
        .map_or(DEFAULT_PAGE_SIZE, |n| n as usize);

    let matches: Vec<Value> = directory
        .people
        .iter()
        .filter(|p| {
            employers.as_ref().map_or(true, |list| {
                str_field(p, "current_employer_domain").is_some_and(|d| list.iter().any(|e| e == d))
            })
        })
        .filter(|p| {
            departments.as_ref().map_or(true, |list| {
                str_field(p, "department").is_some_and(|d| list.iter().any(|e| e == d))
            })
        })
        .filter(|p| {
            // Profiles only carry a level when the seed data sets one.
            match (levels.as_ref(), str_field(p, "management_level")) {
                (Some(list), Some(level)) => list.iter().any(|l| l == level),
                _ => true,
            }
        })
        .cloned()
        .collect();

    Json(page(matches, page_size, "profiles"))
}

async fn lookup_company(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let domain = params.get("domain").ok_or(StatusCode::BAD_REQUEST)?;
    let directory = &*db;
    directory
        .companies
        .get(domain)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn search_companies(State(db): State<Db>, Json(body): Json<Value>) -> Json<Value> {
    let directory = &*db;
    let query = body.get("query").cloned().unwrap_or(Value::Null);
    let techstack = filter_values(&query, "techstack");
    let locations = filter_values(&query, "location");
    let size = (
        filter_number(&query, "company_size_min"),
        filter_number(&query, "company_size_max"),
    );
    let revenue = (
        filter_number(&query, "company_revenue_min"),
        filter_number(&query, "company_revenue_max"),
    );

    let mut matches: Vec<Value> = directory
        .companies
        .values()
        .filter(|c| {
            techstack.as_ref().map_or(true, |wanted| {
                c.get("techstack")
                    .and_then(Value::as_array)
                    .is_some_and(|have| have.iter().any(|t| t.as_str().is_some_and(|t| wanted.iter().any(|w| w == t))))
            })
        })
        .filter(|c| in_range(c, "num_employees", size.0, size.1))
        .filter(|c| in_range(c, "revenue", revenue.0, revenue.1))
        .filter(|c| {
            locations.as_ref().map_or(true, |list| {
                str_field(c, "location")
                    .is_some_and(|have| list.iter().any(|l| location_place(l) == have))
            })
        })
        .cloned()
        .collect();
    matches.sort_by_key(|c| c.get("id").and_then(Value::as_u64));

    Json(page(matches, DEFAULT_PAGE_SIZE, "companies"))
}

async fn bulk_lookup(Json(body): Json<Value>) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let queries = body
        .get("queries")
        .and_then(Value::as_array)
        .ok_or(StatusCode::BAD_REQUEST)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "queued",
            "request_id": Uuid::new_v4(),
            "count": queries.len(),
            "profile_list": body.get("profile_list").cloned().unwrap_or(Value::Null),
            "webhook_id": body.get("webhook_id").cloned().unwrap_or(Value::Null),
        })),
    ))
}

async fn npi_search(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let npi = params.get("npi").ok_or(StatusCode::BAD_REQUEST)?;
    let directory = &*db;
    directory.npi.get(npi).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn lookup_profile_company(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let directory = &*db;
    let found = if let Some(url) = params.get("linkedin_url") {
        directory
            .people
            .iter()
            .find(|p| str_field(p, "linkedin_url") == Some(url.as_str()))
    } else if let Some(id) = params.get("id") {
        directory
            .people
            .iter()
            .find(|p| p.get("id").is_some_and(|v| id_matches(v, id)))
    } else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let profile = found.ok_or(StatusCode::NOT_FOUND)?;

    let company = str_field(profile, "current_employer_domain")
        .and_then(|d| directory.companies.get(d))
        .cloned()
        .unwrap_or(Value::Null);
    Ok(Json(json!({"profile": profile, "company": company})))
}
