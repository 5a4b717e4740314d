//! Organization-structure helpers.
//!
//! Employee records are the API's own JSON objects; only `current_title`,
//! `department` and `current_employer_domain` are read here. Management
//! level is a keyword heuristic over the job title.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::RocketReachClient;
use crate::error::ApiError;
use crate::http::ApiResponse;
use crate::params::params;
use crate::transport::Transport;

/// Page size requested for employee searches.
pub const EMPLOYEE_PAGE_SIZE: u32 = 100;

/// Bucket for employees whose record has no department.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

const C_LEVEL_KEYWORDS: [&str; 5] = ["CEO", "CTO", "CFO", "COO", "Chief"];

/// Seniority tier inferred from a job title, most senior first.
///
/// The derived ordering follows declaration order, so a "lower" level
/// compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManagementLevel {
    #[serde(rename = "C-Level")]
    CLevel,
    #[serde(rename = "VP")]
    Vp,
    Director,
    Manager,
    #[serde(rename = "Individual Contributor")]
    IndividualContributor,
}

impl ManagementLevel {
    pub const ALL: [ManagementLevel; 5] = [
        ManagementLevel::CLevel,
        ManagementLevel::Vp,
        ManagementLevel::Director,
        ManagementLevel::Manager,
        ManagementLevel::IndividualContributor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ManagementLevel::CLevel => "C-Level",
            ManagementLevel::Vp => "VP",
            ManagementLevel::Director => "Director",
            ManagementLevel::Manager => "Manager",
            ManagementLevel::IndividualContributor => "Individual Contributor",
        }
    }

    /// Position in `ALL`; 0 is most senior.
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Classify a title. First matching rule wins, checked from most senior down.
    pub fn from_title(title: &str) -> Self {
        if C_LEVEL_KEYWORDS.iter().any(|k| title.contains(k)) {
            ManagementLevel::CLevel
        } else if title.contains("VP") {
            ManagementLevel::Vp
        } else if title.contains("Director") {
            ManagementLevel::Director
        } else if title.contains("Manager") {
            ManagementLevel::Manager
        } else {
            ManagementLevel::IndividualContributor
        }
    }

    /// Level of an employee record; a missing title counts as individual contributor.
    pub fn of(employee: &Value) -> Self {
        Self::from_title(employee.get("current_title").and_then(Value::as_str).unwrap_or(""))
    }
}

impl fmt::Display for ManagementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employees grouped by level, then by department.
pub type Hierarchy = BTreeMap<ManagementLevel, BTreeMap<String, Vec<Value>>>;

/// Result of `get_org_chart`: the company record plus its employee hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgChart {
    pub company: Value,
    pub hierarchy: Hierarchy,
}

fn department(employee: &Value) -> Option<&str> {
    employee.get("department").and_then(Value::as_str)
}

/// Employee records from a people-search response.
///
/// Reads the `profiles` array, or the body itself when it is an array.
pub fn employees(response: &ApiResponse) -> Vec<Value> {
    match &response.body {
        Value::Array(items) => items.clone(),
        body => match body.get("profiles") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
    }
}

/// Group employees by inferred level, then by department.
pub fn group_by_level(employees: Vec<Value>) -> Hierarchy {
    let mut hierarchy = Hierarchy::new();
    for employee in employees {
        let level = ManagementLevel::of(&employee);
        let dept = department(&employee).unwrap_or(UNKNOWN_DEPARTMENT).to_string();
        hierarchy
            .entry(level)
            .or_default()
            .entry(dept)
            .or_default()
            .push(employee);
    }
    hierarchy
}

/// Employees in the manager's department whose level is strictly below the manager's.
pub fn reports_of(manager: &Value, employees: Vec<Value>) -> Vec<Value> {
    let level = ManagementLevel::of(manager);
    let dept = department(manager);
    employees
        .into_iter()
        .filter(|e| department(e) == dept && ManagementLevel::of(e).rank() > level.rank())
        .collect()
}

impl<T: Transport> RocketReachClient<T> {
    /// Everyone at `domain`, across all management levels.
    ///
    /// # Errors
    /// Propagates `search_people` failures.
    pub fn search_company_employees(&self, domain: &str) -> Result<ApiResponse, ApiError> {
        let levels: Vec<&str> = ManagementLevel::ALL.iter().map(|l| l.as_str()).collect();
        self.search_people(&params(json!({
            "query": {
                "current_employer": [domain],
                "management_levels": levels,
            },
            "page_size": EMPLOYEE_PAGE_SIZE,
        })))
    }

    /// # Errors
    /// Propagates `search_people` failures.
    pub fn get_department_structure(
        &self,
        domain: &str,
        department: &str,
    ) -> Result<ApiResponse, ApiError> {
        self.search_people(&params(json!({
            "query": {
                "current_employer": [domain],
                "department": [department],
            },
            "page_size": EMPLOYEE_PAGE_SIZE,
        })))
    }

    /// C-level and VP employees at `domain`.
    ///
    /// # Errors
    /// Propagates `search_people` failures.
    pub fn get_leadership_team(&self, domain: &str) -> Result<ApiResponse, ApiError> {
        self.search_people(&params(json!({
            "query": {
                "current_employer": [domain],
                "management_levels": [
                    ManagementLevel::CLevel.as_str(),
                    ManagementLevel::Vp.as_str(),
                ],
            }
        })))
    }

    /// Look up the company, fetch its employees and group them.
    ///
    /// # Errors
    /// The first failing call is returned unchanged; nothing is aggregated.
    pub fn get_org_chart(&self, domain: &str) -> Result<OrgChart, ApiError> {
        let company = self.lookup_company(&params(json!({ "domain": domain })))?;
        let staff = employees(&self.search_company_employees(domain)?);
        debug!(domain, employees = staff.len(), "building org chart");
        Ok(OrgChart {
            company: company.body,
            hierarchy: group_by_level(staff),
        })
    }

    /// Employees below `manager_id` in the same department at the same employer.
    ///
    /// # Errors
    /// Lookup and search failures pass through; a manager record without a
    /// `current_employer_domain` is `NotAvailable`.
    pub fn get_direct_reports(&self, manager_id: u64) -> Result<Vec<Value>, ApiError> {
        let manager = self.lookup_person(&params(json!({ "id": manager_id })))?.body;
        let domain = manager
            .get("current_employer_domain")
            .and_then(Value::as_str)
            .ok_or(ApiError::NotAvailable("No employer information available"))?;
        let staff = employees(&self.search_company_employees(domain)?);
        let reports = reports_of(&manager, staff);
        debug!(manager_id, reports = reports.len(), "resolved direct reports");
        Ok(reports)
    }
}
