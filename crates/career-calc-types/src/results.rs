//! Responses returned by the calculation service.

use serde::{Deserialize, Serialize};

// ============================================================================
// CALCULATION
// ============================================================================

/// Result of `/api/calculate`.
///
/// Both the national and the regional figures are computed server-side from
/// the same matching-jobs count; only the denominator differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub percentage: f64,
    pub matching_jobs: u64,
    pub total_jobs: u64,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_region: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_jobs_region: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_salary_met: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_info: Option<SalaryInfo>,
}

/// Annual salary distribution for the matching jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInfo {
    #[serde(default)]
    pub median_salary: Option<u64>,
    #[serde(default)]
    pub pct10_salary: Option<u64>,
    #[serde(default)]
    pub pct25_salary: Option<u64>,
    #[serde(default)]
    pub pct75_salary: Option<u64>,
    #[serde(default)]
    pub pct90_salary: Option<u64>,
}

impl SalaryInfo {
    /// Labelled percentiles in display order.
    pub fn rows(&self) -> [(&'static str, Option<u64>); 5] {
        [
            ("Median", self.median_salary),
            ("10th Percentile", self.pct10_salary),
            ("25th Percentile", self.pct25_salary),
            ("75th Percentile", self.pct75_salary),
            ("90th Percentile", self.pct90_salary),
        ]
    }
}

/// Which denominator the result view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayScope {
    #[default]
    National,
    Regional,
}

impl DisplayScope {
    pub fn all() -> &'static [DisplayScope] {
        &[DisplayScope::National, DisplayScope::Regional]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DisplayScope::National => "Nationwide",
            DisplayScope::Regional => "Regional",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayScope::National => DisplayScope::Regional,
            DisplayScope::Regional => DisplayScope::National,
        }
    }
}

/// Numbers shown for one scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopedFigures {
    pub percentage: f64,
    pub matching_jobs: u64,
    pub total_jobs: u64,
}

impl CalculationResult {
    /// Whether the regional fields came back, so the toggle is meaningful.
    pub fn has_regional(&self) -> bool {
        self.percentage_region.is_some() && self.total_jobs_region.is_some()
    }

    /// Figures for `scope`. Falls back to national when the regional
    /// fields are missing.
    pub fn figures(&self, scope: DisplayScope) -> ScopedFigures {
        match (scope, self.percentage_region, self.total_jobs_region) {
            (DisplayScope::Regional, Some(percentage), Some(total_jobs)) => ScopedFigures {
                percentage,
                matching_jobs: self.matching_jobs,
                total_jobs,
            },
            _ => ScopedFigures {
                percentage: self.percentage,
                matching_jobs: self.matching_jobs,
                total_jobs: self.total_jobs,
            },
        }
    }
}

// ============================================================================
// OPTION LISTS
// ============================================================================

/// `/api/occupations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupationsResponse {
    #[serde(default)]
    pub occupations: Vec<String>,
}

/// `/api/states`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatesResponse {
    #[serde(default)]
    pub states: Vec<String>,
}

/// `/api/areas-by-state`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreasResponse {
    #[serde(default)]
    pub areas: Vec<String>,
}

/// `/api/health` - the payload shape is up to the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}
