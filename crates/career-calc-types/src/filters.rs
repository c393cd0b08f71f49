//! Filter criteria submitted to the calculation service.

use serde::{Deserialize, Serialize};

/// Display value for an education/experience threshold that is not applied.
pub const ANY: &str = "Any";

/// Minimum salary used when none is supplied (or the supplied one is unusable).
pub const DEFAULT_MIN_SALARY: u32 = 80_000;

/// Salary slider bounds.
pub const MIN_SALARY_FLOOR: u32 = 30_000;
pub const MIN_SALARY_CEILING: u32 = 250_000;
pub const MIN_SALARY_STEP: u32 = 5_000;

/// Minimum education ladder understood by the calculation service.
pub const EDUCATION_LEVELS: &[&str] = &[
    "No formal education",
    "High school diploma",
    "Postsecondary nondegree award",
    "Associate degree",
    "Bachelor's degree",
    "Master's degree",
    "Doctoral or professional degree",
];

/// Work experience ladder understood by the calculation service.
pub const EXPERIENCE_LEVELS: &[&str] = &["None", "Less than 5 years", "5 years or more"];

/// The complete set of filters behind one calculation.
///
/// `education` and `experience` are `None` when the user chose "Any"; they
/// are then left out of every outbound payload rather than sent as a
/// wildcard value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub area: String,
    #[serde(default = "default_min_salary")]
    pub min_salary: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

fn default_min_salary() -> u32 {
    DEFAULT_MIN_SALARY
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            occupation: String::new(),
            state: String::new(),
            area: String::new(),
            min_salary: DEFAULT_MIN_SALARY,
            education: None,
            experience: None,
        }
    }
}

impl FilterCriteria {
    /// Occupation, state and area are all required before a calculation
    /// may be requested. Salary and thresholds always have usable defaults.
    pub fn is_complete(&self) -> bool {
        !self.occupation.trim().is_empty()
            && !self.state.trim().is_empty()
            && !self.area.trim().is_empty()
    }

    /// Names of the required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.occupation.trim().is_empty() {
            missing.push("occupation");
        }
        if self.state.trim().is_empty() {
            missing.push("state");
        }
        if self.area.trim().is_empty() {
            missing.push("area");
        }
        missing
    }

    /// Label for the education selector ("Any" when unset).
    pub fn education_label(&self) -> &str {
        self.education.as_deref().unwrap_or(ANY)
    }

    /// Label for the experience selector ("Any" when unset).
    pub fn experience_label(&self) -> &str {
        self.experience.as_deref().unwrap_or(ANY)
    }

    /// Query parameters for `/api/calculate`.
    ///
    /// The service knows the area as `location`. Unset thresholds are
    /// `None` and get dropped by the query builder.
    pub fn calculate_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("location", Some(self.area.clone())),
            ("occupation", Some(self.occupation.clone())),
            ("minSalary", Some(self.min_salary.to_string())),
            ("education", self.education.clone()),
            ("experience", self.experience.clone()),
        ]
    }
}

/// Map a selector label to a threshold value: "Any" and blanks mean no filter.
pub fn threshold_from_label(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case(ANY) {
        None
    } else {
        Some(label.to_string())
    }
}

/// Clamp an arbitrary salary onto the slider's range and step.
pub fn snap_min_salary(value: u32) -> u32 {
    let clamped = value.clamp(MIN_SALARY_FLOOR, MIN_SALARY_CEILING);
    let steps = (clamped - MIN_SALARY_FLOOR + MIN_SALARY_STEP / 2) / MIN_SALARY_STEP;
    (MIN_SALARY_FLOOR + steps * MIN_SALARY_STEP).min(MIN_SALARY_CEILING)
}
