//! Shareable link encoding.
//!
//! The filters behind the last successful calculation are mirrored into a
//! URL query string so the form can be rebuilt from a link. Empty fields
//! and "Any" thresholds are left out; decoding restores them as defaults.

use crate::filters::{threshold_from_label, FilterCriteria, DEFAULT_MIN_SALARY};
use thiserror::Error;
use url::form_urlencoded;
use url::Url;

#[derive(Debug, Error)]
pub enum ShareLinkError {
    #[error("invalid share link '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Encode `criteria` as a query string (without the leading `?`).
pub fn encode(criteria: &FilterCriteria) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    let min_salary = criteria.min_salary.to_string();
    let pairs: [(&str, Option<&str>); 6] = [
        ("occupation", Some(criteria.occupation.as_str())),
        ("state", Some(criteria.state.as_str())),
        ("location", Some(criteria.area.as_str())),
        ("minSalary", Some(min_salary.as_str())),
        ("education", criteria.education.as_deref()),
        ("experience", criteria.experience.as_deref()),
    ];
    for (key, value) in pairs {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            query.append_pair(key, value);
        }
    }
    query.finish()
}

/// Decode filters from a query string, a `?`-prefixed query, or a full URL.
///
/// Unknown keys are ignored. A missing or non-numeric `minSalary` falls
/// back to the default.
pub fn decode(input: &str) -> Result<FilterCriteria, ShareLinkError> {
    let input = input.trim();
    let query = if input.contains("://") {
        let url = Url::parse(input).map_err(|source| ShareLinkError::InvalidUrl {
            input: input.to_string(),
            source,
        })?;
        url.query().unwrap_or_default().to_string()
    } else {
        input.trim_start_matches('?').to_string()
    };

    let mut criteria = FilterCriteria::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim().to_string();
        match key.as_ref() {
            "occupation" => criteria.occupation = value,
            "state" => criteria.state = value,
            "location" | "area" => criteria.area = value,
            "minSalary" => {
                criteria.min_salary = value.parse().unwrap_or(DEFAULT_MIN_SALARY);
            }
            "education" => criteria.education = threshold_from_label(&value),
            "experience" => criteria.experience = threshold_from_label(&value),
            _ => {}
        }
    }
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> FilterCriteria {
        FilterCriteria {
            occupation: "Software Developers".to_string(),
            state: "California".to_string(),
            area: "San Francisco-Oakland-Hayward, CA".to_string(),
            min_salary: 120_000,
            education: Some("Bachelor's degree".to_string()),
            experience: Some("Less than 5 years".to_string()),
        }
    }

    #[test]
    fn round_trip_preserves_filters() {
        let criteria = full();
        assert_eq!(decode(&encode(&criteria)).unwrap(), criteria);
    }

    #[test]
    fn any_thresholds_are_omitted_and_restored_as_any() {
        let mut criteria = full();
        criteria.education = None;
        criteria.experience = None;
        let encoded = encode(&criteria);
        assert!(!encoded.contains("education"));
        assert!(!encoded.contains("experience"));

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.education_label(), "Any");
        assert_eq!(decoded, criteria);
    }

    #[test]
    fn empty_fields_are_not_encoded() {
        let criteria = FilterCriteria {
            occupation: "Chefs".to_string(),
            ..Default::default()
        };
        assert_eq!(encode(&criteria), "occupation=Chefs&minSalary=80000");
    }

    #[test]
    fn decodes_full_urls_and_prefixed_queries() {
        let decoded =
            decode("https://example.test/?location=Texas&occupation=Chefs&minSalary=55000")
                .unwrap();
        assert_eq!(decoded.area, "Texas");
        assert_eq!(decoded.min_salary, 55_000);
        assert!(decoded.state.is_empty());

        let decoded = decode("?occupation=Chefs&education=Any").unwrap();
        assert_eq!(decoded.occupation, "Chefs");
        assert_eq!(decoded.education, None);
    }

    #[test]
    fn bad_salary_falls_back_to_default() {
        let decoded = decode("minSalary=lots").unwrap();
        assert_eq!(decoded.min_salary, DEFAULT_MIN_SALARY);
    }

    #[test]
    fn malformed_url_is_an_error() {
        assert!(matches!(
            decode("http://[::1"),
            Err(ShareLinkError::InvalidUrl { .. })
        ));
    }
}
