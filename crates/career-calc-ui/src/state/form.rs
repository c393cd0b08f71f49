//! Form controller
//!
//! All filter fields live in one [`FilterCriteria`] value that only changes
//! through [`FilterForm::apply`]. Selecting a state clears the area (it
//! belonged to the previous state) and reports the change so the selection
//! chain can reload areas.

use career_calc_types::states::derive_state;
use career_calc_types::{snap_min_salary, threshold_from_label, FilterCriteria};
use thiserror::Error;

/// One user edit to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Occupation(String),
    State(String),
    Area(String),
    MinSalary(u32),
    /// Selector label; "Any" clears the threshold.
    Education(String),
    /// Selector label; "Any" clears the threshold.
    Experience(String),
}

/// What the rest of the app must do after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    None,
    /// The governing state selection changed; areas must be reloaded (or
    /// cleared, when the new state is empty).
    StateChanged(String),
}

/// Submission refused because required fields are empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field(s): {}", .missing.join(", "))]
pub struct IncompleteForm {
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    criteria: FilterCriteria,
    /// The location-to-state heuristic has had its one chance to run.
    hydrated: bool,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from externally supplied values (e.g. a share link).
    pub fn with_initial(initial: FilterCriteria) -> Self {
        Self {
            criteria: initial,
            hydrated: false,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Apply one edit. Returns [`FormEffect::StateChanged`] only when the
    /// state value actually changed.
    pub fn apply(&mut self, event: FormEvent) -> FormEffect {
        match event {
            FormEvent::Occupation(value) => self.criteria.occupation = value,
            FormEvent::State(value) => {
                self.hydrated = true;
                if value == self.criteria.state {
                    return FormEffect::None;
                }
                self.criteria.state = value.clone();
                self.criteria.area.clear();
                return FormEffect::StateChanged(value);
            }
            FormEvent::Area(value) => self.criteria.area = value,
            FormEvent::MinSalary(value) => self.criteria.min_salary = snap_min_salary(value),
            FormEvent::Education(label) => self.criteria.education = threshold_from_label(&label),
            FormEvent::Experience(label) => {
                self.criteria.experience = threshold_from_label(&label)
            }
        }
        FormEffect::None
    }

    /// Derive the state from the supplied area string, once.
    ///
    /// Runs at most one time and only while no state is selected. Unlike a
    /// user's state change this keeps the area, since the area is what the
    /// state was derived from.
    pub fn hydrate_state(&mut self) -> FormEffect {
        if self.hydrated {
            return FormEffect::None;
        }
        self.hydrated = true;

        if !self.criteria.state.is_empty() {
            // State came with the link; the areas still need loading.
            return FormEffect::StateChanged(self.criteria.state.clone());
        }

        match derive_state(&self.criteria.area) {
            Some(state) => {
                tracing::debug!(area = %self.criteria.area, %state, "derived state from location");
                self.criteria.state = state.clone();
                FormEffect::StateChanged(state)
            }
            None => FormEffect::None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.criteria.is_complete()
    }

    /// The payload for a calculation, or why there is none.
    pub fn submit(&self) -> Result<FilterCriteria, IncompleteForm> {
        if self.is_valid() {
            Ok(self.criteria.clone())
        } else {
            Err(IncompleteForm {
                missing: self.criteria.missing_fields(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FilterForm {
        let mut form = FilterForm::new();
        form.apply(FormEvent::Occupation("Registered Nurses".into()));
        form.apply(FormEvent::State("Texas".into()));
        form.apply(FormEvent::Area("Dallas-Fort Worth, TX".into()));
        form.apply(FormEvent::MinSalary(70_000));
        form
    }

    #[test]
    fn complete_form_submits_without_any_thresholds() {
        let form = filled();
        let payload = form.submit().expect("valid form");
        assert_eq!(payload.min_salary, 70_000);
        assert_eq!(payload.education, None);
        assert_eq!(payload.experience, None);

        let json = serde_json::to_value(&payload).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 4);
        assert!(json["minSalary"].is_number());
    }

    #[test]
    fn incomplete_form_refuses_submission() {
        let mut form = filled();
        form.apply(FormEvent::Occupation(String::new()));
        assert!(!form.is_valid());
        let err = form.submit().unwrap_err();
        assert_eq!(err.missing, vec!["occupation"]);
        assert_eq!(err.to_string(), "missing required field(s): occupation");
    }

    #[test]
    fn salary_and_thresholds_never_affect_validity() {
        let mut form = filled();
        form.apply(FormEvent::MinSalary(0));
        form.apply(FormEvent::Education("Master's degree".into()));
        form.apply(FormEvent::Experience("Any".into()));
        assert!(form.is_valid());
        assert_eq!(form.criteria().education_label(), "Master's degree");
        assert_eq!(form.criteria().experience, None);
    }

    #[test]
    fn changing_state_clears_area_and_reports_change() {
        let mut form = filled();
        let effect = form.apply(FormEvent::State("Utah".into()));
        assert_eq!(effect, FormEffect::StateChanged("Utah".into()));
        assert!(form.criteria().area.is_empty());
        assert!(!form.is_valid());
    }

    #[test]
    fn clearing_state_is_a_change_too() {
        let mut form = filled();
        let effect = form.apply(FormEvent::State(String::new()));
        assert_eq!(effect, FormEffect::StateChanged(String::new()));
        assert!(form.criteria().area.is_empty());
    }

    #[test]
    fn reselecting_same_state_keeps_area() {
        let mut form = filled();
        assert_eq!(form.apply(FormEvent::State("Texas".into())), FormEffect::None);
        assert_eq!(form.criteria().area, "Dallas-Fort Worth, TX");
    }

    #[test]
    fn hydration_derives_state_from_suffix_once() {
        let mut form = FilterForm::with_initial(FilterCriteria {
            area: "Austin-Round Rock, TX".into(),
            occupation: "Chefs".into(),
            ..Default::default()
        });
        assert_eq!(form.hydrate_state(), FormEffect::StateChanged("Texas".into()));
        assert_eq!(form.criteria().state, "Texas");
        assert_eq!(form.criteria().area, "Austin-Round Rock, TX");
        assert!(form.is_valid());

        assert_eq!(form.hydrate_state(), FormEffect::None);
    }

    #[test]
    fn hydration_takes_comma_free_location_literally() {
        let mut form = FilterForm::with_initial(FilterCriteria {
            area: "Ohio".into(),
            ..Default::default()
        });
        form.hydrate_state();
        assert_eq!(form.criteria().state, "Ohio");
    }

    #[test]
    fn hydration_skipped_after_user_picked_state() {
        let mut form = FilterForm::with_initial(FilterCriteria {
            area: "Austin-Round Rock, TX".into(),
            ..Default::default()
        });
        form.apply(FormEvent::State("Utah".into()));
        assert_eq!(form.hydrate_state(), FormEffect::None);
        assert_eq!(form.criteria().state, "Utah");
    }

    #[test]
    fn hydration_with_linked_state_requests_areas() {
        let mut form = FilterForm::with_initial(FilterCriteria {
            state: "Texas".into(),
            area: "Texas".into(),
            ..Default::default()
        });
        assert_eq!(form.hydrate_state(), FormEffect::StateChanged("Texas".into()));
        assert_eq!(form.criteria().area, "Texas");
    }
}
