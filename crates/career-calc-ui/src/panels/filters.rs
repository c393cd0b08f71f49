//! Filter Panel
//!
//! Occupation, state and area selectors, the salary slider, the
//! education/experience thresholds and the submit button. The panel owns
//! only the dropdowns' transient state; field values come in through
//! [`FilterPanelData`] and edits go out as [`FormEvent`]s.

use crate::state::{FormEvent, ListStatus};
use crate::widgets::{searchable_dropdown, DropdownState};
use career_calc_types::format::format_salary;
use career_calc_types::{
    FilterCriteria, ANY, EDUCATION_LEVELS, EXPERIENCE_LEVELS, MIN_SALARY_CEILING,
    MIN_SALARY_FLOOR, MIN_SALARY_STEP,
};
use egui::{Button, ComboBox, RichText, Slider, Ui};

/// Data needed to render the panel (extracted before render)
pub struct FilterPanelData<'a> {
    pub criteria: &'a FilterCriteria,
    pub occupations: &'a [String],
    pub states: &'a [String],
    pub areas: &'a [String],
    pub areas_status: ListStatus,
    /// Every required field is filled
    pub can_submit: bool,
    /// A calculation is in flight
    pub calculating: bool,
}

/// Actions triggered from the panel
#[derive(Debug, Default)]
pub struct FilterPanelAction {
    pub events: Vec<FormEvent>,
    pub submit: bool,
}

#[derive(Default)]
pub struct FilterPanel {
    occupation: DropdownState,
    state: DropdownState,
    area: DropdownState,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut Ui, data: &FilterPanelData<'_>) -> FilterPanelAction {
        let mut action = FilterPanelAction::default();
        let criteria = data.criteria;

        field_label(ui, "Occupation / Field");
        if let Some(value) = searchable_dropdown(
            ui,
            "occupation",
            &mut self.occupation,
            data.occupations,
            &criteria.occupation,
            "e.g., Software Developer",
            false,
        ) {
            action.events.push(FormEvent::Occupation(value));
        }
        ui.add_space(8.0);

        field_label(ui, "State");
        if let Some(value) = searchable_dropdown(
            ui,
            "state",
            &mut self.state,
            data.states,
            &criteria.state,
            "Select a state",
            false,
        ) {
            action.events.push(FormEvent::State(value));
        }
        ui.add_space(8.0);

        field_label(ui, "Area");
        let (area_placeholder, area_disabled) = area_placeholder(criteria, data.areas_status);
        if let Some(value) = searchable_dropdown(
            ui,
            "area",
            &mut self.area,
            data.areas,
            &criteria.area,
            area_placeholder,
            area_disabled,
        ) {
            action.events.push(FormEvent::Area(value));
        }
        ui.add_space(8.0);

        field_label(
            ui,
            &format!(
                "Minimum Annual Salary: {}",
                format_salary(u64::from(criteria.min_salary))
            ),
        );
        let mut salary = criteria.min_salary;
        let slider = ui.add(
            Slider::new(&mut salary, MIN_SALARY_FLOOR..=MIN_SALARY_CEILING)
                .step_by(f64::from(MIN_SALARY_STEP))
                .show_value(false),
        );
        if slider.changed() && salary != criteria.min_salary {
            action.events.push(FormEvent::MinSalary(salary));
        }
        ui.add_space(8.0);

        field_label(ui, "Minimum Education Level");
        if let Some(label) =
            threshold_combo(ui, "education", criteria.education_label(), EDUCATION_LEVELS)
        {
            action.events.push(FormEvent::Education(label));
        }
        ui.add_space(8.0);

        field_label(ui, "Required Work Experience");
        if let Some(label) =
            threshold_combo(ui, "experience", criteria.experience_label(), EXPERIENCE_LEVELS)
        {
            action.events.push(FormEvent::Experience(label));
        }
        ui.add_space(16.0);

        let label = if data.calculating {
            "Calculating..."
        } else {
            "Let's Find Out"
        };
        let button = ui.add_enabled(
            data.can_submit && !data.calculating,
            Button::new(RichText::new(label).strong()).min_size(egui::vec2(ui.available_width(), 32.0)),
        );
        if button.clicked() {
            action.submit = true;
        }

        action
    }
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).small().strong());
}

/// Placeholder for the area selector and whether it is disabled. Areas are
/// selectable only once a state is chosen and its list has arrived.
fn area_placeholder(criteria: &FilterCriteria, status: ListStatus) -> (&'static str, bool) {
    if criteria.state.is_empty() {
        return ("Select a state first", true);
    }
    match status {
        ListStatus::Loading => ("Loading areas...", true),
        ListStatus::Failed => ("No areas available", false),
        ListStatus::Idle | ListStatus::Loaded => ("Select an area", false),
    }
}

/// "Any" followed by `levels`. Returns the picked label when it changed.
fn threshold_combo(ui: &mut Ui, id_salt: &str, current: &str, levels: &[&str]) -> Option<String> {
    let mut picked = None;
    ComboBox::from_id_salt(id_salt)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for label in std::iter::once(ANY).chain(levels.iter().copied()) {
                if ui.selectable_label(label == current, label).clicked() && label != current {
                    picked = Some(label.to_string());
                }
            }
        });
    picked
}
