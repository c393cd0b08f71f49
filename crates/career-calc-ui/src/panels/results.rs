//! Results Panel
//!
//! Renders whichever [`ResultView`] the presenter picked. The result view
//! also carries the national/regional toggle, the salary breakdown and the
//! share link.

use crate::state::ResultView;
use career_calc_types::format::{format_percentage, format_salary, group_thousands};
use career_calc_types::{CalculationResult, DisplayScope, SalaryInfo};
use egui::{Color32, RichText, Ui};

/// Data needed to render the panel (extracted before render)
pub struct ResultsPanelData<'a> {
    pub view: ResultView<'a>,
    pub scope: DisplayScope,
    /// Query string for the current result, if there is one
    pub share_link: Option<&'a str>,
}

/// Actions triggered from the panel
#[derive(Debug, Default)]
pub struct ResultsPanelAction {
    pub toggle_scope: bool,
    pub copy_link: bool,
}

pub fn results_panel(ui: &mut Ui, data: &ResultsPanelData<'_>) -> ResultsPanelAction {
    let mut action = ResultsPanelAction::default();

    ui.vertical_centered(|ui| match data.view {
        ResultView::Loading => {
            ui.add_space(24.0);
            ui.spinner();
            ui.label(RichText::new("Calculating...").color(Color32::GRAY));
        }
        ResultView::Error(message) => {
            ui.add_space(24.0);
            ui.label(
                RichText::new("An Error Occurred")
                    .strong()
                    .color(Color32::LIGHT_RED),
            );
            ui.label(RichText::new(message).color(Color32::LIGHT_RED));
        }
        ResultView::Result(result) => {
            result_view(ui, result, data, &mut action);
        }
        ResultView::Placeholder => {
            ui.add_space(24.0);
            ui.label(RichText::new("Start by specifying your preferences.").color(Color32::GRAY));
        }
    });

    action
}

fn result_view(
    ui: &mut Ui,
    result: &CalculationResult,
    data: &ResultsPanelData<'_>,
    action: &mut ResultsPanelAction,
) {
    let figures = result.figures(data.scope);

    // Scope toggle
    ui.horizontal(|ui| {
        let regional = result.has_regional();
        for scope in DisplayScope::all() {
            let enabled = *scope == DisplayScope::National || regional;
            let selected = *scope == data.scope;
            let clicked = ui
                .add_enabled(
                    enabled,
                    egui::SelectableLabel::new(selected, scope.display_name()),
                )
                .clicked();
            if clicked && !selected {
                action.toggle_scope = true;
            }
        }
    });
    ui.add_space(8.0);

    ui.label(
        RichText::new(format!("Based on your criteria for jobs in {}:", result.location))
            .color(Color32::GRAY),
    );
    ui.label(
        RichText::new(format!("{}%", format_percentage(figures.percentage)))
            .size(48.0)
            .strong()
            .color(Color32::from_rgb(129, 140, 248)),
    );
    ui.label(format!(
        "An estimated {} out of {} jobs meet your standards.",
        group_thousands(figures.matching_jobs),
        group_thousands(figures.total_jobs),
    ));

    if let Some(info) = &result.salary_info {
        ui.add_space(12.0);
        salary_block(ui, info, result.min_salary_met);
    }

    if let Some(link) = data.share_link {
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("?{link}")).small().monospace());
            if ui.small_button("Copy link").clicked() {
                action.copy_link = true;
            }
        });
    }
}

fn salary_block(ui: &mut Ui, info: &SalaryInfo, min_salary_met: Option<bool>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.label(RichText::new("Salary Information").strong());
        egui::Grid::new("salary_info")
            .num_columns(2)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                for (label, value) in info.rows() {
                    ui.label(RichText::new(format!("{label}:")).color(Color32::GRAY));
                    ui.label(
                        RichText::new(value.map(format_salary).unwrap_or_else(|| "n/a".into()))
                            .strong(),
                    );
                    ui.end_row();
                }
            });

        if let Some(met) = min_salary_met {
            ui.separator();
            let (text, color) = if met {
                ("✓ Salary requirement met", Color32::from_rgb(134, 239, 172))
            } else {
                ("✗ Salary requirement not met", Color32::from_rgb(252, 165, 165))
            };
            ui.label(RichText::new(text).small().color(color));
        }
    });
}
