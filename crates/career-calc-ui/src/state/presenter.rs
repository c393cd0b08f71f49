//! Result presenter state
//!
//! Exactly one of four views is shown, chosen by priority:
//! Loading > Error > Result > Placeholder. Loading wins even when stale
//! error or data are still around.

use career_calc_types::{CalculationResult, DisplayScope, FilterCriteria};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultView<'a> {
    Loading,
    Error(&'a str),
    Result(&'a CalculationResult),
    Placeholder,
}

pub fn select_view<'a>(
    is_loading: bool,
    error: Option<&'a str>,
    data: Option<&'a CalculationResult>,
) -> ResultView<'a> {
    if is_loading {
        return ResultView::Loading;
    }
    if let Some(message) = error {
        return ResultView::Error(message);
    }
    match data {
        Some(result) => ResultView::Result(result),
        None => ResultView::Placeholder,
    }
}

/// Everything the result panel renders from.
#[derive(Debug, Default)]
pub struct CalculationState {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<CalculationResult>,
    /// Filters behind `data`, used for the share link.
    pub last_filters: Option<FilterCriteria>,
    /// National vs regional. Client-side only.
    pub scope: DisplayScope,
}

impl CalculationState {
    /// Reset for a new request: clears stale output and shows the spinner.
    pub fn begin(&mut self, filters: FilterCriteria) {
        self.loading = true;
        self.error = None;
        self.data = None;
        self.last_filters = Some(filters);
    }

    pub fn finish(&mut self, result: Result<CalculationResult, String>) {
        self.loading = false;
        match result {
            Ok(data) => {
                if !data.has_regional() {
                    self.scope = DisplayScope::National;
                }
                self.data = Some(data);
                self.error = None;
            }
            Err(message) => {
                self.data = None;
                self.error = Some(message);
            }
        }
    }

    pub fn view(&self) -> ResultView<'_> {
        select_view(self.loading, self.error.as_deref(), self.data.as_ref())
    }

    /// Flip the displayed scope. Never triggers a fetch.
    pub fn toggle_scope(&mut self) {
        self.scope = self.scope.toggled();
    }
}
