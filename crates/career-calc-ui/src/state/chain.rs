//! Dependent selection chain
//!
//! Occupation and state lists load once at start-up. The area list depends
//! on the selected state and is reloaded whenever it changes. Each area
//! fetch gets a generation number and a cancellation token; starting a new
//! fetch cancels the previous token, and a response is only committed when
//! its generation is still the current one. Response arrival order never
//! matters.

use crate::api::ApiError;
use tokio_util::sync::CancellationToken;

/// Ordered, duplicate-free option strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList(Vec<String>);

impl OptionList {
    /// Build from a fetched list, dropping blanks and repeats while
    /// keeping first-seen order.
    pub fn from_fetched(items: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .filter(|item| seen.insert(item.clone()))
            .collect();
        Self(items)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Load status of one option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Fetch failed; the list is empty and the user can carry on.
    Failed,
}

/// An area fetch the app must start.
#[derive(Debug, Clone)]
pub struct AreaFetch {
    pub generation: u64,
    pub state: String,
    pub token: CancellationToken,
}

/// What happened to an area response handed to [`SelectionChain::commit_areas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaCommit {
    Applied,
    Failed,
    /// Superseded or cancelled; discarded without touching the list.
    Discarded,
}

#[derive(Debug)]
struct AreaScope {
    generation: u64,
    state: String,
    token: CancellationToken,
}

#[derive(Debug, Default)]
pub struct SelectionChain {
    occupations: OptionList,
    occupations_status: ListStatus,
    states: OptionList,
    states_status: ListStatus,
    areas: OptionList,
    areas_status: ListStatus,
    area_scope: Option<AreaScope>,
    last_generation: u64,
}

impl SelectionChain {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // START-UP LISTS
    // =========================================================================

    /// Mark both start-up lists as in flight.
    pub fn begin_initial_load(&mut self) {
        self.occupations_status = ListStatus::Loading;
        self.states_status = ListStatus::Loading;
    }

    pub fn set_occupations(&mut self, result: Result<Vec<String>, ApiError>) {
        self.occupations_status = store_list(&mut self.occupations, result, "occupations");
    }

    pub fn set_states(&mut self, result: Result<Vec<String>, ApiError>) {
        self.states_status = store_list(&mut self.states, result, "states");
    }

    // =========================================================================
    // AREAS
    // =========================================================================

    /// The governing state changed.
    ///
    /// Cancels any in-flight area fetch and clears the area list right
    /// away. Returns the fetch to start, or `None` when the state was
    /// cleared.
    pub fn select_state(&mut self, state: &str) -> Option<AreaFetch> {
        if let Some(previous) = self.area_scope.take() {
            previous.token.cancel();
            tracing::debug!(
                generation = previous.generation,
                state = %previous.state,
                "cancelled superseded area fetch"
            );
        }
        self.areas.clear();

        let state = state.trim();
        if state.is_empty() {
            self.areas_status = ListStatus::Idle;
            return None;
        }

        self.last_generation += 1;
        let token = CancellationToken::new();
        self.area_scope = Some(AreaScope {
            generation: self.last_generation,
            state: state.to_string(),
            token: token.clone(),
        });
        self.areas_status = ListStatus::Loading;

        Some(AreaFetch {
            generation: self.last_generation,
            state: state.to_string(),
            token,
        })
    }

    /// Offer an area response. Only the current, uncancelled generation is
    /// committed; everything else is dropped.
    pub fn commit_areas(
        &mut self,
        generation: u64,
        result: Result<Vec<String>, ApiError>,
    ) -> AreaCommit {
        let current = match &self.area_scope {
            Some(scope) if scope.generation == generation && !scope.token.is_cancelled() => scope,
            _ => {
                tracing::debug!(generation, "discarded stale area response");
                return AreaCommit::Discarded;
            }
        };

        if matches!(&result, Err(err) if err.is_cancelled()) {
            return AreaCommit::Discarded;
        }

        let state = current.state.clone();
        self.area_scope = None;
        self.areas_status = store_list(&mut self.areas, result, "areas");
        tracing::debug!(%state, count = self.areas.len(), "area list updated");

        match self.areas_status {
            ListStatus::Failed => AreaCommit::Failed,
            _ => AreaCommit::Applied,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn occupations(&self) -> &[String] {
        self.occupations.as_slice()
    }

    pub fn states(&self) -> &[String] {
        self.states.as_slice()
    }

    pub fn areas(&self) -> &[String] {
        self.areas.as_slice()
    }

    pub fn occupations_status(&self) -> ListStatus {
        self.occupations_status
    }

    pub fn states_status(&self) -> ListStatus {
        self.states_status
    }

    pub fn areas_status(&self) -> ListStatus {
        self.areas_status
    }

    pub fn is_loading(&self) -> bool {
        [
            self.occupations_status,
            self.states_status,
            self.areas_status,
        ]
        .contains(&ListStatus::Loading)
    }
}

/// Replace `list` wholesale on success; empty it on failure.
fn store_list(
    list: &mut OptionList,
    result: Result<Vec<String>, ApiError>,
    what: &str,
) -> ListStatus {
    match result {
        Ok(items) => {
            *list = OptionList::from_fetched(items);
            ListStatus::Loaded
        }
        Err(err) => {
            tracing::warn!(list = what, error = %err, "failed to load option list");
            list.clear();
            ListStatus::Failed
        }
    }
}
