//! Career Calculator Application
//!
//! Layout:
//! ┌──────────────────────────────────────────┐
//! │  Header (title, API status)              │
//! ├──────────────┬───────────────────────────┤
//! │  Filters     │  Result                   │
//! │              │                           │
//! └──────────────┴───────────────────────────┘
//!
//! Async work is spawned onto the tokio runtime (native) or the browser
//! event loop (WASM). Each task writes into a shared slot which
//! `check_pending_requests` drains at the start of every frame.

use crate::api::{ApiClient, ApiError};
use crate::panels::{
    results_panel, FilterPanel, FilterPanelAction, FilterPanelData, ResultsPanelAction,
    ResultsPanelData,
};
use crate::state::{CalculationState, FilterForm, FormEffect, SelectionChain};
use career_calc_types::share;
use career_calc_types::{CalculationResult, FilterCriteria, HealthResponse};
use eframe::egui;
use egui::{Color32, RichText};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

/// Default backend when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Result slot shared between a spawned task and the frame loop
type Slot<T> = Arc<Mutex<Option<T>>>;

type ListSlot = Slot<Result<Vec<String>, ApiError>>;

/// How the app was launched
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Filters from a share link
    pub initial: Option<FilterCriteria>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            initial: None,
        }
    }
}

/// Result of the start-up health check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiStatus {
    Checking,
    Online,
    Unreachable,
}

pub struct CareerCalcApp {
    api: ApiClient,

    // Form, option lists and result
    form: FilterForm,
    chain: SelectionChain,
    calculation: CalculationState,
    filter_panel: FilterPanel,
    share_link: Option<String>,
    api_status: ApiStatus,

    // Async result holders
    pending_occupations: Option<ListSlot>,
    pending_states: Option<ListSlot>,
    pending_areas: Vec<(u64, ListSlot)>,
    pending_calculation: Option<Slot<Result<CalculationResult, ApiError>>>,
    pending_health: Option<Slot<Result<HealthResponse, ApiError>>>,
    calculation_token: Option<CancellationToken>,

    // Tokio runtime for native builds
    #[cfg(not(target_arch = "wasm32"))]
    runtime: Arc<tokio::runtime::Runtime>,
}

impl CareerCalcApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> std::io::Result<Self> {
        Self::with_options(options)
    }

    /// Build the app and kick off start-up requests. Needs no egui context.
    pub fn with_options(options: AppOptions) -> std::io::Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?,
        );

        let auto_calculate = options
            .initial
            .as_ref()
            .is_some_and(|f| !f.area.is_empty() && !f.occupation.is_empty());
        let form = match options.initial {
            Some(initial) => FilterForm::with_initial(initial),
            None => FilterForm::new(),
        };

        let mut app = Self {
            api: ApiClient::new(&options.base_url).with_api_key(options.api_key),
            form,
            chain: SelectionChain::new(),
            calculation: CalculationState::default(),
            filter_panel: FilterPanel::new(),
            share_link: None,
            api_status: ApiStatus::Checking,
            pending_occupations: None,
            pending_states: None,
            pending_areas: Vec::new(),
            pending_calculation: None,
            pending_health: None,
            calculation_token: None,
            #[cfg(not(target_arch = "wasm32"))]
            runtime,
        };

        tracing::info!(base_url = %app.api.base_url(), "starting career calculator");
        app.load_initial_lists();
        app.check_health();

        let effect = app.form.hydrate_state();
        app.handle_form_effect(effect);
        if auto_calculate {
            app.submit();
        }

        Ok(app)
    }

    // =========================================================================
    // ASYNC PLUMBING
    // =========================================================================

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn<T: Send + 'static>(&self, task: impl Future<Output = T> + Send + 'static) -> Slot<T> {
        let slot = Arc::new(Mutex::new(None));
        let slot_clone = slot.clone();
        self.runtime.spawn(async move {
            let value = task.await;
            fill(&slot_clone, value);
        });
        slot
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn<T: 'static>(&self, task: impl Future<Output = T> + 'static) -> Slot<T> {
        let slot = Arc::new(Mutex::new(None));
        let slot_clone = slot.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let value = task.await;
            fill(&slot_clone, value);
        });
        slot
    }

    fn load_initial_lists(&mut self) {
        self.chain.begin_initial_load();

        let api = self.api.clone();
        self.pending_occupations = Some(self.spawn(async move { api.occupations().await }));

        let api = self.api.clone();
        self.pending_states = Some(self.spawn(async move { api.states().await }));
    }

    fn check_health(&mut self) {
        let api = self.api.clone();
        self.pending_health = Some(self.spawn(async move { api.health().await }));
    }

    fn load_areas(&mut self, state: &str) {
        let Some(fetch) = self.chain.select_state(state) else {
            return;
        };
        let api = self.api.clone();
        let slot = self.spawn(async move { api.areas_by_state(&fetch.state, &fetch.token).await });
        self.pending_areas.push((fetch.generation, slot));
    }

    fn handle_form_effect(&mut self, effect: FormEffect) {
        match effect {
            FormEffect::None => {}
            FormEffect::StateChanged(state) => self.load_areas(&state),
        }
    }

    /// Validate the form and start a calculation. An incomplete form is
    /// a no-op. A newer submission cancels the one in flight.
    fn submit(&mut self) {
        let filters = match self.form.submit() {
            Ok(filters) => filters,
            Err(err) => {
                tracing::debug!(%err, "submit ignored");
                return;
            }
        };

        tracing::info!(
            occupation = %filters.occupation,
            area = %filters.area,
            min_salary = filters.min_salary,
            education = filters.education_label(),
            experience = filters.experience_label(),
            "calculating"
        );

        if let Some(previous) = self.calculation_token.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.calculation.begin(filters.clone());

        let api = self.api.clone();
        let task_token = token.clone();
        self.pending_calculation = Some(
            self.spawn(async move { api.calculate(&filters, Some(&task_token)).await }),
        );
        self.calculation_token = Some(token);
    }

    fn check_pending_requests(&mut self) {
        if let Some(result) = take(&self.pending_occupations) {
            self.chain.set_occupations(result);
            self.pending_occupations = None;
        }

        if let Some(result) = take(&self.pending_states) {
            self.chain.set_states(result);
            self.pending_states = None;
        }

        // Area responses, in whatever order they land
        let mut resolved = Vec::new();
        self.pending_areas.retain(|(generation, slot)| {
            match slot.try_lock().ok().and_then(|mut g| g.take()) {
                Some(result) => {
                    resolved.push((*generation, result));
                    false
                }
                None => true,
            }
        });
        for (generation, result) in resolved {
            self.chain.commit_areas(generation, result);
        }

        if let Some(result) = take(&self.pending_calculation) {
            self.pending_calculation = None;
            match result {
                Err(err) if err.is_cancelled() => {}
                Ok(data) => {
                    self.calculation_token = None;
                    tracing::info!(
                        percentage = data.percentage,
                        matching_jobs = data.matching_jobs,
                        total_jobs = data.total_jobs,
                        "calculation finished"
                    );
                    self.calculation.finish(Ok(data));
                    self.update_share_link();
                }
                Err(err) => {
                    self.calculation_token = None;
                    tracing::warn!(error = %err, "calculation failed");
                    self.calculation.finish(Err(err.to_string()));
                }
            }
        }

        if let Some(result) = take(&self.pending_health) {
            self.pending_health = None;
            self.api_status = match result {
                Ok(health) => {
                    tracing::debug!(status = ?health.status, "health check");
                    ApiStatus::Online
                }
                Err(err) => {
                    tracing::warn!(error = %err, "health check failed");
                    ApiStatus::Unreachable
                }
            };
        }
    }

    fn is_busy(&self) -> bool {
        self.pending_occupations.is_some()
            || self.pending_states.is_some()
            || !self.pending_areas.is_empty()
            || self.pending_calculation.is_some()
            || self.pending_health.is_some()
    }

    // =========================================================================
    // SHARE LINK
    // =========================================================================

    fn update_share_link(&mut self) {
        let Some(filters) = &self.calculation.last_filters else {
            return;
        };
        let link = share::encode(filters);
        publish_share_link(&link);
        self.share_link = Some(link);
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    fn handle_filter_action(&mut self, action: FilterPanelAction) {
        for event in action.events {
            let effect = self.form.apply(event);
            self.handle_form_effect(effect);
        }
        if action.submit {
            self.submit();
        }
    }

    fn handle_results_action(&mut self, ctx: &egui::Context, action: ResultsPanelAction) {
        if action.toggle_scope {
            self.calculation.toggle_scope();
        }
        if action.copy_link {
            if let Some(link) = &self.share_link {
                ctx.copy_text(share_url(link));
            }
        }
    }

    fn header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Career Calculator");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (text, color) = match self.api_status {
                    ApiStatus::Checking => ("Checking API...", Color32::GRAY),
                    ApiStatus::Online => ("API online", Color32::from_rgb(134, 239, 172)),
                    ApiStatus::Unreachable => ("API unreachable", Color32::LIGHT_RED),
                };
                ui.label(RichText::new(text).small().color(color));
                if self.chain.is_loading() {
                    ui.spinner();
                }
            });
        });
    }
}

impl eframe::App for CareerCalcApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_pending_requests();

        // Request repaint if async operations pending
        if self.is_busy() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.header(ui);
            ui.add_space(4.0);
        });

        let filter_action = egui::SidePanel::left("filters")
            .resizable(false)
            .exact_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        ui.add_space(8.0);
                        let data = FilterPanelData {
                            criteria: self.form.criteria(),
                            occupations: self.chain.occupations(),
                            states: self.chain.states(),
                            areas: self.chain.areas(),
                            areas_status: self.chain.areas_status(),
                            can_submit: self.form.is_valid(),
                            calculating: self.calculation.loading,
                        };
                        self.filter_panel.ui(ui, &data)
                    })
                    .inner
            })
            .inner;
        self.handle_filter_action(filter_action);

        let results_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.add_space(24.0);
                let data = ResultsPanelData {
                    view: self.calculation.view(),
                    scope: self.calculation.scope,
                    share_link: self.share_link.as_deref(),
                };
                results_panel(ui, &data)
            })
            .inner;
        self.handle_results_action(ctx, results_action);
    }
}

fn fill<T>(slot: &Slot<T>, value: T) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
}

fn take<T>(slot: &Option<Slot<T>>) -> Option<T> {
    slot.as_ref()
        .and_then(|p| p.try_lock().ok())
        .and_then(|mut g| g.take())
}

/// Put the link in the address bar without adding a history entry.
#[cfg(target_arch = "wasm32")]
fn publish_share_link(link: &str) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let url = format!("?{link}");
    if let Err(err) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url)) {
        tracing::warn!(?err, "failed to update page URL");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn publish_share_link(link: &str) {
    tracing::debug!(%link, "share link updated");
}

#[cfg(target_arch = "wasm32")]
fn share_url(link: &str) -> String {
    let base = web_sys::window()
        .and_then(|w| {
            let location = w.location();
            Some(format!("{}{}", location.origin().ok()?, location.pathname().ok()?))
        })
        .unwrap_or_default();
    format!("{base}?{link}")
}

#[cfg(not(target_arch = "wasm32"))]
fn share_url(link: &str) -> String {
    format!("?{link}")
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::state::{FormEvent, ListStatus, ResultView};
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    /// Local service: Texas areas and Pilots calculations answer slowly.
    struct Backend {
        base_url: String,
        calculations: Arc<AtomicUsize>,
        _runtime: tokio::runtime::Runtime,
    }

    fn backend() -> Backend {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let calculations = Arc::new(AtomicUsize::new(0));
        let hits = calculations.clone();

        let router = Router::new()
            .route(
                "/api/occupations",
                get(|| async { Json(json!({ "occupations": ["Chefs", "Pilots"] })) }),
            )
            .route(
                "/api/states",
                get(|| async { Json(json!({ "states": ["Texas", "Utah"] })) }),
            )
            .route(
                "/api/health",
                get(|| async { Json(json!({ "status": "healthy" })) }),
            )
            .route(
                "/api/areas-by-state",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let state = params.get("state").cloned().unwrap_or_default();
                    if state == "Texas" {
                        tokio::time::sleep(Duration::from_millis(300)).await;
                    }
                    Json(json!({ "areas": [format!("Capital, {state}")] }))
                }),
            )
            .route(
                "/api/calculate",
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        let occupation = params.get("occupation").cloned().unwrap_or_default();
                        if occupation == "Pilots" {
                            tokio::time::sleep(Duration::from_millis(300)).await;
                        }
                        Json(json!({
                            "percentage": 12.5,
                            "matchingJobs": 125,
                            "totalJobs": 1000,
                            "location": occupation
                        }))
                    }
                }),
            );

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        runtime.spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Backend {
            base_url: format!("http://{addr}"),
            calculations,
            _runtime: runtime,
        }
    }

    fn app_for(backend: &Backend, initial: Option<FilterCriteria>) -> CareerCalcApp {
        CareerCalcApp::with_options(AppOptions {
            base_url: backend.base_url.clone(),
            api_key: None,
            initial,
        })
        .unwrap()
    }

    /// Drain responses frame by frame until `done` holds.
    fn settle(app: &mut CareerCalcApp, done: impl Fn(&CareerCalcApp) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        app.check_pending_requests();
        while !done(app) {
            assert!(Instant::now() < deadline, "responses never arrived");
            std::thread::sleep(Duration::from_millis(10));
            app.check_pending_requests();
        }
    }

    fn edit(app: &mut CareerCalcApp, events: Vec<FormEvent>, submit: bool) {
        app.handle_filter_action(FilterPanelAction { events, submit });
    }

    fn shown_location(app: &CareerCalcApp) -> String {
        match app.calculation.view() {
            ResultView::Result(result) => result.location.clone(),
            other => panic!("expected a result, got {other:?}"),
        }
    }

    #[test]
    fn start_up_loads_lists_and_health() {
        let backend = backend();
        let mut app = app_for(&backend, None);
        settle(&mut app, |app| !app.is_busy());

        assert_eq!(app.chain.occupations(), ["Chefs", "Pilots"]);
        assert_eq!(app.chain.states(), ["Texas", "Utah"]);
        assert_eq!(app.api_status, ApiStatus::Online);
        assert_eq!(app.calculation.view(), ResultView::Placeholder);
    }

    #[test]
    fn area_responses_commit_only_for_latest_state() {
        let backend = backend();
        let mut app = app_for(&backend, None);
        settle(&mut app, |app| !app.is_busy());

        edit(
            &mut app,
            vec![
                FormEvent::State("Texas".into()),
                FormEvent::State("Utah".into()),
            ],
            false,
        );
        assert_eq!(app.pending_areas.len(), 2);

        settle(&mut app, |app| app.pending_areas.is_empty());
        assert_eq!(app.chain.areas(), ["Capital, Utah"]);
        assert_eq!(app.chain.areas_status(), ListStatus::Loaded);

        // Well past the slow Texas answer.
        std::thread::sleep(Duration::from_millis(400));
        app.check_pending_requests();
        assert_eq!(app.chain.areas(), ["Capital, Utah"]);
    }

    #[test]
    fn incomplete_form_sends_no_request() {
        let backend = backend();
        let mut app = app_for(&backend, None);
        settle(&mut app, |app| !app.is_busy());

        edit(&mut app, vec![FormEvent::Occupation("Chefs".into())], true);
        assert!(app.pending_calculation.is_none());
        assert!(!app.calculation.loading);
        assert_eq!(app.calculation.view(), ResultView::Placeholder);
        assert_eq!(backend.calculations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn newer_submission_supersedes_slow_one_silently() {
        let backend = backend();
        let mut app = app_for(&backend, None);
        settle(&mut app, |app| !app.is_busy());

        edit(
            &mut app,
            vec![
                FormEvent::Occupation("Pilots".into()),
                FormEvent::State("Utah".into()),
                FormEvent::Area("Capital, Utah".into()),
            ],
            true,
        );
        assert!(app.calculation.loading);
        edit(&mut app, vec![FormEvent::Occupation("Chefs".into())], true);

        settle(&mut app, |app| !app.calculation.loading);
        assert_eq!(shown_location(&app), "Chefs");
        assert!(app.calculation.error.is_none());
        assert!(app.calculation_token.is_none());

        std::thread::sleep(Duration::from_millis(400));
        app.check_pending_requests();
        assert_eq!(shown_location(&app), "Chefs");
        assert!(app.calculation.error.is_none());
    }

    #[test]
    fn share_link_with_location_calculates_on_start() {
        let backend = backend();
        let initial = FilterCriteria {
            occupation: "Chefs".into(),
            area: "Austin-Round Rock, TX".into(),
            ..Default::default()
        };
        let mut app = app_for(&backend, Some(initial));
        assert_eq!(app.form.criteria().state, "Texas");
        assert!(app.calculation.loading);

        settle(&mut app, |app| !app.calculation.loading);
        assert_eq!(shown_location(&app), "Chefs");
        let link = app.share_link.as_deref().unwrap();
        assert!(link.contains("state=Texas"));
        assert!(link.contains("location=Austin-Round+Rock%2C+TX"));
        assert_eq!(backend.calculations.load(Ordering::SeqCst), 1);
    }
}
