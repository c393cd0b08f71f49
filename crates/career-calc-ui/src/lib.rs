//! Career Calculator UI
//!
//! egui front end: API client, headless form/selection/result state,
//! the searchable dropdown widget and the panels. Runs natively through
//! the `career-calc` launcher or in the browser via [`start`].

#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod app;
pub mod panels;
pub mod state;
pub mod widgets;

pub use api::{ApiClient, ApiError};
pub use app::{AppOptions, CareerCalcApp, DEFAULT_API_BASE_URL};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window();
    let location = window.as_ref().map(|w| w.location());
    let base_url = resolve_base_url(
        window
            .as_ref()
            .and_then(|w| w.document())
            .and_then(|d| meta_api_base_url(&d)),
        location.as_ref().and_then(|l| l.origin().ok()),
    );
    tracing::info!(%base_url, "API base URL");
    let initial = location
        .as_ref()
        .and_then(|l| l.search().ok())
        .filter(|search| !search.is_empty())
        .and_then(|search| match career_calc_types::share::decode(&search) {
            Ok(filters) => Some(filters),
            Err(err) => {
                tracing::warn!(%err, "ignoring malformed share link");
                None
            }
        });

    let options = AppOptions {
        base_url,
        api_key: None,
        initial,
    };

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                "career_calc_canvas",
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(CareerCalcApp::new(cc, options)?))),
            )
            .await;
        if let Err(err) = started {
            tracing::error!(?err, "failed to start eframe");
        }
    });
}

/// Name of the `<meta>` tag that points the browser build at a separately
/// hosted API, e.g. `<meta name="career-calc-api-base-url" content="https://api.example.com">`.
pub const API_BASE_URL_META: &str = "career-calc-api-base-url";

#[cfg(target_arch = "wasm32")]
fn meta_api_base_url(document: &web_sys::Document) -> Option<String> {
    let selector = format!("meta[name=\"{API_BASE_URL_META}\"]");
    document
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"))
}

/// The `<meta>` value when set, else the page origin, else the default.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn resolve_base_url(meta_content: Option<String>, origin: Option<String>) -> String {
    [meta_content, origin]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}
