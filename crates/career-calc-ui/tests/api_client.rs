//! API client against a local axum server.

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use career_calc_types::FilterCriteria;
use career_calc_ui::api::{ApiClient, ApiError, API_KEY_HEADER};
use career_calc_ui::state::{AreaCommit, SelectionChain};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

/// Echoes the query string back as the `location` of a result.
async fn echo_calculate(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let mut keys: Vec<_> = params.keys().cloned().collect();
    keys.sort();
    Json(json!({
        "percentage": 12.5,
        "percentageRegion": 40.0,
        "matchingJobs": 1250,
        "totalJobs": 10000,
        "totalJobsRegion": 3125,
        "location": keys.join(","),
        "minSalaryMet": true,
        "salaryInfo": { "medianSalary": 81000, "pct90Salary": 120000 }
    }))
}

#[tokio::test]
async fn calculate_omits_unset_thresholds() {
    let base = serve(Router::new().route("/api/calculate", get(echo_calculate))).await;
    let client = ApiClient::new(&base);

    let filters = FilterCriteria {
        occupation: "Chefs".into(),
        state: "Texas".into(),
        area: "Austin-Round Rock, TX".into(),
        ..Default::default()
    };
    let result = client.calculate(&filters, None).await.unwrap();
    assert_eq!(result.location, "location,minSalary,occupation");
    assert_eq!(result.total_jobs_region, Some(3125));
    assert_eq!(result.salary_info.unwrap().median_salary, Some(81_000));

    let filters = FilterCriteria {
        education: Some("Bachelor's degree".into()),
        experience: Some("None".into()),
        ..filters
    };
    let result = client.calculate(&filters, None).await.unwrap();
    assert_eq!(
        result.location,
        "education,experience,location,minSalary,occupation"
    );
}

#[tokio::test]
async fn lists_tolerate_count_and_missing_keys() {
    let router = Router::new()
        .route(
            "/api/occupations",
            get(|| async { Json(json!({ "occupations": ["Chefs", "Pilots"], "count": 2 })) }),
        )
        .route("/api/states", get(|| async { Json(json!({ "count": 0 })) }))
        .route(
            "/api/areas-by-state",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let state = params.get("state").cloned().unwrap_or_default();
                Json(json!({ "areas": [format!("Capital, {state}")] }))
            }),
        )
        .route(
            "/api/health",
            get(|| async { Json(json!({ "status": "healthy" })) }),
        );
    let client = ApiClient::new(&serve(router).await);

    assert_eq!(client.occupations().await.unwrap(), ["Chefs", "Pilots"]);
    assert!(client.states().await.unwrap().is_empty());
    let token = CancellationToken::new();
    assert_eq!(
        client.areas_by_state("New York", &token).await.unwrap(),
        ["Capital, New York"]
    );
    assert_eq!(
        client.health().await.unwrap().status.as_deref(),
        Some("healthy")
    );
}

#[tokio::test]
async fn error_statuses_carry_code_reason_and_body() {
    let router = Router::new()
        .route(
            "/api/calculate",
            get(|| async { (StatusCode::BAD_REQUEST, "Location is required") }),
        )
        .route(
            "/api/states",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
    let client = ApiClient::new(&serve(router).await);

    let err = client
        .calculate(&FilterCriteria::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API 400 Bad Request Location is required");

    let err = client.states().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "API 500 Internal Server Error");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let router = Router::new().route("/api/states", get(|| async { "not json" }));
    let client = ApiClient::new(&serve(router).await);
    assert!(matches!(
        client.states().await.unwrap_err(),
        ApiError::Decode(_)
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}"));
    assert!(matches!(
        client.health().await.unwrap_err(),
        ApiError::Network(_)
    ));
}

#[tokio::test]
async fn api_key_is_sent_when_configured() {
    let router = Router::new().route(
        "/api/health",
        get(|headers: HeaderMap| async move {
            match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
                Some("secret") => (StatusCode::OK, Json(json!({ "status": "healthy" }))),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "invalid api key" })),
                ),
            }
        }),
    );
    let base = serve(router).await;

    let anonymous = ApiClient::new(&base);
    assert!(matches!(
        anonymous.health().await.unwrap_err(),
        ApiError::Status { status: 401, .. }
    ));

    let keyed = ApiClient::new(&base).with_api_key(Some("secret".into()));
    assert!(keyed.health().await.is_ok());
}

#[tokio::test]
async fn cancelling_abandons_a_slow_request() {
    let router = Router::new().route(
        "/api/areas-by-state",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "areas": ["Too late, TX"] }))
        }),
    );
    let client = ApiClient::new(&serve(router).await);

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let err = client.areas_by_state("Texas", &token).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(2));
}

/// The slow response for an earlier state arrives after the fast one for
/// the latest state; the chain must end up showing the latest.
#[tokio::test]
async fn last_selected_state_wins_against_slow_responses() {
    let router = Router::new().route(
        "/api/areas-by-state",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let state = params.get("state").cloned().unwrap_or_default();
            if state == "Texas" {
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
            Json(json!({ "areas": [format!("Capital, {state}")] }))
        }),
    );
    let client = ApiClient::new(&serve(router).await);
    let mut chain = SelectionChain::new();

    let texas = chain.select_state("Texas").unwrap();
    let texas_task = {
        let client = client.clone();
        tokio::spawn(async move {
            // Ignore the token so the stale response really does arrive.
            let never = CancellationToken::new();
            let result = client.areas_by_state(&texas.state, &never).await;
            (texas.generation, result)
        })
    };

    let utah = chain.select_state("Utah").unwrap();
    let utah_result = client.areas_by_state(&utah.state, &utah.token).await;
    assert_eq!(
        chain.commit_areas(utah.generation, utah_result),
        AreaCommit::Applied
    );

    let (generation, texas_result) = texas_task.await.unwrap();
    assert_eq!(texas_result.as_ref().unwrap(), &["Capital, Texas"]);
    assert_eq!(
        chain.commit_areas(generation, texas_result),
        AreaCommit::Discarded
    );
    assert_eq!(chain.areas(), ["Capital, Utah"]);
}
