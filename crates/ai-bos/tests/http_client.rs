use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ai_bos::api::{ApiError, CalculationRequest, HttpPenaltyClient, PenaltyApi};
use ai_bos::config::ApiConfig;
use ai_bos::export::ExportDirectory;
use ai_bos::form::CalculationForm;
use ai_bos::storage::MemoryStore;
use ai_bos::ui::{ToastLevel, ToastLog, ViewState};
use ai_bos::{Dashboard, DashboardError};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind backend");
    let addr = listener.local_addr().expect("backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("backend serves");
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpPenaltyClient {
    let config = ApiConfig::new(format!("http://{addr}")).expect("valid url");
    HttpPenaltyClient::new(&config).expect("client builds")
}

async fn echo_calculation(Json(body): Json<Value>) -> Json<Value> {
    let delay = body["delay_minutes"].as_u64().unwrap_or_default();
    Json(json!({
        "request_id": "req-http",
        "timestamp": "2026-10-18T14:30:05.000000",
        "input_data": body,
        "calculation_result": {
            "penalty_applied": true,
            "penalty_amount": 500.0,
            "rule_applied": "fixed_penalty_rule",
            "exceeded_by_minutes": delay.saturating_sub(30)
        },
        "ai_explanation": null,
        "notifications_sent": false
    }))
}

async fn failing_calculation() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Calculation failed: rules engine offline"})),
    )
}

async fn stalled_calculation() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({}))
}

async fn thresholds() -> Json<Value> {
    Json(json!({
        "thresholds": {
            "no_penalty_max": 30,
            "low_penalty_min": 31,
            "low_penalty_max": 60,
            "high_penalty_min": 61
        },
        "amounts": {"fixed_penalty": 500.0, "variable_rate": 25.0, "high_penalty_base": 1000.0},
        "currency": "INR",
        "last_updated": "2026-10-18T09:00:00"
    }))
}

async fn batch(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let delays: Vec<u64> = params
        .get("delays")
        .map(|raw| raw.split(',').filter_map(|d| d.parse().ok()).collect())
        .unwrap_or_default();
    let results: Vec<Value> = delays
        .iter()
        .map(|delay| {
            let amount = if *delay > 30 { 500.0 } else { 0.0 };
            json!({"delay_minutes": delay, "penalty_amount": amount, "rule_applied": "fixed_penalty_rule"})
        })
        .collect();
    Json(json!({
        "batch_id": "batch-1",
        "total_calculations": results.len(),
        "results": results
    }))
}

#[tokio::test]
async fn calculate_posts_request_and_decodes_result() {
    let addr = spawn_backend(Router::new().route("/api/v1/calculate", post(echo_calculation))).await;
    let client = client_for(addr);

    let request = CalculationRequest {
        delay_minutes: 45,
        service_type: "express".to_string(),
        contract_id: Some("C-42".to_string()),
    };
    let result = client.calculate(&request).await.expect("calculation ok");

    assert_eq!(result.request_id, "req-http");
    assert_eq!(result.delay_minutes(), 45);
    assert_eq!(result.service_type(), "express");
    assert_eq!(result.input_data.contract_id.as_deref(), Some("C-42"));
    assert_eq!(result.penalty_amount(), 500.0);
    assert_eq!(result.calculation_result.exceeded_by_minutes, 15);
    assert!(result.ai_explanation.is_none());
}

#[tokio::test]
async fn error_status_carries_service_detail() {
    let addr =
        spawn_backend(Router::new().route("/api/v1/calculate", post(failing_calculation))).await;
    let client = client_for(addr);

    let request = CalculationRequest {
        delay_minutes: 45,
        service_type: "standard".to_string(),
        contract_id: None,
    };
    let err = client.calculate(&request).await.expect_err("server error");

    match &err {
        ApiError::Status { status, detail } => {
            assert_eq!(*status, 500);
            assert_eq!(
                detail.as_deref(),
                Some("Calculation failed: rules engine offline")
            );
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn thresholds_decode_when_served() {
    let addr = spawn_backend(Router::new().route("/api/v1/thresholds", get(thresholds))).await;
    let config = client_for(addr).thresholds().await.expect("thresholds served");

    assert_eq!(config.thresholds.no_penalty_max, 30);
    assert_eq!(config.thresholds.high_penalty_min, 61);
    assert_eq!(config.amounts.variable_rate, 25.0);
    assert_eq!(config.currency, "INR");
}

#[tokio::test]
async fn thresholds_collapse_to_none_on_failure() {
    let addr = spawn_backend(Router::new()).await;
    assert!(client_for(addr).thresholds().await.is_none());

    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        listener.local_addr().expect("addr")
    };
    assert!(client_for(closed).thresholds().await.is_none());
}

#[tokio::test]
async fn batch_sends_delays_as_query() {
    let addr = spawn_backend(Router::new().route("/api/v1/calculate/batch", get(batch))).await;
    let batch = client_for(addr)
        .calculate_batch(&[10, 45, 90])
        .await
        .expect("batch ok");

    assert_eq!(batch.total_calculations, 3);
    let delays: Vec<u32> = batch.results.iter().map(|item| item.delay_minutes).collect();
    assert_eq!(delays, vec![10, 45, 90]);
    assert_eq!(batch.results[0].penalty_amount, 0.0);
    assert_eq!(batch.results[1].penalty_amount, 500.0);
}

#[tokio::test]
async fn hung_service_times_out_back_to_idle() {
    let addr =
        spawn_backend(Router::new().route("/api/v1/calculate", post(stalled_calculation))).await;
    let config = ApiConfig {
        timeout: Duration::from_millis(300),
        ..ApiConfig::new(format!("http://{addr}")).expect("valid url")
    };
    let client = HttpPenaltyClient::new(&config).expect("client builds");

    let dir = tempfile::tempdir().expect("temp dir");
    let toasts = ToastLog::default();
    let mut dashboard = Dashboard::new(
        client,
        MemoryStore::default(),
        ExportDirectory::new(dir.path()),
        Arc::new(toasts.clone()),
    );

    let err = dashboard
        .calculate(&CalculationForm::new("45", "standard"))
        .await
        .expect_err("request times out");

    assert!(
        matches!(err, DashboardError::Api(ApiError::Transport(_))),
        "unexpected error {err:?}"
    );
    assert_eq!(dashboard.ui().state(), &ViewState::Idle);
    assert!(dashboard.history().is_empty());
    assert_eq!(
        toasts.last().map(|toast| toast.level),
        Some(ToastLevel::Error)
    );
}
