#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ai_bos::api::{ApiError, CalculationRequest, CalculationResult, PenaltyApi, ThresholdConfig};
use ai_bos::export::ExportDirectory;
use ai_bos::storage::KeyValueStore;
use ai_bos::ui::ToastLog;
use ai_bos::Dashboard;
use serde_json::json;

/// Scripted reply for the next calculate call.
pub enum Reply {
    Result(CalculationResult),
    Status(u16, &'static str),
    /// Never responds.
    Hang,
}

/// In-process stand-in for the calculation service.
#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CalculationRequest>>,
    generated: AtomicUsize,
    thresholds: Option<ThresholdConfig>,
}

impl FakeApi {
    pub fn replying(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn requests(&self) -> Vec<CalculationRequest> {
        self.requests.lock().expect("requests mutex").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("requests mutex").len()
    }
}

impl PenaltyApi for FakeApi {
    async fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResult, ApiError> {
        self.requests
            .lock()
            .expect("requests mutex")
            .push(request.clone());

        let reply = self.replies.lock().expect("replies mutex").pop_front();
        match reply {
            Some(Reply::Result(result)) => Ok(result),
            Some(Reply::Status(status, detail)) => Err(ApiError::Status {
                status,
                detail: Some(detail.to_string()),
            }),
            Some(Reply::Hang) => std::future::pending().await,
            None => {
                let n = self.generated.fetch_add(1, Ordering::Relaxed);
                Ok(no_penalty_result(&format!("gen-{n}"), request.delay_minutes))
            }
        }
    }

    async fn thresholds(&self) -> Option<ThresholdConfig> {
        self.thresholds.clone()
    }
}

pub fn build_dashboard<S: KeyValueStore>(
    api: FakeApi,
    storage: S,
    exports: ExportDirectory,
) -> (Dashboard<FakeApi, S>, ToastLog) {
    let toasts = ToastLog::default();
    let dashboard = Dashboard::new(api, storage, exports, Arc::new(toasts.clone()));
    (dashboard, toasts)
}

pub fn result_from(value: serde_json::Value) -> CalculationResult {
    serde_json::from_value(value).expect("fixture decodes")
}

/// The 45-minute scenario: ₹500 base plus 5 minutes at ₹25.
pub fn forty_five_minute_result() -> CalculationResult {
    result_from(json!({
        "request_id": "req-45",
        "timestamp": "2026-10-18T14:30:05.000000",
        "input_data": {"delay_minutes": 45, "service_type": "standard", "contract_id": null},
        "calculation_result": {
            "penalty_applied": true,
            "penalty_amount": 625,
            "rule_applied": "progressive_penalty_rule",
            "calculation_breakdown": {
                "base_amount": 500,
                "variable_amount": 125,
                "overage_minutes": 5,
                "per_minute_rate": 25,
                "total": 625
            },
            "threshold_exceeded": true,
            "exceeded_by_minutes": 15
        },
        "ai_explanation": {
            "explanation": "The delay of 45 minutes exceeds the grace period.",
            "confidence_score": 0.95
        }
    }))
}

pub fn no_penalty_result(id: &str, delay: u32) -> CalculationResult {
    result_from(json!({
        "request_id": id,
        "timestamp": "2026-10-18T10:00:00",
        "input_data": {"delay_minutes": delay, "service_type": "standard"},
        "calculation_result": {"penalty_applied": false}
    }))
}

pub fn standard_thresholds() -> ThresholdConfig {
    serde_json::from_value(json!({
        "thresholds": {
            "no_penalty_max": 30,
            "low_penalty_min": 31,
            "low_penalty_max": 60,
            "high_penalty_min": 61
        },
        "amounts": {
            "fixed_penalty": 500.0,
            "variable_rate": 25.0,
            "high_penalty_base": 1000.0
        },
        "currency": "INR",
        "last_updated": "2026-10-18T09:00:00"
    }))
    .expect("thresholds decode")
}
