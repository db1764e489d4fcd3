use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/calculate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub delay_minutes: u32,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
}

/// Full response of a single calculation, as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub request_id: String,
    pub timestamp: String,
    pub input_data: InputData,
    pub calculation_result: PenaltyOutcome,
    #[serde(default)]
    pub ai_explanation: Option<AiExplanation>,
    #[serde(default)]
    pub notifications_sent: bool,
}

impl CalculationResult {
    pub fn delay_minutes(&self) -> u32 {
        self.input_data.delay_minutes
    }

    /// Amount charged, zero when no penalty applied.
    pub fn penalty_amount(&self) -> f64 {
        if self.calculation_result.penalty_applied {
            self.calculation_result.penalty_amount
        } else {
            0.0
        }
    }

    pub fn service_type(&self) -> &str {
        self.input_data
            .service_type
            .as_deref()
            .or(self.calculation_result.service_type.as_deref())
            .unwrap_or("standard")
    }
}

/// Echo of the request inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    pub delay_minutes: u32,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub contract_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyOutcome {
    pub penalty_applied: bool,
    #[serde(default)]
    pub penalty_amount: f64,
    #[serde(default)]
    pub rule_applied: String,
    #[serde(default)]
    pub rule_description: Option<String>,
    #[serde(default)]
    pub calculation_breakdown: Option<CalculationBreakdown>,
    #[serde(default)]
    pub threshold_exceeded: bool,
    #[serde(default)]
    pub exceeded_by_minutes: u32,
    #[serde(default)]
    pub critical_delay: bool,
    #[serde(default)]
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationBreakdown {
    #[serde(default)]
    pub base_amount: f64,
    #[serde(default)]
    pub variable_amount: f64,
    #[serde(default)]
    pub overage_minutes: Option<u32>,
    #[serde(default)]
    pub per_minute_rate: Option<f64>,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiExplanation {
    pub explanation: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
}

/// Response of `GET /api/v1/thresholds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub thresholds: PenaltyThresholds,
    pub amounts: PenaltyAmounts,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub last_updated: Option<String>,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Delay boundaries in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyThresholds {
    pub no_penalty_max: u32,
    pub low_penalty_min: u32,
    pub low_penalty_max: u32,
    pub high_penalty_min: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyAmounts {
    pub fixed_penalty: f64,
    pub variable_rate: f64,
    pub high_penalty_base: f64,
}

/// Response of the batch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCalculation {
    pub batch_id: String,
    pub total_calculations: usize,
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub delay_minutes: u32,
    pub penalty_amount: f64,
    pub rule_applied: String,
}
