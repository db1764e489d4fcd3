use serde::Serialize;

use crate::api::{CalculationResult, ThresholdConfig};
use crate::format::{
    confidence_percent, format_confidence, format_currency, format_delay, format_timestamp,
};
use crate::history::HistoryEntry;

pub const EXPLANATION_FALLBACK: &str = "AI explanation is not available for this calculation.";
pub const NO_PENALTY_HEADLINE: &str = "No Penalty Applied";
pub const NO_PENALTY_DETAIL: &str = "The delay is within the acceptable threshold.";
pub const THRESHOLDS_UNAVAILABLE: &str = "Threshold configuration is currently unavailable.";

/// Display-ready projection of a [`CalculationResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub request_id: String,
    pub calculated_at: String,
    pub delay: String,
    pub service_type: String,
    pub contract_id: Option<String>,
    pub status_label: &'static str,
    pub penalty_amount: String,
    pub rule_applied: String,
    pub rule_description: Option<String>,
    pub threshold_status: String,
    pub critical_delay: bool,
    pub breakdown: BreakdownView,
    pub explanation: ExplanationView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakdownView {
    Charged {
        base_amount: String,
        variable_amount: String,
        overage_minutes: Option<String>,
        per_minute_rate: Option<String>,
        total: String,
    },
    NoPenalty {
        headline: &'static str,
        detail: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationView {
    pub text: String,
    pub confidence: String,
    pub confidence_percent: u8,
    pub model: Option<String>,
    pub available: bool,
}

impl ResultView {
    pub fn from_result(result: &CalculationResult) -> Self {
        let outcome = &result.calculation_result;

        let breakdown = if outcome.penalty_applied {
            match &outcome.calculation_breakdown {
                Some(parts) => BreakdownView::Charged {
                    base_amount: format_currency(parts.base_amount),
                    variable_amount: format_currency(parts.variable_amount),
                    overage_minutes: parts.overage_minutes.map(format_delay),
                    per_minute_rate: parts
                        .per_minute_rate
                        .map(|rate| format!("{}/min", format_currency(rate))),
                    total: format_currency(parts.total),
                },
                None => BreakdownView::Charged {
                    base_amount: format_currency(outcome.penalty_amount),
                    variable_amount: format_currency(0.0),
                    overage_minutes: None,
                    per_minute_rate: None,
                    total: format_currency(outcome.penalty_amount),
                },
            }
        } else {
            BreakdownView::NoPenalty {
                headline: NO_PENALTY_HEADLINE,
                detail: NO_PENALTY_DETAIL,
            }
        };

        let threshold_status = if outcome.threshold_exceeded {
            format!(
                "Threshold exceeded by {}",
                format_delay(outcome.exceeded_by_minutes)
            )
        } else {
            "Within threshold".to_string()
        };

        let explanation = match &result.ai_explanation {
            Some(ai) => ExplanationView {
                text: ai.explanation.clone(),
                confidence: format_confidence(ai.confidence_score),
                confidence_percent: confidence_percent(ai.confidence_score),
                model: ai.model_used.clone(),
                available: true,
            },
            None => ExplanationView {
                text: EXPLANATION_FALLBACK.to_string(),
                confidence: format_confidence(0.0),
                confidence_percent: 0,
                model: None,
                available: false,
            },
        };

        Self {
            request_id: result.request_id.clone(),
            calculated_at: format_timestamp(&result.timestamp),
            delay: format_delay(result.delay_minutes()),
            service_type: result.service_type().to_string(),
            contract_id: result.input_data.contract_id.clone(),
            status_label: if outcome.penalty_applied {
                "Penalty Applied"
            } else {
                "No Penalty"
            },
            penalty_amount: format_currency(result.penalty_amount()),
            rule_applied: outcome.rule_applied.clone(),
            rule_description: outcome.rule_description.clone(),
            threshold_status,
            critical_delay: outcome.critical_delay,
            breakdown,
            explanation,
        }
    }

    /// Grand total as displayed, regardless of breakdown shape.
    pub fn total(&self) -> &str {
        match &self.breakdown {
            BreakdownView::Charged { total, .. } => total,
            BreakdownView::NoPenalty { .. } => &self.penalty_amount,
        }
    }
}

/// One line of the history panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub timestamp: String,
    pub delay: String,
    pub penalty: String,
    pub rule: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            timestamp: format_timestamp(&entry.timestamp),
            delay: format_delay(entry.delay),
            penalty: format_currency(entry.penalty),
            rule: entry.rule.clone(),
        }
    }
}

/// Thresholds panel content; unavailability is shown, never raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdPanel {
    Loaded { lines: Vec<String> },
    Unavailable { message: &'static str },
}

impl ThresholdPanel {
    pub fn from_config(config: Option<&ThresholdConfig>) -> Self {
        let Some(config) = config else {
            return Self::Unavailable {
                message: THRESHOLDS_UNAVAILABLE,
            };
        };

        let limits = &config.thresholds;
        let amounts = &config.amounts;
        let mut lines = vec![
            format!("No penalty: 0-{} minutes", limits.no_penalty_max),
            format!(
                "Fixed penalty: {}-{} minutes -> {}",
                limits.low_penalty_min,
                limits.low_penalty_max,
                format_currency(amounts.fixed_penalty)
            ),
            format!(
                "Progressive penalty: {}+ minutes -> {} + {}/min over {} minutes",
                limits.high_penalty_min,
                format_currency(amounts.high_penalty_base),
                format_currency(amounts.variable_rate),
                limits.low_penalty_max
            ),
            format!("Currency: {}", config.currency),
        ];
        if let Some(updated) = &config.last_updated {
            lines.push(format!("Last updated: {}", format_timestamp(updated)));
        }

        Self::Loaded { lines }
    }
}

impl Default for ThresholdPanel {
    fn default() -> Self {
        Self::from_config(None)
    }
}
