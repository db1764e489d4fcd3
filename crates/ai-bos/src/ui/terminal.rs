//! Plain-text rendering of dashboard panels.

use std::io::{self, Write};

use super::render::{BreakdownView, HistoryRow, ResultView, ThresholdPanel};
use super::state::{LoadingIndicator, ViewState, LOADING_STAGES};
use super::toast::Toast;

pub fn render_welcome(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "AI-BOS penalty calculator")?;
    writeln!(
        out,
        "Enter a delay (0-1440 minutes) and service type to calculate a penalty."
    )
}

pub fn render_loading(indicator: &LoadingIndicator, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "[{:>3}%] {} ({}/{})",
        indicator.percent(),
        indicator.stage(),
        indicator.stage_index() + 1,
        LOADING_STAGES.len()
    )
}

pub fn render_result(view: &ResultView, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Calculation {}", view.request_id)?;
    writeln!(out, "  Calculated at : {}", view.calculated_at)?;
    writeln!(out, "  Delay         : {}", view.delay)?;
    writeln!(out, "  Service type  : {}", view.service_type)?;
    if let Some(contract) = &view.contract_id {
        writeln!(out, "  Contract      : {contract}")?;
    }
    writeln!(out, "  Status        : {}", view.status_label)?;
    writeln!(out, "  Penalty       : {}", view.penalty_amount)?;
    writeln!(out, "  Rule applied  : {}", view.rule_applied)?;
    if let Some(description) = &view.rule_description {
        writeln!(out, "  Rule detail   : {description}")?;
    }
    writeln!(out, "  Threshold     : {}", view.threshold_status)?;
    if view.critical_delay {
        writeln!(out, "  Critical delay: yes")?;
    }

    writeln!(out, "\nBreakdown")?;
    match &view.breakdown {
        BreakdownView::Charged {
            base_amount,
            variable_amount,
            overage_minutes,
            per_minute_rate,
            total,
        } => {
            writeln!(out, "  Base amount     : {base_amount}")?;
            writeln!(out, "  Variable amount : {variable_amount}")?;
            if let Some(minutes) = overage_minutes {
                writeln!(out, "  Overage         : {minutes}")?;
            }
            if let Some(rate) = per_minute_rate {
                writeln!(out, "  Rate            : {rate}")?;
            }
            writeln!(out, "  Total           : {total}")?;
        }
        BreakdownView::NoPenalty { headline, detail } => {
            writeln!(out, "  {headline}")?;
            writeln!(out, "  {detail}")?;
        }
    }

    writeln!(out, "\nAI explanation ({} confidence)", view.explanation.confidence)?;
    writeln!(out, "  {}", view.explanation.text)?;
    if let Some(model) = &view.explanation.model {
        writeln!(out, "  Model: {model}")?;
    }
    Ok(())
}

pub fn render_history(rows: &[HistoryRow], out: &mut impl Write) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "History: no calculations yet");
    }

    writeln!(out, "History ({} most recent first)", rows.len())?;
    for row in rows {
        writeln!(
            out,
            "- {} | {} | {} | {} | {}",
            row.timestamp, row.delay, row.penalty, row.rule, row.id
        )?;
    }
    Ok(())
}

pub fn render_thresholds(panel: &ThresholdPanel, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Penalty thresholds")?;
    match panel {
        ThresholdPanel::Loaded { lines } => {
            for line in lines {
                writeln!(out, "- {line}")?;
            }
            Ok(())
        }
        ThresholdPanel::Unavailable { message } => writeln!(out, "  {message}"),
    }
}

pub fn render_toast(toast: &Toast, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "[{}] {}", toast.level.label(), toast.message)
}

/// Draws whichever main panel the state calls for.
pub fn render_state(state: &ViewState, out: &mut impl Write) -> io::Result<()> {
    match state {
        ViewState::Idle => render_welcome(out),
        ViewState::Loading(indicator) => render_loading(indicator, out),
        ViewState::ResultsShown(view) => render_result(view, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CalculationResult, InputData, PenaltyOutcome};
    use crate::ui::render::EXPLANATION_FALLBACK;

    fn no_penalty_view() -> ResultView {
        ResultView::from_result(&CalculationResult {
            request_id: "req-10".to_string(),
            timestamp: "2026-10-18T10:00:00".to_string(),
            input_data: InputData {
                delay_minutes: 10,
                service_type: Some("express".to_string()),
                contract_id: None,
            },
            calculation_result: PenaltyOutcome {
                penalty_applied: false,
                penalty_amount: 0.0,
                rule_applied: "no_penalty_threshold".to_string(),
                rule_description: None,
                calculation_breakdown: None,
                threshold_exceeded: false,
                exceeded_by_minutes: 0,
                critical_delay: false,
                service_type: None,
            },
            ai_explanation: None,
            notifications_sent: false,
        })
    }

    fn rendered(view: &ResultView) -> String {
        let mut buffer = Vec::new();
        render_result(view, &mut buffer).expect("render succeeds");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn no_penalty_result_prints_fallbacks() {
        let text = rendered(&no_penalty_view());
        assert!(text.contains("No Penalty Applied"));
        assert!(!text.contains("Base amount"));
        assert!(text.contains(EXPLANATION_FALLBACK));
        assert!(text.contains("(0% confidence)"));
        assert!(text.contains("Service type  : express"));
    }

    #[test]
    fn empty_history_has_placeholder() {
        let mut buffer = Vec::new();
        render_history(&[], &mut buffer).expect("render succeeds");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "History: no calculations yet\n"
        );
    }
}
