use std::io::{self, Write};

use ai_bos::error::AppError;
use ai_bos::export::ExportFormat;
use ai_bos::form::{CalculationForm, ValidationError, MAX_DELAY_MINUTES};
use ai_bos::format::{format_currency, format_delay};
use ai_bos::notice::Recipient;
use ai_bos::ui::terminal::{render_history, render_result, render_thresholds};
use ai_bos::DashboardError;

use crate::cli::{CalculateArgs, HistoryArgs};
use crate::infra::ConsoleDashboard;

pub(crate) async fn calculate(
    dashboard: &mut ConsoleDashboard,
    args: CalculateArgs,
) -> Result<(), AppError> {
    let CalculateArgs {
        delay,
        service_type,
        contract_id,
        save,
        share,
        json,
        notify_email,
        notify_phone,
        notify_name,
    } = args;

    let form = CalculationForm::new(delay, service_type)
        .with_contract(contract_id.unwrap_or_default());
    let result = dashboard.calculate(&form).await?;

    if json {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, result).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        print_current(dashboard)?;
    }

    if save {
        dashboard.save_result()?;
    }
    if share {
        dashboard.share_result()?;
    }
    if notify_email.is_some() || notify_phone.is_some() {
        let recipient = Recipient {
            name: notify_name,
            email: notify_email,
            phone: notify_phone,
        };
        let receipt = dashboard.send_notice(&recipient)?;
        println!(
            "Notice {} (email: {}, sms: {})",
            receipt.notice_id, receipt.email_sent, receipt.sms_sent
        );
    }
    Ok(())
}

pub(crate) fn history(dashboard: &ConsoleDashboard, args: HistoryArgs) -> Result<(), AppError> {
    let rows = dashboard.ui().history();
    let shown = args.limit.map_or(rows.len(), |limit| limit.min(rows.len()));
    render_history(&rows[..shown], &mut io::stdout().lock())?;
    Ok(())
}

pub(crate) fn show(dashboard: &mut ConsoleDashboard, id: &str) -> Result<(), AppError> {
    dashboard.show_history_entry(id)?;
    print_current(dashboard)
}

pub(crate) fn export(dashboard: &ConsoleDashboard, format: ExportFormat) -> Result<(), AppError> {
    let path = dashboard.export_history(format)?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) async fn thresholds(dashboard: &mut ConsoleDashboard) -> Result<(), AppError> {
    dashboard.load_thresholds().await;
    render_thresholds(dashboard.ui().thresholds(), &mut io::stdout().lock())?;
    Ok(())
}

/// Batch results are not recorded in history.
pub(crate) async fn batch(dashboard: &ConsoleDashboard, delays: &[u32]) -> Result<(), AppError> {
    if let Some(delay) = delays.iter().find(|delay| **delay > MAX_DELAY_MINUTES) {
        let err = ValidationError::OutOfRange(i64::from(*delay));
        return Err(DashboardError::from(err).into());
    }

    let batch = dashboard.api().calculate_batch(delays).await?;
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "Batch {} ({} calculations)",
        batch.batch_id, batch.total_calculations
    )?;
    for item in &batch.results {
        writeln!(
            out,
            "- {:>12} | {:>12} | {}",
            format_delay(item.delay_minutes),
            format_currency(item.penalty_amount),
            item.rule_applied
        )?;
    }
    Ok(())
}

pub(crate) fn print_current(dashboard: &ConsoleDashboard) -> Result<(), AppError> {
    if let Some(view) = dashboard.ui().current_view() {
        render_result(view, &mut io::stdout().lock())?;
    }
    Ok(())
}
