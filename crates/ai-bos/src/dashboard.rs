//! User-triggered actions composing the client, history, and view state.
//!
//! Every handler recovers its own failures: the error is turned into a toast
//! before being returned, so callers may ignore the `Err` without losing the
//! user-facing report.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::api::{ApiError, CalculationResult, PenaltyApi};
use crate::export::{ExportDirectory, ExportError, ExportFormat};
use crate::form::{CalculationForm, ValidationError};
use crate::format::format_currency;
use crate::history::HistoryStore;
use crate::notice::{
    NoticeContent, NoticeDispatcher, NoticeError, NoticeReceipt, Recipient, SimulatedDispatcher,
};
use crate::share::{MemoryClipboard, ShareChannels, ShareError, ShareOutcome, SharePayload};
use crate::storage::KeyValueStore;
use crate::ui::{
    HistoryRow, LoadingIndicator, ResultView, ThresholdPanel, Toast, ToastLevel, ToastSink,
    TransitionError, UiController,
};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("calculation failed: {0}")]
    Api(#[from] ApiError),
    #[error("no calculation result to {0}")]
    NoResult(&'static str),
    #[error("no history entry with id '{0}'")]
    UnknownEntry(String),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error(transparent)]
    Notice(#[from] NoticeError),
}

type ProgressHook = Box<dyn Fn(&LoadingIndicator)>;

/// Application context handed to every action.
pub struct Dashboard<A, S> {
    api: A,
    history: HistoryStore<S>,
    ui: UiController,
    current: Option<CalculationResult>,
    toasts: Arc<dyn ToastSink>,
    exports: ExportDirectory,
    share: ShareChannels,
    notices: Arc<dyn NoticeDispatcher>,
    progress: Option<ProgressHook>,
}

impl<A, S> Dashboard<A, S>
where
    A: PenaltyApi,
    S: KeyValueStore,
{
    pub fn new(api: A, storage: S, exports: ExportDirectory, toasts: Arc<dyn ToastSink>) -> Self {
        let mut dashboard = Self {
            api,
            history: HistoryStore::load(storage),
            ui: UiController::default(),
            current: None,
            toasts,
            exports,
            share: ShareChannels::clipboard_only(MemoryClipboard::default()),
            notices: Arc::new(SimulatedDispatcher::default()),
            progress: None,
        };
        dashboard.refresh_history();
        dashboard
    }

    pub fn with_share(mut self, share: ShareChannels) -> Self {
        self.share = share;
        self
    }

    pub fn with_notices(mut self, notices: Arc<dyn NoticeDispatcher>) -> Self {
        self.notices = notices;
        self
    }

    /// Called each time the pending indicator moves.
    pub fn with_progress(mut self, hook: impl Fn(&LoadingIndicator) + 'static) -> Self {
        self.progress = Some(Box::new(hook));
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn ui(&self) -> &UiController {
        &self.ui
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn current(&self) -> Option<&CalculationResult> {
        self.current.as_ref()
    }

    /// Validate, call the service, then render and record the result.
    ///
    /// Dropping the future while the request is in flight returns the view
    /// to `Idle`.
    pub async fn calculate(
        &mut self,
        form: &CalculationForm,
    ) -> Result<&CalculationResult, DashboardError> {
        let request = match form.validate() {
            Ok(request) => request,
            Err(err) => {
                self.toast(ToastLevel::Error, err.to_string());
                return Err(err.into());
            }
        };

        if let Err(err) = self.ui.submit() {
            self.toast(ToastLevel::Warning, err.to_string());
            return Err(err.into());
        }
        self.report_progress();

        info!(
            delay_minutes = request.delay_minutes,
            service_type = %request.service_type,
            "calculation submitted"
        );
        self.ui.advance();
        self.report_progress();

        let pending = PendingRequest::new(&mut self.ui);
        let outcome = self.api.calculate(&request).await;
        pending.settle();

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                let _ = self.ui.fail();
                warn!(error = %err, status = ?err.status(), "calculation failed");
                self.toast(ToastLevel::Error, format!("Calculation failed: {err}"));
                return Err(err.into());
            }
        };

        self.ui.advance();
        self.report_progress();
        self.ui.advance();
        self.report_progress();

        self.ui.succeed(ResultView::from_result(&result))?;
        self.history.record_result(&result);
        self.refresh_history();

        info!(
            request_id = %result.request_id,
            penalty_applied = result.calculation_result.penalty_applied,
            penalty_amount = result.penalty_amount(),
            "calculation completed"
        );
        self.toast(
            ToastLevel::Success,
            format!(
                "Calculation complete: {}",
                format_currency(result.penalty_amount())
            ),
        );

        Ok(&*self.current.insert(result))
    }

    /// Back to the welcome panel with no current result.
    pub fn reset(&mut self) -> Result<(), DashboardError> {
        if let Err(err) = self.ui.reset() {
            self.toast(ToastLevel::Warning, err.to_string());
            return Err(err.into());
        }
        self.current = None;
        self.toast(ToastLevel::Info, "Calculator reset");
        Ok(())
    }

    pub fn save_result(&self) -> Result<PathBuf, DashboardError> {
        let result = self.require_current("save")?;
        match self.exports.save_result(result) {
            Ok(path) => {
                self.toast(
                    ToastLevel::Success,
                    format!("Result saved to {}", path.display()),
                );
                Ok(path)
            }
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Save failed: {err}"));
                Err(err.into())
            }
        }
    }

    pub fn share_result(&self) -> Result<ShareOutcome, DashboardError> {
        let result = self.require_current("share")?;
        let payload = SharePayload::for_result(result);
        match self.share.share(&payload) {
            Ok(ShareOutcome::Shared) => {
                self.toast(ToastLevel::Success, "Result shared");
                Ok(ShareOutcome::Shared)
            }
            Ok(ShareOutcome::Copied) => {
                self.toast(ToastLevel::Success, "Result copied to clipboard");
                Ok(ShareOutcome::Copied)
            }
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Share failed: {err}"));
                Err(err.into())
            }
        }
    }

    /// Writes the whole history plus the threshold snapshot.
    pub fn export_history(&self, format: ExportFormat) -> Result<PathBuf, DashboardError> {
        match self
            .exports
            .export_history(self.history.entries(), format, Local::now())
        {
            Ok(path) => {
                self.toast(
                    ToastLevel::Success,
                    format!("History exported to {}", path.display()),
                );
                Ok(path)
            }
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Export failed: {err}"));
                Err(err.into())
            }
        }
    }

    pub fn send_notice(&self, recipient: &Recipient) -> Result<NoticeReceipt, DashboardError> {
        let result = self.require_current("notify about")?;
        let at = Local::now();
        let content = NoticeContent::prepare(result, recipient, at);

        match self.notices.dispatch(recipient, &content, at) {
            Ok(receipt) => {
                self.toast(
                    ToastLevel::Success,
                    format!("Notice {} sent", receipt.notice_id),
                );
                Ok(receipt)
            }
            Err(err) => {
                self.toast(ToastLevel::Error, format!("Notice not sent: {err}"));
                Err(err.into())
            }
        }
    }

    /// Re-displays a stored calculation without calling the service.
    pub fn show_history_entry(&mut self, id: &str) -> Result<&CalculationResult, DashboardError> {
        let Some(result) = self.history.recall(id).cloned() else {
            self.toast(ToastLevel::Warning, format!("No history entry {id}"));
            return Err(DashboardError::UnknownEntry(id.to_string()));
        };

        if let Err(err) = self.ui.show_stored(ResultView::from_result(&result)) {
            self.toast(ToastLevel::Warning, err.to_string());
            return Err(err.into());
        }
        Ok(&*self.current.insert(result))
    }

    /// Optional enrichment: a failed fetch shows the fallback panel silently.
    pub async fn load_thresholds(&mut self) -> bool {
        let config = self.api.thresholds().await;
        let loaded = config.is_some();
        self.ui
            .set_thresholds(ThresholdPanel::from_config(config.as_ref()));
        loaded
    }

    fn require_current(&self, action: &'static str) -> Result<&CalculationResult, DashboardError> {
        self.current.as_ref().ok_or_else(|| {
            self.toast(ToastLevel::Warning, format!("No calculation result to {action}"));
            DashboardError::NoResult(action)
        })
    }

    fn refresh_history(&mut self) {
        let rows = self.history.entries().map(HistoryRow::from).collect();
        self.ui.refresh_history(rows);
    }

    fn report_progress(&self) {
        if let (Some(hook), Some(indicator)) = (&self.progress, self.ui.loading()) {
            hook(indicator);
        }
    }

    fn toast(&self, level: ToastLevel, message: impl Into<String>) {
        self.toasts.push(Toast::new(level, message));
    }
}

/// Returns the controller to `Idle` unless the request settled.
struct PendingRequest<'a> {
    ui: &'a mut UiController,
    settled: bool,
}

impl<'a> PendingRequest<'a> {
    fn new(ui: &'a mut UiController) -> Self {
        Self { ui, settled: false }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if !self.settled && self.ui.fail().is_ok() {
            warn!("calculation abandoned before the service responded");
        }
    }
}
