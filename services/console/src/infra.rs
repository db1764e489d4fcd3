use std::io::{self, Write};
use std::sync::Arc;

use ai_bos::api::HttpPenaltyClient;
use ai_bos::config::AppConfig;
use ai_bos::error::AppError;
use ai_bos::export::ExportDirectory;
use ai_bos::share::{ShareChannels, ShareError, SharePayload, ShareTarget};
use ai_bos::storage::FileStore;
use ai_bos::ui::terminal::{render_loading, render_toast};
use ai_bos::ui::{Toast, ToastSink};
use ai_bos::Dashboard;
use tracing::debug;

pub(crate) type ConsoleDashboard = Dashboard<HttpPenaltyClient, FileStore>;

/// Toasts go to stderr so stdout stays clean for panels and exports.
#[derive(Default, Clone)]
pub(crate) struct TerminalToasts;

impl ToastSink for TerminalToasts {
    fn push(&self, toast: Toast) {
        if let Err(err) = render_toast(&toast, &mut io::stderr().lock()) {
            debug!(error = %err, "failed to print notification");
        }
    }
}

/// The terminal stands in for the clipboard: the summary is printed for copying.
#[derive(Default, Clone)]
pub(crate) struct TerminalClipboard;

impl ShareTarget for TerminalClipboard {
    fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}\n{}", payload.title, payload.text)
            .and_then(|()| out.flush())
            .map_err(|err| ShareError::Unavailable(err.to_string()))
    }
}

pub(crate) fn build_dashboard(config: &AppConfig) -> Result<ConsoleDashboard, AppError> {
    let client = HttpPenaltyClient::new(&config.api)?;
    let storage = FileStore::new(&config.storage.data_dir);
    let exports = ExportDirectory::new(config.storage.export_dir());

    let dashboard = Dashboard::new(client, storage, exports, Arc::new(TerminalToasts))
        .with_share(ShareChannels::clipboard_only(TerminalClipboard))
        .with_progress(|indicator| {
            if let Err(err) = render_loading(indicator, &mut io::stderr().lock()) {
                debug!(error = %err, "failed to print progress");
            }
        });
    Ok(dashboard)
}
