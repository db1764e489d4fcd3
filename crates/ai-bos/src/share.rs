use std::sync::{Arc, Mutex};

use crate::api::CalculationResult;
use crate::format::{format_currency, format_delay};

/// Text handed to whichever share channel is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
}

impl SharePayload {
    pub fn for_result(result: &CalculationResult) -> Self {
        let mut text = format!(
            "AI-BOS penalty calculation\nDelay: {}\nPenalty: {}\nRule: {}",
            format_delay(result.delay_minutes()),
            format_currency(result.penalty_amount()),
            result.calculation_result.rule_applied,
        );
        if let Some(ai) = &result.ai_explanation {
            text.push_str(&format!("\nExplanation: {}", ai.explanation));
        }
        text.push_str(&format!("\nReference: {}", result.request_id));

        Self {
            title: "AI-BOS Penalty Calculation".to_string(),
            text,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share cancelled")]
    Cancelled,
    #[error("share channel unavailable: {0}")]
    Unavailable(String),
}

pub trait ShareTarget {
    fn share(&self, payload: &SharePayload) -> Result<(), ShareError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
}

/// Native share when the host offers one, clipboard otherwise.
pub struct ShareChannels {
    native: Option<Box<dyn ShareTarget>>,
    clipboard: Box<dyn ShareTarget>,
}

impl ShareChannels {
    pub fn clipboard_only(clipboard: impl ShareTarget + 'static) -> Self {
        Self {
            native: None,
            clipboard: Box::new(clipboard),
        }
    }

    pub fn with_native(mut self, native: impl ShareTarget + 'static) -> Self {
        self.native = Some(Box::new(native));
        self
    }

    /// Single best-effort attempt; a failing native share does not fall
    /// through to the clipboard.
    pub fn share(&self, payload: &SharePayload) -> Result<ShareOutcome, ShareError> {
        match &self.native {
            Some(native) => native.share(payload).map(|()| ShareOutcome::Shared),
            None => self
                .clipboard
                .share(payload)
                .map(|()| ShareOutcome::Copied),
        }
    }
}

/// Clipboard kept in memory; clones observe the same contents.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ShareTarget for MemoryClipboard {
    fn share(&self, payload: &SharePayload) -> Result<(), ShareError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| ShareError::Unavailable("clipboard mutex poisoned".to_string()))?;
        *guard = Some(payload.text.clone());
        Ok(())
    }
}
