use super::render::{HistoryRow, ResultView, ThresholdPanel};

/// Fixed progress stages shown while a calculation is pending.
pub const LOADING_STAGES: [&str; 4] = [
    "Validating input",
    "Applying business rules",
    "Generating AI explanation",
    "Preparing results",
];

/// Pending indicator advanced by the request lifecycle, not by a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingIndicator {
    stage: usize,
}

impl LoadingIndicator {
    fn start() -> Self {
        Self { stage: 0 }
    }

    pub fn stage(&self) -> &'static str {
        LOADING_STAGES[self.stage]
    }

    pub fn stage_index(&self) -> usize {
        self.stage
    }

    pub fn percent(&self) -> u8 {
        (((self.stage + 1) * 100) / LOADING_STAGES.len()) as u8
    }

    fn advance(&mut self) {
        self.stage = (self.stage + 1).min(LOADING_STAGES.len() - 1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading(LoadingIndicator),
    ResultsShown(Box<ResultView>),
}

/// Which panels are on screen for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub welcome: bool,
    pub results: bool,
    pub loading_overlay: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("a calculation is already in progress")]
    Busy,
    #[error("no calculation is in progress")]
    NotLoading,
}

/// Owns the view state plus the side panels refreshed alongside it.
#[derive(Debug, Clone)]
pub struct UiController {
    state: ViewState,
    history: Vec<HistoryRow>,
    thresholds: ThresholdPanel,
}

impl Default for UiController {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
            history: Vec::new(),
            thresholds: ThresholdPanel::default(),
        }
    }
}

impl UiController {
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn panels(&self) -> Panels {
        match self.state {
            ViewState::Idle => Panels {
                welcome: true,
                results: false,
                loading_overlay: false,
            },
            ViewState::Loading(_) => Panels {
                welcome: false,
                results: false,
                loading_overlay: true,
            },
            ViewState::ResultsShown(_) => Panels {
                welcome: false,
                results: true,
                loading_overlay: false,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading(_))
    }

    pub fn current_view(&self) -> Option<&ResultView> {
        match &self.state {
            ViewState::ResultsShown(view) => Some(view.as_ref()),
            _ => None,
        }
    }

    pub fn loading(&self) -> Option<&LoadingIndicator> {
        match &self.state {
            ViewState::Loading(indicator) => Some(indicator),
            _ => None,
        }
    }

    /// `Idle | ResultsShown -> Loading`.
    pub fn submit(&mut self) -> Result<(), TransitionError> {
        if self.is_loading() {
            return Err(TransitionError::Busy);
        }
        self.state = ViewState::Loading(LoadingIndicator::start());
        Ok(())
    }

    pub fn advance(&mut self) {
        if let ViewState::Loading(indicator) = &mut self.state {
            indicator.advance();
        }
    }

    /// `Loading -> ResultsShown`.
    pub fn succeed(&mut self, view: ResultView) -> Result<(), TransitionError> {
        if !self.is_loading() {
            return Err(TransitionError::NotLoading);
        }
        self.state = ViewState::ResultsShown(Box::new(view));
        Ok(())
    }

    /// `Loading -> Idle`.
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        if !self.is_loading() {
            return Err(TransitionError::NotLoading);
        }
        self.state = ViewState::Idle;
        Ok(())
    }

    /// `ResultsShown -> Idle`; a no-op when already idle.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        if self.is_loading() {
            return Err(TransitionError::Busy);
        }
        self.state = ViewState::Idle;
        Ok(())
    }

    /// Re-displays a stored result without a request round-trip.
    pub fn show_stored(&mut self, view: ResultView) -> Result<(), TransitionError> {
        if self.is_loading() {
            return Err(TransitionError::Busy);
        }
        self.state = ViewState::ResultsShown(Box::new(view));
        Ok(())
    }

    pub fn history(&self) -> &[HistoryRow] {
        &self.history
    }

    pub fn refresh_history(&mut self, rows: Vec<HistoryRow>) {
        self.history = rows;
    }

    pub fn thresholds(&self) -> &ThresholdPanel {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, panel: ThresholdPanel) {
        self.thresholds = panel;
    }
}
