//! View state, display projections, and terminal rendering.

pub mod render;
mod state;
pub mod terminal;
mod toast;

pub use render::{
    BreakdownView, ExplanationView, HistoryRow, ResultView, ThresholdPanel,
    EXPLANATION_FALLBACK, NO_PENALTY_HEADLINE,
};
pub use state::{LoadingIndicator, Panels, TransitionError, UiController, ViewState, LOADING_STAGES};
pub use toast::{Toast, ToastLevel, ToastLog, ToastSink};
