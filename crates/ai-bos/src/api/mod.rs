//! Client for the remote penalty calculation service.

mod client;
pub mod types;

pub use client::{ApiError, HttpPenaltyClient, PenaltyApi};
pub use types::{
    AiExplanation, BatchCalculation, BatchItem, CalculationBreakdown, CalculationRequest,
    CalculationResult, InputData, PenaltyAmounts, PenaltyOutcome, PenaltyThresholds,
    ThresholdConfig,
};
