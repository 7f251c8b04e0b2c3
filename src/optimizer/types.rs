use serde::{Deserialize, Serialize};

use super::policy::{DispatchMode, ThresholdPolicy};
use crate::domain::DispatchStep;

/// Day-ahead battery schedule with its cost comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchPlan {
    pub mode: DispatchMode,
    /// Thresholds of the winning candidate; `None` for an empty plan
    pub policy: Option<ThresholdPolicy>,
    pub steps: Vec<DispatchStep>,
    pub baseline_cost: f64,
    pub optimized_cost: f64,
    pub savings: f64,
    /// Whether the daily savings target was reached; `None` without a target
    pub target_met: Option<bool>,
}

impl DispatchPlan {
    pub fn empty(mode: DispatchMode) -> Self {
        Self {
            mode,
            policy: None,
            steps: Vec::new(),
            baseline_cost: 0.0,
            optimized_cost: 0.0,
            savings: 0.0,
            target_met: None,
        }
    }

    pub fn from_steps(mode: DispatchMode, policy: ThresholdPolicy, steps: Vec<DispatchStep>) -> Self {
        let baseline_cost: f64 = steps.iter().map(DispatchStep::baseline_cost).sum();
        let optimized_cost: f64 = steps.iter().map(DispatchStep::optimized_cost).sum();
        Self {
            mode,
            policy: Some(policy),
            steps,
            baseline_cost,
            optimized_cost,
            savings: baseline_cost - optimized_cost,
            target_met: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
