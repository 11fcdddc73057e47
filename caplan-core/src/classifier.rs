//! Strategy classifier: an ordered decision table over the four factors.
//!
//! Rules are evaluated top to bottom and the first match wins. The conditions
//! overlap (a stable, flexible, low-risk route satisfies both rule 1 and rule
//! 2), so the order is part of the contract:
//!
//! 1. stability > 0.7, cost exposure < 0.5, delay risk < 0.3 → MaximizeUtilization
//! 2. flexibility > 0.7, delay risk < 0.4 → DynamicBuffer
//! 3. delay risk > 0.5 or cost exposure > 0.7 → ConservativeLoading
//! 4. anything else → BalancedAllocation
//!
//! Every comparison is strict.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::factors::FactorScores;

pub const MAXIMIZE_MIN_STABILITY: f64 = 0.7;
pub const MAXIMIZE_MAX_COST_EXPOSURE: f64 = 0.5;
pub const MAXIMIZE_MAX_DELAY_RISK: f64 = 0.3;
pub const BUFFER_MIN_FLEXIBILITY: f64 = 0.7;
pub const BUFFER_MAX_DELAY_RISK: f64 = 0.4;
pub const CONSERVATIVE_MIN_DELAY_RISK: f64 = 0.5;
pub const CONSERVATIVE_MIN_COST_EXPOSURE: f64 = 0.7;

/// Capacity-commitment strategy recommended for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    MaximizeUtilization,
    DynamicBuffer,
    ConservativeLoading,
    BalancedAllocation,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::MaximizeUtilization,
        Strategy::DynamicBuffer,
        Strategy::ConservativeLoading,
        Strategy::BalancedAllocation,
    ];

    /// Human-readable label, e.g. "Dynamic Buffer".
    pub fn label(&self) -> &'static str {
        match self {
            Self::MaximizeUtilization => "Maximize Utilization",
            Self::DynamicBuffer => "Dynamic Buffer",
            Self::ConservativeLoading => "Conservative Loading",
            Self::BalancedAllocation => "Balanced Allocation",
        }
    }

    /// Stable machine name, e.g. `dynamic_buffer`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaximizeUtilization => "maximize_utilization",
            Self::DynamicBuffer => "dynamic_buffer",
            Self::ConservativeLoading => "conservative_loading",
            Self::BalancedAllocation => "balanced_allocation",
        }
    }

    /// Keyword match used for free-text strategy columns in plan tables.
    ///
    /// Anything that names none of the first three strategies reads as
    /// `BalancedAllocation`.
    pub fn from_label_lenient(label: &str) -> Self {
        if label.contains("Maximize") {
            Self::MaximizeUtilization
        } else if label.contains("Buffer") {
            Self::DynamicBuffer
        } else if label.contains("Conservative") {
            Self::ConservativeLoading
        } else {
            Self::BalancedAllocation
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}'")]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    /// Accepts the display label or the snake_case name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|st| st.label().eq_ignore_ascii_case(wanted) || st.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

/// Which row of the decision table produced a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionRule {
    /// Rule 1: strong, cheap, reliable demand.
    StrongSignal,
    /// Rule 2: flexible flight with acceptable delay risk.
    FlexibleCapacity,
    /// Rule 3: high delay risk or high fixed-cost exposure.
    RiskAverse,
    /// Rule 4: residual bucket.
    Residual,
}

impl DecisionRule {
    /// Position in the decision table, 1-based.
    pub fn number(&self) -> u8 {
        match self {
            Self::StrongSignal => 1,
            Self::FlexibleCapacity => 2,
            Self::RiskAverse => 3,
            Self::Residual => 4,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::StrongSignal => Strategy::MaximizeUtilization,
            Self::FlexibleCapacity => Strategy::DynamicBuffer,
            Self::RiskAverse => Strategy::ConservativeLoading,
            Self::Residual => Strategy::BalancedAllocation,
        }
    }
}

/// Strategy plus the rule that selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub strategy: Strategy,
    pub rule: DecisionRule,
}

/// Find the first decision-table rule that matches `scores`.
pub fn matching_rule(scores: &FactorScores) -> DecisionRule {
    if scores.demand_stability > MAXIMIZE_MIN_STABILITY
        && scores.cost_exposure < MAXIMIZE_MAX_COST_EXPOSURE
        && scores.delay_risk < MAXIMIZE_MAX_DELAY_RISK
    {
        DecisionRule::StrongSignal
    } else if scores.flexibility > BUFFER_MIN_FLEXIBILITY && scores.delay_risk < BUFFER_MAX_DELAY_RISK {
        DecisionRule::FlexibleCapacity
    } else if scores.delay_risk > CONSERVATIVE_MIN_DELAY_RISK
        || scores.cost_exposure > CONSERVATIVE_MIN_COST_EXPOSURE
    {
        DecisionRule::RiskAverse
    } else {
        DecisionRule::Residual
    }
}

pub fn classify_strategy(scores: &FactorScores) -> Strategy {
    matching_rule(scores).strategy()
}

pub fn classify_with_rule(scores: &FactorScores) -> Classification {
    let rule = matching_rule(scores);
    Classification {
        strategy: rule.strategy(),
        rule,
    }
}
