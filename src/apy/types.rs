use serde::{Deserialize, Serialize};

use crate::oracle::RateSample;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Two samples of the same source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldWindow {
    pub start: RateSample,
    pub end: RateSample,
}

impl YieldWindow {
    pub fn new(start: RateSample, end: RateSample) -> Self {
        Self { start, end }
    }

    /// Whole days covered, `None` when the window runs backwards or is empty
    pub fn days(&self) -> Option<u64> {
        if self.start.timestamp >= self.end.timestamp {
            return None;
        }
        Some((self.end.timestamp - self.start.timestamp) / SECONDS_PER_DAY)
    }
}

/// Annualized growth of a rate over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowYield {
    /// Compounded annual rate as a fraction (0.05 = 5%)
    pub annualized_rate: f64,
    pub days: u64,
    /// Raw change over the window, in percent
    pub percent_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum YieldOutcome {
    Resolved(WindowYield),
    /// The source could not be priced; it contributes nothing to the total
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceYield {
    pub source: String,
    pub outcome: YieldOutcome,
}

impl SourceYield {
    pub fn annualized_rate(&self) -> Option<f64> {
        match &self.outcome {
            YieldOutcome::Resolved(window) => Some(window.annualized_rate),
            YieldOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.outcome, YieldOutcome::Resolved(_))
    }
}

/// Per-source yields of a vault whose return stacks several rate curves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeYield {
    pub components: Vec<SourceYield>,
}

impl CompositeYield {
    /// Sum of the resolved annualized rates
    ///
    /// A plain sum rather than a geometric blend; unavailable sources add 0.
    pub fn total(&self) -> f64 {
        self.components
            .iter()
            .filter_map(SourceYield::annualized_rate)
            .sum()
    }

    pub fn component(&self, source: &str) -> Option<&SourceYield> {
        self.components.iter().find(|c| c.source == source)
    }

    pub fn unavailable(&self) -> impl Iterator<Item = &SourceYield> {
        self.components.iter().filter(|c| !c.is_available())
    }
}
