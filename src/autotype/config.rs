//! Tunable thresholds for the autotype heuristics.
use serde::{Deserialize, Serialize};

/// Parameters of the autotype rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutotypeConfig {
    /// Distinct values allowed per non-missing row before a column stops
    /// counting as having "few" values.
    pub max_distinct_ratio: f64,

    /// Lower bound on the distinct-value threshold, so short columns can
    /// still be recognised as categorical.
    pub min_threshold: usize,
}

impl Default for AutotypeConfig {
    fn default() -> Self {
        Self {
            max_distinct_ratio: 0.1,
            min_threshold: 5,
        }
    }
}

impl AutotypeConfig {
    /// Sets the distinct-value ratio.
    #[must_use]
    pub fn with_max_distinct_ratio(mut self, ratio: f64) -> Self {
        self.max_distinct_ratio = ratio;
        self
    }

    /// Sets the minimum distinct-value threshold.
    #[must_use]
    pub fn with_min_threshold(mut self, n: usize) -> Self {
        self.min_threshold = n;
        self
    }

    /// Largest distinct count that still counts as "few" for a column with
    /// `nonmissing` present values.
    pub fn threshold(&self, nonmissing: usize) -> usize {
        let scaled = (self.max_distinct_ratio * nonmissing as f64).floor();
        let scaled = if scaled.is_finite() && scaled > 0.0 { scaled as usize } else { 0 };
        scaled.max(self.min_threshold)
    }

    /// Whether `distinct` values over `nonmissing` rows are few enough to be levels.
    pub fn has_few_distinct(&self, distinct: usize, nonmissing: usize) -> bool {
        distinct > 0 && distinct < nonmissing && distinct <= self.threshold(nonmissing)
    }
}
