//! Bounded quality score value object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Quality score clamped to `[0, 100]` with an optional named breakdown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityScore {
    value: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    breakdown: BTreeMap<String, f64>,
}

impl QualityScore {
    /// Create a score, clamping the value into the valid range.
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 100.0),
            breakdown: BTreeMap::new(),
        }
    }

    /// Create a score with named component contributions.
    pub fn with_breakdown(value: f64, breakdown: BTreeMap<String, f64>) -> Self {
        Self {
            value: value.clamp(0.0, 100.0),
            breakdown,
        }
    }

    /// Weighted average of named components.
    pub fn from_components(
        weights: &BTreeMap<String, f64>,
        scores: &BTreeMap<String, f64>,
    ) -> Self {
        let total_weight: f64 = weights.values().sum();
        if total_weight == 0.0 {
            return Self::zero();
        }
        let weighted_sum: f64 = weights
            .iter()
            .map(|(name, weight)| weight * scores.get(name).copied().unwrap_or(0.0))
            .sum();
        Self::with_breakdown(weighted_sum / total_weight, scores.clone())
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }

    pub fn perfect() -> Self {
        Self::new(100.0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn breakdown(&self) -> &BTreeMap<String, f64> {
        &self.breakdown
    }

    /// Letter grade: A >= 90, B >= 80, C >= 70, D >= 60, else F.
    pub fn grade(&self) -> char {
        match self.value {
            v if v >= 90.0 => 'A',
            v if v >= 80.0 => 'B',
            v if v >= 70.0 => 'C',
            v if v >= 60.0 => 'D',
            _ => 'F',
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.value >= 70.0
    }

    /// Add a bonus (clamped), recording it in the breakdown under `reason`.
    pub fn with_bonus(&self, bonus: f64, reason: &str) -> Self {
        let mut breakdown = self.breakdown.clone();
        if !reason.is_empty() {
            breakdown.insert(reason.to_string(), bonus);
        }
        Self::with_breakdown(self.value + bonus, breakdown)
    }
}
