//! Prediction targets and results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of predicted targets
pub const NUM_TARGETS: usize = 5;

/// Engagement metrics predicted by the model, in output-vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Likes,
    Comments,
    Shares,
    Clicks,
    TimingQualityScore,
}

impl Target {
    pub const ALL: [Target; NUM_TARGETS] = [
        Target::Likes,
        Target::Comments,
        Target::Shares,
        Target::Clicks,
        Target::TimingQualityScore,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Target::Likes => "likes",
            Target::Comments => "comments",
            Target::Shares => "shares",
            Target::Clicks => "clicks",
            Target::TimingQualityScore => "timing_quality_score",
        }
    }

    /// Count-like targets were trained in log1p space
    pub fn is_log_transformed(self) -> bool {
        !matches!(self, Target::TimingQualityScore)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final metrics: non-negative, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
    pub clicks: f64,
    pub timing_quality_score: f64,
}

impl PredictionOutput {
    /// Build from values in [`Target::ALL`] order
    pub fn from_values(values: [f64; NUM_TARGETS]) -> Self {
        Self {
            likes: values[0],
            comments: values[1],
            shares: values[2],
            clicks: values[3],
            timing_quality_score: values[4],
        }
    }

    pub fn get(&self, target: Target) -> f64 {
        match target {
            Target::Likes => self.likes,
            Target::Comments => self.comments,
            Target::Shares => self.shares,
            Target::Clicks => self.clicks,
            Target::TimingQualityScore => self.timing_quality_score,
        }
    }

    /// Values in [`Target::ALL`] order
    pub fn values(&self) -> [f64; NUM_TARGETS] {
        Target::ALL.map(|t| self.get(t))
    }

    /// `(target, value)` pairs in target order
    pub fn iter(&self) -> impl Iterator<Item = (Target, f64)> + '_ {
        Target::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}
