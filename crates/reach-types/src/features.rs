//! The feature contract between raw requests and the trained network

use serde::{Deserialize, Serialize};

/// Length of the padded token sequence
pub const SEQUENCE_LENGTH: usize = 80;

/// Vocabulary bound of the embedding table
pub const VOCAB_SIZE: usize = 30_000;

/// Token id used for padding; masked out by the network
pub const PAD_TOKEN_ID: u32 = 0;

/// Width of the numeric feature vector
pub const NUM_NUMERIC_FEATURES: usize = 6;

/// Hour used when `post_time` cannot be parsed
pub const DEFAULT_POST_HOUR: u32 = 12;

/// Day of week used when `post_date` cannot be parsed (Monday)
pub const DEFAULT_DAY_OF_WEEK: u32 = 0;

/// Positions of the numeric features. The order is the training-time order
/// and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFeature {
    PlatformId = 0,
    PostHour = 1,
    DayOfWeek = 2,
    IsWeekend = 3,
    FollowersLog = 4,
    AdBoost = 5,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; NUM_NUMERIC_FEATURES] = [
        NumericFeature::PlatformId,
        NumericFeature::PostHour,
        NumericFeature::DayOfWeek,
        NumericFeature::IsWeekend,
        NumericFeature::FollowersLog,
        NumericFeature::AdBoost,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericFeature::PlatformId => "platform_id",
            NumericFeature::PostHour => "post_hour",
            NumericFeature::DayOfWeek => "day_of_week",
            NumericFeature::IsWeekend => "is_weekend",
            NumericFeature::FollowersLog => "followers_log",
            NumericFeature::AdBoost => "ad_boost",
        }
    }
}

/// Network inputs for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatures {
    /// Token ids, right-padded with [`PAD_TOKEN_ID`]
    pub token_sequence: Vec<u32>,
    /// Numeric features in [`NumericFeature`] order
    pub numeric_vector: Vec<f32>,
}

impl EncodedFeatures {
    /// Value of a single numeric feature; `None` if the vector is short
    pub fn numeric(&self, feature: NumericFeature) -> Option<f32> {
        self.numeric_vector.get(feature.index()).copied()
    }

    /// Number of non-padding tokens
    pub fn token_count(&self) -> usize {
        self.token_sequence
            .iter()
            .filter(|&&id| id != PAD_TOKEN_ID)
            .count()
    }

    /// Shape check against the network contract
    pub fn has_expected_shape(&self) -> bool {
        self.token_sequence.len() == SEQUENCE_LENGTH
            && self.numeric_vector.len() == NUM_NUMERIC_FEATURES
    }
}
