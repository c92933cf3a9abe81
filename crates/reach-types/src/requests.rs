//! Prediction request types

use crate::{ReachError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Social platforms known to the trained model.
///
/// Discriminants are the category codes used at training time: the platform
/// names sorted alphabetically. Changing them silently breaks the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Facebook = 0,
    Instagram = 1,
    TikTok = 2,
    Twitter = 3,
    YouTube = 4,
}

impl Platform {
    /// All platforms, in id order
    pub const ALL: [Platform; 5] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::TikTok,
        Platform::Twitter,
        Platform::YouTube,
    ];

    /// Look up a platform by its exact (case-sensitive) name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Category id fed to the model
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Twitter => "Twitter",
            Platform::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw fields of a planned post.
///
/// `platform`, `post_date` and `post_time` stay as the caller sent them:
/// malformed values degrade to documented defaults during feature encoding
/// instead of failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Post caption text
    pub caption: String,
    /// Post content / body text
    pub content: String,
    /// Social media platform name
    pub platform: String,
    /// Scheduled post date (YYYY-MM-DD)
    pub post_date: String,
    /// Scheduled post time (HH:MM, 24-hour)
    pub post_time: String,
    /// Page / account follower count
    pub followers: i64,
    /// 1 if the post will be boosted, 0 otherwise
    pub ad_boost: u8,
}

impl PredictionInput {
    /// Create a request with neutral scheduling fields
    pub fn new(
        caption: impl Into<String>,
        content: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            caption: caption.into(),
            content: content.into(),
            platform: platform.into(),
            post_date: String::new(),
            post_time: String::new(),
            followers: 0,
            ad_boost: 0,
        }
    }

    /// Set the scheduled date and time
    pub fn with_schedule(mut self, post_date: impl Into<String>, post_time: impl Into<String>) -> Self {
        self.post_date = post_date.into();
        self.post_time = post_time.into();
        self
    }

    /// Set the follower count
    pub fn with_followers(mut self, followers: i64) -> Self {
        self.followers = followers;
        self
    }

    /// Set the ad boost flag
    pub fn with_ad_boost(mut self, boosted: bool) -> Self {
        self.ad_boost = u8::from(boosted);
        self
    }

    /// Schema checks performed at the service boundary.
    ///
    /// Formatting problems in the date, time and platform fields are not
    /// errors; only values outside the request contract are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.followers < 0 {
            return Err(ReachError::request_validation(format!(
                "followers must be >= 0, got {}",
                self.followers
            )));
        }
        if self.ad_boost > 1 {
            return Err(ReachError::request_validation(format!(
                "ad_boost must be 0 or 1, got {}",
                self.ad_boost
            )));
        }
        Ok(())
    }
}
