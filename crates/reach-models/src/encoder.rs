//! Feature encoding
//!
//! Turns raw request fields into the exact inputs the network was trained
//! on. Every function here is total: malformed dates, times and platform
//! names degrade to documented defaults rather than failing the request.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use reach_types::{
    EncodedFeatures, Platform, PredictionInput, Result, DEFAULT_DAY_OF_WEEK, DEFAULT_POST_HOUR,
    NUM_NUMERIC_FEATURES, PAD_TOKEN_ID, SEQUENCE_LENGTH, VOCAB_SIZE,
};
use tracing::debug;

use crate::tokenizer::TextTokenizer;

/// Category id for a platform name.
///
/// Unknown names share id 0 with Facebook. The trained network only knows
/// the five categories, so a separate "unknown" id would be out of
/// distribution.
pub fn platform_id(platform: &str) -> u32 {
    match Platform::from_name(platform) {
        Some(p) => p.id(),
        None => {
            debug!("Unknown platform '{}', using id 0", platform);
            0
        }
    }
}

/// Hour of day from exactly `HH:MM`; [`DEFAULT_POST_HOUR`] when unparseable.
///
/// Surrounding whitespace or a seconds field is not accepted.
pub fn post_hour(post_time: &str) -> u32 {
    if post_time.trim() != post_time {
        return DEFAULT_POST_HOUR;
    }
    NaiveTime::parse_from_str(post_time, "%H:%M")
        .map(|t| t.hour())
        .unwrap_or(DEFAULT_POST_HOUR)
}

fn parse_date(post_date: &str) -> Option<NaiveDate> {
    let s = post_date.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Day of week (0 = Monday … 6 = Sunday); [`DEFAULT_DAY_OF_WEEK`] when unparseable
pub fn day_of_week(post_date: &str) -> u32 {
    parse_date(post_date)
        .map(|d| d.weekday().num_days_from_monday())
        .unwrap_or(DEFAULT_DAY_OF_WEEK)
}

pub fn is_weekend(day_of_week: u32) -> bool {
    matches!(day_of_week, 5 | 6)
}

/// `log1p` of the follower count, with negatives clamped to zero
pub fn followers_log(followers: i64) -> f32 {
    (followers.max(0) as f64).ln_1p() as f32
}

/// Numeric feature vector in training order:
/// platform_id, post_hour, day_of_week, is_weekend, followers_log, ad_boost
pub fn encode_numeric(
    platform: &str,
    post_date: &str,
    post_time: &str,
    followers: i64,
    ad_boost: u8,
) -> [f32; NUM_NUMERIC_FEATURES] {
    let dow = day_of_week(post_date);
    [
        platform_id(platform) as f32,
        post_hour(post_time) as f32,
        dow as f32,
        if is_weekend(dow) { 1.0 } else { 0.0 },
        followers_log(followers),
        f32::from(ad_boost),
    ]
}

/// Truncate or right-pad to `len`, both at the tail
pub fn pad_sequence(mut ids: Vec<u32>, len: usize) -> Vec<u32> {
    ids.truncate(len);
    ids.resize(len, PAD_TOKEN_ID);
    ids
}

/// Padded token sequence for caption and content joined by a space.
///
/// Ids outside the embedding table are dropped before padding.
pub fn encode_text(tokenizer: &dyn TextTokenizer, caption: &str, content: &str) -> Result<Vec<u32>> {
    let text = format!("{} {}", caption, content);
    let ids: Vec<u32> = tokenizer
        .encode(text.trim())?
        .into_iter()
        .filter(|&id| (id as usize) < VOCAB_SIZE)
        .collect();
    Ok(pad_sequence(ids, SEQUENCE_LENGTH))
}

/// Encode a full request
pub fn encode(tokenizer: &dyn TextTokenizer, input: &PredictionInput) -> Result<EncodedFeatures> {
    let token_sequence = encode_text(tokenizer, &input.caption, &input.content)?;
    let numeric_vector = encode_numeric(
        &input.platform,
        &input.post_date,
        &input.post_time,
        input.followers,
        input.ad_boost,
    );
    Ok(EncodedFeatures {
        token_sequence,
        numeric_vector: numeric_vector.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_parsing() {
        assert_eq!(post_hour("09:30"), 9);
        assert_eq!(post_hour("23:59"), 23);
        assert_eq!(post_hour("9:05"), 9);
        assert_eq!(post_hour("bad-time"), 12);
        assert_eq!(post_hour("25:00"), 12);
        assert_eq!(post_hour("09:30:00"), 12);
        assert_eq!(post_hour(""), 12);
        assert_eq!(post_hour(" 14:30"), 12);
        assert_eq!(post_hour("14:30 "), 12);
    }

    #[test]
    fn date_parsing() {
        assert_eq!(day_of_week("2024-06-10"), 0); // Monday
        assert_eq!(day_of_week("2024-06-15"), 5); // Saturday
        assert_eq!(day_of_week("2024-06-16"), 6); // Sunday
        assert_eq!(day_of_week("2024-06-14T18:00:00"), 4);
        assert_eq!(day_of_week("not-a-date"), 0);
        assert_eq!(day_of_week("2024-02-30"), 0);
    }

    #[test]
    fn weekend_flag_for_every_day() {
        for dow in 0..7 {
            assert_eq!(is_weekend(dow), dow >= 5, "day {}", dow);
        }
    }

    #[test]
    fn followers_are_clamped_and_compressed() {
        assert_eq!(followers_log(0), 0.0);
        assert_eq!(followers_log(-10), 0.0);
        assert!((followers_log(1000) - 1001f32.ln()).abs() < 1e-5);
    }

    #[test]
    fn padding_and_truncation_at_tail() {
        assert_eq!(pad_sequence(vec![5, 6], 4), vec![5, 6, 0, 0]);
        assert_eq!(pad_sequence(vec![1, 2, 3, 4, 5], 3), vec![1, 2, 3]);
        assert_eq!(pad_sequence(Vec::new(), 2), vec![0, 0]);
    }
}
