use std::collections::HashMap;

use reach_models::{encode, encode_numeric, encode_text, platform_id, WordIndexTokenizer};
use reach_types::*;

fn tokenizer() -> WordIndexTokenizer {
    let words = ["summer", "sale", "shop", "now", "big", "deals"];
    let index: HashMap<String, u32> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.to_string(), i as u32 + 1))
        .collect();
    WordIndexTokenizer::new(index, None)
}

#[test]
fn known_platforms_map_to_table_ids() {
    let table = [
        ("Facebook", 0),
        ("Instagram", 1),
        ("TikTok", 2),
        ("Twitter", 3),
        ("YouTube", 4),
    ];
    for (name, id) in table {
        assert_eq!(platform_id(name), id);
        let v = encode_numeric(name, "2024-06-10", "09:30", 10, 0);
        assert_eq!(v[NumericFeature::PlatformId.index()], id as f32);
    }
}

#[test]
fn unknown_platforms_map_to_zero() {
    for name in ["LinkedIn", "instagram", "", "YOUTUBE"] {
        let v = encode_numeric(name, "2024-06-10", "09:30", 10, 0);
        assert_eq!(v[0], 0.0, "{name}");
    }
}

#[test]
fn instagram_monday_morning_scenario() {
    let v = encode_numeric("Instagram", "2024-06-10", "09:30", 1000, 0);
    assert_eq!(&v[..4], &[1.0, 9.0, 0.0, 0.0]);
    assert!((v[4] - 6.9088).abs() < 1e-3);
    assert_eq!(v[5], 0.0);
}

#[test]
fn malformed_schedule_uses_defaults() {
    let v = encode_numeric("Twitter", "not-a-date", "bad-time", 0, 1);
    assert_eq!(v[NumericFeature::PostHour.index()], 12.0);
    assert_eq!(v[NumericFeature::DayOfWeek.index()], 0.0);
    assert_eq!(v[NumericFeature::IsWeekend.index()], 0.0);
    assert_eq!(v[NumericFeature::AdBoost.index()], 1.0);
}

#[test]
fn weekend_flag_tracks_day_of_week() {
    // 2024-06-10 is a Monday
    for offset in 0..7 {
        let date = format!("2024-06-{:02}", 10 + offset);
        let v = encode_numeric("Facebook", &date, "12:00", 0, 0);
        assert_eq!(v[2], offset as f32);
        assert_eq!(v[3], if offset >= 5 { 1.0 } else { 0.0 }, "{date}");
    }
}

#[test]
fn token_sequence_is_always_fixed_length() {
    let tok = tokenizer();
    let long = "summer sale ".repeat(200);
    for (caption, content) in [("", ""), ("sale", ""), (long.as_str(), "shop now")] {
        let seq = encode_text(&tok, caption, content).unwrap();
        assert_eq!(seq.len(), SEQUENCE_LENGTH);
    }
}

#[test]
fn text_is_joined_truncated_and_padded_at_tail() {
    let tok = tokenizer();
    let seq = encode_text(&tok, "Summer SALE", "shop now!").unwrap();
    assert_eq!(&seq[..4], &[1, 2, 3, 4]);
    assert!(seq[4..].iter().all(|&id| id == PAD_TOKEN_ID));

    let long = format!("big {}", "deals ".repeat(100));
    let seq = encode_text(&tok, &long, "summer").unwrap();
    assert_eq!(seq[0], 5);
    assert!(seq[1..].iter().all(|&id| id == 6));
}

#[test]
fn out_of_vocabulary_ids_never_reach_the_network() {
    let mut index = HashMap::new();
    index.insert("huge".to_string(), VOCAB_SIZE as u32 + 10);
    index.insert("ok".to_string(), 7);
    let tok = WordIndexTokenizer::new(index, None);
    let seq = encode_text(&tok, "huge ok", "").unwrap();
    assert_eq!(seq[0], 7);
    assert_eq!(seq[1], PAD_TOKEN_ID);
}

#[test]
fn full_request_encoding() {
    let input = PredictionInput::new("Summer sale", "Big deals", "TikTok")
        .with_schedule("2024-06-15", "18:45")
        .with_followers(-3)
        .with_ad_boost(true);
    let features = encode(&tokenizer(), &input).unwrap();
    assert!(features.has_expected_shape());
    assert_eq!(features.token_count(), 4);
    assert_eq!(features.numeric_vector, vec![2.0, 18.0, 5.0, 1.0, 0.0, 1.0]);
}
