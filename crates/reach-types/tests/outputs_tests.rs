use reach_types::*;

#[test]
fn targets_are_in_output_order() {
    let names: Vec<&str> = Target::ALL.iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        ["likes", "comments", "shares", "clicks", "timing_quality_score"]
    );
    for (i, t) in Target::ALL.iter().enumerate() {
        assert_eq!(t.index(), i);
    }
}

#[test]
fn only_count_targets_are_log_transformed() {
    let logged: Vec<Target> = Target::ALL
        .into_iter()
        .filter(|t| t.is_log_transformed())
        .collect();
    assert_eq!(
        logged,
        [Target::Likes, Target::Comments, Target::Shares, Target::Clicks]
    );
}

#[test]
fn output_serializes_with_target_names() {
    let output = PredictionOutput::from_values([10.5, 2.0, 1.25, 3.0, 0.75]);
    let json = serde_json::to_value(output).unwrap();
    assert_eq!(json["likes"], 10.5);
    assert_eq!(json["timing_quality_score"], 0.75);
    assert_eq!(output.values(), [10.5, 2.0, 1.25, 3.0, 0.75]);
    assert_eq!(output.iter().count(), NUM_TARGETS);
}

#[test]
fn encoded_features_shape_check() {
    let features = EncodedFeatures {
        token_sequence: vec![PAD_TOKEN_ID; SEQUENCE_LENGTH],
        numeric_vector: vec![0.0; NUM_NUMERIC_FEATURES],
    };
    assert!(features.has_expected_shape());
    assert_eq!(features.token_count(), 0);

    let short = EncodedFeatures {
        token_sequence: vec![1, 2, 3],
        numeric_vector: vec![0.0; NUM_NUMERIC_FEATURES],
    };
    assert!(!short.has_expected_shape());
}
