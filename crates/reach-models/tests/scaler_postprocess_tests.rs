use reach_models::{postprocess, TargetScaler};
use reach_types::{Target, NUM_TARGETS};

#[test]
fn scaler_inversion_precedes_log_inversion() {
    // In log space the mean is ln(101); expm1 must be applied after un-scaling
    let mean = 101f64.ln();
    let scaler = TargetScaler::Standard {
        mean: vec![mean, mean, mean, mean, 0.5],
        scale: vec![1.0; NUM_TARGETS],
    };
    let out = postprocess(&scaler, &[0.0; NUM_TARGETS]).unwrap();
    for target in [Target::Likes, Target::Comments, Target::Shares, Target::Clicks] {
        assert_eq!(out.get(target), 100.0);
    }
    assert_eq!(out.get(Target::TimingQualityScore), 0.5);
}

#[test]
fn large_negative_outputs_floor_at_zero() {
    let scaler = TargetScaler::MinMax {
        min: vec![0.0; NUM_TARGETS],
        scale: vec![0.1; NUM_TARGETS],
    };
    let out = postprocess(&scaler, &[-1e9, -3.0, -0.01, -1e-12, -42.0]).unwrap();
    assert_eq!(out.values(), [0.0; NUM_TARGETS]);
}

#[test]
fn decoding_is_deterministic() {
    let scaler = TargetScaler::Standard {
        mean: vec![2.0, 1.0, 0.5, 1.5, 0.4],
        scale: vec![0.7, 0.6, 0.5, 0.9, 0.2],
    };
    let raw = [0.3, -0.2, 1.1, 0.0, 0.8];
    assert_eq!(
        postprocess(&scaler, &raw).unwrap(),
        postprocess(&scaler, &raw).unwrap()
    );
}
