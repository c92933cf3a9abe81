//! Output decoding: network space → engagement metrics

use reach_types::{PredictionOutput, ReachError, Result, Target, NUM_TARGETS};

use crate::scaler::TargetScaler;

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_finite(stage: &str, values: &[f64; NUM_TARGETS]) -> Result<()> {
    match Target::ALL.into_iter().find(|t| !values[t.index()].is_finite()) {
        Some(target) => Err(ReachError::inference(format!(
            "Non-finite {} value for {}: {}",
            stage,
            target,
            values[target.index()]
        ))),
        None => Ok(()),
    }
}

/// Scaler inversion first (the scaler was fit on log-space values), then
/// `expm1` for the count targets, then a zero floor and rounding.
///
/// Non-finite values are rejected before the floor, which would otherwise
/// map NaN to zero.
pub fn postprocess(scaler: &TargetScaler, raw: &[f64; NUM_TARGETS]) -> Result<PredictionOutput> {
    ensure_finite("network", raw)?;
    let unscaled = scaler.inverse_transform(raw);
    ensure_finite("unscaled", &unscaled)?;

    let mut values = [0.0; NUM_TARGETS];
    for target in Target::ALL {
        let mut value = unscaled[target.index()];
        if target.is_log_transformed() {
            value = value.max(0.0).exp_m1();
        }
        values[target.index()] = round2(value.max(0.0));
    }
    ensure_finite("decoded", &values)?;
    Ok(PredictionOutput::from_values(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> TargetScaler {
        TargetScaler::Standard {
            mean: vec![0.0; NUM_TARGETS],
            scale: vec![1.0; NUM_TARGETS],
        }
    }

    #[test]
    fn counts_are_un_logged_score_is_not() {
        let v = 2.0f64.ln_1p();
        let out = postprocess(&identity(), &[v, v, v, v, 0.756]).unwrap();
        assert_eq!(out.likes, 2.0);
        assert_eq!(out.clicks, 2.0);
        assert_eq!(out.timing_quality_score, 0.76);
    }

    #[test]
    fn zero_raw_output_decodes_scaler_offsets() {
        let scaler = TargetScaler::Standard {
            mean: vec![3.0, 1.0, 0.5, 2.0, 0.6],
            scale: vec![1.5; NUM_TARGETS],
        };
        let out = postprocess(&scaler, &[0.0; NUM_TARGETS]).unwrap();
        assert_eq!(out.likes, round2(3.0f64.exp_m1()));
        assert_eq!(out.comments, round2(1.0f64.exp_m1()));
        assert_eq!(out.shares, round2(0.5f64.exp_m1()));
        assert_eq!(out.clicks, round2(2.0f64.exp_m1()));
        assert_eq!(out.timing_quality_score, 0.6);
    }

    #[test]
    fn never_negative() {
        let scaler = TargetScaler::Standard {
            mean: vec![1.0; NUM_TARGETS],
            scale: vec![2.0; NUM_TARGETS],
        };
        for raw in [-1e6, -50.0, -1.0, -0.49, 0.0] {
            let out = postprocess(&scaler, &[raw; NUM_TARGETS]).unwrap();
            assert!(out.values().iter().all(|&v| v >= 0.0), "raw {}", raw);
        }
    }

    #[test]
    fn non_finite_network_output_is_rejected() {
        for bad in [f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
            let mut raw = [0.5; NUM_TARGETS];
            raw[2] = bad;
            let err = postprocess(&identity(), &raw).unwrap_err();
            assert!(matches!(err, ReachError::Inference { .. }), "{bad}: {err}");
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn overflow_after_expm1_is_rejected() {
        let err = postprocess(&identity(), &[800.0, 0.0, 0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, ReachError::Inference { .. }), "{err}");
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235001), 1.24);
        assert_eq!(round2(0.0), 0.0);
    }
}
