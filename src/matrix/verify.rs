//! First-mismatch result checking.

/// One element of the result that fell outside the comparison threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    /// Row-major index of the first differing element.
    pub index: usize,
    /// Value the kernel produced.
    pub got: f64,
    /// Value the golden reference holds.
    pub expected: f64,
}

/// Scan `result` against `gold` in row-major order and report the first
/// element whose absolute difference exceeds `threshold`, or `None` if every
/// element is within it.
///
/// A NaN in either matrix is always a mismatch: NaN comparisons are false,
/// so the difference test fails rather than letting a poisoned element pass.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn verify(result: &[f64], gold: &[f64], threshold: f64) -> Option<Mismatch> {
    assert_eq!(result.len(), gold.len(), "result/gold shape mismatch");
    for (index, (&got, &expected)) in result.iter().zip(gold).enumerate() {
        let diff = (got - expected).abs();
        if diff > threshold || diff.is_nan() {
            return Some(Mismatch {
                index,
                got,
                expected,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_passes_at_zero_threshold() {
        let x = [1.0, -2.5, 0.0];
        assert_eq!(verify(&x, &x, 0.0), None);
    }

    #[test]
    fn reports_first_difference() {
        let got = [1.0, 2.0, 3.5, 9.0];
        let gold = [1.0, 2.0, 3.0, 4.0];
        let m = verify(&got, &gold, 0.25).unwrap();
        assert_eq!(m.index, 2);
        assert_eq!(m.got, 3.5);
        assert_eq!(m.expected, 3.0);
    }

    #[test]
    fn within_threshold_passes() {
        let got = [1.0, 2.001];
        let gold = [1.0, 2.0];
        assert_eq!(verify(&got, &gold, 0.01), None);
    }

    #[test]
    fn nan_never_passes() {
        let got = [f64::NAN];
        let gold = [0.0];
        assert!(verify(&got, &gold, 1e9).is_some());
        assert!(verify(&gold, &got, 1e9).is_some());
    }
}
