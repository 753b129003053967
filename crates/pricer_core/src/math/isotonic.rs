//! Isotonic regression via Pool-Adjacent-Violators.
//!
//! Projects a sequence onto the closest (least-squares) monotone
//! sequence. Pointwise fixed-point updates of an exercise boundary do not
//! preserve monotonicity in time, so the refined samples are projected
//! before they are handed to the spectral fit.

/// Least-squares projection onto non-decreasing sequences.
///
/// Equal weights; ties are merged into block averages in a single
/// left-to-right pass (Pool-Adjacent-Violators).
///
/// # Examples
/// ```
/// use pricer_core::math::isotonic::isotonic_non_decreasing;
///
/// let fitted = isotonic_non_decreasing(&[1.0, 3.0, 2.0, 4.0]);
/// assert_eq!(fitted, vec![1.0, 2.5, 2.5, 4.0]);
/// ```
pub fn isotonic_non_decreasing(values: &[f64]) -> Vec<f64> {
    // Blocks of (sum, count) merged whenever a new value violates the
    // running block mean.
    let mut sums: Vec<f64> = Vec::with_capacity(values.len());
    let mut counts: Vec<usize> = Vec::with_capacity(values.len());

    for &v in values {
        let mut sum = v;
        let mut count = 1usize;
        while let (Some(&prev_sum), Some(&prev_count)) = (sums.last(), counts.last()) {
            if prev_sum / prev_count as f64 <= sum / count as f64 {
                break;
            }
            sum += prev_sum;
            count += prev_count;
            sums.pop();
            counts.pop();
        }
        sums.push(sum);
        counts.push(count);
    }

    let mut fitted = Vec::with_capacity(values.len());
    for (sum, count) in sums.into_iter().zip(counts) {
        let mean = sum / count as f64;
        fitted.extend(std::iter::repeat(mean).take(count));
    }
    fitted
}

/// Least-squares projection onto non-increasing sequences.
///
/// Implemented as non-decreasing regression on the reversed input.
///
/// # Examples
/// ```
/// use pricer_core::math::isotonic::isotonic_non_increasing;
///
/// let fitted = isotonic_non_increasing(&[4.0, 2.0, 3.0, 1.0]);
/// assert_eq!(fitted, vec![4.0, 2.5, 2.5, 1.0]);
/// ```
pub fn isotonic_non_increasing(values: &[f64]) -> Vec<f64> {
    let reversed: Vec<f64> = values.iter().rev().copied().collect();
    let mut fitted = isotonic_non_decreasing(&reversed);
    fitted.reverse();
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_already_monotone_is_unchanged() {
        let input = [1.0, 2.0, 2.0, 5.0];
        assert_eq!(isotonic_non_decreasing(&input), input.to_vec());
    }

    #[test]
    fn test_single_violation_pools_pair() {
        assert_eq!(
            isotonic_non_decreasing(&[1.0, 3.0, 2.0, 4.0]),
            vec![1.0, 2.5, 2.5, 4.0]
        );
    }

    #[test]
    fn test_cascading_merge() {
        // The final small value drags down the whole preceding block.
        let fitted = isotonic_non_decreasing(&[1.0, 4.0, 5.0, 0.0]);
        assert_eq!(fitted, vec![1.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_constant_output_for_reversed_input() {
        let fitted = isotonic_non_decreasing(&[3.0, 2.0, 1.0]);
        for v in fitted {
            assert_relative_eq!(v, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_and_singleton() {
        assert!(isotonic_non_decreasing(&[]).is_empty());
        assert_eq!(isotonic_non_decreasing(&[7.0]), vec![7.0]);
    }

    #[test]
    fn test_non_increasing_mirror() {
        let fitted = isotonic_non_increasing(&[4.0, 2.0, 3.0, 1.0]);
        assert_eq!(fitted, vec![4.0, 2.5, 2.5, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_output_is_monotone(values in proptest::collection::vec(-1e3..1e3f64, 0..60)) {
            let fitted = isotonic_non_decreasing(&values);
            for pair in fitted.windows(2) {
                prop_assert!(pair[0] <= pair[1] + 1e-9);
            }
        }

        #[test]
        fn prop_mean_is_preserved(values in proptest::collection::vec(-1e3..1e3f64, 1..60)) {
            let fitted = isotonic_non_decreasing(&values);
            let before: f64 = values.iter().sum();
            let after: f64 = fitted.iter().sum();
            prop_assert!((before - after).abs() < 1e-6 * (1.0 + before.abs()));
        }

        #[test]
        fn prop_idempotent(values in proptest::collection::vec(-1e3..1e3f64, 0..60)) {
            let once = isotonic_non_decreasing(&values);
            let twice = isotonic_non_decreasing(&once);
            for (a, b) in once.iter().zip(twice.iter()) {
                prop_assert!((a - b).abs() < 1e-9);
            }
        }
    }
}
