//! Paired two-sample statistical tests.
//!
//! Both tests operate on equal-length sample slices where index `i` of each
//! slice belongs to the same subject. Pairing is positional; callers are
//! responsible for aligning subjects before invoking a test (see
//! [`Config::with_subject_alignment_check`](crate::Config::with_subject_alignment_check)
//! for the stricter identity check at the comparator level).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Statistical test selector.
///
/// A closed enumeration of the supported paired tests. Parsing an
/// unrecognized name via [`FromStr`] is an invalid-configuration error,
/// surfaced as [`ParseStatTestError`] rather than silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatTest {
    /// Paired Student's t-test (parametric).
    #[serde(rename = "paired-t-test")]
    PairedT,
    /// Wilcoxon signed-rank test (non-parametric).
    #[serde(rename = "wilcoxon-signed-rank")]
    WilcoxonSignedRank,
}

impl StatTest {
    /// Compute the two-sided p-value of this test for paired samples.
    pub fn p_value(self, a: &[f64], b: &[f64]) -> Result<f64, StatError> {
        match self {
            StatTest::PairedT => paired_t_test(a, b),
            StatTest::WilcoxonSignedRank => wilcoxon_signed_rank(a, b),
        }
    }
}

impl fmt::Display for StatTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatTest::PairedT => write!(f, "paired-t-test"),
            StatTest::WilcoxonSignedRank => write!(f, "wilcoxon-signed-rank"),
        }
    }
}

impl FromStr for StatTest {
    type Err = ParseStatTestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paired-t-test" => Ok(StatTest::PairedT),
            "wilcoxon-signed-rank" => Ok(StatTest::WilcoxonSignedRank),
            other => Err(ParseStatTestError {
                unrecognized: other.to_string(),
            }),
        }
    }
}

/// Error returned when parsing an unrecognized test name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatTestError {
    /// The name that failed to parse.
    pub unrecognized: String,
}

impl fmt::Display for ParseStatTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized statistical test '{}' (expected 'paired-t-test' or 'wilcoxon-signed-rank')",
            self.unrecognized
        )
    }
}

impl std::error::Error for ParseStatTestError {}

/// Errors from degenerate or malformed test input.
#[derive(Debug, Clone, PartialEq)]
pub enum StatError {
    /// The two sample slices have different lengths.
    LengthMismatch {
        /// Length of the first sample.
        left: usize,
        /// Length of the second sample.
        right: usize,
    },

    /// Too few paired samples for the test to be defined.
    InsufficientSamples {
        /// Number of usable pairs found.
        got: usize,
        /// Minimum number of pairs required.
        min: usize,
    },

    /// A sample contains a non-finite value (NaN or infinity).
    NonFinite,

    /// Paired differences have zero variance around a nonzero mean, so the
    /// t statistic is unbounded.
    ZeroVariance,

    /// All paired differences are exactly zero; the signed-rank test is
    /// undefined.
    AllZeroDifferences,
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatError::LengthMismatch { left, right } => {
                write!(f, "paired samples differ in length: {} vs {}", left, right)
            }
            StatError::InsufficientSamples { got, min } => {
                write!(
                    f,
                    "insufficient paired samples: got {}, need at least {}",
                    got, min
                )
            }
            StatError::NonFinite => write!(f, "sample contains a non-finite value"),
            StatError::ZeroVariance => {
                write!(
                    f,
                    "paired differences have zero variance around a nonzero mean"
                )
            }
            StatError::AllZeroDifferences => {
                write!(f, "all paired differences are zero; signed-rank test undefined")
            }
        }
    }
}

impl std::error::Error for StatError {}

/// Validate paired input: equal lengths, at least `MIN_PAIRS`, all finite.
fn check_paired_input(a: &[f64], b: &[f64]) -> Result<(), StatError> {
    if a.len() != b.len() {
        return Err(StatError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.len() < MIN_PAIRS {
        return Err(StatError::InsufficientSamples {
            got: a.len(),
            min: MIN_PAIRS,
        });
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(StatError::NonFinite);
    }
    Ok(())
}

/// Minimum number of paired samples for either test.
const MIN_PAIRS: usize = 2;

/// Paired Student's t-test on matched samples.
///
/// Computes differences `d_i = a_i - b_i`, the t statistic
/// `t = mean(d) / (sd(d) / sqrt(n))`, and the two-sided p-value from the
/// Student's t distribution with `n - 1` degrees of freedom.
///
/// All-zero differences (identical samples) are a defined degenerate case:
/// there is no evidence against the null, so the p-value is 1.0. Zero
/// variance around a *nonzero* mean difference leaves the statistic
/// unbounded and is reported as [`StatError::ZeroVariance`].
pub fn paired_t_test(a: &[f64], b: &[f64]) -> Result<f64, StatError> {
    check_paired_input(a, b)?;

    let n = a.len() as f64;
    let diffs: Vec<f64> = a.iter().zip(b.iter()).map(|(&x, &y)| x - y).collect();
    let mean = diffs.iter().sum::<f64>() / n;
    let var = diffs.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / (n - 1.0);

    if var == 0.0 {
        if diffs.iter().all(|&d| d == 0.0) {
            return Ok(1.0);
        }
        return Err(StatError::ZeroVariance);
    }

    let t = mean / (var / n).sqrt();
    let df = n - 1.0;
    // df >= 1 is guaranteed by the MIN_PAIRS check above.
    let dist = StudentsT::new(0.0, 1.0, df).expect("valid degrees of freedom");
    let p = 2.0 * (1.0 - dist.cdf(t.abs()));
    Ok(p.clamp(0.0, 1.0))
}

/// Wilcoxon signed-rank test on matched samples.
///
/// Zero differences are discarded before ranking (the classical "wilcox"
/// zero method). Absolute differences receive midranks for ties, `T+` is the
/// sum of ranks of positive differences, and the two-sided p-value comes
/// from the normal approximation with tie-corrected variance.
///
/// The test is undefined when every paired difference is zero; that case is
/// reported as [`StatError::AllZeroDifferences`] rather than producing NaN.
pub fn wilcoxon_signed_rank(a: &[f64], b: &[f64]) -> Result<f64, StatError> {
    check_paired_input(a, b)?;

    let diffs: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| x - y)
        .filter(|&d| d != 0.0)
        .collect();

    if diffs.is_empty() {
        return Err(StatError::AllZeroDifferences);
    }
    if diffs.len() < MIN_PAIRS {
        return Err(StatError::InsufficientSamples {
            got: diffs.len(),
            min: MIN_PAIRS,
        });
    }

    let n = diffs.len() as f64;

    // Sort by absolute difference, remembering which original difference
    // each entry came from.
    let mut by_magnitude: Vec<(f64, usize)> = diffs
        .iter()
        .enumerate()
        .map(|(i, &d)| (d.abs(), i))
        .collect();
    by_magnitude.sort_by(|x, y| x.0.total_cmp(&y.0));

    let ranks = midranks(&by_magnitude);

    let t_plus: f64 = by_magnitude
        .iter()
        .zip(ranks.iter())
        .filter(|((_, orig), _)| diffs[*orig] > 0.0)
        .map(|(_, &rank)| rank)
        .sum();

    let mu = n * (n + 1.0) / 4.0;
    let sigma_sq = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_correction(&by_magnitude) / 48.0;
    if sigma_sq <= 0.0 {
        return Err(StatError::ZeroVariance);
    }

    let z = (t_plus - mu) / sigma_sq.sqrt();
    let normal = Normal::new(0.0, 1.0).expect("unit normal");
    let p = 2.0 * (1.0 - normal.cdf(z.abs()));
    Ok(p.clamp(0.0, 1.0))
}

/// Assign midranks to entries sorted by absolute magnitude. Tied runs share
/// the average of the ranks they span.
fn midranks(sorted: &[(f64, usize)]) -> Vec<f64> {
    let n = sorted.len();
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j].0 == sorted[i].0 {
            j += 1;
        }
        // Positions i..j are tied; their 1-based ranks average to (i+1 + j)/2.
        let midrank = (i + 1 + j) as f64 / 2.0;
        for rank in ranks.iter_mut().take(j).skip(i) {
            *rank = midrank;
        }
        i = j;
    }
    ranks
}

/// Tie correction term for the signed-rank variance: sum of t(t^2 - 1)
/// over tied runs of length t.
fn tie_correction(sorted: &[(f64, usize)]) -> f64 {
    let n = sorted.len();
    let mut correction = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j].0 == sorted[i].0 {
            j += 1;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            correction += t * (t * t - 1.0);
        }
        i = j;
    }
    correction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_test_parse_round_trip() {
        for test in [StatTest::PairedT, StatTest::WilcoxonSignedRank] {
            let name = test.to_string();
            assert_eq!(name.parse::<StatTest>().unwrap(), test);
        }
    }

    #[test]
    fn stat_test_parse_unrecognized() {
        let err = "unsupported-test".parse::<StatTest>().unwrap_err();
        assert_eq!(err.unrecognized, "unsupported-test");
        assert!(err.to_string().contains("unsupported-test"));
    }

    #[test]
    fn t_test_identical_samples_is_one() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let p = paired_t_test(&a, &a).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn t_test_constant_shift_is_zero_variance() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(paired_t_test(&a, &b).unwrap_err(), StatError::ZeroVariance);
    }

    #[test]
    fn t_test_large_consistent_shift_is_significant() {
        // Shifted by ~10 with small per-subject noise.
        let a = [12.1, 11.8, 12.3, 11.9, 12.0, 12.2];
        let b = [2.0, 1.9, 2.2, 2.1, 1.8, 2.0];
        let p = paired_t_test(&a, &b).unwrap();
        assert!(p < 0.001, "expected strong significance, got p = {}", p);
    }

    #[test]
    fn t_test_noise_is_not_significant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [1.2, 1.8, 3.5, 4.1, 4.6];
        let p = paired_t_test(&a, &b).unwrap();
        assert!(p > 0.5, "expected non-significance, got p = {}", p);
        assert!(p < 1.0);
    }

    #[test]
    fn t_test_symmetric_in_argument_order() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [1.5, 1.7, 3.8, 4.4, 4.1];
        let p_ab = paired_t_test(&a, &b).unwrap();
        let p_ba = paired_t_test(&b, &a).unwrap();
        assert!((p_ab - p_ba).abs() < 1e-12);
    }

    #[test]
    fn t_test_length_mismatch() {
        let err = paired_t_test(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatError::LengthMismatch { left: 3, right: 2 });
    }

    #[test]
    fn t_test_too_few_pairs() {
        let err = paired_t_test(&[1.0], &[2.0]).unwrap_err();
        assert_eq!(err, StatError::InsufficientSamples { got: 1, min: 2 });
    }

    #[test]
    fn t_test_rejects_non_finite() {
        let err = paired_t_test(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, StatError::NonFinite);
    }

    #[test]
    fn wilcoxon_consistent_shift_is_significant() {
        // Eight subjects, all differences positive and distinct:
        // T+ = 36, mu = 18, sigma^2 = 51, z ~ 2.52, p ~ 0.012.
        let a = [5.1, 6.3, 7.2, 8.4, 9.1, 10.5, 11.2, 12.8];
        let b = [4.0, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0];
        let p = wilcoxon_signed_rank(&a, &b).unwrap();
        assert!(p < 0.05, "expected significance, got p = {}", p);
    }

    #[test]
    fn wilcoxon_balanced_signs_is_not_significant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.5, 1.5, 3.5, 3.5, 5.5, 5.5];
        let p = wilcoxon_signed_rank(&a, &b).unwrap();
        assert!(p > 0.5, "expected non-significance, got p = {}", p);
    }

    #[test]
    fn wilcoxon_all_zero_differences_errors() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let err = wilcoxon_signed_rank(&a, &a).unwrap_err();
        assert_eq!(err, StatError::AllZeroDifferences);
    }

    #[test]
    fn wilcoxon_single_nonzero_difference_errors() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [1.0, 2.0, 3.0, 5.0];
        let err = wilcoxon_signed_rank(&a, &b).unwrap_err();
        assert_eq!(err, StatError::InsufficientSamples { got: 1, min: 2 });
    }

    #[test]
    fn wilcoxon_handles_tied_magnitudes() {
        // |d| values tie in pairs; midranks and tie correction apply.
        let a = [2.0, 3.0, 5.0, 6.0, 9.0, 10.0];
        let b = [1.0, 2.0, 3.0, 4.0, 6.0, 7.0];
        let p = wilcoxon_signed_rank(&a, &b).unwrap();
        assert!(p.is_finite());
        assert!((0.0..=1.0).contains(&p));
        // All differences positive, so this should lean significant.
        assert!(p < 0.05);
    }

    #[test]
    fn midranks_average_ties() {
        let sorted = [(1.0, 0), (2.0, 1), (2.0, 2), (3.0, 3)];
        let ranks = midranks(&sorted);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn tie_correction_counts_runs() {
        let sorted = [(1.0, 0), (2.0, 1), (2.0, 2), (2.0, 3)];
        // One run of length 3: 3 * (9 - 1) = 24.
        assert_eq!(tie_correction(&sorted), 24.0);
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let a = [5.1, 6.3, 7.2, 8.4, 9.1];
        let b = [4.0, 5.0, 5.5, 6.0, 6.5];
        assert_eq!(
            StatTest::PairedT.p_value(&a, &b).unwrap(),
            paired_t_test(&a, &b).unwrap()
        );
        assert_eq!(
            StatTest::WilcoxonSignedRank.p_value(&a, &b).unwrap(),
            wilcoxon_signed_rank(&a, &b).unwrap()
        );
    }
}
