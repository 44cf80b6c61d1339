//! The statistical comparator: per-band, per-region paired tests between
//! two experimental conditions.

use std::fmt;

use crate::config::Config;
use crate::output;
use crate::report::{Comparison, Diagnostics, PValueTable, SignificantLocation};
use crate::stats::{StatError, StatTest};
use crate::table::{PsdTable, TableError};

/// P-values at or below this threshold are reported as significant.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Errors that abort a comparison. No partial results are returned.
#[derive(Debug)]
pub enum CompareError {
    /// The measurement table failed validation.
    Table(TableError),

    /// A condition code has no rows within a band.
    ConditionNotFound {
        /// The missing condition code.
        condition: String,
        /// The band being processed.
        band: String,
    },

    /// The two condition subsets of a band have different row counts, so
    /// positional pairing is impossible.
    UnequalSampleCounts {
        /// The band being processed.
        band: String,
        /// First condition code.
        first_condition: String,
        /// Row count for the first condition.
        first_count: usize,
        /// Second condition code.
        second_condition: String,
        /// Row count for the second condition.
        second_count: usize,
    },

    /// Subject identifiers do not line up between the two condition subsets.
    ///
    /// Only raised when [`Config::check_subject_alignment`] is enabled.
    SubjectMisalignment {
        /// The band being processed.
        band: String,
        /// Position within the paired rows (0-based).
        position: usize,
        /// Subject found in the first condition subset.
        first: String,
        /// Subject found in the second condition subset.
        second: String,
    },

    /// The selected test is undefined for a region/band cell's data.
    Degenerate {
        /// The band being processed.
        band: String,
        /// The region column being tested.
        region: String,
        /// The underlying test failure.
        source: StatError,
    },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::Table(e) => write!(f, "invalid measurement table: {}", e),
            CompareError::ConditionNotFound { condition, band } => {
                write!(
                    f,
                    "condition '{}' has no rows in band '{}'",
                    condition, band
                )
            }
            CompareError::UnequalSampleCounts {
                band,
                first_condition,
                first_count,
                second_condition,
                second_count,
            } => {
                write!(
                    f,
                    "band '{}': condition '{}' has {} rows but condition '{}' has {}",
                    band, first_condition, first_count, second_condition, second_count
                )
            }
            CompareError::SubjectMisalignment {
                band,
                position,
                first,
                second,
            } => {
                write!(
                    f,
                    "band '{}': subjects misaligned at position {} ('{}' vs '{}')",
                    band, position, first, second
                )
            }
            CompareError::Degenerate {
                band,
                region,
                source,
            } => {
                write!(
                    f,
                    "test undefined for region '{}' in band '{}': {}",
                    region, band, source
                )
            }
        }
    }
}

impl std::error::Error for CompareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompareError::Table(e) => Some(e),
            CompareError::Degenerate { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TableError> for CompareError {
    fn from(e: TableError) -> Self {
        CompareError::Table(e)
    }
}

/// Compare two conditions across every band and region with default
/// configuration.
///
/// For each distinct frequency band and each region column, the rows of the
/// two conditions are paired positionally and the selected test's two-sided
/// p-value fills the corresponding cell of the returned table. Locations
/// with p ≤ 0.05 are collected as significant.
///
/// # Errors
///
/// Any malformed table, missing condition, unequal subset size, or
/// degenerate test input aborts the whole comparison; see [`CompareError`].
///
/// # Example
///
/// ```
/// use bandwise::{compare, PsdTable, StatTest};
///
/// let mut table = PsdTable::new(vec!["Fz".into(), "Pz".into()]);
/// for (i, (before, after)) in [(9.1, 3.0), (8.7, 2.8), (9.4, 3.3), (8.9, 2.5), (9.0, 3.1)]
///     .iter()
///     .enumerate()
/// {
///     let subject = format!("S{:02}", i);
///     table.push_row(&subject, "alpha", "EC_00", vec![*before, 5.0]).unwrap();
///     table.push_row(&subject, "alpha", "EC_06", vec![*after, 5.0]).unwrap();
/// }
///
/// let result = compare(&table, ("EC_00", "EC_06"), StatTest::PairedT).unwrap();
/// assert!(result.is_significant("alpha", "Fz"));
/// ```
pub fn compare(
    table: &PsdTable,
    conditions: (&str, &str),
    test: StatTest,
) -> Result<Comparison, CompareError> {
    compare_with(table, conditions, test, &Config::default())
}

/// Compare two conditions with explicit configuration.
///
/// See [`compare`] for the core semantics. The configuration adds the
/// optional subject-alignment identity check and per-band diagnostic output.
pub fn compare_with(
    table: &PsdTable,
    conditions: (&str, &str),
    test: StatTest,
    config: &Config,
) -> Result<Comparison, CompareError> {
    table.validate()?;

    let bands: Vec<String> = table.bands().iter().map(|b| b.to_string()).collect();
    let regions = table.regions().to_vec();

    let mut pvalues = PValueTable::new(regions.clone(), bands.clone());
    let mut significant = Vec::new();
    let mut subjects_per_band = Vec::with_capacity(bands.len());

    for (band_index, band) in bands.iter().enumerate() {
        let first = table.band_condition_rows(band, conditions.0);
        let second = table.band_condition_rows(band, conditions.1);

        if first.is_empty() {
            return Err(CompareError::ConditionNotFound {
                condition: conditions.0.to_string(),
                band: band.clone(),
            });
        }
        if second.is_empty() {
            return Err(CompareError::ConditionNotFound {
                condition: conditions.1.to_string(),
                band: band.clone(),
            });
        }
        if first.len() != second.len() {
            return Err(CompareError::UnequalSampleCounts {
                band: band.clone(),
                first_condition: conditions.0.to_string(),
                first_count: first.len(),
                second_condition: conditions.1.to_string(),
                second_count: second.len(),
            });
        }

        if config.check_subject_alignment {
            for (position, (a, b)) in first.iter().zip(second.iter()).enumerate() {
                if a.subject != b.subject {
                    return Err(CompareError::SubjectMisalignment {
                        band: band.clone(),
                        position,
                        first: a.subject.clone(),
                        second: b.subject.clone(),
                    });
                }
            }
        }

        subjects_per_band.push(first.len());

        for (region_index, region) in regions.iter().enumerate() {
            let a: Vec<f64> = first.iter().map(|row| row.values[region_index]).collect();
            let b: Vec<f64> = second.iter().map(|row| row.values[region_index]).collect();

            let p = test
                .p_value(&a, &b)
                .map_err(|source| CompareError::Degenerate {
                    band: band.clone(),
                    region: region.clone(),
                    source,
                })?;
            pvalues.set(region_index, band_index, p);
        }

        let band_hits: Vec<SignificantLocation> = regions
            .iter()
            .enumerate()
            .filter(|(region_index, _)| {
                pvalues
                    .get_at(*region_index, band_index)
                    .is_some_and(meets_threshold)
            })
            .map(|(_, region)| SignificantLocation::new(band.clone(), region.clone()))
            .collect();

        if config.verbose && !band_hits.is_empty() {
            eprintln!("{}", output::format_band_findings(conditions, band, &band_hits));
        }
        significant.extend(band_hits);
    }

    let diagnostics = Diagnostics {
        n_bands: bands.len(),
        n_regions: regions.len(),
        n_tests: bands.len() * regions.len(),
        subjects_per_band,
    };

    Ok(Comparison {
        test,
        conditions: (conditions.0.to_string(), conditions.1.to_string()),
        pvalues,
        significant,
        diagnostics,
    })
}

/// Inclusive significance predicate: p ≤ 0.05.
fn meets_threshold(p: f64) -> bool {
    p <= SIGNIFICANCE_THRESHOLD
}
