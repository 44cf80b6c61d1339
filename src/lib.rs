//! # bandwise
//!
//! Per-band, per-region paired statistical comparison of power spectral
//! density tables.
//!
//! Given a long-format table of PSD measurements (one row per subject, band,
//! and condition), this crate compares two experimental conditions with
//! either a paired t-test or a Wilcoxon signed-rank test, producing:
//! - a p-value table indexed by region (rows) and frequency band (columns)
//! - the collection of (band, region) locations with p ≤ 0.05
//!
//! ## Pairing
//!
//! The paired tests match samples positionally: the i-th row of a band's
//! first-condition subset is paired with the i-th row of its
//! second-condition subset. Make sure both subsets list subjects in the same
//! order, or enable [`Config::with_subject_alignment_check`] to have
//! mismatches rejected instead of silently mispaired.
//!
//! ## Quick start
//!
//! ```
//! use bandwise::{compare, PsdTable, StatTest};
//!
//! let mut table = PsdTable::new(vec!["Fz".into(), "Pz".into()]);
//! table.push_row("S01", "alpha", "EC_00", vec![9.1, 5.2]).unwrap();
//! table.push_row("S01", "alpha", "EC_06", vec![3.0, 5.1]).unwrap();
//! table.push_row("S02", "alpha", "EC_00", vec![8.7, 5.4]).unwrap();
//! table.push_row("S02", "alpha", "EC_06", vec![2.8, 5.6]).unwrap();
//! table.push_row("S03", "alpha", "EC_00", vec![9.4, 5.0]).unwrap();
//! table.push_row("S03", "alpha", "EC_06", vec![3.3, 4.9]).unwrap();
//!
//! let result = compare(&table, ("EC_00", "EC_06"), StatTest::PairedT)?;
//! println!("{}", result.summary());
//! for loc in &result.significant {
//!     println!("significant: {}", loc);
//! }
//! # Ok::<(), bandwise::CompareError>(())
//! ```
//!
//! No multiple-comparison correction is applied across the band × region
//! grid; p-values are reported exactly as the underlying tests produce them.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod compare;
mod config;
mod report;
mod stats;
mod table;

pub mod output;

pub use compare::{compare, compare_with, CompareError, SIGNIFICANCE_THRESHOLD};
pub use config::Config;
pub use report::{Comparison, Diagnostics, PValueTable, SignificantLocation};
pub use stats::{
    paired_t_test, wilcoxon_signed_rank, ParseStatTestError, StatError, StatTest,
};
pub use table::{Observation, PsdTable, TableError};
