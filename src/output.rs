//! Terminal formatting for comparison results.
//!
//! Diagnostic output only; nothing here affects the data returned by the
//! comparator.

use colored::Colorize;

use crate::compare::SIGNIFICANCE_THRESHOLD;
use crate::report::{Comparison, SignificantLocation};

/// Format the diagnostic line for a band with significant regions.
///
/// Mirrors the classical per-band finding message, e.g.:
///
/// ```text
/// ['EC_00' vs 'EC_06'] significant changes of alpha at: alpha/Fz, alpha/Pz
/// ```
pub fn format_band_findings(
    conditions: (&str, &str),
    band: &str,
    locations: &[SignificantLocation],
) -> String {
    let locs: Vec<String> = locations.iter().map(|l| l.to_string()).collect();
    format!(
        "['{}' vs '{}'] significant changes of {} at: {}",
        conditions.0,
        conditions.1,
        band.bold(),
        locs.join(", ").yellow()
    )
}

/// Format a full comparison result for human-readable terminal output.
///
/// Renders the p-value grid with one row per region and one column per
/// band; significant cells are marked and colored.
pub fn format_comparison(comparison: &Comparison) -> String {
    let mut out = String::new();
    let pvals = &comparison.pvalues;

    out.push_str(&format!("{}\n\n", comparison.summary().bold()));

    // Column header.
    let label_width = pvals
        .regions()
        .iter()
        .map(|r| r.len())
        .max()
        .unwrap_or(0)
        .max(6);
    out.push_str(&format!("{:label_width$}", "region"));
    for band in pvals.bands() {
        out.push_str(&format!("  {:>10}", band));
    }
    out.push('\n');

    for (ri, region) in pvals.regions().iter().enumerate() {
        out.push_str(&format!("{:label_width$}", region));
        for bi in 0..pvals.num_bands() {
            // Pad before colorizing so ANSI escapes don't skew the width.
            match pvals.get_at(ri, bi) {
                Some(p) if p <= SIGNIFICANCE_THRESHOLD => {
                    let cell = format!("{:>10}", format!("{:.4}*", p));
                    out.push_str(&format!("  {}", cell.red()));
                }
                Some(p) => {
                    out.push_str(&format!("  {:>10}", format!("{:.4}", p)));
                }
                None => {
                    out.push_str(&format!("  {:>10}", "-"));
                }
            }
        }
        out.push('\n');
    }

    if comparison.significant.is_empty() {
        out.push_str(&format!("\n{}\n", "no significant locations".dimmed()));
    } else {
        let locs: Vec<String> = comparison.significant.iter().map(|l| l.to_string()).collect();
        out.push_str(&format!(
            "\nsignificant (p <= {}): {}\n",
            SIGNIFICANCE_THRESHOLD,
            locs.join(", ").yellow()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare, PsdTable, StatTest};

    fn example_table() -> PsdTable {
        let mut table = PsdTable::new(vec!["Fz".into(), "Pz".into()]);
        let baseline = [9.1, 8.7, 9.4, 8.9, 9.0];
        let shifted = [3.0, 2.8, 3.3, 2.5, 3.1];
        for i in 0..5 {
            let subject = format!("S{:02}", i);
            table
                .push_row(&subject, "alpha", "EC_00", vec![baseline[i], 5.0 + i as f64 * 0.1])
                .unwrap();
            table
                .push_row(&subject, "alpha", "EC_06", vec![shifted[i], 5.05 + i as f64 * 0.1])
                .unwrap();
        }
        table
    }

    #[test]
    fn band_findings_names_band_and_locations() {
        let locs = vec![SignificantLocation::new("alpha", "Fz")];
        let line = format_band_findings(("EC_00", "EC_06"), "alpha", &locs);
        assert!(line.contains("EC_00"));
        assert!(line.contains("alpha"));
        assert!(line.contains("alpha/Fz"));
    }

    #[test]
    fn comparison_output_lists_regions_and_bands() {
        let table = example_table();
        let result = compare(&table, ("EC_00", "EC_06"), StatTest::PairedT).unwrap();
        let rendered = format_comparison(&result);

        assert!(rendered.contains("Fz"));
        assert!(rendered.contains("Pz"));
        assert!(rendered.contains("alpha"));
        assert!(rendered.contains("significant"));
    }
}
