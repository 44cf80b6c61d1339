//! Comparison output model: the p-value table and significance markers.

use serde::{Deserialize, Serialize};

use crate::stats::StatTest;

/// Dense region × band table of p-values.
///
/// Rows are the input table's region columns; columns are the distinct
/// frequency bands. A cell is `None` until a p-value has been computed for
/// it, which keeps "never computed" distinct from any real p-value
/// (including exactly 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PValueTable {
    regions: Vec<String>,
    bands: Vec<String>,
    /// Row-major cells: `cells[region_index * bands.len() + band_index]`.
    cells: Vec<Option<f64>>,
}

impl PValueTable {
    /// Create an empty table with all cells unset.
    pub fn new(regions: Vec<String>, bands: Vec<String>) -> Self {
        let cells = vec![None; regions.len() * bands.len()];
        Self {
            regions,
            bands,
            cells,
        }
    }

    /// Region row labels.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Band column labels.
    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    /// Number of region rows.
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Number of band columns.
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Index of a region row by name.
    pub fn region_index(&self, region: &str) -> Option<usize> {
        self.regions.iter().position(|r| r == region)
    }

    /// Index of a band column by name.
    pub fn band_index(&self, band: &str) -> Option<usize> {
        self.bands.iter().position(|b| b == band)
    }

    /// Look up a cell by region and band name.
    ///
    /// Returns `None` for unknown labels as well as for unset cells.
    pub fn get(&self, region: &str, band: &str) -> Option<f64> {
        let ri = self.region_index(region)?;
        let bi = self.band_index(band)?;
        self.get_at(ri, bi)
    }

    /// Look up a cell by row and column index.
    pub fn get_at(&self, region_index: usize, band_index: usize) -> Option<f64> {
        if region_index >= self.regions.len() || band_index >= self.bands.len() {
            return None;
        }
        self.cells[region_index * self.bands.len() + band_index]
    }

    /// Set a cell by row and column index.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub(crate) fn set(&mut self, region_index: usize, band_index: usize, p: f64) {
        assert!(region_index < self.regions.len(), "region index out of bounds");
        assert!(band_index < self.bands.len(), "band index out of bounds");
        self.cells[region_index * self.bands.len() + band_index] = Some(p);
    }

    /// Iterate over all cells as `(region, band, p_value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Option<f64>)> {
        self.regions.iter().enumerate().flat_map(move |(ri, region)| {
            self.bands.iter().enumerate().map(move |(bi, band)| {
                (
                    region.as_str(),
                    band.as_str(),
                    self.cells[ri * self.bands.len() + bi],
                )
            })
        })
    }
}

/// A (band, region) pair whose p-value met the significance threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignificantLocation {
    /// Frequency band label.
    pub band: String,
    /// Region column name.
    pub region: String,
}

impl SignificantLocation {
    /// Create a significance marker.
    pub fn new(band: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            band: band.into(),
            region: region.into(),
        }
    }
}

impl std::fmt::Display for SignificantLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.band, self.region)
    }
}

/// Run statistics recorded alongside the comparison result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Distinct bands found in the table.
    pub n_bands: usize,
    /// Region columns in the table.
    pub n_regions: usize,
    /// Individual tests evaluated (bands × regions).
    pub n_tests: usize,
    /// Paired subjects per band, in band order.
    pub subjects_per_band: Vec<usize>,
}

/// Complete result of a two-condition comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The test that was applied.
    pub test: StatTest,
    /// The compared condition codes, in the order given by the caller.
    pub conditions: (String, String),
    /// P-values for every region × band cell.
    pub pvalues: PValueTable,
    /// Locations with p ≤ 0.05, band-major.
    pub significant: Vec<SignificantLocation>,
    /// Run statistics.
    pub diagnostics: Diagnostics,
}

impl Comparison {
    /// Check whether a (band, region) location was significant.
    pub fn is_significant(&self, band: &str, region: &str) -> bool {
        self.significant
            .iter()
            .any(|loc| loc.band == band && loc.region == region)
    }

    /// Get a human-readable one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} of '{}' vs '{}': {} significant of {} locations",
            self.test,
            self.conditions.0,
            self.conditions.1,
            self.significant.len(),
            self.diagnostics.n_tests,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cells_start_unset() {
        let table = PValueTable::new(names(&["Fz", "Pz"]), names(&["alpha"]));
        assert_eq!(table.get("Fz", "alpha"), None);
        assert_eq!(table.get_at(0, 0), None);
    }

    #[test]
    fn set_and_get_by_name() {
        let mut table = PValueTable::new(names(&["Fz", "Pz"]), names(&["alpha", "beta"]));
        table.set(1, 0, 0.03);
        assert_eq!(table.get("Pz", "alpha"), Some(0.03));
        assert_eq!(table.get("Fz", "alpha"), None);
        assert_eq!(table.get("Pz", "beta"), None);
    }

    #[test]
    fn unknown_labels_return_none() {
        let table = PValueTable::new(names(&["Fz"]), names(&["alpha"]));
        assert_eq!(table.get("Cz", "alpha"), None);
        assert_eq!(table.get("Fz", "gamma"), None);
        assert_eq!(table.get_at(5, 0), None);
    }

    #[test]
    fn zero_regions_and_bands() {
        let no_regions = PValueTable::new(vec![], names(&["alpha"]));
        assert_eq!(no_regions.num_regions(), 0);
        assert_eq!(no_regions.iter().count(), 0);

        let no_bands = PValueTable::new(names(&["Fz"]), vec![]);
        assert_eq!(no_bands.num_bands(), 0);
        assert_eq!(no_bands.iter().count(), 0);
    }

    #[test]
    fn iter_is_region_major() {
        let mut table = PValueTable::new(names(&["Fz", "Pz"]), names(&["alpha", "beta"]));
        table.set(0, 0, 0.1);
        table.set(0, 1, 0.2);
        table.set(1, 0, 0.3);
        table.set(1, 1, 0.4);

        let cells: Vec<(&str, &str, Option<f64>)> = table.iter().collect();
        assert_eq!(cells[0], ("Fz", "alpha", Some(0.1)));
        assert_eq!(cells[1], ("Fz", "beta", Some(0.2)));
        assert_eq!(cells[2], ("Pz", "alpha", Some(0.3)));
        assert_eq!(cells[3], ("Pz", "beta", Some(0.4)));
    }

    #[test]
    fn significant_location_display() {
        let loc = SignificantLocation::new("alpha", "Fz");
        assert_eq!(loc.to_string(), "alpha/Fz");
    }
}
