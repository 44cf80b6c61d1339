//! Long-format measurement table for power spectral density values.
//!
//! One [`Observation`] row carries the power values of every region for a
//! single (subject, frequency band, condition) triple. The region-name list
//! is fixed at table construction; every row must carry exactly one value
//! per region.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table row: one subject under one band and condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Subject identifier.
    pub subject: String,
    /// Frequency band label (e.g. "alpha").
    pub band: String,
    /// Experimental condition code (e.g. "EC_00").
    pub condition: String,
    /// One power value per region, in region-column order.
    pub values: Vec<f64>,
}

impl Observation {
    /// Create an observation row.
    pub fn new(
        subject: impl Into<String>,
        band: impl Into<String>,
        condition: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            subject: subject.into(),
            band: band.into(),
            condition: condition.into(),
            values,
        }
    }
}

/// Long-format table of power spectral density measurements.
///
/// Rows are kept in insertion order; that order is the positional pairing
/// used by the paired tests when two conditions are compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsdTable {
    /// Region column names (EEG channels or anatomical regions).
    pub regions: Vec<String>,
    /// All observation rows, in source order.
    pub rows: Vec<Observation>,
}

impl PsdTable {
    /// Create an empty table with the given region columns.
    pub fn new(regions: Vec<String>) -> Self {
        Self {
            regions,
            rows: Vec::new(),
        }
    }

    /// Append a row, validating it against the region columns.
    pub fn push(&mut self, row: Observation) -> Result<(), TableError> {
        self.check_row(self.rows.len(), &row)?;
        self.rows.push(row);
        Ok(())
    }

    /// Convenience constructor-and-push for a row.
    pub fn push_row(
        &mut self,
        subject: impl Into<String>,
        band: impl Into<String>,
        condition: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        self.push(Observation::new(subject, band, condition, values))
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Region column names.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct frequency bands, in first-seen order.
    pub fn bands(&self) -> Vec<&str> {
        let mut bands: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !bands.contains(&row.band.as_str()) {
                bands.push(&row.band);
            }
        }
        bands
    }

    /// Distinct condition codes, in first-seen order.
    pub fn conditions(&self) -> Vec<&str> {
        let mut conditions: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !conditions.contains(&row.condition.as_str()) {
                conditions.push(&row.condition);
            }
        }
        conditions
    }

    /// Rows for one band and condition, preserving source order.
    pub fn band_condition_rows(&self, band: &str, condition: &str) -> Vec<&Observation> {
        self.rows
            .iter()
            .filter(|r| r.band == band && r.condition == condition)
            .collect()
    }

    /// Validate the whole table for analysis.
    ///
    /// Checks region names for duplicates and every row for column count and
    /// finiteness. Rows pushed through [`push`](Self::push) are already
    /// valid; this guards tables built or deserialized field-by-field.
    pub fn validate(&self) -> Result<(), TableError> {
        for (i, name) in self.regions.iter().enumerate() {
            if self.regions[..i].contains(name) {
                return Err(TableError::DuplicateRegion { name: name.clone() });
            }
        }
        for (i, row) in self.rows.iter().enumerate() {
            self.check_row(i, row)?;
        }
        Ok(())
    }

    fn check_row(&self, index: usize, row: &Observation) -> Result<(), TableError> {
        if row.values.len() != self.regions.len() {
            return Err(TableError::RegionCountMismatch {
                row: index,
                expected: self.regions.len(),
                got: row.values.len(),
            });
        }
        if let Some(pos) = row.values.iter().position(|v| !v.is_finite()) {
            return Err(TableError::NonFiniteValue {
                row: index,
                region: self.regions[pos].clone(),
            });
        }
        Ok(())
    }
}

/// Errors from malformed measurement tables.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A row's value count does not match the region columns.
    RegionCountMismatch {
        /// Row index (0-based).
        row: usize,
        /// Expected number of values (region count).
        expected: usize,
        /// Number of values found.
        got: usize,
    },

    /// A row contains a NaN or infinite value.
    NonFiniteValue {
        /// Row index (0-based).
        row: usize,
        /// Region column holding the offending value.
        region: String,
    },

    /// Two region columns share a name.
    DuplicateRegion {
        /// The duplicated region name.
        name: String,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::RegionCountMismatch { row, expected, got } => {
                write!(
                    f,
                    "row {} has {} values but the table has {} region columns",
                    row, got, expected
                )
            }
            TableError::NonFiniteValue { row, region } => {
                write!(f, "row {} has a non-finite value in region '{}'", row, region)
            }
            TableError::DuplicateRegion { name } => {
                write!(f, "duplicate region column '{}'", name)
            }
        }
    }
}

impl std::error::Error for TableError {}
