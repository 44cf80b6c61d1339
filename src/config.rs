//! Comparison configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a comparison run.
///
/// Defaults preserve the classical behavior: positional subject pairing and
/// no diagnostic output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Verify that subject identifiers line up position-by-position between
    /// the two condition subsets before testing.
    ///
    /// Default: false
    ///
    /// The paired tests rely on row order for subject alignment. Enabling
    /// this check turns a silently wrong pairing into a
    /// [`SubjectMisalignment`](crate::CompareError::SubjectMisalignment) error.
    pub check_subject_alignment: bool,

    /// Print a diagnostic line to stderr for each band with at least one
    /// significant region.
    ///
    /// Default: false
    ///
    /// Purely a side channel; the returned report is identical either way.
    pub verbose: bool,
}

impl Config {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the subject-alignment identity check.
    pub fn with_subject_alignment_check(mut self) -> Self {
        self.check_subject_alignment = true;
        self
    }

    /// Enable per-band diagnostic output.
    pub fn with_verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}
