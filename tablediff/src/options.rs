//! Options controlling how tables are diffed.

use serde::{Deserialize, Serialize};

/// Configuration for [`Table::diff`](crate::Table::diff).
///
/// ```rust
/// use tablediff::DiffOptions;
///
/// let options = DiffOptions::new().raise(false).coldiff(true);
/// assert!(!options.raise);
/// assert!(options.coldiff);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Fail with a mismatch error when any difference is found
    pub raise: bool,
    /// Match columns by header instead of by position
    pub coldiff: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            raise: true,
            coldiff: false,
        }
    }
}

impl DiffOptions {
    /// Create new default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set whether differences are an error
    pub fn raise(mut self, raise: bool) -> Self {
        self.raise = raise;
        self
    }

    /// Builder: set whether columns are reconciled by header
    pub fn coldiff(mut self, coldiff: bool) -> Self {
        self.coldiff = coldiff;
        self
    }
}
