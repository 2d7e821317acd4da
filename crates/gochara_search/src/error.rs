//! Error type for event searches.

use gochara_core::OracleError;

/// Errors from event search.
///
/// Oracle failures pass through untouched; everything else is a usage
/// error caught before the first oracle call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Error from the position oracle.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
    /// Invalid search configuration or argument.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
