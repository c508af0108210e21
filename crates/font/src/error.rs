use thiserror::Error;

/// Errors emitted while resolving, parsing, or measuring fonts.
///
/// Queueing operations catch these at the registry boundary and degrade to
/// logged no-ops; fallback resolution substitutes a default family instead of
/// propagating. The only failure that escapes as a panic is reading the glyph
/// page manager before it has been created.
#[derive(Debug, Error)]
pub enum FontError {
    /// The requested family could not be found on this system.
    #[error("font family '{family}' is not available: {reason}")]
    Unavailable {
        /// Family name that failed to resolve.
        family: String,
        /// Human-readable cause (no match, empty database, ...).
        reason: String,
    },

    /// Font data could not be parsed as TrueType.
    #[error("malformed font data: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// A worker-pool font task panicked or was cancelled.
    #[error("background font task failed: {0}")]
    Task(String),
}
