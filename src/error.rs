//! Error types for the I/O boundaries (storage and tuning files).
//!
//! The simulation itself never fails: out-of-range values are clamped every
//! tick. Only the edges that touch the outside world return these errors, and
//! their callers log and carry on with defaults.

use std::fmt;

/// Failure talking to a key-value store.
#[derive(Debug)]
pub enum StoreError {
    /// The backing store does not exist on this platform or refused access.
    Unavailable(&'static str),
    /// Filesystem error while reading or writing the store file.
    Io(std::io::Error),
    /// The store file is not a JSON object of numbers.
    Json(serde_json::Error),
    /// A stored value could not be read as a number.
    InvalidNumber {
        /// Key that was read.
        key: String,
        /// Raw text found under the key.
        raw: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(what) => write!(f, "storage unavailable: {}", what),
            StoreError::Io(e) => write!(f, "storage I/O failed: {}", e),
            StoreError::Json(e) => write!(f, "storage file is malformed: {}", e),
            StoreError::InvalidNumber { key, raw } => {
                write!(f, "value under '{}' is not a number: {:?}", key, raw)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Failure loading a tuning file.
#[derive(Debug)]
pub enum TuningError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid tuning JSON.
    Json(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "could not read tuning file: {}", e),
            TuningError::Json(e) => write!(f, "invalid tuning JSON: {}", e),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::InvalidNumber {
            key: "bestScore".into(),
            raw: "abc".into(),
        };
        assert!(err.to_string().contains("bestScore"));
    }

    #[test]
    fn test_tuning_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TuningError = json_err.into();
        assert!(matches!(err, TuningError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
