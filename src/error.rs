//! Error types for stocatima.
//!
//! Every error here is fatal: it aborts the run and maps to exit code 1.
//! Per-card problems are not errors; the resolver reports them as skips
//! and keeps going (see [`crate::migrate::SkipReason`]).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for stocatima operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes.
///
/// The code string shows up in debug logs; shell scripts only see the
/// exit code, which is 1 for every fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UsageError,
    StoreNotFound,
    StoreUnavailable,
    NoLoyaltyCards,
    IconDecodeError,
    PackagingError,
    IoError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::UsageError => "USAGE_ERROR",
            Self::StoreNotFound => "STORE_NOT_FOUND",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::NoLoyaltyCards => "NO_LOYALTY_CARDS",
            Self::IconDecodeError => "ICON_DECODE_ERROR",
            Self::PackagingError => "PACKAGING_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }

    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UsageError
            | Self::StoreNotFound
            | Self::StoreUnavailable
            | Self::NoLoyaltyCards
            | Self::IconDecodeError
            | Self::PackagingError
            | Self::IoError => 1,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Fatal errors that abort a migration run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("No store found: {}", path.display())]
    StoreNotFound { path: PathBuf },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    #[error("No loyalty card records found in {}", path.display())]
    NoLoyaltyCards { path: PathBuf },

    #[error("Cannot decode icon {}: {source}", path.display())]
    IconDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Packaging failed for {}: {source}", path.display())]
    Packaging {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Usage(_) => ErrorCode::UsageError,
            Self::StoreNotFound { .. } => ErrorCode::StoreNotFound,
            Self::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            Self::NoLoyaltyCards { .. } => ErrorCode::NoLoyaltyCards,
            Self::IconDecode { .. } => ErrorCode::IconDecodeError,
            Self::Packaging { .. } => ErrorCode::PackagingError,
            Self::Io(_) => ErrorCode::IoError,
        }
    }

    /// Exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Recovery hint for the user, if there is an actionable one.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Usage(_) => Some(format!("Usage: {}", crate::cli::USAGE)),

            Self::StoreNotFound { .. } => Some(format!(
                "Pass the synced database path explicitly, \
                 or place it at `{}` in the current directory.",
                crate::config::DEFAULT_STORE_PATH
            )),

            Self::StoreUnavailable(_) => Some(
                "The file must be a SQLite database with a `synced_resources` table.".to_string(),
            ),

            Self::NoLoyaltyCards { .. } => Some(format!(
                "Expected rows with content type `{}` under `/users/<user>/loyalty-cards/`.",
                crate::config::LOYALTY_CARD_CONTENT_TYPE
            )),

            Self::IconDecode { .. } | Self::Packaging { .. } | Self::Io(_) => None,
        }
    }

    /// Wrap a zip failure for the archive at `path`.
    pub(crate) fn packaging(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Packaging {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_fatal_error_exits_with_one() {
        let errors = [
            Error::Usage("bad args".into()),
            Error::StoreNotFound {
                path: PathBuf::from("missing.sqlite"),
            },
            Error::StoreUnavailable(rusqlite::Error::InvalidQuery),
            Error::NoLoyaltyCards {
                path: PathBuf::from("empty.sqlite"),
            },
            Error::Io(std::io::Error::other("disk full")),
        ];

        for err in &errors {
            assert_eq!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn test_store_not_found_names_path() {
        let err = Error::StoreNotFound {
            path: PathBuf::from("/nowhere/sync_db.sqlite"),
        };
        assert!(err.to_string().contains("/nowhere/sync_db.sqlite"));
        assert_eq!(err.error_code().as_str(), "STORE_NOT_FOUND");
    }

    #[test]
    fn test_usage_hint_shows_usage_line() {
        let hint = Error::Usage("unexpected argument".into()).hint().unwrap();
        assert!(hint.starts_with("Usage: stocatima"));
    }
}
