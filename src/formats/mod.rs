//! Per-format asset verification
//!
//! Each verifier answers one question: does this file load, and does it hold
//! any data? Every verifier converts its own errors (and panics raised inside
//! format libraries) into a failed [`VerificationOutcome`]; nothing escapes.

mod columnar;
mod generic;
mod relational;
mod triples;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

pub use columnar::{parquet_fragments, verify_parquet};
pub use generic::verify_generic;
pub use relational::verify_sqlite;
pub use triples::{verify_hdt, HDT_SIGNATURE};

/// Suffix for columnar (Parquet) assets
pub const COLUMNAR_SUFFIX: &str = ".parquet";

/// Suffixes for embedded relational (SQLite) assets
pub const RELATIONAL_SUFFIXES: &[&str] = &[".sqlite", ".sqlite3", ".db"];

/// Suffix for compressed triple-store (HDT) assets
pub const TRIPLE_STORE_SUFFIX: &str = ".hdt";

/// File kind an asset is verified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Columnar,
    Relational,
    TripleStore,
    Generic,
}

impl AssetKind {
    /// Classify by suffix, case-insensitively.
    ///
    /// Precedence: columnar, relational, triple store, generic.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(COLUMNAR_SUFFIX) {
            Self::Columnar
        } else if RELATIONAL_SUFFIXES
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            Self::Relational
        } else if lower.ends_with(TRIPLE_STORE_SUFFIX) {
            Self::TripleStore
        } else {
            Self::Generic
        }
    }

    /// Run the verifier for this kind
    pub fn verify(self, path: &Path) -> VerificationOutcome {
        match self {
            Self::Columnar => verify_parquet(path),
            Self::Relational => verify_sqlite(path),
            Self::TripleStore => verify_hdt(path),
            Self::Generic => verify_generic(path),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Columnar => write!(f, "parquet"),
            Self::Relational => write!(f, "sqlite"),
            Self::TripleStore => write!(f, "hdt"),
            Self::Generic => write!(f, "file"),
        }
    }
}

/// Result of checking one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub passed: bool,
    pub message: String,
}

impl VerificationOutcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Pass when `count > 0`, picking the matching message
    fn from_count(
        count: u64,
        on_data: impl FnOnce(u64) -> String,
        on_empty: impl FnOnce() -> String,
    ) -> Self {
        if count > 0 {
            Self::passed(on_data(count))
        } else {
            Self::failed(on_empty())
        }
    }
}

/// Run a format check, turning errors and panics into a failed outcome.
///
/// `describe` prefixes the error text, e.g. "Failed to load parquet file".
fn contain<E, F>(describe: &str, check: F) -> VerificationOutcome
where
    E: fmt::Display,
    F: FnOnce() -> Result<VerificationOutcome, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => VerificationOutcome::failed(format!("{describe}: {err:#}")),
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!(reason = %reason, "format library panicked");
            VerificationOutcome::failed(format!("{describe}: {reason}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "reader panicked".to_string()
    }
}
