//! Drug catalog and matching cascade for MediScan Engine
//!
//! Maps noisy recognized text (OCR output that may be partial, re-cased,
//! or surrounded by garbage) to a best-effort catalog record through a
//! deterministic three-stage cascade:
//!
//! 1. **Exact** - case-insensitive name equality
//! 2. **Substring** - the candidate contained inside a catalog name
//! 3. **Keyword** - individual tokens of the candidate, short tokens dropped
//!
//! Stages run from highest to lowest confidence, every candidate is tried
//! at a stage before the cascade weakens, and catalog insertion order is
//! the documented tie-break within a stage. Matching is synchronous and
//! never fails: malformed input simply does not match.
//!
//! The catalog itself is read-only after load and ingested from the
//! crawled CSV exports with an explicit validation step, so the matcher
//! only ever sees records with a usable name.
//!
//! # Example
//!
//! ```rust,no_run
//! use drug_lookup_service::{DrugMatcher, DrugStore, MatchResult};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DrugStore::load_csv("data/drug_database.csv")?;
//! let matcher = DrugMatcher::new(&store);
//!
//! let candidates = vec!["PANADOL EXTRA".to_string(), "garbled123".to_string()];
//! match matcher.resolve(&candidates) {
//!     MatchResult::Resolved { record, .. } => println!("Found: {}", record.name),
//!     MatchResult::NotFound { .. } => println!("No match"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod matcher;
pub mod record;
pub mod store;

pub use error::*;
pub use matcher::*;
pub use record::*;
pub use store::*;
