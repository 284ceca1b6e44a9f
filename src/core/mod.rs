//! Post-parse processing for chatpulse.
//!
//! This module contains:
//! - [`summary`] - the parse report ([`ParseSummary`])
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use chatpulse::core::{ParseSummary, to_csv, to_json, to_jsonl, write_csv, write_json, write_jsonl};
//! # }
//! ```

pub mod output;
pub mod summary;

pub use summary::ParseSummary;

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
