//! proviso - descriptor-header parsing and capability matching.
//!
//! This library parses component descriptor headers into structured clauses,
//! builds typed capability and requirement records from them, and evaluates
//! LDAP-style filter expressions against capabilities.
//!
//! # Example
//!
//! ```
//! use proviso::{capabilities_from_header, matches, parse_filter};
//!
//! let capabilities =
//!     capabilities_from_header("com.example.http;version:Version=2.1.0").unwrap();
//! let filter = parse_filter("(version>=2.0.0)").unwrap();
//!
//! assert!(matches(&capabilities[0], &filter));
//! ```
//!
//! Everything here is a pure function over its inputs: parsing and matching
//! hold no shared state and are safe to call concurrently on different
//! inputs.

pub mod cli;
pub mod error;
pub mod filter;
pub mod header;
pub mod output;
pub mod records;
pub mod tokenizer;
pub mod types;
pub mod version;

// Re-export commonly used types at crate root
pub use error::{ProvisoError, Result};
pub use filter::{matches, parse_filter, satisfies, FilterNode};
pub use header::{normalize_clauses, parse_header, Clause};
pub use records::{
    capabilities_from_header, identity_capability, requirements_from_header, Capability,
    Requirement,
};
pub use types::TypedValue;
pub use version::{Version, VersionRange};
