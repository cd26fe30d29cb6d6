//! Capability and requirement records.
//!
//! Records are the normalized output of header parsing: one record per
//! `(clause, path)` pair, the path becoming the record's namespace. This
//! module provides:
//!
//! - **Models**: the `Capability` and `Requirement` value objects
//! - **Builder**: clause-to-record conversion with namespace validation,
//!   plus the internally synthesized identity capability
//!
//! Certain namespaces are reserved for capabilities the system synthesizes
//! itself (identity and wiring); headers that declare them explicitly are
//! rejected.

mod builder;
mod models;

pub use builder::{
    capabilities_from_header, clauses_to_capabilities, clauses_to_requirements,
    identity_capability, requirements_from_header, unmarshal_attribute, unmarshal_directive,
};
pub use models::{Capability, Requirement};

/// Namespace of the synthesized identity capability.
pub const IDENTITY_NAMESPACE: &str = "component.identity";

/// Prefix of the namespaces synthesized while wiring components together.
pub const WIRING_NAMESPACE_PREFIX: &str = "component.wiring.";

/// Directive naming the attributes a capability requires filters to mention.
pub const MANDATORY_DIRECTIVE: &str = "mandatory";

/// Directive carrying a requirement's filter expression.
pub const FILTER_DIRECTIVE: &str = "filter";

/// Attribute carrying the version of the synthesized identity capability.
pub const VERSION_ATTRIBUTE: &str = "version";

/// Attribute carrying the type of the synthesized identity capability.
pub const TYPE_ATTRIBUTE: &str = "type";
