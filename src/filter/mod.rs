//! Filter expressions over capability attributes.
//!
//! A filter is a small boolean query language in LDAP search-filter style:
//! `(&(name=foo)(version>=2.0))`. This module provides:
//!
//! - **Ast**: the immutable `FilterNode` tree, its canonical rendering, and
//!   construction from plain attribute maps
//! - **Parser**: filter-text parsing with syntax errors that carry the
//!   offending input
//! - **Matcher**: type-aware evaluation of a filter against a capability,
//!   including mandatory-attribute enforcement
//!
//! Parsing can fail; matching cannot. A comparison whose operand does not
//! parse as the attribute's type simply does not match.

mod ast;
mod matcher;
mod parser;

pub use ast::{FilterNode, Operator, SubstringPattern};
pub use matcher::{matches, satisfies};
pub use parser::{parse_filter, MAX_FILTER_DEPTH};

#[cfg(test)]
mod tests;
