use std::collections::BTreeMap;

use crate::types::TypedValue;

/// One comma-delimited unit of a header: an ordered list of path segments
/// plus the attributes, directives, and attribute type declarations shared by
/// those paths.
///
/// Attributes start out as `TypedValue::Str` when produced by the parser;
/// `normalize_clauses` replaces them with typed values according to
/// `declared_types`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    pub paths: Vec<String>,
    pub directives: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, TypedValue>,
    pub declared_types: BTreeMap<String, String>,
}

impl Clause {
    pub fn attribute(&self, key: &str) -> Option<&TypedValue> {
        self.attributes.get(key)
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }
}
