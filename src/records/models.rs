use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::Result;
use crate::filter::FilterNode;
use crate::tokenizer::split_delimited;
use crate::types::TypedValue;

use super::{FILTER_DIRECTIVE, MANDATORY_DIRECTIVE};

/// A named, attributed, directive-bearing description of something a
/// component provides.
///
/// Two capabilities with equal namespace, attributes, and directives are
/// equal. Once built, a capability is a plain value object; nothing mutates
/// it during matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capability {
    pub namespace: String,
    pub attributes: BTreeMap<String, TypedValue>,
    pub directives: BTreeMap<String, String>,
}

impl Capability {
    pub fn new<S: Into<String>>(namespace: S) -> Self {
        Self {
            namespace: namespace.into(),
            attributes: BTreeMap::new(),
            directives: BTreeMap::new(),
        }
    }

    pub fn with_attribute<K: Into<String>, V: Into<TypedValue>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_directive<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.directives.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&TypedValue> {
        self.attributes.get(key)
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }

    /// The attribute names this capability marks mandatory, from the
    /// comma-delimited `mandatory` directive.
    pub fn mandatory_attributes(&self) -> BTreeSet<String> {
        match self.directives.get(MANDATORY_DIRECTIVE) {
            None => BTreeSet::new(),
            Some(value) => split_delimited(value, ",", true)
                .unwrap_or_default()
                .into_iter()
                .collect(),
        }
    }

    pub fn is_attribute_mandatory(&self, name: &str) -> bool {
        self.mandatory_attributes().contains(name)
    }
}

/// A named, attributed, directive-bearing description of something a
/// component needs, typically carrying a `filter` directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    pub namespace: String,
    pub attributes: BTreeMap<String, TypedValue>,
    pub directives: BTreeMap<String, String>,
}

impl Requirement {
    pub fn new<S: Into<String>>(namespace: S) -> Self {
        Self {
            namespace: namespace.into(),
            attributes: BTreeMap::new(),
            directives: BTreeMap::new(),
        }
    }

    pub fn with_attribute<K: Into<String>, V: Into<TypedValue>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_directive<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.directives.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&TypedValue> {
        self.attributes.get(key)
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }

    /// Parse this requirement's `filter` directive, if present.
    pub fn filter(&self) -> Result<Option<FilterNode>> {
        match self.directives.get(FILTER_DIRECTIVE) {
            None => Ok(None),
            Some(expr) => crate::filter::parse_filter(expr).map(Some),
        }
    }

    /// Attach a filter, storing its rendered form as the `filter` directive.
    pub fn with_filter(mut self, filter: &FilterNode) -> Self {
        self.directives
            .insert(FILTER_DIRECTIVE.to_string(), filter.to_string());
        self
    }
}
