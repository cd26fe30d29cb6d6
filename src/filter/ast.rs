use std::collections::BTreeMap;
use std::fmt;

use crate::types::TypedValue;
use crate::version::VersionRange;

/// Comparison operators usable in a filter leaf. Presence (`=*`) and
/// substring (`=` with wildcards) tests are separate node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    GreaterEqual,
    LessEqual,
    Approximate,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Equal => "=",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Approximate => "~=",
        })
    }
}

/// A substring test: literal segments separated by wildcards. An unanchored
/// start or end means the value may begin or end with anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringPattern {
    pub segments: Vec<String>,
    pub anchored_start: bool,
    pub anchored_end: bool,
}

impl SubstringPattern {
    /// Returns true if `value` contains the pattern's segments in order,
    /// honoring the anchoring at either end.
    pub fn matches(&self, value: &str) -> bool {
        let mut pos = 0usize;
        let last = self.segments.len().saturating_sub(1);
        for (i, segment) in self.segments.iter().enumerate() {
            if i == 0 && self.anchored_start {
                if !value.starts_with(segment.as_str()) {
                    return false;
                }
                pos = segment.len();
            } else if i == last && self.anchored_end {
                if value.len() < pos + segment.len() || !value.ends_with(segment.as_str()) {
                    return false;
                }
                pos = value.len();
            } else {
                match value[pos..].find(segment.as_str()) {
                    Some(found) => pos = pos + found + segment.len(),
                    None => return false,
                }
            }
        }
        true
    }
}

impl fmt::Display for SubstringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.anchored_start {
            f.write_str("*")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("*")?;
            }
            f.write_str(&escape_literal(segment))?;
        }
        if !self.anchored_end {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// One node of a parsed filter expression. The tree is immutable once built;
/// evaluation never mutates or shares nodes across calls.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Matches every capability.
    MatchAll,
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    /// True when the named attribute exists, whatever its value.
    Present { attribute: String },
    /// Wildcard match against a string-valued attribute.
    Substring {
        attribute: String,
        pattern: SubstringPattern,
    },
    /// Typed comparison of the named attribute against a textual operand.
    Comparison {
        attribute: String,
        operator: Operator,
        operand: String,
    },
}

impl FilterNode {
    /// Build the filter a requirement carries for a plain attribute map: an
    /// equality conjunction, with version ranges expanded into their bound
    /// comparisons. An empty map yields `MatchAll`.
    pub fn from_attributes(attributes: &BTreeMap<String, TypedValue>) -> FilterNode {
        let mut leaves = Vec::new();
        for (key, value) in attributes {
            match value {
                TypedValue::Range(range) => push_range_leaves(&mut leaves, key, range),
                other => leaves.push(FilterNode::Comparison {
                    attribute: key.clone(),
                    operator: Operator::Equal,
                    operand: other.to_string(),
                }),
            }
        }
        if leaves.is_empty() {
            FilterNode::MatchAll
        } else if leaves.len() == 1 {
            leaves.remove(0)
        } else {
            FilterNode::And(leaves)
        }
    }

    /// The attribute a leaf node tests, if this is a leaf.
    pub(crate) fn leaf_attribute(&self) -> Option<&str> {
        match self {
            FilterNode::Present { attribute }
            | FilterNode::Substring { attribute, .. }
            | FilterNode::Comparison { attribute, .. } => Some(attribute),
            _ => None,
        }
    }
}

fn push_range_leaves(leaves: &mut Vec<FilterNode>, key: &str, range: &VersionRange) {
    leaves.push(FilterNode::Comparison {
        attribute: key.to_string(),
        operator: Operator::GreaterEqual,
        operand: range.floor().to_string(),
    });
    if !range.floor_inclusive() {
        leaves.push(FilterNode::Not(Box::new(FilterNode::Comparison {
            attribute: key.to_string(),
            operator: Operator::Equal,
            operand: range.floor().to_string(),
        })));
    }
    if let Some(ceiling) = range.ceiling() {
        leaves.push(FilterNode::Comparison {
            attribute: key.to_string(),
            operator: Operator::LessEqual,
            operand: ceiling.to_string(),
        });
        if !range.ceiling_inclusive() {
            leaves.push(FilterNode::Not(Box::new(FilterNode::Comparison {
                attribute: key.to_string(),
                operator: Operator::Equal,
                operand: ceiling.to_string(),
            })));
        }
    }
}

/// Canonical rendering. Literal values are escaped so that parsing the
/// rendered text yields the same tree.
impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::MatchAll => f.write_str("(*)"),
            FilterNode::And(children) => {
                f.write_str("(&")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            FilterNode::Or(children) => {
                f.write_str("(|")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str(")")
            }
            FilterNode::Not(child) => write!(f, "(!{})", child),
            FilterNode::Present { attribute } => write!(f, "({}=*)", attribute),
            FilterNode::Substring { attribute, pattern } => {
                write!(f, "({}={})", attribute, pattern)
            }
            FilterNode::Comparison {
                attribute,
                operator,
                operand,
            } => write!(f, "({}{}{})", attribute, operator, escape_literal(operand)),
        }
    }
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '(' | ')' | '*') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
