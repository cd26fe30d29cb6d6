//! Filter evaluation against capabilities.
//!
//! Matching is a pure tree walk: boolean composition short-circuits, leaf
//! comparisons dispatch on the attribute's runtime type, and a capability's
//! mandatory attributes must all be referenced by the filter's top level for
//! any match to stand. Evaluation never fails; an operand that does not parse
//! as the attribute's type simply does not match.

use std::cmp::Ordering;
use std::str::FromStr;

use tracing::trace;

use crate::error::Result;
use crate::records::{Capability, Requirement};
use crate::types::TypedValue;
use crate::version::{Version, VersionRange};

use super::ast::{FilterNode, Operator, SubstringPattern};

/// Evaluate a filter against a capability.
///
/// Returns true when the filter structurally matches and every attribute the
/// capability marks mandatory is referenced at the filter's top level.
pub fn matches(capability: &Capability, filter: &FilterNode) -> bool {
    let matched = evaluate(capability, filter) && mandatory_referenced(capability, filter);
    trace!(namespace = %capability.namespace, matched, "evaluated filter");
    matched
}

/// Check whether a capability satisfies a requirement: namespaces must be
/// equal, and the requirement's filter directive (if any) must match. A
/// requirement without a filter matches as if by `MatchAll`, so it still
/// fails against a capability with unreferenced mandatory attributes.
///
/// Fails only when the requirement carries a malformed filter directive.
pub fn satisfies(capability: &Capability, requirement: &Requirement) -> Result<bool> {
    if capability.namespace != requirement.namespace {
        return Ok(false);
    }
    let filter = requirement.filter()?.unwrap_or(FilterNode::MatchAll);
    Ok(matches(capability, &filter))
}

fn evaluate(capability: &Capability, node: &FilterNode) -> bool {
    match node {
        FilterNode::MatchAll => true,
        FilterNode::And(children) => children.iter().all(|c| evaluate(capability, c)),
        FilterNode::Or(children) => children.iter().any(|c| evaluate(capability, c)),
        FilterNode::Not(child) => !evaluate(capability, child),
        FilterNode::Present { attribute } => capability.attributes.contains_key(attribute),
        FilterNode::Substring { attribute, pattern } => match capability.attribute(attribute) {
            Some(value) => substring_matches(value, pattern),
            None => false,
        },
        FilterNode::Comparison {
            attribute,
            operator,
            operand,
        } => match capability.attribute(attribute) {
            Some(value) => compare(value, *operator, operand),
            None => false,
        },
    }
}

/// Substring tests are defined for string values only; for a list, any
/// string element may match. Every other type evaluates to false.
fn substring_matches(value: &TypedValue, pattern: &SubstringPattern) -> bool {
    match value {
        TypedValue::Str(s) => pattern.matches(s),
        TypedValue::List(items) => items.iter().any(|item| substring_matches(item, pattern)),
        _ => false,
    }
}

/// Type-aware comparison of an attribute value against the filter's textual
/// operand. The operand is coerced to the attribute's type; coercion failure
/// means no match.
fn compare(value: &TypedValue, operator: Operator, operand: &str) -> bool {
    match value {
        TypedValue::Str(s) => match operator {
            Operator::Equal => s == operand,
            Operator::GreaterEqual => s.as_str() >= operand,
            Operator::LessEqual => s.as_str() <= operand,
            Operator::Approximate => approximate(s) == approximate(operand),
        },
        TypedValue::Long(n) => match operand.trim().parse::<i64>() {
            Err(_) => false,
            Ok(rhs) => match operator {
                Operator::Equal | Operator::Approximate => *n == rhs,
                Operator::GreaterEqual => *n >= rhs,
                Operator::LessEqual => *n <= rhs,
            },
        },
        TypedValue::Double(d) => match operand.trim().parse::<f64>() {
            Err(_) => false,
            Ok(rhs) => match (operator, d.partial_cmp(&rhs)) {
                (Operator::Equal | Operator::Approximate, Some(Ordering::Equal)) => true,
                (Operator::GreaterEqual, Some(Ordering::Greater | Ordering::Equal)) => true,
                (Operator::LessEqual, Some(Ordering::Less | Ordering::Equal)) => true,
                _ => false,
            },
        },
        // Booleans only support equality, whatever the declared operator.
        TypedValue::Boolean(b) => *b == operand.trim().eq_ignore_ascii_case("true"),
        TypedValue::Char(c) => {
            let mut chars = operand.chars();
            match (chars.next(), chars.next()) {
                (Some(rhs), None) => match operator {
                    Operator::Equal => *c == rhs,
                    Operator::GreaterEqual => *c >= rhs,
                    Operator::LessEqual => *c <= rhs,
                    Operator::Approximate => {
                        c.to_lowercase().eq(rhs.to_lowercase())
                    }
                },
                _ => false,
            }
        }
        TypedValue::Version(v) => {
            // An equality test against a comma-bearing operand is a range
            // inclusion test.
            if operator == Operator::Equal && operand.contains(',') {
                return match VersionRange::from_str(operand) {
                    Ok(range) => range.includes(v),
                    Err(_) => false,
                };
            }
            match Version::from_str(operand) {
                Err(_) => false,
                Ok(rhs) => match operator {
                    Operator::Equal | Operator::Approximate => *v == rhs,
                    Operator::GreaterEqual => *v >= rhs,
                    Operator::LessEqual => *v <= rhs,
                },
            }
        }
        // No ordering is defined over ranges; fall back to textual equality.
        TypedValue::Range(r) => r.to_string() == operand,
        TypedValue::List(items) => items.iter().any(|item| compare(item, operator, operand)),
    }
}

/// Approximate string form: whitespace removed, case folded.
fn approximate(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Every attribute the capability marks mandatory must be referenced by name
/// at the filter's top level: by a top-level leaf, or by an immediate
/// (non-NOT) child of a top-level AND. Deeper references do not count.
fn mandatory_referenced(capability: &Capability, filter: &FilterNode) -> bool {
    let mandatory = capability.mandatory_attributes();
    if mandatory.is_empty() {
        return true;
    }
    mandatory.iter().all(|name| references(filter, name))
}

fn references(filter: &FilterNode, name: &str) -> bool {
    if filter.leaf_attribute() == Some(name) {
        return true;
    }
    match filter {
        FilterNode::And(children) => children
            .iter()
            .any(|child| child.leaf_attribute() == Some(name)),
        _ => false,
    }
}
