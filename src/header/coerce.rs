//! Declared-type coercion of clause attributes.
//!
//! The set of supported declared types is small and closed (`String`,
//! `Double`, `Long`, `Version`, and `List<...>` over those), so coercion is a
//! direct dispatch over the parsed tag rather than any dynamic lookup.

use std::str::FromStr;

use crate::error::{ProvisoError, Result};
use crate::tokenizer::split_delimited;
use crate::types::TypedValue;
use crate::version::Version;

use super::clause::Clause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    Str,
    Double,
    Long,
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaredType {
    Scalar(ScalarType),
    List(ScalarType),
}

/// Apply every clause's declared attribute types, replacing the raw string
/// values the parser produced with typed values.
///
/// Attributes without a type declaration (or declared `String`) are left
/// untouched. Fails with an error naming the attribute key and the offending
/// tag when the tag is unknown, a `List<...>` tag is malformed, or a value
/// does not parse as its declared type.
pub fn normalize_clauses(clauses: Vec<Clause>) -> Result<Vec<Clause>> {
    let mut normalized = Vec::with_capacity(clauses.len());
    for mut clause in clauses {
        let declarations: Vec<(String, String)> = clause
            .declared_types
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, tag) in declarations {
            if tag == "String" {
                continue;
            }
            if let Some(raw) = clause.attributes.get(&key) {
                let raw = raw.to_string();
                let typed = coerce_value(&key, &tag, &raw)?;
                clause.attributes.insert(key, typed);
            }
        }
        normalized.push(clause);
    }
    Ok(normalized)
}

/// Coerce one raw attribute value according to its declared type tag.
pub(crate) fn coerce_value(key: &str, tag: &str, raw: &str) -> Result<TypedValue> {
    match parse_type_tag(key, tag)? {
        DeclaredType::Scalar(scalar) => coerce_scalar(key, tag, scalar, raw),
        DeclaredType::List(element) => {
            let tokens = split_delimited(raw, ",", false)?;
            let mut values = Vec::with_capacity(tokens.len());
            for token in tokens {
                values.push(coerce_scalar(key, tag, element, &token)?);
            }
            Ok(TypedValue::List(values))
        }
    }
}

fn coerce_scalar(key: &str, tag: &str, scalar: ScalarType, raw: &str) -> Result<TypedValue> {
    match scalar {
        ScalarType::Str => Ok(TypedValue::Str(raw.to_string())),
        ScalarType::Double => raw
            .trim()
            .parse::<f64>()
            .map(TypedValue::Double)
            .map_err(|_| ProvisoError::invalid_attribute_value(key, tag, raw)),
        ScalarType::Long => raw
            .trim()
            .parse::<i64>()
            .map(TypedValue::Long)
            .map_err(|_| ProvisoError::invalid_attribute_value(key, tag, raw)),
        ScalarType::Version => Version::from_str(raw.trim())
            .map(TypedValue::Version)
            .map_err(|_| ProvisoError::invalid_attribute_value(key, tag, raw)),
    }
}

fn parse_type_tag(key: &str, tag: &str) -> Result<DeclaredType> {
    match tag {
        "String" => return Ok(DeclaredType::Scalar(ScalarType::Str)),
        "Double" => return Ok(DeclaredType::Scalar(ScalarType::Double)),
        "Long" => return Ok(DeclaredType::Scalar(ScalarType::Long)),
        "Version" => return Ok(DeclaredType::Scalar(ScalarType::Version)),
        _ => {}
    }
    if !tag.starts_with("List") {
        return Err(ProvisoError::unknown_attribute_type(key, tag));
    }

    let open = tag.find('<');
    let close = tag.find('>');
    let element = match (open, close) {
        (None, None) => "String",
        (Some(o), Some(c)) if c > o => tag[o + 1..c].trim(),
        _ => {
            return Err(ProvisoError::MalformedListType {
                key: key.to_string(),
                type_tag: tag.to_string(),
            })
        }
    };
    let element = match element {
        "String" => ScalarType::Str,
        "Double" => ScalarType::Double,
        "Long" => ScalarType::Long,
        "Version" => ScalarType::Version,
        _ => return Err(ProvisoError::unknown_attribute_type(key, tag)),
    };
    Ok(DeclaredType::List(element))
}
