//! Runtime attribute values.
//!
//! Header attributes carry one of a small closed set of types. Values parsed
//! from headers are strings, 64-bit integers, doubles, versions, or
//! homogeneous lists of those; booleans, characters, and version ranges can
//! additionally appear on programmatically built records.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::version::{Version, VersionRange};

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Str(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Char(char),
    Version(Version),
    Range(VersionRange),
    List(Vec<TypedValue>),
}

impl TypedValue {
    /// The declared-type name this value corresponds to.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Str(_) => "String",
            TypedValue::Long(_) => "Long",
            TypedValue::Double(_) => "Double",
            TypedValue::Boolean(_) => "Boolean",
            TypedValue::Char(_) => "Character",
            TypedValue::Version(_) => "Version",
            TypedValue::Range(_) => "VersionRange",
            TypedValue::List(_) => "List",
        }
    }

}

/// The textual form used for serialization fallbacks and filter construction.
/// Lists render as their comma-joined elements.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Str(s) => f.write_str(s),
            TypedValue::Long(n) => write!(f, "{}", n),
            TypedValue::Double(d) => write!(f, "{}", d),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Char(c) => write!(f, "{}", c),
            TypedValue::Version(v) => write!(f, "{}", v),
            TypedValue::Range(r) => write!(f, "{}", r),
            TypedValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TypedValue::Str(s) => serializer.serialize_str(s),
            TypedValue::Long(n) => serializer.serialize_i64(*n),
            TypedValue::Double(d) => serializer.serialize_f64(*d),
            TypedValue::Boolean(b) => serializer.serialize_bool(*b),
            TypedValue::Char(c) => serializer.collect_str(c),
            TypedValue::Version(v) => serializer.collect_str(v),
            TypedValue::Range(r) => serializer.collect_str(r),
            TypedValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Str(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::Str(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Long(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Double(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl From<char> for TypedValue {
    fn from(value: char) -> Self {
        TypedValue::Char(value)
    }
}

impl From<Version> for TypedValue {
    fn from(value: Version) -> Self {
        TypedValue::Version(value)
    }
}

impl From<VersionRange> for TypedValue {
    fn from(value: VersionRange) -> Self {
        TypedValue::Range(value)
    }
}

impl From<Vec<TypedValue>> for TypedValue {
    fn from(value: Vec<TypedValue>) -> Self {
        TypedValue::List(value)
    }
}
