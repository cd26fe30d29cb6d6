//! Version and version-range value types.
//!
//! A version has the form `major[.minor[.micro[.qualifier]]]` with numeric
//! segments and an alphanumeric qualifier. Ordering is numeric on the three
//! segments, then lexicographic on the qualifier. A range is either a bare
//! version (meaning "that version or anything later") or an interval such as
//! `[1.0,2.0)` with per-bound inclusivity.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{ProvisoError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    micro: u32,
    qualifier: String,
}

impl Version {
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    pub fn with_qualifier(major: u32, minor: u32, micro: u32, qualifier: &str) -> Result<Self> {
        validate_qualifier(qualifier, qualifier)?;
        Ok(Self {
            major,
            minor,
            micro,
            qualifier: qualifier.to_string(),
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ProvisoError;

    /// Parses `major[.minor[.micro[.qualifier]]]`. The empty string parses as
    /// `0.0.0`.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Ok(Version::default());
        }

        let mut parts = text.split('.');
        let major = parse_segment(parts.next().unwrap_or(""), text)?;
        let minor = match parts.next() {
            Some(p) => parse_segment(p, text)?,
            None => 0,
        };
        let micro = match parts.next() {
            Some(p) => parse_segment(p, text)?,
            None => 0,
        };
        let qualifier = match parts.next() {
            Some(q) => {
                validate_qualifier(q, text)?;
                q.to_string()
            }
            None => String::new(),
        };
        if parts.next().is_some() {
            return Err(ProvisoError::InvalidVersion {
                value: text.to_string(),
            });
        }

        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_segment(segment: &str, original: &str) -> Result<u32> {
    segment
        .parse::<u32>()
        .map_err(|_| ProvisoError::InvalidVersion {
            value: original.to_string(),
        })
}

fn validate_qualifier(qualifier: &str, original: &str) -> Result<()> {
    let valid = qualifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ProvisoError::InvalidVersion {
            value: original.to_string(),
        })
    }
}

/// A half-open or closed interval of versions.
///
/// `floor` is always present; a missing `ceiling` means the range is unbounded
/// above (the bare-version form).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    floor: Version,
    floor_inclusive: bool,
    ceiling: Option<Version>,
    ceiling_inclusive: bool,
}

impl VersionRange {
    pub fn at_least(floor: Version) -> Self {
        Self {
            floor,
            floor_inclusive: true,
            ceiling: None,
            ceiling_inclusive: false,
        }
    }

    pub fn between(
        floor: Version,
        floor_inclusive: bool,
        ceiling: Version,
        ceiling_inclusive: bool,
    ) -> Self {
        Self {
            floor,
            floor_inclusive,
            ceiling: Some(ceiling),
            ceiling_inclusive,
        }
    }

    pub fn floor(&self) -> &Version {
        &self.floor
    }

    pub fn floor_inclusive(&self) -> bool {
        self.floor_inclusive
    }

    pub fn ceiling(&self) -> Option<&Version> {
        self.ceiling.as_ref()
    }

    pub fn ceiling_inclusive(&self) -> bool {
        self.ceiling_inclusive
    }

    /// Returns true if `version` falls inside this range.
    pub fn includes(&self, version: &Version) -> bool {
        match version.cmp(&self.floor) {
            Ordering::Less => return false,
            Ordering::Equal if !self.floor_inclusive => return false,
            _ => {}
        }
        if let Some(ceiling) = &self.ceiling {
            match version.cmp(ceiling) {
                Ordering::Greater => return false,
                Ordering::Equal if !self.ceiling_inclusive => return false,
                _ => {}
            }
        }
        true
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ceiling {
            None => write!(f, "{}", self.floor),
            Some(ceiling) => write!(
                f,
                "{}{},{}{}",
                if self.floor_inclusive { '[' } else { '(' },
                self.floor,
                ceiling,
                if self.ceiling_inclusive { ']' } else { ')' },
            ),
        }
    }
}

impl FromStr for VersionRange {
    type Err = ProvisoError;

    /// Parses either a bare version (`1.0`, meaning `1.0` and up) or an
    /// interval (`[1.0,2.0)`).
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ProvisoError::InvalidVersionRange {
                value: s.to_string(),
            });
        }

        let floor_inclusive = match text.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => {
                let floor = Version::from_str(text)?;
                return Ok(Self::at_least(floor));
            }
        };
        let ceiling_inclusive = if text.ends_with(']') {
            true
        } else if text.ends_with(')') {
            false
        } else {
            return Err(ProvisoError::InvalidVersionRange {
                value: text.to_string(),
            });
        };

        let inner = &text[1..text.len() - 1];
        let mut bounds = inner.splitn(2, ',');
        let floor_text = bounds.next().unwrap_or("");
        let ceiling_text = match bounds.next() {
            Some(c) => c,
            None => {
                return Err(ProvisoError::InvalidVersionRange {
                    value: text.to_string(),
                })
            }
        };

        let floor = Version::from_str(floor_text.trim())?;
        let ceiling = Version::from_str(ceiling_text.trim())?;
        Ok(Self::between(
            floor,
            floor_inclusive,
            ceiling,
            ceiling_inclusive,
        ))
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
