use thiserror::Error;

/// Error type covering every failure the parsing and matching pipeline can
/// report: malformed header or filter text, bad type declarations, and
/// namespace rules violated while building records.
#[derive(Debug, Error)]
pub enum ProvisoError {
    #[error("unable to parse header: {header}")]
    TruncatedHeader { header: String },

    #[error("duplicate '{key}' in: {header}")]
    DuplicateKey { key: String, header: String },

    #[error("invalid delimited string: {value}")]
    InvalidDelimitedString { value: String },

    #[error("unknown attribute type for '{key}': {type_tag}")]
    UnknownAttributeType { key: String, type_tag: String },

    #[error("invalid attribute list type for '{key}': {type_tag}")]
    MalformedListType { key: String, type_tag: String },

    #[error("value '{value}' of attribute '{key}' does not parse as {type_tag}")]
    InvalidAttributeValue {
        key: String,
        type_tag: String,
        value: String,
    },

    #[error("invalid version: {value}")]
    InvalidVersion { value: String },

    #[error("invalid version range: {value}")]
    InvalidVersionRange { value: String },

    #[error("namespace '{namespace}' is reserved and cannot be declared")]
    ReservedNamespace { namespace: String },

    #[error("empty namespace in header clause")]
    EmptyNamespace,

    #[error("filter syntax error: {message} at '{at}'")]
    FilterSyntax { message: String, at: String },

    #[error("filter nesting exceeds {depth} levels")]
    FilterTooDeep { depth: usize },
}

pub type Result<T> = std::result::Result<T, ProvisoError>;

impl ProvisoError {
    pub fn truncated_header<S: Into<String>>(header: S) -> Self {
        Self::TruncatedHeader {
            header: header.into(),
        }
    }

    pub fn duplicate_key<S: Into<String>>(key: S, header: S) -> Self {
        Self::DuplicateKey {
            key: key.into(),
            header: header.into(),
        }
    }

    pub fn unknown_attribute_type<S: Into<String>>(key: S, type_tag: S) -> Self {
        Self::UnknownAttributeType {
            key: key.into(),
            type_tag: type_tag.into(),
        }
    }

    pub fn invalid_attribute_value<S: Into<String>>(key: S, type_tag: S, value: S) -> Self {
        Self::InvalidAttributeValue {
            key: key.into(),
            type_tag: type_tag.into(),
            value: value.into(),
        }
    }

    pub fn filter_syntax<S: Into<String>>(message: S, at: S) -> Self {
        Self::FilterSyntax {
            message: message.into(),
            at: at.into(),
        }
    }

    /// Returns true if the error describes malformed header or filter text.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::TruncatedHeader { .. }
                | Self::DuplicateKey { .. }
                | Self::InvalidDelimitedString { .. }
                | Self::FilterSyntax { .. }
                | Self::FilterTooDeep { .. }
        )
    }

    /// Returns true if the error describes a type declaration or conversion
    /// failure.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Self::UnknownAttributeType { .. }
                | Self::MalformedListType { .. }
                | Self::InvalidAttributeValue { .. }
                | Self::InvalidVersion { .. }
                | Self::InvalidVersionRange { .. }
        )
    }

    /// Returns true if the error describes a namespace rule violation.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Self::ReservedNamespace { .. } | Self::EmptyNamespace)
    }
}
