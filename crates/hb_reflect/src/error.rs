use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// WireError

/// Failure of the wire codec for a single value.
///
/// A decode failure means the whole aggregate is rejected; the codec never
/// returns a partially read vector or matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The input does not match the expected structural shape.
    #[error("{0}")]
    Mismatch(String),
    /// A non-finite float was written while named literals are disabled.
    #[error("non-finite value `{value}` cannot be written without named float literals")]
    NonFinite { value: String },
    /// The value could not be written for another reason.
    #[error("{0}")]
    Encode(String),
}

impl WireError {
    #[inline]
    pub(crate) fn mismatch(msg: impl fmt::Display) -> Self {
        Self::Mismatch(msg.to_string())
    }
}

impl From<serde_json::Error> for WireError {
    fn from(value: serde_json::Error) -> Self {
        match value.classify() {
            serde_json::error::Category::Io => Self::Encode(value.to_string()),
            _ => Self::Mismatch(value.to_string()),
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectError

/// Outcome category of a [`ReflectError`], kept on log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectErrorKind {
    TypeNotFound,
    ConverterNotFound,
    MemberNotFound,
    MemberNotWritable,
    ReferenceUnresolved,
    DecodeMismatch,
    ConversionException,
}

impl ReflectErrorKind {
    /// Whether the populator skips the member and keeps the overall call successful.
    #[inline]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::TypeNotFound
                | Self::MemberNotFound
                | Self::MemberNotWritable
                | Self::ReferenceUnresolved
        )
    }
}

impl fmt::Display for ReflectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TypeNotFound => "TypeNotFound",
            Self::ConverterNotFound => "ConverterNotFound",
            Self::MemberNotFound => "MemberNotFound",
            Self::MemberNotWritable => "MemberNotWritable",
            Self::ReferenceUnresolved => "ReferenceUnresolved",
            Self::DecodeMismatch => "DecodeMismatch",
            Self::ConversionException => "ConversionException",
        };
        f.write_str(name)
    }
}

/// Errors raised while converting between live values and serialized trees.
#[derive(Debug, Clone, Error)]
pub enum ReflectError {
    #[error("type `{type_name}` is not known to the type registry")]
    TypeNotFound { type_name: String },
    #[error("no converter can handle type `{type_path}`")]
    ConverterNotFound { type_path: &'static str },
    #[error("{namespace} `{member}` not found on `{owner}`")]
    MemberNotFound {
        owner: &'static str,
        namespace: &'static str,
        member: String,
    },
    #[error("property `{member}` on `{owner}` is not writable")]
    MemberNotWritable { owner: &'static str, member: String },
    #[error("reference `{reference}` did not resolve to a live `{required}`")]
    ReferenceUnresolved {
        reference: String,
        required: &'static str,
    },
    #[error("cannot decode `{type_path}`: {source}")]
    DecodeMismatch {
        type_path: &'static str,
        source: WireError,
    },
    #[error("conversion of `{target}` failed: {reason}")]
    ConversionException { target: String, reason: String },
}

impl ReflectError {
    /// Returns the category of this error.
    pub const fn kind(&self) -> ReflectErrorKind {
        match self {
            Self::TypeNotFound { .. } => ReflectErrorKind::TypeNotFound,
            Self::ConverterNotFound { .. } => ReflectErrorKind::ConverterNotFound,
            Self::MemberNotFound { .. } => ReflectErrorKind::MemberNotFound,
            Self::MemberNotWritable { .. } => ReflectErrorKind::MemberNotWritable,
            Self::ReferenceUnresolved { .. } => ReflectErrorKind::ReferenceUnresolved,
            Self::DecodeMismatch { .. } => ReflectErrorKind::DecodeMismatch,
            Self::ConversionException { .. } => ReflectErrorKind::ConversionException,
        }
    }

    #[inline]
    pub(crate) fn conversion(target: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::ConversionException {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    #[inline]
    pub(crate) fn decode(type_path: &'static str, source: WireError) -> Self {
        Self::DecodeMismatch { type_path, source }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ReflectError, ReflectErrorKind, WireError};

    #[test]
    fn recoverable_kinds() {
        assert!(ReflectErrorKind::MemberNotFound.is_recoverable());
        assert!(ReflectErrorKind::ReferenceUnresolved.is_recoverable());
        assert!(!ReflectErrorKind::DecodeMismatch.is_recoverable());
        assert!(!ReflectErrorKind::ConversionException.is_recoverable());
    }

    #[test]
    fn member_not_found_message() {
        let err = ReflectError::MemberNotFound {
            owner: "Game.Player",
            namespace: "field",
            member: "speed".into(),
        };
        assert_eq!(err.kind(), ReflectErrorKind::MemberNotFound);
        assert_eq!(err.to_string(), "field `speed` not found on `Game.Player`");
    }

    #[test]
    fn serde_json_errors_are_mismatches() {
        let err = serde_json::from_str::<f32>("{").unwrap_err();
        assert!(matches!(WireError::from(err), WireError::Mismatch(_)));
    }
}
