//! Error Taxonomy
//!
//! Every failure of a generation run. All of them are terminal: the run
//! aborts and no artifact is written.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueType;

#[derive(Debug, Error)]
pub enum TweakError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine the format of {}; pass --format json|toml", .path.display())]
    UnknownFormat { path: PathBuf },

    #[error("malformed tweaks document: {reason}")]
    MalformedDocument { reason: String },

    #[error("invalid key `{key}` at {location}: {reason}")]
    InvalidKey {
        location: String,
        key: String,
        reason: &'static str,
    },

    #[error("feature `{feature}` is declared more than once")]
    DuplicateFeature { feature: String },

    #[error("variable `{variable}` is declared more than once in feature `{feature}`")]
    DuplicateVariable { feature: String, variable: String },

    #[error("unsupported type {found} for `{feature}.{variable}`; expected one of bool, integer, float, string")]
    UnsupportedType {
        feature: String,
        variable: String,
        found: String,
    },

    #[error("`{feature}.{variable}` is declared {expected} but its {property} is {found}")]
    TypeMismatch {
        feature: String,
        variable: String,
        property: &'static str,
        expected: ValueType,
        found: String,
    },

    #[error("default of `{feature}.{variable}` lies outside its declared range {range}")]
    DefaultOutOfRange {
        feature: String,
        variable: String,
        range: String,
    },

    #[error("range of `{feature}.{variable}` is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        feature: String,
        variable: String,
        min: f64,
        max: f64,
    },

    #[error("`{key}` does not produce a usable identifier")]
    InvalidIdentifier { key: String },

    #[error("`{first}` and `{second}` both derive the identifier `{identifier}`")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("the tweaks document declares no features")]
    EmptySchema,
}

impl TweakError {
    /// Stable taxonomy name reported on the diagnostic stream
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Io",
            Self::UnknownFormat { .. } => "UnknownFormat",
            Self::MalformedDocument { .. } => "MalformedDocument",
            Self::InvalidKey { .. } => "InvalidKey",
            Self::DuplicateFeature { .. } => "DuplicateFeature",
            Self::DuplicateVariable { .. } => "DuplicateVariable",
            Self::UnsupportedType { .. } => "UnsupportedType",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::DefaultOutOfRange { .. } => "DefaultOutOfRange",
            Self::InvertedRange { .. } => "InvertedRange",
            Self::InvalidIdentifier { .. } => "InvalidIdentifier",
            Self::IdentifierCollision { .. } => "IdentifierCollision",
            Self::EmptySchema => "EmptySchema",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
