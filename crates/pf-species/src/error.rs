//! Species collection errors.

use pf_core::CoreError;
use thiserror::Error;

/// Result type for species operations.
pub type SpeciesResult<T> = Result<T, SpeciesError>;

/// Errors raised by the species collection, its compounds and the compound factory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeciesError {
    /// Identifier could not be resolved against the databank.
    #[error("Compound '{identifier}' not defined in databank: {reason}")]
    CompoundResolution { identifier: String, reason: String },

    /// Structural mutation of a frozen collection.
    #[error("Cannot alter a species collection that is attached to streams")]
    ImmutableCollection,

    /// Property value of the wrong kind.
    #[error("Property '{property}' expects {expected}, got {found}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Identifier is not a member of the collection.
    #[error("Unknown species identifier '{identifier}'")]
    UnknownIdentifier { identifier: String },

    /// Compound has no property with this name.
    #[error("Compound '{identifier}' has no property '{property}'")]
    UnknownProperty { property: String, identifier: String },

    /// Identifier appears more than once.
    #[error("Duplicate species identifier '{identifier}'")]
    DuplicateIdentifier { identifier: String },

    /// Malformed identifier (empty, bad prefix payload).
    #[error("Invalid identifier: {what}")]
    InvalidIdentifier { what: String },

    /// Property exists but cannot be assigned.
    #[error("Property '{property}' is read-only")]
    ReadOnlyProperty { property: String },

    /// Non-physical or non-finite condition value.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SpeciesError {
    pub(crate) fn unknown(identifier: impl Into<String>) -> Self {
        Self::UnknownIdentifier {
            identifier: identifier.into(),
        }
    }

    pub(crate) fn duplicate(identifier: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            identifier: identifier.into(),
        }
    }
}

/// Result type for loading databanks and species configuration files.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading databank or species configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file extension for {path}")]
    UnsupportedFormat { path: String },

    #[error(transparent)]
    Species(#[from] SpeciesError),
}
