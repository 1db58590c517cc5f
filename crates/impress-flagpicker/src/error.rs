//! Error types for impress-flagpicker

use thiserror::Error;

/// Result type alias for flag picker operations
pub type Result<T> = std::result::Result<T, FlagError>;

/// Main error type for flag picker operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// The flag type declares no members at all
    #[error("Flag type '{type_name}' declares no members")]
    NoMembers { type_name: String },

    /// More than one member of the flag type has the value zero
    #[error("Flag type '{type_name}' declares more than one zero member: {members:?}")]
    MultipleZeroMembers {
        type_name: String,
        members: Vec<String>,
    },

    /// Two members share a name
    #[error("Flag type '{type_name}' declares member '{member}' twice")]
    DuplicateMember { type_name: String, member: String },

    /// A value or member belongs to a different flag type
    #[error("Type mismatch: expected '{expected}', got '{actual}'")]
    TypeMismatch { expected: String, actual: String },

    /// A bitwise-zero value was assigned to a type without a zero member
    #[error("Flag type '{type_name}' has no zero member; an empty value is not allowed")]
    InvalidZero { type_name: String },

    /// A value was assigned before any flag type
    #[error("No flag type assigned")]
    NoTypeAssigned,

    /// A member name did not match any member of the type
    #[error("Flag type '{type_name}' has no member named '{name}'")]
    UnknownMember { type_name: String, name: String },

    /// Bits do not fit the target representation
    #[error("Bits {bits:#x} do not fit flag type '{type_name}'")]
    BitsOutOfRange { type_name: String, bits: u64 },

    /// Toggle index from the presentation layer is out of range
    #[error("Toggle index {index} out of range ({len} toggles)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Selector configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for FlagError {
    fn from(err: toml::de::Error) -> Self {
        FlagError::Config(err.to_string())
    }
}

impl FlagError {
    /// Build a type mismatch error from two type names.
    pub(crate) fn mismatch(expected: &str, actual: &str) -> Self {
        FlagError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
