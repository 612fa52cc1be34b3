use thiserror::Error;

use crate::property::Property;

/// A declaration the cascade could not keep. Never fatal: the declaration
/// is dropped and a warning is printed once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The property is not in the supported catalog.
    #[error("unsupported property '{0}'")]
    UnknownProperty(String),

    /// The value does not fit the property's grammar.
    #[error("invalid value '{value}' for '{property}'")]
    InvalidValue {
        /// Property the value was given for.
        property: Property,
        /// The value as written.
        value: String,
    },
}
