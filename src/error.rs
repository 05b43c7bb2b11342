//! # Error Module
//!
//! Typed failures returned by hydration.
//!
//! Every failure is a value: the first error met at any nesting depth aborts the
//! whole top-level call and no partially built object escapes. Turning these into
//! transport responses (for example a 400 with the message as body) is left to
//! the caller.

use thiserror::Error;

/// Failure of a single [`ObjectBuilder::hydrate`](crate::ObjectBuilder::hydrate) call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HydrationError {
    /// The target type was never registered and cannot be introspected.
    #[error("Unknown type `{0}`")]
    UnknownType(String),

    /// A constructor parameter has no default and no input key.
    #[error("Not found required property \"{field}\"")]
    MissingRequiredValue {
        /// Parameter name
        field: String,
    },

    /// A non-nullable field or parameter still resolved to null after defaulting.
    #[error("Property {field} can't be null. Change your dto type to ?{declared_type}")]
    NonNullableNull {
        /// Field or parameter name
        field: String,
        /// Primary declared type of the field
        declared_type: String,
    },

    /// A value could not be converted into the type the field or parameter needs.
    #[error("Invalid value for property \"{field}\": expected {expected}, found {found}")]
    InvalidValue {
        /// Field or parameter name
        field: String,
        /// What the field accepts
        expected: String,
        /// What the input carried
        found: String,
    },

    /// Hydration was asked to build an interface or abstract type.
    #[error("Type `{type_name}` cannot be instantiated; map it to a concrete type")]
    NotInstantiable {
        /// Interface name
        type_name: String,
    },

    /// Nested hydration went deeper than the configured limit.
    #[error("Hydration of `{type_name}` exceeded the maximum nesting depth of {depth}")]
    RecursionLimit {
        /// Type that would have been entered
        type_name: String,
        /// Configured maximum depth
        depth: usize,
    },

    /// A read-only field was written outside of initialization.
    #[error("Property {field} is read-only and can only be set while the object is initialized")]
    ReadOnlyField {
        /// Field name
        field: String,
    },

    /// A described field has no registered writer on the type being built.
    #[error("Property {field} of `{type_name}` has no registered writer")]
    UnwritableField {
        /// Type being hydrated
        type_name: String,
        /// Field name
        field: String,
    },

    /// A type cache already holds descriptors of a different registry.
    #[error("Type cache is bound to another registry; share the registry together with the cache")]
    RegistryMismatch,

    /// The hydrated object is not the Rust type the caller asked for.
    #[error("Hydrated `{actual}` cannot be returned as `{requested}`")]
    TargetMismatch {
        /// Rust type requested by the caller
        requested: String,
        /// Registered type that was built
        actual: String,
    },
}

/// Conversion failure from a [`Value`](crate::Value), before a field name is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueError {
    /// What the target Rust type accepts
    pub expected: String,
    /// Variant (or registered type) that was supplied
    pub found: String,
}

impl ValueError {
    /// Create a conversion error.
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attach the field the conversion was for.
    pub fn for_field(self, field: &str) -> HydrationError {
        HydrationError::InvalidValue {
            field: field.to_string(),
            expected: self.expected,
            found: self.found,
        }
    }
}
