//! Mapping directives attached to fields and constructor parameters.

use serde::Serialize;

/// How a raw input value is turned into a registered type.
///
/// Resolved when a value is hydrated, not when the descriptor is built, so the
/// target may itself carry directives and nest to any depth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "target")]
pub enum MappingDirective {
    /// Convert the whole value into one instance of the target type.
    MapSingle(String),
    /// Convert every element of a sequence into an instance of the target type.
    MapEachElement(String),
}

impl MappingDirective {
    /// Registered name of the type values are converted into.
    pub fn target(&self) -> &str {
        match self {
            MappingDirective::MapSingle(target) | MappingDirective::MapEachElement(target) => target,
        }
    }
}
