//! # Hydrator
//!
//! **Hydrator** builds fully-populated typed Rust values from semi-structured input
//! (a JSON object as decoded by `serde_json`), driven by a registry of type shapes.
//!
//! ## Overview
//!
//! Request bodies, query strings and configuration fragments arrive as loose
//! mappings. Hydrator walks the declared shape of a target type, pulls matching
//! keys out of the mapping, fills everything else with sensible defaults, and
//! recurses into nested types and lists of nested types. The result is a
//! complete instance or a typed [`HydrationError`]; nothing half-built escapes.
//!
//! ## Architecture
//!
//! - **[`definition`]** - Registration of type shapes ([`ClassDef`], [`FieldDef`], [`TypeDef`])
//! - **[`registry`]** - Name-indexed [`TypeRegistry`] and the [`Hydrate`] trait
//! - **[`descriptor`]** - Per-type structural metadata ([`TypeDescriptor`], [`FieldDescriptor`])
//! - **[`type_cache`]** - Thread-safe, build-once [`TypeCache`] of descriptors
//! - **[`builder`]** - The recursive [`ObjectBuilder`]
//! - **[`directive`]** - [`MappingDirective`] annotations for interface-typed fields and lists
//! - **[`value`]** - Hydrated [`Value`]s and the [`FromValue`] conversion trait
//! - **[`arguments`]** - Constructor [`Arguments`] in declaration order
//! - **[`runtime_config`]** - Environment-driven [`HydratorConfig`]
//! - **[`error`]** - [`HydrationError`]
//!
//! ### Hydration Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Builder as ObjectBuilder
//!     participant Cache as TypeCache
//!     participant Registry as TypeRegistry
//!     participant Def as TypeDef
//!
//!     App->>Builder: hydrate(input, "Order")
//!     Builder->>Cache: get_or_build("Order")
//!     Cache->>Registry: get("Order")
//!     Registry-->>Cache: TypeDef
//!     Cache-->>Builder: Arc<TypeDescriptor>
//!     Builder->>Builder: coerce fields, then constructor params
//!     Builder->>Builder: recurse into nested mappings
//!     Builder->>Def: construct(arguments)
//!     Def-->>Builder: Object
//!     Builder->>Def: write remaining fields
//!     Builder-->>App: Result<Object, HydrationError>
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hydrator::{Hydrate, ObjectBuilder, TypeRegistry};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq, Hydrate)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! #[derive(Debug, Default, PartialEq, Hydrate)]
//! struct Segment {
//!     from: Point,
//!     to: Point,
//!     #[hydrate(rename = "label")]
//!     name: Option<String>,
//! }
//!
//! let registry = TypeRegistry::new().with_type::<Point>().with_type::<Segment>();
//! let builder = ObjectBuilder::new(registry);
//!
//! let input = json!({"from": {"x": 1, "y": 2}, "label": "diag"});
//! let segment: Segment = builder.hydrate_type(input.as_object().unwrap()).unwrap();
//!
//! assert_eq!(segment.from, Point { x: 1, y: 2 });
//! assert_eq!(segment.to, Point::default());
//! assert_eq!(segment.name.as_deref(), Some("diag"));
//! ```
//!
//! ## Declared Types
//!
//! Members declare their type as a string: `int`, `bool`, `float` (alias `double`),
//! `string`, `array`, `iterable`, a registered type name, a nullable shorthand
//! `?T`, or a union `A|B|null` whose first non-null member drives coercion.
//! Members without a declared type (or declared `mixed`) take input as-is.
//!
//! ## Configuration
//!
//! See [`runtime_config`] for `HYDRATOR_TYPE_CACHE` and `HYDRATOR_MAX_DEPTH`.
//!
//! ## Logging
//!
//! Registration and cache events are emitted through `tracing` (`info` when a
//! cache is created, `debug` for registrations, builds and hits); install any
//! subscriber to see them. Hydration failures are returned, never logged.

extern crate self as hydrator;

pub mod arguments;
pub mod builder;
pub mod definition;
pub mod descriptor;
pub mod directive;
pub mod error;
pub mod registry;
pub mod runtime_config;
pub mod type_cache;
pub mod value;

pub use arguments::Arguments;
pub use builder::{Input, ObjectBuilder};
pub use definition::{ClassDef, FieldDef, TypeDef, TypeKind};
pub use descriptor::{FieldDescriptor, TypeDescriptor};
pub use directive::MappingDirective;
pub use error::{HydrationError, ValueError};
pub use registry::{Hydrate, TypeRegistry};
pub use runtime_config::HydratorConfig;
pub use type_cache::TypeCache;
pub use value::{FromValue, Object, Value};

/// Derive [`Hydrate`] (and [`FromValue`]) for a named-field struct.
///
/// Container attribute: `#[hydrate(name = "Registered")]` overrides the
/// registered name (default: the struct name).
///
/// Field attributes:
/// - `rename = "key"` - input key and member name
/// - `ty = "int|string"` - declared type, overriding inference
/// - `map_to = "Type"` - [`MappingDirective::MapSingle`]
/// - `map_each = "Type"` - [`MappingDirective::MapEachElement`]
/// - `default = <literal>` - explicit default when the key is absent
/// - `readonly` - written during initialization only
/// - `skip` - not a hydratable field; keeps its `Default` value
///
/// The struct must implement `Default`.
pub use hydrator_macros::Hydrate;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value as JsonValue;
}
