//! # Registry Module
//!
//! The registry is the introspection facility the builder consumes: it answers
//! "which fields, which constructor, which declared types" for every type name the
//! application registered at startup.
//!
//! Register everything before sharing the registry; an [`ObjectBuilder`](crate::ObjectBuilder)
//! takes ownership and only ever reads it.
//!
//! ```rust
//! use hydrator::{ClassDef, FieldDef, TypeRegistry};
//!
//! #[derive(Debug, Default)]
//! struct Point { x: i64, y: i64 }
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register(
//!         ClassDef::<Point>::new("Point")
//!             .field(FieldDef::new("x").typed("int"), |p: &mut Point, v: i64| p.x = v)
//!             .field(FieldDef::new("y").typed("int"), |p: &mut Point, v: i64| p.y = v),
//!     )
//!     .interface("Shape");
//!
//! assert!(registry.contains("Point"));
//! assert_eq!(registry.len(), 2);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::definition::{TypeDef, TypeKind};

/// A type that knows its own registration, usually via `#[derive(Hydrate)]`.
pub trait Hydrate: Any + Send + Sync + Sized {
    /// Registered type name; also the name other types use to declare it.
    const NAME: &'static str;

    /// Full registration of this type.
    fn type_def() -> TypeDef;
}

/// Registered types by name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<TypeDef>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type definition, replacing any earlier one with the same name.
    pub fn register(&mut self, def: impl Into<TypeDef>) -> &mut Self {
        let def = def.into();
        let name = def.name().to_string();
        debug!(
            type_name = %name,
            kind = ?def.kind(),
            fields = def.fields().len(),
            params = def.params().len(),
            "Registered hydratable type"
        );
        if self.types.insert(name.clone(), Arc::new(def)).is_some() {
            warn!(type_name = %name, "Type registered twice; keeping the latest definition");
        }
        self
    }

    /// Register a type through its [`Hydrate`] implementation.
    pub fn register_type<T: Hydrate>(&mut self) -> &mut Self {
        self.register(T::type_def())
    }

    /// Register an interface name.
    pub fn interface(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(TypeDef::interface(name))
    }

    /// Consuming variant of [`register`](Self::register) for builder-style setup.
    pub fn with(mut self, def: impl Into<TypeDef>) -> Self {
        self.register(def);
        self
    }

    /// Consuming variant of [`register_type`](Self::register_type).
    pub fn with_type<T: Hydrate>(mut self) -> Self {
        self.register_type::<T>();
        self
    }

    /// Definition registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(name)
    }

    /// Class or interface, `None` when `name` is not registered.
    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.types.get(name).map(|def| def.kind())
    }

    /// `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, unordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
