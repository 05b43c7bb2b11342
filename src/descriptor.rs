//! # Descriptor Module
//!
//! Per-type structural metadata derived from a registered [`TypeDef`].
//!
//! A [`TypeDescriptor`] answers every classification question the builder asks
//! while hydrating (is the primary type a scalar, a class, an interface; what is
//! the resolved default; which fields belong to the constructor) so that none of
//! it is recomputed per call. Descriptors are plain data and serialize with serde,
//! which makes the cached table easy to dump when debugging a registration.
//!
//! ## Default resolution
//!
//! | Member kind               | Explicit default | Non-nullable, no default | Nullable, no default |
//! |---------------------------|------------------|--------------------------|----------------------|
//! | Field                     | declared value   | zero value of the type   | `null`               |
//! | Constructor parameter     | declared value   | none (required)          | `null`               |
//!
//! Zero values: `bool` → `false`, `int` → `0`, `float`/`double` → `0.0`,
//! `string` → `""`, `array`/`iterable` → `[]`. Class, interface and unknown types
//! have no zero value; the builder fills non-nullable class and directive members
//! by hydrating an empty input instead.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::definition::{FieldDef, TypeDef, TypeKind};
use crate::directive::MappingDirective;
use crate::registry::TypeRegistry;

/// Canonical scalar name, folding `double` into `float`.
fn scalar_name(type_name: &str) -> Option<&'static str> {
    match type_name {
        "int" => Some("int"),
        "bool" => Some("bool"),
        "float" | "double" => Some("float"),
        "string" => Some("string"),
        _ => None,
    }
}

fn is_collection_name(type_name: &str) -> bool {
    matches!(type_name, "array" | "iterable")
}

fn zero_value(type_name: &str) -> Option<JsonValue> {
    match scalar_name(type_name) {
        Some("bool") => Some(JsonValue::Bool(false)),
        Some("int") => Some(json!(0)),
        Some("float") => Some(json!(0.0)),
        Some("string") => Some(JsonValue::String(String::new())),
        _ if is_collection_name(type_name) => Some(JsonValue::Array(Vec::new())),
        _ => None,
    }
}

/// Where a member came from; decides default synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Field,
    Parameter,
}

/// Hydration-relevant shape of one field or constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    name: String,
    declared_types: Vec<String>,
    is_nullable: bool,
    is_mixed: bool,
    is_scalar_primary: bool,
    is_collection: bool,
    is_class_type: bool,
    is_interface_type: bool,
    mapping_directive: Option<MappingDirective>,
    default_value: Option<JsonValue>,
    has_explicit_default: bool,
    is_read_only: bool,
}

impl FieldDescriptor {
    fn build(def: &FieldDef, role: Role, registry: &TypeRegistry) -> Self {
        let declared_types = def.declared_types().map(<[String]>::to_vec).unwrap_or_default();
        let is_mixed = def.declared_types().is_none();
        let is_nullable = is_mixed || def.allows_null();

        let primary = declared_types.first().map(String::as_str);
        let is_scalar_primary = primary.and_then(scalar_name).is_some();
        let is_collection = primary.is_some_and(is_collection_name);
        let kind = primary
            .filter(|_| !is_scalar_primary && !is_collection)
            .and_then(|p| registry.kind_of(p));

        let has_explicit_default = def.default_value().is_some();
        let default_value = match (def.default_value(), role) {
            (Some(explicit), _) => Some(explicit.clone()),
            (None, _) if is_nullable => Some(JsonValue::Null),
            (None, Role::Field) => Some(primary.and_then(zero_value).unwrap_or(JsonValue::Null)),
            (None, Role::Parameter) => None,
        };

        Self {
            name: def.name().to_string(),
            declared_types,
            is_nullable,
            is_mixed,
            is_scalar_primary,
            is_collection,
            is_class_type: kind == Some(TypeKind::Class),
            is_interface_type: kind == Some(TypeKind::Interface),
            mapping_directive: def.directive().cloned(),
            default_value,
            has_explicit_default,
            is_read_only: def.is_read_only(),
        }
    }

    /// Member name and input key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared non-null types, in declaration order.
    pub fn declared_types(&self) -> &[String] {
        &self.declared_types
    }

    /// First declared type; drives every coercion decision.
    pub fn primary_type(&self) -> Option<&str> {
        self.declared_types.first().map(String::as_str)
    }

    /// Untyped, or the union includes null.
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    /// No declared type: any value passes through unchanged.
    pub fn is_mixed(&self) -> bool {
        self.is_mixed
    }

    /// Primary type is one of int, bool, float (double) or string.
    pub fn is_scalar_primary(&self) -> bool {
        self.is_scalar_primary
    }

    /// Primary type is `array` or `iterable`.
    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// Primary type is a registered concrete type.
    pub fn is_class_type(&self) -> bool {
        self.is_class_type
    }

    /// Primary type is a registered interface.
    pub fn is_interface_type(&self) -> bool {
        self.is_interface_type
    }

    /// Attached mapping directive.
    pub fn mapping_directive(&self) -> Option<&MappingDirective> {
        self.mapping_directive.as_ref()
    }

    /// Resolved default; `None` only for required constructor parameters.
    pub fn default_value(&self) -> Option<&JsonValue> {
        self.default_value.as_ref()
    }

    /// `true` if the default was declared rather than synthesized.
    pub fn has_explicit_default(&self) -> bool {
        self.has_explicit_default
    }

    /// Written through the initialization capability only.
    pub fn is_read_only(&self) -> bool {
        self.is_read_only
    }

    /// Type name reported in null errors.
    pub(crate) fn display_type(&self) -> &str {
        self.primary_type().unwrap_or("mixed")
    }
}

/// Cached shape of one registered type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    fields: Vec<FieldDescriptor>,
    constructor_params: Vec<FieldDescriptor>,
    #[serde(skip)]
    constructor_keys: HashSet<String>,
}

impl TypeDescriptor {
    /// Build the descriptor for `def`, classifying declared types against `registry`.
    pub fn build(def: &TypeDef, registry: &TypeRegistry) -> Self {
        let mut fields: Vec<FieldDescriptor> = def
            .fields()
            .iter()
            .map(|field| FieldDescriptor::build(field, Role::Field, registry))
            .collect();

        let constructor_params: Vec<FieldDescriptor> = def
            .params()
            .iter()
            .map(|param| FieldDescriptor::build(param, Role::Parameter, registry))
            .collect();

        fields.extend(
            def.params()
                .iter()
                .filter(|param| param.is_promoted())
                .filter(|param| !def.fields().iter().any(|f| f.name() == param.name()))
                .map(|param| FieldDescriptor::build(param, Role::Field, registry)),
        );

        let constructor_keys = constructor_params
            .iter()
            .map(|param| param.name.clone())
            .collect();

        Self {
            name: def.name().to_string(),
            kind: def.kind(),
            fields,
            constructor_params,
            constructor_keys,
        }
    }

    /// Registered type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Public fields in declaration order, promoted parameters last.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Constructor parameters in declaration order.
    pub fn constructor_params(&self) -> &[FieldDescriptor] {
        &self.constructor_params
    }

    /// Field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// `true` if `name` is owned by the constructor.
    pub fn is_constructor_param(&self, name: &str) -> bool {
        self.constructor_keys.contains(name)
    }

    /// Fields written after construction: everything the constructor does not own.
    pub fn assignable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| !self.constructor_keys.contains(&field.name))
    }
}
