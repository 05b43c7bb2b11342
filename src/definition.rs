//! # Definition Module
//!
//! Explicit registration of the shape of a hydratable type.
//!
//! A [`TypeDef`] is what the builder introspects instead of live reflection: the
//! declared fields with their type unions, defaults, read-only flags and mapping
//! directives, the constructor parameters in declaration order, and the hooks that
//! construct an instance and write its fields.
//!
//! ```rust
//! use hydrator::{Arguments, ClassDef, FieldDef, HydrationError};
//!
//! #[derive(Debug, Default)]
//! struct Point { x: i64, y: i64 }
//!
//! let point = ClassDef::<Point>::new("Point")
//!     .field(FieldDef::new("x").typed("int"), |p: &mut Point, v: i64| p.x = v)
//!     .field(FieldDef::new("y").typed("int"), |p: &mut Point, v: i64| p.y = v);
//!
//! struct Label { text: String }
//!
//! let label = ClassDef::<Label>::constructed_by(
//!     "Label",
//!     [FieldDef::new("text").typed("string")],
//!     |args: &mut Arguments| -> Result<Label, HydrationError> {
//!         Ok(Label { text: args.take("text")? })
//!     },
//! );
//! # let _ = (point, label);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::arguments::Arguments;
use crate::directive::MappingDirective;
use crate::error::HydrationError;
use crate::value::{FromValue, Object, Value};

/// Whether a registered type can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// Concrete type with a constructor.
    Class,
    /// Abstract type; fields typed with it need a mapping directive.
    Interface,
}

/// Declaration of one field or constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    declared: Option<Vec<String>>,
    null_allowed: bool,
    default: Option<JsonValue>,
    directive: Option<MappingDirective>,
    read_only: bool,
    promoted: bool,
}

impl FieldDef {
    /// An untyped (mixed) member named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            null_allowed: false,
            default: None,
            directive: None,
            read_only: false,
            promoted: false,
        }
    }

    /// Declare the member's type.
    ///
    /// Accepts a single name (`int`), a nullable shorthand (`?Point`) or a union
    /// (`int|string|null`). `mixed` leaves the member untyped.
    pub fn typed(mut self, expr: &str) -> Self {
        let expr = expr.trim();
        let (nullable, body) = match expr.strip_prefix('?') {
            Some(rest) => (true, rest),
            None => (false, expr),
        };

        let mut types = Vec::new();
        let mut null_allowed = nullable;
        let mut mixed = false;
        for member in body.split('|').map(str::trim).filter(|m| !m.is_empty()) {
            match member {
                "null" => null_allowed = true,
                "mixed" => mixed = true,
                other => types.push(other.to_string()),
            }
        }

        if mixed || types.is_empty() {
            self.declared = None;
            self.null_allowed = false;
        } else {
            self.declared = Some(types);
            self.null_allowed = null_allowed;
        }
        self
    }

    /// Allow null in addition to the declared type.
    pub fn nullable(mut self) -> Self {
        self.null_allowed = true;
        self
    }

    /// Explicit default used when the input has no key for this member.
    pub fn default(mut self, value: JsonValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Convert the raw value into one instance of `target`.
    pub fn map_to(mut self, target: impl Into<String>) -> Self {
        self.directive = Some(MappingDirective::MapSingle(target.into()));
        self
    }

    /// Convert each element of the raw sequence into an instance of `target`.
    pub fn map_each(mut self, target: impl Into<String>) -> Self {
        self.directive = Some(MappingDirective::MapEachElement(target.into()));
        self
    }

    /// Field can only be written while the instance is being initialized.
    pub fn readonly(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Constructor parameter that is also exposed as a public field.
    pub fn promoted(mut self) -> Self {
        self.promoted = true;
        self
    }

    /// Member name, also the input key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared non-null type members in declaration order, `None` when untyped.
    pub fn declared_types(&self) -> Option<&[String]> {
        self.declared.as_deref()
    }

    /// `true` if the declared union includes null.
    pub fn allows_null(&self) -> bool {
        self.null_allowed
    }

    /// Explicit default, if one was declared.
    pub fn default_value(&self) -> Option<&JsonValue> {
        self.default.as_ref()
    }

    /// Attached mapping directive.
    pub fn directive(&self) -> Option<&MappingDirective> {
        self.directive.as_ref()
    }

    /// `true` for read-only members.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// `true` for promoted constructor parameters.
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }
}

pub(crate) type Constructor =
    Arc<dyn Fn(&mut Arguments) -> Result<Object, HydrationError> + Send + Sync>;

type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<(), HydrationError> + Send + Sync>;

/// Capability to write fields of an instance that was constructed moments ago.
///
/// Only the builder can create one, right after running a constructor; read-only
/// fields cannot be written without it.
pub(crate) struct Initializing {
    _private: (),
}

impl Initializing {
    pub(crate) fn after_construction() -> Self {
        Self { _private: () }
    }
}

/// Writes one field of a constructed instance.
#[derive(Clone)]
pub(crate) enum FieldWriter {
    /// Ordinary public field.
    Assign(Setter),
    /// Read-only field, injected during initialization only.
    Inject(Setter),
}

impl FieldWriter {
    /// Write `value` into `field` of `target`.
    ///
    /// `Inject` writers refuse to run without the initialization capability.
    pub(crate) fn write(
        &self,
        field: &str,
        target: &mut Object,
        value: Value,
        init: Option<&Initializing>,
    ) -> Result<(), HydrationError> {
        match (self, init) {
            (FieldWriter::Assign(setter), _) | (FieldWriter::Inject(setter), Some(_)) => {
                setter(target.as_any_mut(), value)
            }
            (FieldWriter::Inject(_), None) => Err(HydrationError::ReadOnlyField {
                field: field.to_string(),
            }),
        }
    }
}

/// Type-erased registration of one type, as stored by the
/// [`TypeRegistry`](crate::TypeRegistry).
pub struct TypeDef {
    name: String,
    kind: TypeKind,
    fields: Vec<FieldDef>,
    params: Vec<FieldDef>,
    writers: HashMap<String, FieldWriter>,
    constructor: Option<Constructor>,
}

impl TypeDef {
    /// Register `name` as an interface: usable as a declared type, never constructed.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            fields: Vec::new(),
            params: Vec::new(),
            writers: HashMap::new(),
            constructor: None,
        }
    }

    /// Registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Declared public fields, in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Constructor parameters, in declaration order.
    pub fn params(&self) -> &[FieldDef] {
        &self.params
    }

    pub(crate) fn construct(&self, args: &mut Arguments) -> Result<Object, HydrationError> {
        match &self.constructor {
            Some(constructor) => constructor(args),
            None => Err(HydrationError::NotInstantiable {
                type_name: self.name.clone(),
            }),
        }
    }

    pub(crate) fn writer(&self, field: &str) -> Option<&FieldWriter> {
        self.writers.get(field)
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Typed builder for a concrete type `T`.
///
/// Field setters receive `&mut T` and an already converted value, so the
/// registration reads like ordinary Rust assignments.
pub struct ClassDef<T> {
    def: TypeDef,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync + Default> ClassDef<T> {
    /// A type built by `T::default()` and then populated field by field.
    pub fn new(name: impl Into<String>) -> Self {
        Self::constructed_by(name, Vec::new(), |_args: &mut Arguments| Ok(T::default()))
    }
}

impl<T: Any + Send + Sync> ClassDef<T> {
    /// A type with constructor parameters `params`.
    ///
    /// `constructor` receives the assembled arguments in declaration order and pulls
    /// them out by name with [`Arguments::take`].
    pub fn constructed_by<P, F>(name: impl Into<String>, params: P, constructor: F) -> Self
    where
        P: IntoIterator<Item = FieldDef>,
        F: Fn(&mut Arguments) -> Result<T, HydrationError> + Send + Sync + 'static,
    {
        let name = name.into();
        let type_name = name.clone();
        let constructor: Constructor = Arc::new(move |args: &mut Arguments| {
            constructor(args).map(|value| Object::new(&type_name, value))
        });

        Self {
            def: TypeDef {
                name,
                kind: TypeKind::Class,
                fields: Vec::new(),
                params: params.into_iter().collect(),
                writers: HashMap::new(),
                constructor: Some(constructor),
            },
            _marker: PhantomData,
        }
    }

    /// Declare a public field and how to store its converted value.
    pub fn field<V, F>(mut self, field: FieldDef, setter: F) -> Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let field_name = field.name().to_string();
        let owner = self.def.name.clone();
        let setter: Setter = Arc::new(move |target: &mut dyn Any, value: Value| {
            let target = target
                .downcast_mut::<T>()
                .ok_or_else(|| HydrationError::TargetMismatch {
                    requested: std::any::type_name::<T>().to_string(),
                    actual: owner.clone(),
                })?;
            let value = V::from_value(value).map_err(|e| e.for_field(&field_name))?;
            setter(target, value);
            Ok(())
        });

        let writer = if field.is_read_only() {
            FieldWriter::Inject(setter)
        } else {
            FieldWriter::Assign(setter)
        };
        self.def.writers.insert(field.name().to_string(), writer);
        self.def.fields.push(field);
        self
    }

    /// Finish the registration.
    pub fn build(self) -> TypeDef {
        self.def
    }
}

impl<T: Any + Send + Sync> From<ClassDef<T>> for TypeDef {
    fn from(class: ClassDef<T>) -> Self {
        class.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_single() {
        let field = FieldDef::new("x").typed("int");
        assert_eq!(field.declared_types(), Some(&["int".to_string()][..]));
        assert!(!field.allows_null());
    }

    #[test]
    fn test_typed_nullable_shorthand() {
        let field = FieldDef::new("p").typed("?Point");
        assert_eq!(field.declared_types(), Some(&["Point".to_string()][..]));
        assert!(field.allows_null());
    }

    #[test]
    fn test_typed_union_keeps_order() {
        let field = FieldDef::new("v").typed("string | int | null");
        assert_eq!(
            field.declared_types(),
            Some(&["string".to_string(), "int".to_string()][..])
        );
        assert!(field.allows_null());
    }

    #[test]
    fn test_mixed_is_untyped() {
        assert_eq!(FieldDef::new("m").typed("mixed").declared_types(), None);
        assert_eq!(FieldDef::new("m").declared_types(), None);
    }

    #[test]
    fn test_last_directive_wins() {
        let field = FieldDef::new("tags").map_to("Tag").map_each("Tag");
        assert_eq!(
            field.directive(),
            Some(&MappingDirective::MapEachElement("Tag".to_string()))
        );
    }

    #[test]
    fn test_flags_and_default() {
        let field = FieldDef::new("id").typed("int").readonly().promoted().default(json!(7));
        assert!(field.is_read_only());
        assert!(field.is_promoted());
        assert_eq!(field.default_value(), Some(&json!(7)));
    }

    #[derive(Debug, Default)]
    struct Counter {
        hits: u32,
    }

    #[test]
    fn test_class_def_writes_through_setter() {
        let def = ClassDef::<Counter>::new("Counter")
            .field(FieldDef::new("hits").typed("int"), |c: &mut Counter, v: u32| c.hits = v)
            .build();
        assert_eq!(def.kind(), TypeKind::Class);

        let mut args = Arguments::new("Counter", Vec::new());
        let mut object = def.construct(&mut args).unwrap();
        let init = Initializing::after_construction();
        def.writer("hits")
            .unwrap()
            .write("hits", &mut object, Value::Int(3), Some(&init))
            .unwrap();
        assert_eq!(object.downcast::<Counter>().unwrap().hits, 3);
    }

    #[test]
    fn test_readonly_field_needs_initialization() {
        let def = ClassDef::<Counter>::new("Counter")
            .field(
                FieldDef::new("hits").typed("int").readonly(),
                |c: &mut Counter, v: u32| c.hits = v,
            )
            .build();
        let mut object = def.construct(&mut Arguments::new("Counter", Vec::new())).unwrap();
        let writer = def.writer("hits").unwrap();

        let err = writer
            .write("hits", &mut object, Value::Int(1), None)
            .unwrap_err();
        assert_eq!(
            err,
            HydrationError::ReadOnlyField {
                field: "hits".to_string()
            }
        );

        let init = Initializing::after_construction();
        writer
            .write("hits", &mut object, Value::Int(2), Some(&init))
            .unwrap();
        assert_eq!(object.downcast_ref::<Counter>().unwrap().hits, 2);
    }

    #[test]
    fn test_public_field_writes_without_initialization() {
        let def = ClassDef::<Counter>::new("Counter")
            .field(FieldDef::new("hits").typed("int"), |c: &mut Counter, v: u32| c.hits = v)
            .build();
        let mut object = def.construct(&mut Arguments::new("Counter", Vec::new())).unwrap();
        def.writer("hits")
            .unwrap()
            .write("hits", &mut object, Value::Int(4), None)
            .unwrap();
        assert_eq!(object.downcast_ref::<Counter>().unwrap().hits, 4);
    }

    #[test]
    fn test_setter_reports_field_on_bad_value() {
        let def = ClassDef::<Counter>::new("Counter")
            .field(FieldDef::new("hits").typed("int"), |c: &mut Counter, v: u32| c.hits = v)
            .build();
        let mut object = def.construct(&mut Arguments::new("Counter", Vec::new())).unwrap();
        let err = def
            .writer("hits")
            .unwrap()
            .write(
                "hits",
                &mut object,
                Value::String("x".into()),
                Some(&Initializing::after_construction()),
            )
            .unwrap_err();
        assert!(matches!(err, HydrationError::InvalidValue { ref field, .. } if field == "hits"));
    }

    #[test]
    fn test_interface_cannot_construct() {
        let def = TypeDef::interface("Shape");
        let err = def
            .construct(&mut Arguments::new("Shape", Vec::new()))
            .unwrap_err();
        assert_eq!(
            err,
            HydrationError::NotInstantiable {
                type_name: "Shape".to_string()
            }
        );
    }
}
