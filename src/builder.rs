//! # Object Builder Module
//!
//! Recursive hydration of registered types from semi-structured input.
//!
//! ## Algorithm
//!
//! For `hydrate(input, T)`:
//!
//! 1. Fetch `T`'s [`TypeDescriptor`] from the [`TypeCache`] (built on first use).
//! 2. Coerce every input key that names a non-constructor field.
//! 3. Coerce every input key that names a constructor parameter.
//! 4. Assemble constructor arguments in declaration order: coerced input, else the
//!    parameter's default; non-nullable class-typed and directive parameters that
//!    are still null get a nested default instead.
//! 5. Run the constructor.
//! 6. Write every field the constructor does not own, in declaration order, with
//!    the same defaulting. Read-only fields are injected with the initialization
//!    capability.
//!
//! Coerced values go into a map local to the call rather than back into the
//! caller's input, and later phases read from it, so constructor assembly sees
//! the nested objects the field passes already built.
//!
//! ## Coercion
//!
//! | Raw value | Member                                   | Result                                  |
//! |-----------|------------------------------------------|-----------------------------------------|
//! | scalar    | scalar primary type, or mixed            | unchanged                               |
//! | sequence  | `MapEachElement(T)`                      | each mapping hydrated, each scalar → `T(scalar)` |
//! | mapping   | `MapSingle(T)`                           | `hydrate(mapping, T)`                   |
//! | scalar    | `MapSingle(T)`                           | `T(scalar)`                             |
//! | mapping   | class primary type `C`                   | `hydrate(mapping, C)`                   |
//! | scalar    | class primary type `C`                   | `C(scalar)`                             |
//! | `null`    | any                                      | left for defaulting                     |
//! | other     | any                                      | unchanged                               |
//!
//! `T(scalar)` binds the scalar to `T`'s first constructor parameter; the other
//! parameters take their explicit defaults. The instance then goes through step 6
//! like any other, so field defaults and nested defaults still apply.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};

use crate::arguments::Arguments;
use crate::definition::{Initializing, TypeDef, TypeKind};
use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::directive::MappingDirective;
use crate::error::HydrationError;
use crate::registry::{Hydrate, TypeRegistry};
use crate::runtime_config::HydratorConfig;
use crate::type_cache::TypeCache;
use crate::value::{Object, Value};

/// Input mapping handed to [`ObjectBuilder::hydrate`].
pub type Input = Map<String, JsonValue>;

/// Builds typed instances from input mappings.
///
/// Holds only read-only state (the registry and the descriptor cache), so one
/// builder can serve any number of threads; clones share both.
///
/// # Example
///
/// ```rust
/// use hydrator::{Arguments, ClassDef, FieldDef, HydrationError, ObjectBuilder, TypeRegistry};
/// use serde_json::json;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point { x: i64, y: i64 }
/// hydrator::object_value!(Point);
///
/// #[derive(Debug, PartialEq)]
/// struct Wrapper { p: Point }
///
/// let registry = TypeRegistry::new()
///     .with(
///         ClassDef::<Point>::new("Point")
///             .field(FieldDef::new("x").typed("int"), |p: &mut Point, v: i64| p.x = v)
///             .field(FieldDef::new("y").typed("int"), |p: &mut Point, v: i64| p.y = v),
///     )
///     .with(ClassDef::<Wrapper>::constructed_by(
///         "Wrapper",
///         [FieldDef::new("p").typed("Point")],
///         |args: &mut Arguments| -> Result<Wrapper, HydrationError> {
///             Ok(Wrapper { p: args.take("p")? })
///         },
///     ));
/// let builder = ObjectBuilder::new(registry);
///
/// let input = json!({"p": {"x": 1, "y": 2}});
/// let wrapper: Wrapper = builder.hydrate_as(input.as_object().unwrap(), "Wrapper").unwrap();
/// assert_eq!(wrapper.p, Point { x: 1, y: 2 });
///
/// let wrapper: Wrapper = builder.hydrate_as(&Default::default(), "Wrapper").unwrap();
/// assert_eq!(wrapper.p, Point { x: 0, y: 0 });
/// ```
#[derive(Clone, Debug)]
pub struct ObjectBuilder {
    registry: Arc<TypeRegistry>,
    cache: TypeCache,
    config: HydratorConfig,
}

impl ObjectBuilder {
    /// Create a builder with the default configuration.
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_config(registry, HydratorConfig::default())
    }

    /// Create a builder with an explicit configuration.
    pub fn with_config(registry: TypeRegistry, config: HydratorConfig) -> Self {
        let registry = Arc::new(registry);
        Self {
            cache: TypeCache::bound_to(config.cache_enabled, &registry),
            registry,
            config,
        }
    }

    /// Create a builder that publishes descriptors into an existing cache.
    ///
    /// Builders sharing a cache must share the registry too, since cached
    /// descriptors are keyed by type name only.
    ///
    /// # Errors
    ///
    /// [`HydrationError::RegistryMismatch`] if `cache` is bound to (or already
    /// filled from) another registry.
    pub fn with_cache(
        registry: impl Into<Arc<TypeRegistry>>,
        cache: TypeCache,
        config: HydratorConfig,
    ) -> Result<Self, HydrationError> {
        let registry = registry.into();
        cache.bind(&registry)?;
        Ok(Self {
            registry,
            cache,
            config,
        })
    }

    /// Registry this builder reads.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Descriptor cache this builder publishes into.
    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    /// Active configuration.
    pub fn config(&self) -> &HydratorConfig {
        &self.config
    }

    /// Descriptor for `type_name`, building and caching it on first use.
    ///
    /// # Errors
    ///
    /// [`HydrationError::UnknownType`] if `type_name` is not registered.
    pub fn descriptor(&self, type_name: &str) -> Result<Arc<TypeDescriptor>, HydrationError> {
        self.cache.get_or_build(type_name, || {
            let def = self.definition(type_name)?;
            Ok(TypeDescriptor::build(def, &self.registry))
        })
    }

    /// `true` if `type_name` is a registered class with at least one public field.
    ///
    /// Callers use this to skip hydration for types that have nothing to fill.
    pub fn supports(&self, type_name: &str) -> bool {
        self.descriptor(type_name)
            .map(|descriptor| {
                descriptor.kind() == TypeKind::Class && !descriptor.fields().is_empty()
            })
            .unwrap_or(false)
    }

    /// Build an instance of `type_name` from `input`.
    ///
    /// All or nothing: the first failure at any depth is returned and no partially
    /// filled instance escapes.
    pub fn hydrate(&self, input: &Input, type_name: &str) -> Result<Object, HydrationError> {
        self.hydrate_at(input, type_name, 0)
    }

    /// Build an instance of `type_name` and return it as `T`.
    pub fn hydrate_as<T: Any>(&self, input: &Input, type_name: &str) -> Result<T, HydrationError> {
        self.hydrate(input, type_name)?
            .downcast::<T>()
            .map_err(|object| HydrationError::TargetMismatch {
                requested: std::any::type_name::<T>().to_string(),
                actual: object.kind().to_string(),
            })
    }

    /// Build a `T` registered through its [`Hydrate`] implementation.
    pub fn hydrate_type<T: Hydrate>(&self, input: &Input) -> Result<T, HydrationError> {
        self.hydrate_as(input, T::NAME)
    }

    fn definition(&self, type_name: &str) -> Result<&Arc<TypeDef>, HydrationError> {
        self.registry
            .get(type_name)
            .ok_or_else(|| HydrationError::UnknownType(type_name.to_string()))
    }

    fn hydrate_at(
        &self,
        input: &Input,
        type_name: &str,
        depth: usize,
    ) -> Result<Object, HydrationError> {
        if depth > self.config.max_depth {
            return Err(HydrationError::RecursionLimit {
                type_name: type_name.to_string(),
                depth: self.config.max_depth,
            });
        }

        let descriptor = self.descriptor(type_name)?;
        let def = self.definition(type_name)?;
        if descriptor.kind() == TypeKind::Interface {
            return Err(HydrationError::NotInstantiable {
                type_name: type_name.to_string(),
            });
        }

        // Coerced input, keyed by member name; consumed as members are resolved
        let mut values: HashMap<&str, Value> = HashMap::with_capacity(input.len());

        for field in descriptor.assignable_fields() {
            if let Some(raw) = input.get(field.name()) {
                values.insert(field.name(), self.coerce(field, raw, depth)?);
            }
        }
        for param in descriptor.constructor_params() {
            if let Some(raw) = input.get(param.name()) {
                values.insert(param.name(), self.coerce(param, raw, depth)?);
            }
        }

        let mut slots = Vec::with_capacity(descriptor.constructor_params().len());
        for param in descriptor.constructor_params() {
            let value = values
                .remove(param.name())
                .or_else(|| param.default_value().map(Value::from));
            let value = match self.fill_nested_default(param, value, depth)? {
                Some(value) => value,
                None => {
                    return Err(HydrationError::MissingRequiredValue {
                        field: param.name().to_string(),
                    })
                }
            };
            check_nullability(param, &value)?;
            slots.push((param.name().to_string(), Some(value)));
        }

        let mut object = def.construct(&mut Arguments::new(type_name, slots))?;
        self.assign_fields(&descriptor, def, &mut object, &mut values, depth)?;
        Ok(object)
    }

    /// Write every field the constructor does not own, from `values` or defaults.
    fn assign_fields(
        &self,
        descriptor: &TypeDescriptor,
        def: &TypeDef,
        object: &mut Object,
        values: &mut HashMap<&str, Value>,
        depth: usize,
    ) -> Result<(), HydrationError> {
        let init = Initializing::after_construction();

        for field in descriptor.assignable_fields() {
            let value = values
                .remove(field.name())
                .or_else(|| field.default_value().map(Value::from));
            let value = self
                .fill_nested_default(field, value, depth)?
                .unwrap_or(Value::Null);
            check_nullability(field, &value)?;

            let writer = def
                .writer(field.name())
                .ok_or_else(|| HydrationError::UnwritableField {
                    type_name: descriptor.name().to_string(),
                    field: field.name().to_string(),
                })?;
            writer.write(field.name(), object, value, Some(&init))?;
        }

        Ok(())
    }

    /// Replace a missing or null value of a non-nullable class-typed or directive
    /// member with its nested default.
    fn fill_nested_default(
        &self,
        member: &FieldDescriptor,
        value: Option<Value>,
        depth: usize,
    ) -> Result<Option<Value>, HydrationError> {
        let is_null = value.as_ref().map_or(true, Value::is_null);
        if !is_null || member.is_nullable() {
            return Ok(value);
        }

        if member.is_class_type() {
            if let Some(class) = member.primary_type() {
                return self.hydrate_empty(class, depth).map(Some);
            }
        }

        match member.mapping_directive() {
            Some(MappingDirective::MapEachElement(_)) => Ok(Some(Value::List(Vec::new()))),
            Some(MappingDirective::MapSingle(target)) => self.hydrate_empty(target, depth).map(Some),
            None => Ok(value),
        }
    }

    fn hydrate_empty(&self, type_name: &str, depth: usize) -> Result<Value, HydrationError> {
        self.hydrate_at(&Input::new(), type_name, depth + 1)
            .map(Value::Object)
    }

    /// Coerce one raw input value for `member`.
    fn coerce(
        &self,
        member: &FieldDescriptor,
        raw: &JsonValue,
        depth: usize,
    ) -> Result<Value, HydrationError> {
        if is_scalar(raw) && (member.is_scalar_primary() || member.is_mixed()) {
            return Ok(Value::from(raw));
        }

        if let Some(directive) = member.mapping_directive() {
            return match (directive, raw) {
                (_, JsonValue::Null) => Ok(Value::Null),
                (MappingDirective::MapEachElement(target), JsonValue::Array(items)) => items
                    .iter()
                    .map(|item| self.convert(member, item, target, depth))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                (MappingDirective::MapEachElement(_), other) => Err(invalid(member, "array", other)),
                (MappingDirective::MapSingle(target), other) => {
                    self.convert(member, other, target, depth)
                }
            };
        }

        if member.is_class_type() && !raw.is_null() {
            if let Some(class) = member.primary_type() {
                return self.convert(member, raw, class, depth);
            }
        }

        Ok(Value::from(raw))
    }

    /// Turn one raw value into an instance of `target`.
    fn convert(
        &self,
        member: &FieldDescriptor,
        raw: &JsonValue,
        target: &str,
        depth: usize,
    ) -> Result<Value, HydrationError> {
        match raw {
            JsonValue::Object(map) => self.hydrate_at(map, target, depth + 1).map(Value::Object),
            JsonValue::Array(_) => Err(invalid(member, target, raw)),
            scalar => self
                .construct_from_scalar(target, Value::from(scalar), depth + 1)
                .map(Value::Object),
        }
    }

    /// Single-argument construction: `scalar` becomes the first constructor argument.
    fn construct_from_scalar(
        &self,
        type_name: &str,
        scalar: Value,
        depth: usize,
    ) -> Result<Object, HydrationError> {
        if depth > self.config.max_depth {
            return Err(HydrationError::RecursionLimit {
                type_name: type_name.to_string(),
                depth: self.config.max_depth,
            });
        }

        let descriptor = self.descriptor(type_name)?;
        let def = self.definition(type_name)?;
        if descriptor.kind() == TypeKind::Interface {
            return Err(HydrationError::NotInstantiable {
                type_name: type_name.to_string(),
            });
        }

        let mut scalar = Some(scalar);
        let slots = descriptor
            .constructor_params()
            .iter()
            .map(|param| {
                let value = match scalar.take() {
                    Some(value) => Some(value),
                    None if param.has_explicit_default() => param.default_value().map(Value::from),
                    None => None,
                };
                (param.name().to_string(), value)
            })
            .collect();

        let mut object = def.construct(&mut Arguments::new(type_name, slots))?;
        self.assign_fields(&descriptor, def, &mut object, &mut HashMap::new(), depth)?;
        Ok(object)
    }
}

fn check_nullability(member: &FieldDescriptor, value: &Value) -> Result<(), HydrationError> {
    if value.is_null() && !member.is_nullable() {
        return Err(HydrationError::NonNullableNull {
            field: member.name().to_string(),
            declared_type: member.display_type().to_string(),
        });
    }
    Ok(())
}

fn is_scalar(raw: &JsonValue) -> bool {
    matches!(
        raw,
        JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_)
    )
}

fn json_kind(raw: &JsonValue) -> &'static str {
    match raw {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn invalid(member: &FieldDescriptor, expected: &str, raw: &JsonValue) -> HydrationError {
    HydrationError::InvalidValue {
        field: member.name().to_string(),
        expected: expected.to_string(),
        found: json_kind(raw).to_string(),
    }
}
