//! # Value Module
//!
//! Hydrated values and the conversions between them and Rust field types.
//!
//! Raw input arrives as `serde_json::Value`. While a type is being hydrated, each
//! present key is turned into a [`Value`]: scalars and collections are carried over
//! as-is, and nested mappings that target a registered class are replaced by an
//! already-constructed [`Object`]. Constructors and field setters then pull typed
//! Rust values out of those [`Value`]s through [`FromValue`].

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::ValueError;

/// A value produced during hydration.
///
/// Mirrors the JSON data model, plus [`Value::Object`] for instances that were
/// hydrated from a nested mapping or constructed from a scalar.
#[derive(Debug, Default)]
pub enum Value {
    /// Explicit or defaulted null.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    String(String),
    /// Ordered sequence, possibly of hydrated objects.
    List(Vec<Value>),
    /// Nested mapping that was not converted into an object (mixed or array fields).
    Map(BTreeMap<String, Value>),
    /// Fully constructed instance of a registered type.
    Object(Object),
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Take the hydrated instance out of this value as `T`.
    ///
    /// This is what [`FromValue`] implementations for registered types delegate to.
    pub fn into_object<T: Any>(self) -> Result<T, ValueError> {
        match self {
            Value::Object(object) => {
                let actual = object.kind().to_string();
                object
                    .downcast::<T>()
                    .map_err(|_| ValueError::new(std::any::type_name::<T>(), actual))
            }
            other => Err(ValueError::new(std::any::type_name::<T>(), other.kind())),
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(raw: &JsonValue) -> Self {
        match raw {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => number_to_value(n),
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(raw: JsonValue) -> Self {
        Value::from(&raw)
    }
}

fn number_to_value(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        // u64 beyond i64::MAX and real numbers both land here
        None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// An owned, type-erased hydrated instance.
///
/// Carries the registered type name so errors and debug output can say what was
/// built without knowing the concrete Rust type.
pub struct Object {
    type_name: String,
    inner: Box<dyn Any + Send + Sync>,
}

impl Object {
    pub(crate) fn new<T: Any + Send + Sync>(type_name: &str, value: T) -> Self {
        Self {
            type_name: type_name.to_string(),
            inner: Box::new(value),
        }
    }

    /// Registered name of the type this instance was built as.
    pub fn kind(&self) -> &str {
        &self.type_name
    }

    /// Borrow the instance as `T`, if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the instance as `T`, handing the object back on mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, Object> {
        let type_name = self.type_name;
        match self.inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Object { type_name, inner }),
        }
    }

    pub(crate) fn as_any_mut(&mut self) -> &mut dyn Any {
        self.inner.as_mut()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Conversion from a hydrated [`Value`] into a Rust type.
///
/// Implemented for scalars, collections and `serde_json::Value`. Registered types
/// get an implementation from `#[derive(Hydrate)]` or [`object_value!`](crate::object_value).
pub trait FromValue: Sized {
    /// Convert `value`, or report what was expected and what was found.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueError::new("bool", other.kind())),
        }
    }
}

macro_rules! int_from_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i)
                            .map_err(|_| ValueError::new(stringify!($ty), "out-of-range int")),
                        other => Err(ValueError::new(stringify!($ty), other.kind())),
                    }
                }
            }
        )+
    };
}

int_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(ValueError::new("f64", other.kind())),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ValueError::new("string", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueError::new("array", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|v| (key, v)))
                .collect(),
            // Implied default of a non-nullable collection
            Value::List(items) if items.is_empty() => Ok(Self::new()),
            other => Err(ValueError::new("map", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| T::from_value(value).map(|v| (key, v)))
                .collect(),
            // Implied default of a non-nullable collection
            Value::List(items) if items.is_empty() => Ok(Self::new()),
            other => Err(ValueError::new("map", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        T::from_value(value).map(Box::new)
    }
}

impl FromValue for JsonValue {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(match value {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(b),
            Value::Int(i) => JsonValue::from(i),
            Value::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
            Value::String(s) => JsonValue::String(s),
            Value::List(items) => JsonValue::Array(
                items
                    .into_iter()
                    .map(JsonValue::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, JsonValue::from_value(value)?);
                }
                JsonValue::Object(map)
            }
            Value::Object(object) => return Err(ValueError::new("json", object.kind().to_string())),
        })
    }
}

/// Implement [`FromValue`] for registered types by downcasting hydrated objects.
///
/// ```rust
/// #[derive(Debug, Default)]
/// struct Point { x: i64 }
///
/// hydrator::object_value!(Point);
/// ```
#[macro_export]
macro_rules! object_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::ValueError> {
                    value.into_object::<$ty>()
                }
            }
        )+
    };
}
