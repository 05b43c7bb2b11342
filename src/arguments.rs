//! Constructor arguments handed to a registered constructor.

use crate::error::HydrationError;
use crate::value::{FromValue, Value};

/// Ordered constructor arguments, addressed by parameter name.
///
/// Each slot holds the value the builder resolved for that parameter (input,
/// default, or nested default). A slot is empty when no value could be resolved,
/// which only happens when an instance is built from a single scalar and a later
/// parameter has no default.
#[derive(Debug)]
pub struct Arguments {
    type_name: String,
    slots: Vec<(String, Option<Value>)>,
}

impl Arguments {
    pub(crate) fn new(type_name: &str, slots: Vec<(String, Option<Value>)>) -> Self {
        Self {
            type_name: type_name.to_string(),
            slots,
        }
    }

    /// Registered name of the type being constructed.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Take the argument for `name`, converted to `V`.
    ///
    /// # Errors
    ///
    /// * [`HydrationError::MissingRequiredValue`] if the slot is empty or was already taken
    /// * [`HydrationError::InvalidValue`] if the value does not convert to `V`
    pub fn take<V: FromValue>(&mut self, name: &str) -> Result<V, HydrationError> {
        match self.slot_mut(name).and_then(Option::take) {
            Some(value) => V::from_value(value).map_err(|e| e.for_field(name)),
            None => Err(HydrationError::MissingRequiredValue {
                field: name.to_string(),
            }),
        }
    }

    /// Take the argument for `name`, or `V::default()` if the slot is empty.
    pub fn take_or_default<V: FromValue + Default>(
        &mut self,
        name: &str,
    ) -> Result<V, HydrationError> {
        match self.slot_mut(name).and_then(Option::take) {
            Some(value) => V::from_value(value).map_err(|e| e.for_field(name)),
            None => Ok(V::default()),
        }
    }

    /// `true` if `name` still holds a value.
    pub fn contains(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|(slot, value)| slot == name && value.is_some())
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` for zero-argument construction.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<Value>> {
        self.slots
            .iter_mut()
            .find(|(slot, _)| slot == name)
            .map(|(_, value)| value)
    }
}
