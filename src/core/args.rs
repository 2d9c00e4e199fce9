//! Arguments supplied to `fire` and forwarded to guards and entry actions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure to read a fire-time argument.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArgumentError {
    #[error("Argument {index} missing ({available} supplied)")]
    Missing { index: usize, available: usize },

    #[error("Argument {index} has unexpected shape: {reason}")]
    Invalid { index: usize, reason: String },
}

/// Ordered, untyped arguments passed along with a trigger.
///
/// The engine never looks inside; the same list reaches every guard and
/// every entry action that runs for the fire. Typing is the host's business,
/// via [`TriggerArgs::get`].
///
/// # Example
///
/// ```rust
/// use strata::core::TriggerArgs;
///
/// let args = TriggerArgs::one("alice");
/// let assignee: String = args.get(0).unwrap();
/// assert_eq!(assignee, "alice");
/// assert!(args.get::<String>(1).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerArgs {
    values: Vec<Value>,
}

impl TriggerArgs {
    /// No arguments.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single argument.
    ///
    /// Values that fail to serialize are recorded as `null`; see
    /// [`TriggerArgs::push`].
    pub fn one<V: Serialize>(value: V) -> Self {
        Self::none().push(value)
    }

    pub fn try_one<V: Serialize>(value: V) -> Result<Self, serde_json::Error> {
        Self::none().try_push(value)
    }

    /// Append an argument, returning the extended list.
    ///
    /// A value JSON cannot represent (a map with non-string keys, say) is
    /// stored as `null` and a warning is logged. Use
    /// [`TriggerArgs::try_push`] to get the error instead.
    pub fn push<V: Serialize>(mut self, value: V) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!(
                index = self.values.len(),
                error = %e,
                "Trigger argument is not representable as JSON, storing null"
            );
            Value::Null
        });
        self.values.push(value);
        self
    }

    /// Append an argument, failing if it cannot be serialized.
    pub fn try_push<V: Serialize>(mut self, value: V) -> Result<Self, serde_json::Error> {
        self.values.push(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Deserialize the argument at `index`.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, ArgumentError> {
        let value = self.values.get(index).ok_or(ArgumentError::Missing {
            index,
            available: self.values.len(),
        })?;

        serde_json::from_value(value.clone()).map_err(|e| ArgumentError::Invalid {
            index,
            reason: e.to_string(),
        })
    }

    /// Raw access to the argument at `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for TriggerArgs {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn keyed_by_pairs() -> HashMap<(u8, u8), &'static str> {
        HashMap::from([((1, 2), "seat")])
    }

    #[test]
    fn try_push_reports_unrepresentable_values() {
        assert!(TriggerArgs::try_one(keyed_by_pairs()).is_err());
        assert!(TriggerArgs::none()
            .push("ok")
            .try_push(keyed_by_pairs())
            .is_err());

        let args = TriggerArgs::try_one("fine").unwrap().try_push(7u8).unwrap();
        assert_eq!(args.get::<u8>(1).unwrap(), 7);
    }

    #[test]
    fn push_stores_null_for_unrepresentable_values() {
        let args = TriggerArgs::one(keyed_by_pairs()).push(3u8);

        assert_eq!(args.value(0), Some(&Value::Null));
        assert_eq!(args.get::<u8>(1).unwrap(), 3);
        assert!(matches!(
            args.get::<HashMap<String, String>>(0),
            Err(ArgumentError::Invalid { index: 0, .. })
        ));
    }

    #[test]
    fn get_deserializes_typed_values() {
        let args = TriggerArgs::one("bob").push(42u32);

        assert_eq!(args.get::<String>(0).unwrap(), "bob");
        assert_eq!(args.get::<u32>(1).unwrap(), 42);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn get_reports_missing_argument() {
        let args = TriggerArgs::none();

        assert_eq!(
            args.get::<String>(0),
            Err(ArgumentError::Missing {
                index: 0,
                available: 0
            })
        );
        assert!(args.is_empty());
    }

    #[test]
    fn get_reports_wrong_shape() {
        let args = TriggerArgs::from(vec![json!({"name": "carol"})]);

        assert!(matches!(
            args.get::<u32>(0),
            Err(ArgumentError::Invalid { index: 0, .. })
        ));
    }

    #[test]
    fn value_exposes_raw_json() {
        let args = TriggerArgs::one(json!([1, 2]));
        assert_eq!(args.value(0), Some(&json!([1, 2])));
        assert_eq!(args.value(1), None);
    }
}
