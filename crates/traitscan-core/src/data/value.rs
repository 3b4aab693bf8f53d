use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A single cell of a dataset.
///
/// Floats are compared by their bit pattern after normalisation, so `Value` can be used as a
/// hash map key. `NaN` and empty text never survive construction through the helper
/// constructors, they become [`Value::Missing`].
#[derive(Debug, Clone)]
pub enum Value {
    Text(Arc<str>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Missing,
}

impl Value {
    pub fn text(value: &str) -> Self {
        if value.is_empty() {
            Value::Missing
        } else {
            Value::Text(Arc::from(value))
        }
    }

    pub fn float(value: f64) -> Self {
        if value.is_nan() {
            Value::Missing
        } else {
            Value::Float(value)
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(value) => value.is_nan(),
            _ => false,
        }
    }

    /// Rewrites values that are equivalent to missing into [`Value::Missing`].
    pub fn normalize(self) -> Self {
        match self {
            Value::Text(text) if text.is_empty() => Value::Missing,
            Value::Float(value) => Value::float(value),
            value => value,
        }
    }
}

fn float_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(text) => text.hash(state),
            Value::Integer(value) => value.hash(state),
            Value::Float(value) => float_bits(*value).hash(state),
            Value::Boolean(value) => value.hash(state),
            Value::Missing => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{}", text),
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Missing => write!(f, "missing"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::text(&value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn signed_zero_is_one_value() {
        let values: HashSet<Value> = vec![Value::Float(0.0), Value::Float(-0.0)]
            .into_iter()
            .collect();

        assert_eq!(values.len(), 1);
    }

    #[test]
    fn nan_and_empty_text_are_missing() {
        assert!(Value::float(f64::NAN).is_missing());
        assert!(Value::from("").is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert_eq!(Value::Text(Arc::from("")).normalize(), Value::Missing);
    }

    #[test]
    fn variants_never_compare_equal() {
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::Integer(1));
        assert_eq!(Value::from("nan"), Value::Text(Arc::from("nan")));
    }

    #[test]
    fn options_map_to_missing() {
        assert_eq!(Value::from(None::<i64>), Value::Missing);
        assert_eq!(Value::from(Some(4i64)), Value::Integer(4));
    }
}
