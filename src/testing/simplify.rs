//! Rounding nested outputs for simple equality checks in tests
//!
//! Floats are rounded, arrays become nested lists, and maps keep their keys,
//! so model outputs can be compared against short literals with `json!`.

use ndarray::{ArrayBase, ArrayViewD, Axis, Data, Dimension};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};

use super::yaml::value_kind;
use crate::error::{Error, Result};

/// Decimal places kept by default.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Conversion into a rounded JSON tree
pub trait Simplify {
    fn simplify(&self, decimals: u32) -> Result<Value>;
}

/// Simplify `obj`, rounding every float to `decimals` places.
pub fn nested_simplify<T: Simplify + ?Sized>(obj: &T, decimals: u32) -> Result<Value> {
    obj.simplify(decimals)
}

fn round_float(x: f64, decimals: u32) -> Result<Value> {
    if !x.is_finite() {
        return Err(Error::unsupported(format!("non-finite float {x}")));
    }
    let scale = 10f64.powi(decimals as i32);
    let rounded = (x * scale).round() / scale;
    Number::from_f64(rounded)
        .map(Value::Number)
        .ok_or_else(|| Error::unsupported(format!("float {x}")))
}

impl Simplify for f64 {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        round_float(*self, decimals)
    }
}

impl Simplify for f32 {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        round_float(f64::from(*self), decimals)
    }
}

macro_rules! simplify_as_is {
    ($($ty:ty),*) => {
        $(
            impl Simplify for $ty {
                fn simplify(&self, _decimals: u32) -> Result<Value> {
                    Ok(Value::from(*self))
                }
            }
        )*
    };
}

simplify_as_is!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Simplify for str {
    fn simplify(&self, _decimals: u32) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl Simplify for String {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        self.as_str().simplify(decimals)
    }
}

impl<T: Simplify + ?Sized> Simplify for &T {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        (**self).simplify(decimals)
    }
}

impl<T: Simplify> Simplify for Option<T> {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        match self {
            Some(inner) => inner.simplify(decimals),
            None => Ok(Value::Null),
        }
    }
}

impl<T: Simplify> Simplify for [T] {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        self.iter()
            .map(|item| item.simplify(decimals))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<T: Simplify> Simplify for Vec<T> {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        self.as_slice().simplify(decimals)
    }
}

fn simplify_entries<'a, K, V>(
    entries: impl Iterator<Item = (&'a K, &'a V)>,
    decimals: u32,
) -> Result<Value>
where
    K: AsRef<str> + 'a,
    V: Simplify + 'a,
{
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.as_ref().to_string(), value.simplify(decimals)?);
    }
    Ok(Value::Object(map))
}

impl<K: AsRef<str>, V: Simplify> Simplify for BTreeMap<K, V> {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        simplify_entries(self.iter(), decimals)
    }
}

impl<K: AsRef<str>, V: Simplify, S> Simplify for HashMap<K, V, S> {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        simplify_entries(self.iter(), decimals)
    }
}

impl<A, S, D> Simplify for ArrayBase<S, D>
where
    A: Simplify,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn simplify(&self, decimals: u32) -> Result<Value> {
        simplify_array(self.view().into_dyn(), decimals)
    }
}

fn simplify_array<A: Simplify>(array: ArrayViewD<'_, A>, decimals: u32) -> Result<Value> {
    if array.ndim() == 0 {
        return match array.iter().next() {
            Some(value) => value.simplify(decimals),
            None => Ok(Value::Null),
        };
    }
    array
        .axis_iter(Axis(0))
        .map(|sub| simplify_array(sub, decimals))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

impl Simplify for Value {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        match self {
            Value::Number(n) if n.is_f64() => match n.as_f64() {
                Some(x) => round_float(x, decimals),
                None => Ok(self.clone()),
            },
            Value::Array(items) => items.simplify(decimals),
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, value) in map {
                    out.insert(key.clone(), value.simplify(decimals)?);
                }
                Ok(Value::Object(out))
            }
            _ => Ok(self.clone()),
        }
    }
}

impl Simplify for serde_yaml::Value {
    fn simplify(&self, decimals: u32) -> Result<Value> {
        use serde_yaml::Value as Yaml;

        match self {
            Yaml::Null => Ok(Value::Null),
            Yaml::Bool(b) => Ok(Value::Bool(*b)),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::from(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::from(u))
                } else {
                    round_float(n.as_f64().unwrap_or(f64::NAN), decimals)
                }
            }
            Yaml::String(s) => Ok(Value::String(s.clone())),
            Yaml::Sequence(items) => items.simplify(decimals),
            Yaml::Mapping(mapping) => {
                let mut out = Map::new();
                for (key, value) in mapping {
                    let key = match key {
                        Yaml::String(s) => s.clone(),
                        Yaml::Bool(b) => b.to_string(),
                        Yaml::Number(n) => n.to_string(),
                        other => {
                            return Err(Error::unsupported(format!(
                                "{} mapping key",
                                value_kind(other)
                            )))
                        }
                    };
                    out.insert(key, value.simplify(decimals)?);
                }
                Ok(Value::Object(out))
            }
            Yaml::Tagged(_) => Err(Error::unsupported(value_kind(self))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn test_rounds_floats() {
        assert_eq!(nested_simplify(&0.123456f64, 3).unwrap(), json!(0.123));
        assert_eq!(nested_simplify(&0.1f32, DEFAULT_DECIMALS).unwrap(), json!(0.1));
        assert_eq!(nested_simplify(&2.5f64, 0).unwrap(), json!(3.0));
    }

    #[test]
    fn test_ints_and_strings_kept() {
        assert_eq!(nested_simplify(&42i64, 3).unwrap(), json!(42));
        assert_eq!(nested_simplify("token", 3).unwrap(), json!("token"));
        assert_eq!(nested_simplify(&None::<f32>, 3).unwrap(), json!(null));
    }

    #[test]
    fn test_nested_collections() {
        let mut scores = BTreeMap::new();
        scores.insert("loss", vec![0.33333f32, 1.0]);
        scores.insert("acc", vec![0.98765]);
        assert_eq!(
            nested_simplify(&scores, 2).unwrap(),
            json!({"acc": [0.99], "loss": [0.33, 1.0]})
        );
    }

    #[test]
    fn test_ndarray_to_nested_lists() {
        let logits = array![[0.12345f32, 1.0], [2.0, -0.55555]];
        assert_eq!(
            nested_simplify(&logits, 3).unwrap(),
            json!([[0.123, 1.0], [2.0, -0.556]])
        );
        let ids = array![1i64, 2, 3].into_dyn();
        assert_eq!(nested_simplify(&ids, 3).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_json_value() {
        let value = json!({"score": 0.98765, "labels": [1, 2], "name": "x"});
        assert_eq!(
            nested_simplify(&value, 1).unwrap(),
            json!({"score": 1.0, "labels": [1, 2], "name": "x"})
        );
    }

    #[test]
    fn test_yaml_value() {
        let value: serde_yaml::Value = serde_yaml::from_str("a: 0.12345\n1: [true, ~]\n").unwrap();
        assert_eq!(
            nested_simplify(&value, 2).unwrap(),
            json!({"a": 0.12, "1": [true, null]})
        );
    }

    #[test]
    fn test_non_finite_unsupported() {
        let err = nested_simplify(&f32::NAN, 3).unwrap_err();
        assert!(err.to_string().starts_with("Not supported: non-finite float"));
    }

    #[test]
    fn test_yaml_tagged_unsupported() {
        let value: serde_yaml::Value = serde_yaml::from_str("!Point {x: 1}").unwrap();
        let err = nested_simplify(&value, 3).unwrap_err();
        assert_eq!(err.to_string(), "Not supported: tagged value !Point");
    }
}
