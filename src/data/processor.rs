//! Data Processor Module
//! Typed extraction of drawing parameters from a loosely-typed mapping.

use crate::error::{PlotError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed drawing parameters (coordinates, colors, markers, widths,
/// alphas, labels). Absent or `null` keys fall back to style defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotData(Map<String, Value>);

impl From<Map<String, Value>> for PlotData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl PlotData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(PlotError::invalid("data", "a key/value mapping")),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for `key`, treating `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn floats(&self, key: &str) -> Result<Option<Vec<f64>>> {
        self.get(key)
            .map(|v| DataProcessor::floats(v, key))
            .transpose()
    }

    pub fn require_floats(&self, key: &str) -> Result<Vec<f64>> {
        self.floats(key)?.ok_or_else(|| PlotError::missing(key))
    }

    pub fn series(&self, key: &str) -> Result<Option<Vec<Vec<f64>>>> {
        self.get(key)
            .map(|v| DataProcessor::series(v, key))
            .transpose()
    }

    pub fn f64(&self, key: &str) -> Result<Option<f64>> {
        self.get(key).map(|v| DataProcessor::f64(v, key)).transpose()
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key).map(|v| DataProcessor::bool(v, key)).transpose()
    }

    pub fn string(&self, key: &str) -> Result<Option<String>> {
        self.get(key)
            .map(|v| DataProcessor::string(v, key))
            .transpose()
    }
}

/// Conversion helpers from JSON values into drawing parameter types.
pub struct DataProcessor;

impl DataProcessor {
    /// A flat list of numbers; `null` entries become NaN, a bare number is a
    /// one-element list.
    pub fn floats(value: &Value, key: &str) -> Result<Vec<f64>> {
        match value {
            Value::Number(n) => Ok(vec![n.as_f64().unwrap_or(f64::NAN)]),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Null => Ok(f64::NAN),
                    Value::Number(n) => Ok(n.as_f64().unwrap_or(f64::NAN)),
                    _ => Err(PlotError::invalid(key, "a list of numbers")),
                })
                .collect(),
            _ => Err(PlotError::invalid(key, "a list of numbers")),
        }
    }

    /// One or more series: a list of lists, or a flat list taken as one series.
    pub fn series(value: &Value, key: &str) -> Result<Vec<Vec<f64>>> {
        match value {
            Value::Array(items) if items.iter().any(Value::is_array) => items
                .iter()
                .map(|item| Self::floats(item, key))
                .collect(),
            _ => Ok(vec![Self::floats(value, key)?]),
        }
    }

    pub fn f64(value: &Value, key: &str) -> Result<f64> {
        value.as_f64().ok_or_else(|| PlotError::invalid(key, "a number"))
    }

    pub fn bool(value: &Value, key: &str) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| PlotError::invalid(key, "true or false"))
    }

    pub fn string(value: &Value, key: &str) -> Result<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| PlotError::invalid(key, "a string"))
    }

    /// Broadcast a per-line parameter over `n` lines.
    ///
    /// A single value (as judged by `is_single`) repeats for every line; a
    /// list gives one value per line and must have at least `n` entries.
    /// Absent values stay `None` so the style default applies.
    pub fn per_line<T, S, P>(
        value: Option<&Value>,
        n: usize,
        key: &str,
        is_single: S,
        parse: P,
    ) -> Result<Vec<Option<T>>>
    where
        T: Clone,
        S: Fn(&Value) -> bool,
        P: Fn(&Value) -> Result<T>,
    {
        let value = match value {
            None | Some(Value::Null) => return Ok(vec![None; n]),
            Some(value) => value,
        };

        if is_single(value) {
            return Ok(vec![Some(parse(value)?); n]);
        }

        let items = value
            .as_array()
            .ok_or_else(|| PlotError::invalid(key, "a value or a list with one value per line"))?;
        if items.len() < n {
            return Err(PlotError::length_mismatch(key, n, items.len()));
        }

        items
            .iter()
            .take(n)
            .map(|item| match item {
                Value::Null => Ok(None),
                item => parse(item).map(Some),
            })
            .collect()
    }

    /// Per-point parameter: a scalar for all points or one value per point.
    pub fn per_point(value: Option<&Value>, n: usize, key: &str) -> Result<Option<Vec<f64>>> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        if let Some(v) = value.as_f64() {
            return Ok(Some(vec![v; n]));
        }
        let values = Self::floats(value, key)?;
        if values.len() != n {
            return Err(PlotError::length_mismatch(key, n, values.len()));
        }
        Ok(Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> PlotData {
        PlotData::from_value(value).unwrap()
    }

    #[test]
    fn nulls_are_absent() {
        let d = data(json!({"color": null, "alpha": 0.5}));
        assert!(d.get("color").is_none());
        assert_eq!(d.f64("alpha").unwrap(), Some(0.5));
        assert_eq!(d.f64("missing").unwrap(), None);
    }

    #[test]
    fn floats_accept_nulls_and_scalars() {
        let d = data(json!({"y": [1, null, 3.5], "s": 4}));
        let y = d.require_floats("y").unwrap();
        assert_eq!(y[0], 1.0);
        assert!(y[1].is_nan());
        assert_eq!(d.require_floats("s").unwrap(), vec![4.0]);
        assert!(matches!(d.require_floats("x"), Err(PlotError::MissingKey(_))));
        assert!(data(json!({"y": ["a"]})).floats("y").is_err());
    }

    #[test]
    fn series_wraps_flat_lists() {
        let d = data(json!({"flat": [1, 2], "nested": [[1, 2], [3]]}));
        assert_eq!(d.series("flat").unwrap().unwrap(), vec![vec![1.0, 2.0]]);
        assert_eq!(
            d.series("nested").unwrap().unwrap(),
            vec![vec![1.0, 2.0], vec![3.0]]
        );
    }

    #[test]
    fn per_line_broadcasts_scalars_and_checks_length() {
        let parse = |v: &Value| DataProcessor::f64(v, "linewidths");
        let single = |v: &Value| v.is_number();

        let widths = DataProcessor::per_line(Some(&json!(2.0)), 3, "linewidths", single, parse).unwrap();
        assert_eq!(widths, vec![Some(2.0); 3]);

        let widths =
            DataProcessor::per_line(Some(&json!([1.0, null, 3.0])), 3, "linewidths", single, parse).unwrap();
        assert_eq!(widths, vec![Some(1.0), None, Some(3.0)]);

        let err = DataProcessor::per_line(Some(&json!([1.0])), 2, "linewidths", single, parse).unwrap_err();
        assert!(matches!(err, PlotError::LengthMismatch { expected: 2, found: 1, .. }));

        let absent = DataProcessor::per_line(None, 2, "linewidths", single, parse).unwrap();
        assert_eq!(absent, vec![None, None]);
    }

    #[test]
    fn per_point_requires_matching_length() {
        assert_eq!(
            DataProcessor::per_point(Some(&json!(9)), 2, "s").unwrap(),
            Some(vec![9.0, 9.0])
        );
        assert!(DataProcessor::per_point(Some(&json!([1, 2, 3])), 2, "s").is_err());
        assert_eq!(DataProcessor::per_point(None, 2, "s").unwrap(), None);
    }
}
