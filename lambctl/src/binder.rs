// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Binds raw command-line values to the typed parameters of an operation.

use crate::error::ValidationError;
use crate::schema::{OperationSpec, ParamKind, ParamSpec};
use bytes::Bytes;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Prefix of a blob value read from a file.
pub const BLOB_FILE_PREFIX: &str = "fileb://";
/// Prefix of a JSON value read from a file.
pub const TEXT_FILE_PREFIX: &str = "file://";

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Plain text.
    String(String),
    /// A signed integer.
    Integer(i64),
    /// A switch.
    Boolean(bool),
    /// A finite floating point number.
    Double(f64),
    /// Binary data.
    Blob(Bytes),
    /// A list of strings.
    StringList(Vec<String>),
    /// A string to string map.
    StringMap(BTreeMap<String, String>),
    /// A string to number map.
    DoubleMap(BTreeMap<String, f64>),
    /// A JSON document.
    Json(Value),
}

impl ParamValue {
    /// Converts the value into its JSON body representation. Blobs are
    /// base64-encoded, as the Lambda REST API expects in JSON documents.
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::Integer(i) => Value::from(*i),
            ParamValue::Boolean(b) => Value::Bool(*b),
            ParamValue::Double(d) => number(*d),
            ParamValue::Blob(b) => Value::String(base64::encode(b)),
            ParamValue::StringList(list) => {
                Value::Array(list.iter().cloned().map(Value::String).collect())
            }
            ParamValue::StringMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            ParamValue::DoubleMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), number(*v)))
                    .collect(),
            ),
            ParamValue::Json(v) => v.clone(),
        }
    }

    /// Renders the value for a query string, or `None` if it cannot be
    /// carried there. Lists yield one entry per element.
    pub fn to_query_values(&self) -> Option<Vec<String>> {
        match self {
            ParamValue::StringList(list) => Some(list.clone()),
            other => other.to_text().map(|text| vec![text]),
        }
    }

    /// Renders a scalar value as text for paths and headers.
    pub fn to_text(&self) -> Option<String> {
        match self {
            ParamValue::String(s) => Some(s.clone()),
            ParamValue::Integer(i) => Some(i.to_string()),
            ParamValue::Boolean(b) => Some(b.to_string()),
            ParamValue::Double(d) => Some(d.to_string()),
            _ => None,
        }
    }
}

fn number(d: f64) -> Value {
    // Non-finite numbers are rejected while binding.
    Number::from_f64(d).map(Value::Number).unwrap_or(Value::Null)
}

/// The parameters bound for one command execution, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    values: BTreeMap<&'static str, ParamValue>,
}

impl BoundParams {
    /// Returns the value bound to the parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns true if the parameter is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over the bound parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Returns the number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Binds raw values to the operation's parameters.
///
/// # Arguments
/// * `operation` - The operation being invoked.
/// * `raw` - Parameter names with every raw value given for them. Names
///   with no values are treated as unbound.
///
/// # Returns
/// The typed parameters, or the first validation error.
pub fn bind<I, S>(operation: &OperationSpec, raw: I) -> Result<BoundParams, ValidationError>
where
    I: IntoIterator<Item = (S, Vec<String>)>,
    S: AsRef<str>,
{
    let mut bound = BoundParams::default();
    for (name, values) in raw {
        let name = name.as_ref();
        let spec = operation
            .param(name)
            .ok_or_else(|| ValidationError::UnknownParameter {
                operation: operation.name.to_string(),
                param:     name.to_string(),
            })?;
        if values.is_empty() {
            continue;
        }
        let value = parse_value(spec, &values)?;
        bound.values.insert(spec.name, value);
    }
    Ok(bound)
}

/// Parses the raw values of one parameter according to its kind.
pub fn parse_value(spec: &ParamSpec, values: &[String]) -> Result<ParamValue, ValidationError> {
    let last = values.last().map(String::as_str).unwrap_or_default();
    let invalid = |value: &str, reason: &str| ValidationError::InvalidValue {
        param:  spec.name.to_string(),
        value:  value.to_string(),
        reason: reason.to_string(),
    };

    match spec.kind {
        ParamKind::String => Ok(ParamValue::String(last.to_string())),
        ParamKind::Integer => last
            .trim()
            .parse::<i64>()
            .map(ParamValue::Integer)
            .map_err(|e| invalid(last, &e.to_string())),
        ParamKind::Boolean => match last.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(ParamValue::Boolean(true)),
            "false" | "no" | "0" => Ok(ParamValue::Boolean(false)),
            _ => Err(invalid(last, "expected true or false")),
        },
        ParamKind::Double => parse_double(last)
            .map(ParamValue::Double)
            .ok_or_else(|| invalid(last, "expected a finite number")),
        ParamKind::Blob => read_blob(spec, last).map(ParamValue::Blob),
        ParamKind::StringList => {
            if is_explicitly_empty(values) {
                return Ok(ParamValue::StringList(vec![]));
            }
            Ok(ParamValue::StringList(values.to_vec()))
        }
        ParamKind::StringMap => {
            let mut map = BTreeMap::new();
            if is_explicitly_empty(values) {
                return Ok(ParamValue::StringMap(map));
            }
            for pair in values {
                let (key, value) =
                    split_pair(pair).ok_or_else(|| invalid(pair, "expected KEY=VALUE"))?;
                map.insert(key.to_string(), value.to_string());
            }
            Ok(ParamValue::StringMap(map))
        }
        ParamKind::DoubleMap => {
            let mut map = BTreeMap::new();
            if is_explicitly_empty(values) {
                return Ok(ParamValue::DoubleMap(map));
            }
            for pair in values {
                let (key, value) =
                    split_pair(pair).ok_or_else(|| invalid(pair, "expected KEY=NUMBER"))?;
                let weight =
                    parse_double(value).ok_or_else(|| invalid(pair, "expected a finite number"))?;
                map.insert(key.to_string(), weight);
            }
            Ok(ParamValue::DoubleMap(map))
        }
        ParamKind::Json => {
            let text = match last.strip_prefix(TEXT_FILE_PREFIX) {
                Some(path) => String::from_utf8_lossy(&read_file(spec, path)?).into_owned(),
                None => last.to_string(),
            };
            serde_json::from_str(&text)
                .map(ParamValue::Json)
                .map_err(|e| invalid(last, &e.to_string()))
        }
    }
}

/// A single empty value asks for an empty collection rather than none.
fn is_explicitly_empty(values: &[String]) -> bool {
    values.len() == 1 && values[0].is_empty()
}

fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_double(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|d| d.is_finite())
}

fn read_blob(spec: &ParamSpec, raw: &str) -> Result<Bytes, ValidationError> {
    match raw.strip_prefix(BLOB_FILE_PREFIX) {
        Some(path) => read_file(spec, path).map(Bytes::from),
        None => Ok(Bytes::copy_from_slice(raw.as_bytes())),
    }
}

fn read_file(spec: &ParamSpec, path: &str) -> Result<Vec<u8>, ValidationError> {
    std::fs::read(path).map_err(|e| ValidationError::UnreadableBlob {
        param:   spec.name.to_string(),
        path:    path.to_string(),
        message: e.to_string(),
    })
}
