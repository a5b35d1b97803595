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

//! Copies bound parameters into an HTTP request of the Lambda REST API.

use crate::binder::{BoundParams, ParamValue};
use crate::error::ValidationError;
use crate::schema::{Binding, Method, OperationSpec, ParamSpec};
use bytes::Bytes;
use serde_json::{Map, Value};

/// The body of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No body.
    Empty,
    /// A JSON document.
    Json(Value),
    /// Raw bytes.
    Blob(Bytes),
}

/// An unsigned request, relative to the service endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The HTTP method.
    pub method:  Method,
    /// The path with every placeholder substituted and encoded.
    pub path:    String,
    /// Query pairs in insertion order. A key may repeat.
    pub query:   Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// The body.
    pub body:    Body,
}

impl Request {
    /// Replaces every value of the query key.
    pub fn set_query(&mut self, key: &str, value: impl Into<String>) {
        self.remove_query(key);
        self.query.push((key.to_string(), value.into()));
    }

    /// Removes every value of the query key.
    pub fn remove_query(&mut self, key: &str) {
        self.query.retain(|(k, _)| k != key);
    }

    /// Returns the first value of the query key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the header value, ignoring the case of its name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The path and the encoded query string.
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Builds the request of an operation from its bound parameters.
///
/// Required parameters are checked before anything is built, so a missing
/// one is reported without any network call. Members of the JSON body are
/// written at their object path; an enclosing object such as `Environment`
/// only appears when one of its members is bound. `POST` and `PUT` requests
/// without any body member send `{}`.
pub fn build_request(
    operation: &OperationSpec,
    params: &BoundParams,
) -> Result<Request, ValidationError> {
    if let Some(missing) = operation
        .params
        .iter()
        .find(|p| p.required && !params.contains(p.name))
    {
        return Err(ValidationError::MissingRequired {
            operation: operation.name.to_string(),
            param:     missing.name.to_string(),
        });
    }

    let mut path = operation.path.to_string();
    let mut query = vec![];
    let mut headers = vec![];
    let mut body = Map::new();
    let mut payload = None;

    for (name, value) in params.iter() {
        let spec = operation
            .param(name)
            .ok_or_else(|| ValidationError::UnknownParameter {
                operation: operation.name.to_string(),
                param:     name.to_string(),
            })?;
        match spec.binding {
            Binding::Path(placeholder) => {
                let text = scalar(spec, value)?;
                if text.is_empty() {
                    return Err(ValidationError::InvalidValue {
                        param:  spec.name.to_string(),
                        value:  text,
                        reason: "must not be empty".to_string(),
                    });
                }
                path = path.replace(
                    &format!("{{{}}}", placeholder),
                    &urlencoding::encode(&text),
                );
            }
            Binding::Query(key) => {
                let values = value.to_query_values().ok_or_else(|| unsupported(spec))?;
                query.extend(values.into_iter().map(|v| (key.to_string(), v)));
            }
            Binding::Header(header) => {
                headers.push((header.to_string(), scalar(spec, value)?));
            }
            Binding::Body(member) => {
                insert_member(&mut body, member, value.to_json()).ok_or_else(|| unsupported(spec))?;
            }
            Binding::Payload => match value {
                ParamValue::Blob(bytes) => payload = Some(bytes.clone()),
                _ => return Err(unsupported(spec)),
            },
        }
    }

    let body = match payload {
        Some(bytes) if body.is_empty() => Body::Blob(bytes),
        Some(_) => {
            return Err(ValidationError::UnsupportedBinding {
                param: "Payload".to_string(),
            })
        }
        None if !body.is_empty() || operation.method.has_body() => Body::Json(Value::Object(body)),
        None => Body::Empty,
    };

    Ok(Request {
        method: operation.method,
        path,
        query,
        headers,
        body,
    })
}

fn scalar(spec: &ParamSpec, value: &ParamValue) -> Result<String, ValidationError> {
    value.to_text().ok_or_else(|| unsupported(spec))
}

fn unsupported(spec: &ParamSpec) -> ValidationError {
    ValidationError::UnsupportedBinding {
        param: spec.name.to_string(),
    }
}

/// Writes the value at the object path, creating the enclosing objects on
/// the way. Returns `None` if a non-object value is in the way.
fn insert_member(root: &mut Map<String, Value>, member: &[&str], value: Value) -> Option<()> {
    let (last, parents) = member.split_last()?;
    let mut current = root;
    for key in parents {
        current = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()?;
    }
    current.insert(last.to_string(), value);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::bind;
    use crate::schema::find_operation;
    use serde_json::json;

    fn build(operation: &str, raw: &[(&str, &[&str])]) -> Result<Request, ValidationError> {
        let op = find_operation(operation).unwrap();
        let raw = raw
            .iter()
            .map(|(name, values)| (*name, values.iter().map(|v| v.to_string()).collect::<Vec<_>>()));
        let bound = bind(op, raw)?;
        build_request(op, &bound)
    }

    #[test]
    fn missing_required_parameters_fail_before_building() {
        let err = build("PutFunctionConcurrency", &[("FunctionName", &["f"])]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequired {
                operation: "PutFunctionConcurrency".to_string(),
                param:     "ReservedConcurrentExecution".to_string(),
            }
        );
    }

    #[test]
    fn path_parameters_are_encoded() {
        let request = build(
            "GetDurableExecution",
            &[(
                "DurableExecutionArn",
                &["arn:aws:lambda:us-east-1:123456789012:function:f/durable/run 1"],
            )],
        )
        .unwrap();
        assert_eq!(
            request.path,
            "/2025-12-01/durable-executions/arn%3Aaws%3Alambda%3Aus-east-1%3A123456789012%3Afunction%3Af%2Fdurable%2Frun%201"
        );
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.body, Body::Empty);
    }

    #[test]
    fn empty_path_parameters_are_rejected() {
        let err = build("GetFunction", &[("FunctionName", &[""])]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn nested_objects_appear_only_when_a_member_is_bound() {
        let request = build(
            "UpdateFunctionConfiguration",
            &[("FunctionName", &["f"]), ("Timeout", &["30"])],
        )
        .unwrap();
        assert_eq!(request.body, Body::Json(json!({ "Timeout": 30 })));

        let request = build(
            "UpdateFunctionConfiguration",
            &[
                ("FunctionName", &["f"]),
                ("Environment_Variable", &["STAGE=prod", "DEBUG=0"]),
                ("TracingConfig_Mode", &["Active"]),
            ],
        )
        .unwrap();
        assert_eq!(
            request.body,
            Body::Json(json!({
                "Environment": { "Variables": { "DEBUG": "0", "STAGE": "prod" } },
                "TracingConfig": { "Mode": "Active" }
            }))
        );
    }

    #[test]
    fn an_explicitly_empty_map_is_sent() {
        let request = build(
            "UpdateFunctionConfiguration",
            &[("FunctionName", &["f"]), ("Environment_Variable", &[""])],
        )
        .unwrap();
        assert_eq!(
            request.body,
            Body::Json(json!({ "Environment": { "Variables": {} } }))
        );
    }

    #[test]
    fn error_objects_are_populated_member_by_member() {
        let request = build(
            "StopDurableExecution",
            &[
                ("DurableExecutionArn", &["arn"]),
                ("Error_ErrorType", &["Cancelled"]),
                ("Error_StackTrace", &["at a", "at b"]),
            ],
        )
        .unwrap();
        assert_eq!(request.path, "/2025-12-01/durable-executions/arn/stop");
        assert_eq!(
            request.body,
            Body::Json(json!({
                "Error": { "ErrorType": "Cancelled", "StackTrace": ["at a", "at b"] }
            }))
        );
    }

    #[test]
    fn posts_without_members_send_an_empty_object() {
        let request = build("PublishVersion", &[("FunctionName", &["f"])]).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Body::Json(json!({})));

        let request = build("DeleteFunction", &[("FunctionName", &["f"])]).unwrap();
        assert_eq!(request.body, Body::Empty);
    }

    #[test]
    fn headers_query_and_payload_are_bound() {
        let request = build(
            "Invoke",
            &[
                ("FunctionName", &["f"]),
                ("InvocationType", &["Event"]),
                ("Qualifier", &["live"]),
                ("Payload", &[r#"{"k":"v"}"#]),
            ],
        )
        .unwrap();
        assert_eq!(request.header("x-amz-invocation-type"), Some("Event"));
        assert_eq!(request.query_value("Qualifier"), Some("live"));
        assert_eq!(
            request.body,
            Body::Blob(Bytes::from_static(br#"{"k":"v"}"#))
        );
        assert_eq!(
            request.uri(),
            "/2015-03-31/functions/f/invocations?Qualifier=live"
        );
    }

    #[test]
    fn list_values_repeat_their_query_key() {
        let mut request = build(
            "UntagResource",
            &[("Resource", &["arn"]), ("TagKey", &["team", "cost center"])],
        )
        .unwrap();
        assert_eq!(request.uri(), "/2017-03-31/tags/arn?tagKeys=team&tagKeys=cost%20center");

        request.set_query("tagKeys", "only");
        assert_eq!(request.uri(), "/2017-03-31/tags/arn?tagKeys=only");
        request.remove_query("tagKeys");
        assert_eq!(request.uri(), "/2017-03-31/tags/arn");
    }
}
