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

//! Shapes HTTP responses into response documents.

use crate::error::{LambctlError, Result};
use crate::schema::{PayloadShape, ResponseShape};
use http::HeaderMap;
use serde_json::{Map, Value};

/// Turns a successful HTTP response into the operation's response document.
///
/// # Arguments
/// * `shape` - The response shape of the operation.
/// * `status` - The HTTP status code.
/// * `headers` - The response headers.
/// * `body` - The response body.
///
/// # Returns
/// The document, or `Value::Null` when it has no fields.
pub fn shape_response(
    shape: &ResponseShape,
    status: u16,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Value> {
    let mut document = match shape.payload {
        PayloadShape::Json if is_blank(body) => Map::new(),
        PayloadShape::Json => match serde_json::from_slice(body)? {
            Value::Object(members) => members,
            Value::Null => Map::new(),
            other => {
                return Err(LambctlError::Internal(format!(
                    "expected a JSON object in the response, got {}",
                    other
                )))
            }
        },
        PayloadShape::Blob(field) => {
            let mut members = Map::new();
            if !body.is_empty() {
                // Function results are usually JSON; anything else is kept
                // as text.
                let payload = serde_json::from_slice(body)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()));
                members.insert(field.to_string(), payload);
            }
            members
        }
        PayloadShape::Empty => Map::new(),
    };

    for (header, field) in shape.headers {
        if let Some(value) = headers.get(*header).and_then(|v| v.to_str().ok()) {
            document.insert(field.to_string(), Value::String(value.to_string()));
        }
    }
    if let Some(field) = shape.status_field {
        document.insert(field.to_string(), Value::from(status));
    }

    if document.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(document))
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(|b| b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::find_operation;
    use http::HeaderValue;
    use serde_json::json;

    #[test]
    fn json_bodies_become_the_document() {
        let op = find_operation("GetFunctionConcurrency").unwrap();
        let value = shape_response(
            &op.response,
            200,
            &HeaderMap::new(),
            br#"{"ReservedConcurrentExecutions":5}"#,
        )
        .unwrap();
        assert_eq!(value, json!({ "ReservedConcurrentExecutions": 5 }));

        let value = shape_response(&op.response, 200, &HeaderMap::new(), b"").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn invoke_maps_headers_status_and_payload() {
        let op = find_operation("Invoke").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-amz-executed-version", HeaderValue::from_static("$LATEST"));
        headers.insert("x-amz-function-error", HeaderValue::from_static("Unhandled"));

        let value = shape_response(
            &op.response,
            200,
            &headers,
            br#"{"errorMessage":"boom"}"#,
        )
        .unwrap();
        assert_eq!(
            value,
            json!({
                "Payload": { "errorMessage": "boom" },
                "ExecutedVersion": "$LATEST",
                "FunctionError": "Unhandled",
                "StatusCode": 200
            })
        );

        let value = shape_response(&op.response, 200, &HeaderMap::new(), b"plain text").unwrap();
        assert_eq!(value["Payload"], "plain text");
    }

    #[test]
    fn invoke_async_reports_its_status() {
        let op = find_operation("InvokeAsync").unwrap();
        let value = shape_response(&op.response, 202, &HeaderMap::new(), b"").unwrap();
        assert_eq!(value, json!({ "Status": 202 }));
    }

    #[test]
    fn empty_shapes_produce_null() {
        let op = find_operation("DeleteFunction").unwrap();
        let value = shape_response(&op.response, 204, &HeaderMap::new(), b"").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn non_object_json_is_rejected() {
        let op = find_operation("GetAccountSettings").unwrap();
        assert!(shape_response(&op.response, 200, &HeaderMap::new(), b"[1,2]").is_err());
    }
}
