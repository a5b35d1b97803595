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

//! Projection of response documents into command output.

use crate::binder::BoundParams;
use crate::error::ValidationError;
use crate::schema::OperationSpec;
use serde_json::Value;

/// What part of the response a command prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSelection {
    /// `*`: the whole response document.
    Whole,
    /// A single top-level field of the response.
    Field(String),
    /// `^Name`: the value bound to an input parameter.
    EchoParam(String),
}

impl OutputSelection {
    /// Parses and validates a selector against the operation. Without a
    /// selector the operation's default applies.
    pub fn resolve(
        operation: &OperationSpec,
        selector: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::parse(operation, selector.unwrap_or(operation.default_select))
    }

    /// Parses and validates a selector against the operation.
    pub fn parse(operation: &OperationSpec, selector: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidSelector {
            selector: selector.to_string(),
            reason,
        };
        let trimmed = selector.trim();
        if trimmed == "*" {
            return Ok(OutputSelection::Whole);
        }
        if let Some(name) = trimmed.strip_prefix('^') {
            return match operation.param(name) {
                Some(param) => Ok(OutputSelection::EchoParam(param.name.to_string())),
                None => Err(invalid(format!(
                    "{} has no parameter named '{}'",
                    operation.name, name
                ))),
            };
        }
        if trimmed.is_empty() {
            return Err(invalid("the selector is empty".to_string()));
        }
        if operation.has_response_field(trimmed) {
            Ok(OutputSelection::Field(trimmed.to_string()))
        } else {
            Err(invalid(format!(
                "{} responses have no field named '{}'",
                operation.name, trimmed
            )))
        }
    }

    /// Selects the output from the response and the bound parameters.
    /// Returns `None` when there is nothing to print.
    pub fn project(&self, response: &Value, params: &BoundParams) -> Option<Value> {
        match self {
            OutputSelection::Whole => match response {
                Value::Null => None,
                Value::Object(o) if o.is_empty() => None,
                other => Some(other.clone()),
            },
            OutputSelection::Field(field) => response.get(field).filter(|v| !v.is_null()).cloned(),
            OutputSelection::EchoParam(name) => params.get(name).map(|v| v.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::bind;
    use crate::schema::find_operation;
    use serde_json::json;

    #[test]
    fn parses_the_three_selector_forms() {
        let op = find_operation("PutFunctionConcurrency").unwrap();
        assert_eq!(OutputSelection::parse(op, "*"), Ok(OutputSelection::Whole));
        assert_eq!(
            OutputSelection::parse(op, "ReservedConcurrentExecutions"),
            Ok(OutputSelection::Field(
                "ReservedConcurrentExecutions".to_string()
            ))
        );
        assert_eq!(
            OutputSelection::parse(op, "^FunctionName"),
            Ok(OutputSelection::EchoParam("FunctionName".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_fields_and_params() {
        let op = find_operation("GetAlias").unwrap();
        assert!(matches!(
            OutputSelection::parse(op, "Payload"),
            Err(ValidationError::InvalidSelector { .. })
        ));
        assert!(matches!(
            OutputSelection::parse(op, "^Payload"),
            Err(ValidationError::InvalidSelector { .. })
        ));
        assert!(matches!(
            OutputSelection::parse(op, " "),
            Err(ValidationError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn falls_back_to_the_default_selector() {
        let op = find_operation("ListFunctions").unwrap();
        assert_eq!(
            OutputSelection::resolve(op, None),
            Ok(OutputSelection::Field("Functions".to_string()))
        );
        assert_eq!(
            OutputSelection::resolve(op, Some("*")),
            Ok(OutputSelection::Whole)
        );
    }

    #[test]
    fn projects_whole_field_or_echoed_input() {
        let op = find_operation("PutFunctionConcurrency").unwrap();
        let params = bind(
            op,
            vec![
                ("FunctionName", vec!["my-function".to_string()]),
                ("ReservedConcurrentExecution", vec!["10".to_string()]),
            ],
        )
        .unwrap();
        let response = json!({ "ReservedConcurrentExecutions": 10 });

        assert_eq!(
            OutputSelection::Whole.project(&response, &params),
            Some(response.clone())
        );
        assert_eq!(
            OutputSelection::Field("ReservedConcurrentExecutions".to_string())
                .project(&response, &params),
            Some(json!(10))
        );
        assert_eq!(
            OutputSelection::EchoParam("FunctionName".to_string()).project(&response, &params),
            Some(json!("my-function"))
        );
    }

    #[test]
    fn missing_or_null_fields_print_nothing() {
        let params = BoundParams::default();
        let selection = OutputSelection::Field("NextMarker".to_string());
        assert_eq!(selection.project(&json!({ "NextMarker": null }), &params), None);
        assert_eq!(selection.project(&json!({}), &params), None);
        assert_eq!(OutputSelection::Whole.project(&Value::Null, &params), None);
        assert_eq!(
            OutputSelection::EchoParam("Qualifier".to_string()).project(&json!({}), &params),
            None
        );
    }
}
