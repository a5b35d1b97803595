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

//! One command execution: bind, build, send, paginate and project.

use crate::aws::LambdaService;
use crate::binder::{bind, BoundParams};
use crate::error::{LambctlError, Result, ValidationError};
use crate::output::OutputSelection;
use crate::paginator::{paginate, PagingOptions};
use crate::request::{build_request, Request};
use crate::schema::{self, ConfirmImpact, OperationSpec};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// The generic options every command accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationOptions {
    /// The output selector; the operation's default when absent.
    pub select: Option<String>,
    /// Pagination flags, ignored by operations that do not paginate.
    pub paging: PagingOptions,
    /// Skip the confirmation of mutating operations.
    pub force:  bool,
}

/// A validated command, ready to run.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// The operation.
    pub operation: &'static OperationSpec,
    /// The bound parameters.
    pub params:    BoundParams,
    /// The request of the first page.
    pub request:   Request,
    /// What the command prints.
    pub selection: OutputSelection,
    /// Pagination flags.
    pub paging:    PagingOptions,
    /// Whether confirmation is skipped.
    pub force:     bool,
}

/// What a command produced.
#[derive(Debug)]
pub struct CommandOutput {
    /// The projected output; `None` when there is nothing to print.
    pub value:       Option<Value>,
    /// The marker of the next page, for resuming manual paging.
    pub next_marker: Option<String>,
    /// Whether a page failure cut the results short.
    pub truncated:   bool,
    /// The failure of the service call, if any.
    pub error:       Option<LambctlError>,
}

impl Invocation {
    /// Binds the raw values, builds the request and resolves the output
    /// selector. Nothing is sent; every validation error surfaces here.
    pub fn new<I, S>(
        operation: &'static OperationSpec,
        raw: I,
        options: InvocationOptions,
    ) -> std::result::Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: AsRef<str>,
    {
        let params = bind(operation, raw)?;
        let request = build_request(operation, &params)?;
        let selection = OutputSelection::resolve(operation, options.select.as_deref())?;
        Ok(Invocation {
            operation,
            params,
            request,
            selection,
            paging: options.paging,
            force: options.force,
        })
    }

    /// The value of the parameter naming the resource acted upon.
    pub fn target(&self) -> Option<String> {
        self.operation
            .target_param()
            .and_then(|p| self.params.get(p.name))
            .and_then(|v| v.to_text())
    }

    /// Returns true if the command has to be confirmed before it runs.
    pub fn needs_confirmation(&self, threshold: ConfirmImpact) -> bool {
        schema::needs_confirmation(self.operation.impact, threshold, self.force)
    }

    /// Tells a caller paging by hand how to request the next page. `None`
    /// when the pages were followed automatically or this was the last one.
    pub fn next_page_hint(&self, output: &CommandOutput) -> Option<String> {
        if !self.paging.is_manual() {
            return None;
        }
        output.next_marker.as_ref().map(|marker| {
            format!(
                "More results are available; pass --marker {} to fetch the next page.",
                marker
            )
        })
    }

    /// Runs the command. Failures of the service call are reported in the
    /// output rather than returned.
    pub async fn execute(
        &self,
        service: &dyn LambdaService,
        cancel: &CancellationToken,
    ) -> CommandOutput {
        match self.fetch(service, cancel).await {
            Ok((response, next_marker, truncated)) => CommandOutput {
                value: self.selection.project(&response, &self.params),
                next_marker,
                truncated,
                error: None,
            },
            Err(e) => CommandOutput {
                value:       None,
                next_marker: None,
                truncated:   false,
                error:       Some(e),
            },
        }
    }

    async fn fetch(
        &self,
        service: &dyn LambdaService,
        cancel: &CancellationToken,
    ) -> Result<(Value, Option<String>, bool)> {
        let spec = match &self.operation.paging {
            Some(spec) => spec,
            None => {
                let response = service
                    .send(self.operation, self.request.clone(), cancel)
                    .await?;
                return Ok((response, None, false));
            }
        };

        let result = paginate(spec, &self.paging, |page| {
            let mut request = self.request.clone();
            match page.marker {
                Some(marker) => request.set_query(spec.marker_key, marker),
                None => request.remove_query(spec.marker_key),
            }
            match page.page_size {
                Some(size) => request.set_query(spec.page_size_key, size.to_string()),
                None => request.remove_query(spec.page_size_key),
            }
            service.send(self.operation, request, cancel)
        })
        .await?;

        Ok((result.response, result.next_marker, result.truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::request::Body;
    use crate::schema::find_operation;
    use crate::test_util::MockLambdaService;
    use serde_json::json;

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, Vec<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), vec![v.to_string()]))
            .collect()
    }

    fn functions(names: &[&str], next: Option<&str>) -> Result<Value> {
        let functions: Vec<Value> = names
            .iter()
            .map(|n| json!({ "FunctionName": n }))
            .collect();
        let mut page = json!({ "Functions": functions });
        if let Some(next) = next {
            page["NextMarker"] = json!(next);
        }
        Ok(page)
    }

    #[tokio::test]
    async fn lists_every_page_of_functions() {
        let op = find_operation("list-functions").unwrap();
        let invocation = Invocation::new(op, raw(&[]), InvocationOptions::default()).unwrap();
        let mock = MockLambdaService::new().with_responses(vec![
            functions(&["a", "b"], Some("m1")),
            functions(&["c"], None),
        ]);

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert!(output.error.is_none());
        assert_eq!(
            output.value,
            Some(json!([
                { "FunctionName": "a" },
                { "FunctionName": "b" },
                { "FunctionName": "c" }
            ]))
        );

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].request.uri(), "/2015-03-31/functions/");
        assert_eq!(
            requests[1].request.uri(),
            "/2015-03-31/functions/?Marker=m1"
        );
    }

    #[tokio::test]
    async fn an_item_budget_is_sent_as_max_items() {
        let op = find_operation("ListFunctions").unwrap();
        let options = InvocationOptions {
            paging: PagingOptions {
                max_items: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let invocation = Invocation::new(op, raw(&[]), options).unwrap();
        let mock = MockLambdaService::new()
            .with_responses(vec![functions(&["a", "b", "c", "d", "e"], Some("m1"))]);

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert_eq!(output.value.unwrap().as_array().unwrap().len(), 5);
        assert_eq!(output.next_marker.as_deref(), Some("m1"));

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].request.query_value("MaxItems"), Some("5"));
    }

    #[tokio::test]
    async fn a_starting_marker_fetches_one_page() {
        let op = find_operation("ListAliases").unwrap();
        let options = InvocationOptions {
            select: Some("*".to_string()),
            paging: PagingOptions {
                marker: Some("m7".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let invocation = Invocation::new(op, raw(&[("FunctionName", "f")]), options).unwrap();
        let mock = MockLambdaService::new().with_responses(vec![
            Ok(json!({ "Aliases": [{ "Name": "live" }], "NextMarker": "m8" })),
            Ok(json!({ "Aliases": [{ "Name": "beta" }] })),
        ]);

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert_eq!(mock.calls().await, 1);
        assert_eq!(output.next_marker.as_deref(), Some("m8"));
        assert_eq!(
            output.value,
            Some(json!({ "Aliases": [{ "Name": "live" }], "NextMarker": "m8" }))
        );
        assert_eq!(
            invocation.next_page_hint(&output).as_deref(),
            Some("More results are available; pass --marker m8 to fetch the next page.")
        );
    }

    #[tokio::test]
    async fn manual_paging_reports_the_marker_even_when_it_is_not_selected() {
        let op = find_operation("ListFunctions").unwrap();
        let options = InvocationOptions {
            paging: PagingOptions {
                no_auto_iteration: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let invocation = Invocation::new(op, raw(&[]), options).unwrap();
        let mock = MockLambdaService::new().with_response(Ok(
            json!({ "Functions": [{ "FunctionName": "a" }], "NextMarker": "m1" }),
        ));

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert_eq!(output.value, Some(json!([{ "FunctionName": "a" }])));
        let hint = invocation.next_page_hint(&output).unwrap();
        assert!(hint.contains("--marker m1"));

        let last = CommandOutput {
            value:       None,
            next_marker: None,
            truncated:   false,
            error:       None,
        };
        assert_eq!(invocation.next_page_hint(&last), None);
    }

    #[tokio::test]
    async fn automatic_paging_gives_no_hint() {
        let op = find_operation("ListFunctions").unwrap();
        let invocation = Invocation::new(op, raw(&[]), InvocationOptions::default()).unwrap();
        let output = CommandOutput {
            value:       None,
            next_marker: Some("m1".to_string()),
            truncated:   false,
            error:       None,
        };
        assert_eq!(invocation.next_page_hint(&output), None);
    }

    #[tokio::test]
    async fn validation_fails_before_any_call() {
        let op = find_operation("CheckpointDurableExecution").unwrap();
        let err = Invocation::new(
            op,
            raw(&[("DurableExecutionArn", "arn")]),
            InvocationOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequired {
                operation: "CheckpointDurableExecution".to_string(),
                param:     "CheckpointToken".to_string(),
            }
        );

        let err = Invocation::new(
            op,
            raw(&[("DurableExecutionArn", "arn"), ("CheckpointToken", "t")]),
            InvocationOptions {
                select: Some("Events".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSelector { .. }));
    }

    #[tokio::test]
    async fn service_errors_are_captured_in_the_output() {
        let op = find_operation("GetFunction").unwrap();
        let invocation = Invocation::new(
            op,
            raw(&[("FunctionName", "missing")]),
            InvocationOptions::default(),
        )
        .unwrap();
        let mock = MockLambdaService::new().with_response(Err(ServiceError {
            code:       "ResourceNotFoundException".to_string(),
            message:    "Function not found".to_string(),
            status:     404,
            request_id: None,
        }
        .into()));

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert!(output.value.is_none());
        assert!(matches!(output.error, Some(LambctlError::Service(_))));
    }

    #[tokio::test]
    async fn echo_selection_prints_the_bound_input() {
        let op = find_operation("DeleteFunction").unwrap();
        let invocation = Invocation::new(
            op,
            raw(&[("FunctionName", "old-function")]),
            InvocationOptions {
                select: Some("^FunctionName".to_string()),
                force: true,
                ..Default::default()
            },
        )
        .unwrap();
        let mock = MockLambdaService::new();

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert_eq!(output.value, Some(json!("old-function")));
        assert_eq!(mock.calls().await, 1);
        assert_eq!(
            mock.requests().await[0].request.method,
            crate::schema::Method::Delete
        );
    }

    #[tokio::test]
    async fn checkpoint_sends_token_and_updates() {
        let op = find_operation("CheckpointDurableExecution").unwrap();
        let invocation = Invocation::new(
            op,
            vec![
                ("DurableExecutionArn".to_string(), vec!["arn:exec".to_string()]),
                ("CheckpointToken".to_string(), vec!["token-1".to_string()]),
                (
                    "Update".to_string(),
                    vec![r#"[{"Id":"step-1","Type":"STEP","Action":"SUCCEED"}]"#.to_string()],
                ),
            ],
            InvocationOptions {
                select: Some("CheckpointToken".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let mock = MockLambdaService::new()
            .with_response(Ok(json!({ "CheckpointToken": "token-2" })));

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert_eq!(output.value, Some(json!("token-2")));

        let sent = &mock.requests().await[0].request;
        assert_eq!(
            sent.path,
            "/2025-12-01/durable-executions/arn%3Aexec/checkpoint"
        );
        assert_eq!(
            sent.body,
            Body::Json(json!({
                "CheckpointToken": "token-1",
                "Updates": [{ "Id": "step-1", "Type": "STEP", "Action": "SUCCEED" }]
            }))
        );
    }

    #[tokio::test]
    async fn history_forwards_the_limit_as_page_size() {
        let op = find_operation("GetDurableExecutionHistory").unwrap();
        let options = InvocationOptions {
            paging: PagingOptions {
                max_items: Some(100),
                ..Default::default()
            },
            ..Default::default()
        };
        let invocation = Invocation::new(
            op,
            raw(&[("DurableExecutionArn", "arn"), ("IncludeExecutionData", "true")]),
            options,
        )
        .unwrap();
        let mock = MockLambdaService::new().with_responses(vec![
            Ok(json!({ "Events": [{ "EventId": 1 }], "NextMarker": "e1" })),
            Ok(json!({ "Events": [{ "EventId": 2 }] })),
        ]);

        let output = invocation.execute(&mock, &CancellationToken::new()).await;
        assert_eq!(
            output.value,
            Some(json!([{ "EventId": 1 }, { "EventId": 2 }]))
        );
        let requests = mock.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].request.uri(),
            "/2025-12-01/durable-executions/arn/history?IncludeExecutionData=true&Marker=e1&MaxItems=100"
        );
    }

    #[tokio::test]
    async fn cancellation_is_reported() {
        let op = find_operation("GetAccountSettings").unwrap();
        let invocation = Invocation::new(op, raw(&[]), InvocationOptions::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let output = invocation
            .execute(&MockLambdaService::new(), &cancel)
            .await;
        assert!(matches!(output.error, Some(LambctlError::Cancelled)));
    }

    #[test]
    fn confirmation_and_target_follow_the_operation() {
        let op = find_operation("DeleteAlias").unwrap();
        let invocation = Invocation::new(
            op,
            raw(&[("FunctionName", "f"), ("Name", "live")]),
            InvocationOptions::default(),
        )
        .unwrap();
        assert_eq!(invocation.target().as_deref(), Some("live"));
        assert!(invocation.needs_confirmation(ConfirmImpact::High));

        let op = find_operation("GetAlias").unwrap();
        let invocation = Invocation::new(
            op,
            raw(&[("FunctionName", "f"), ("Name", "live")]),
            InvocationOptions::default(),
        )
        .unwrap();
        assert!(!invocation.needs_confirmation(ConfirmImpact::Low));
    }
}
