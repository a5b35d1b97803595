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

//! Synchronous and asynchronous invocation.

use super::ParamKind::*;
use super::*;

pub(super) static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name:            "Invoke",
        command:         "invoke",
        about:           "Invokes a function, synchronously by default",
        method:          Method::Post,
        path:            "/2015-03-31/functions/{FunctionName}/invocations",
        params:          &[
            ParamSpec::path(
                "FunctionName",
                "function-name",
                "The name, ARN or partial ARN of the Lambda function",
            ),
            ParamSpec::header(
                "InvocationType",
                "invocation-type",
                "X-Amz-Invocation-Type",
                "RequestResponse (default), Event or DryRun",
            ),
            ParamSpec::header(
                "LogType",
                "log-type",
                "X-Amz-Log-Type",
                "Set to Tail to include the execution log in the response",
            ),
            ParamSpec::header(
                "ClientContext",
                "client-context",
                "X-Amz-Client-Context",
                "Base64-encoded client context passed to the function",
            ),
            ParamSpec::header(
                "DurableExecutionName",
                "durable-execution-name",
                "X-Amz-Durable-Execution-Name",
                "The name of the durable execution started by this invocation",
            ),
            ParamSpec::query(
                "Qualifier",
                "qualifier",
                String,
                "A version number or alias name",
            ),
            ParamSpec::payload(
                "Payload",
                "payload",
                "The JSON input of the function, literal or fileb://PATH",
            ),
        ],
        response:        ResponseShape {
            payload:      PayloadShape::Blob("Payload"),
            headers:      &[
                ("X-Amz-Function-Error", "FunctionError"),
                ("X-Amz-Log-Result", "LogResult"),
                ("X-Amz-Executed-Version", "ExecutedVersion"),
                ("X-Amz-Durable-Execution-Arn", "DurableExecutionArn"),
            ],
            status_field: Some("StatusCode"),
        },
        response_fields: &[
            "StatusCode",
            "FunctionError",
            "LogResult",
            "Payload",
            "ExecutedVersion",
            "DurableExecutionArn",
        ],
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "InvokeAsync",
        command:         "invoke-async",
        about:           "Queues an event for a function (legacy asynchronous invocation)",
        method:          Method::Post,
        path:            "/2014-11-13/functions/{FunctionName}/invoke-async/",
        params:          &[
            ParamSpec::path(
                "FunctionName",
                "function-name",
                "The name, ARN or partial ARN of the Lambda function",
            ),
            ParamSpec::payload(
                "InvokeArgs",
                "invoke-args",
                "The JSON event of the function, literal or fileb://PATH",
            )
            .required(),
        ],
        response:        ResponseShape {
            payload:      PayloadShape::Empty,
            headers:      &[],
            status_field: Some("Status"),
        },
        response_fields: &["Status"],
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
];
