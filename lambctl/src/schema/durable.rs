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

//! Durable execution operations.
//!
//! A durable execution is a checkpointed workflow run by the Lambda service.
//! State-mutating calls consume a single-use checkpoint token and return the
//! next one; ordering and token validation happen on the service side. These
//! operations live under the `2025-12-01` API version.

use super::ParamKind::*;
use super::*;

const EXECUTION_ARN: ParamSpec = ParamSpec::path(
    "DurableExecutionArn",
    "durable-execution-arn",
    "The ARN of the durable execution",
);

const CALLBACK_ID: ParamSpec = ParamSpec::path(
    "CallbackId",
    "callback-id",
    "The identifier of the callback the execution is waiting on",
);

const PAGING: PagingSpec = PagingSpec {
    marker_key:        "Marker",
    page_size_key:     "MaxItems",
    next_marker_field: "NextMarker",
    items_field:       "",
    server_max:        1000,
    legacy_budget:     false,
};

const ERROR_TYPE: ParamSpec = ParamSpec::body(
    "Error_ErrorType",
    "error-type",
    String,
    &["Error", "ErrorType"],
    "The type of the error",
);

const ERROR_MESSAGE: ParamSpec = ParamSpec::body(
    "Error_ErrorMessage",
    "error-message",
    String,
    &["Error", "ErrorMessage"],
    "The error message",
);

const ERROR_DATA: ParamSpec = ParamSpec::body(
    "Error_ErrorData",
    "error-data",
    String,
    &["Error", "ErrorData"],
    "Machine readable data attached to the error",
);

const ERROR_STACK_TRACE: ParamSpec = ParamSpec::body(
    "Error_StackTrace",
    "stack-trace",
    StringList,
    &["Error", "StackTrace"],
    "One frame of the stack trace; repeat for each frame",
);

pub(super) static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name:            "CheckpointDurableExecution",
        command:         "checkpoint-durable-execution",
        about:           "Records operation updates of a durable execution",
        method:          Method::Post,
        path:            "/2025-12-01/durable-executions/{DurableExecutionArn}/checkpoint",
        params:          &[
            EXECUTION_ARN,
            ParamSpec::body(
                "CheckpointToken",
                "checkpoint-token",
                String,
                &["CheckpointToken"],
                "The token received from the previous checkpoint or invocation",
            )
            .required(),
            ParamSpec::body(
                "Update",
                "updates",
                Json,
                &["Updates"],
                "The operation updates as a JSON array",
            ),
            ParamSpec::body(
                "ClientToken",
                "client-token",
                String,
                &["ClientToken"],
                "An idempotency token for the request",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["CheckpointToken", "NewExecutionState"],
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "GetDurableExecution",
        command:         "get-durable-execution",
        about:           "Returns the status, input and result of a durable execution",
        method:          Method::Get,
        path:            "/2025-12-01/durable-executions/{DurableExecutionArn}",
        params:          &[EXECUTION_ARN],
        response:        ResponseShape::JSON,
        response_fields: &[
            "DurableExecutionArn",
            "DurableExecutionName",
            "FunctionArn",
            "InputPayload",
            "Result",
            "Error",
            "StartTimestamp",
            "Status",
            "EndTimestamp",
            "Version",
        ],
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "GetDurableExecutionHistory",
        command:         "get-durable-execution-history",
        about:           "Returns the events recorded for a durable execution",
        method:          Method::Get,
        path:            "/2025-12-01/durable-executions/{DurableExecutionArn}/history",
        params:          &[
            EXECUTION_ARN,
            ParamSpec::query(
                "IncludeExecutionData",
                "include-execution-data",
                Boolean,
                "Include the inputs and results of each operation",
            ),
            ParamSpec::query(
                "ReverseOrder",
                "reverse-order",
                Boolean,
                "Return the newest events first",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["Events", "NextMarker"],
        default_select:  "Events",
        impact:          ConfirmImpact::None,
        paging:          Some(PagingSpec {
            items_field: "Events",
            ..PAGING
        }),
    },
    OperationSpec {
        name:            "GetDurableExecutionState",
        command:         "get-durable-execution-state",
        about:           "Returns the operations of a durable execution at a checkpoint",
        method:          Method::Get,
        path:            "/2025-12-01/durable-executions/{DurableExecutionArn}/state",
        params:          &[
            EXECUTION_ARN,
            ParamSpec::query(
                "CheckpointToken",
                "checkpoint-token",
                String,
                "The checkpoint token the state is read at",
            )
            .required(),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["Operations", "NextMarker"],
        default_select:  "Operations",
        impact:          ConfirmImpact::None,
        paging:          Some(PagingSpec {
            items_field: "Operations",
            ..PAGING
        }),
    },
    OperationSpec {
        name:            "ListDurableExecutionsByFunction",
        command:         "list-durable-executions-by-function",
        about:           "Returns the durable executions of a function",
        method:          Method::Get,
        path:            "/2025-12-01/functions/{FunctionName}/durable-executions",
        params:          &[
            ParamSpec::path(
                "FunctionName",
                "function-name",
                "The name, ARN or partial ARN of the Lambda function",
            ),
            ParamSpec::query(
                "Qualifier",
                "qualifier",
                String,
                "A version number or alias name",
            ),
            ParamSpec::query(
                "DurableExecutionName",
                "durable-execution-name",
                String,
                "Only list executions with this name",
            ),
            ParamSpec::query_as(
                "Status",
                "status",
                StringList,
                "Statuses",
                "Only list executions in this status; repeat for several",
            ),
            ParamSpec::query(
                "StartedAfter",
                "started-after",
                String,
                "Only list executions started after this ISO-8601 time",
            ),
            ParamSpec::query(
                "StartedBefore",
                "started-before",
                String,
                "Only list executions started before this ISO-8601 time",
            ),
            ParamSpec::query(
                "ReverseOrder",
                "reverse-order",
                Boolean,
                "Return the newest executions first",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["DurableExecutions", "NextMarker"],
        default_select:  "DurableExecutions",
        impact:          ConfirmImpact::None,
        paging:          Some(PagingSpec {
            items_field: "DurableExecutions",
            ..PAGING
        }),
    },
    OperationSpec {
        name:            "StopDurableExecution",
        command:         "stop-durable-execution",
        about:           "Stops a running durable execution",
        method:          Method::Post,
        path:            "/2025-12-01/durable-executions/{DurableExecutionArn}/stop",
        params:          &[
            EXECUTION_ARN,
            ERROR_TYPE,
            ERROR_MESSAGE,
            ERROR_DATA,
            ERROR_STACK_TRACE,
        ],
        response:        ResponseShape::JSON,
        response_fields: &["StopTimestamp"],
        default_select:  "*",
        impact:          ConfirmImpact::High,
        paging:          None,
    },
    OperationSpec {
        name:            "SendDurableExecutionCallbackSuccess",
        command:         "send-durable-execution-callback-success",
        about:           "Completes a pending callback with a result",
        method:          Method::Post,
        path:            "/2025-12-01/durable-execution-callbacks/{CallbackId}/succeed",
        params:          &[
            CALLBACK_ID,
            ParamSpec::payload(
                "Result",
                "result",
                "The callback result, literal or fileb://PATH",
            ),
        ],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "SendDurableExecutionCallbackFailure",
        command:         "send-durable-execution-callback-failure",
        about:           "Fails a pending callback with an error object",
        method:          Method::Post,
        path:            "/2025-12-01/durable-execution-callbacks/{CallbackId}/fail",
        params:          &[
            CALLBACK_ID,
            ERROR_TYPE,
            ERROR_MESSAGE,
            ERROR_DATA,
            ERROR_STACK_TRACE,
        ],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "SendDurableExecutionCallbackHeartbeat",
        command:         "send-durable-execution-callback-heartbeat",
        about:           "Tells the service a pending callback is still being worked on",
        method:          Method::Post,
        path:            "/2025-12-01/durable-execution-callbacks/{CallbackId}/heartbeat",
        params:          &[CALLBACK_ID],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::Low,
        paging:          None,
    },
];
