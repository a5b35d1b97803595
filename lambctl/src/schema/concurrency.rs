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

//! Reserved concurrency.
//!
//! <https://docs.aws.amazon.com/lambda/latest/dg/configuration-concurrency.html>

use super::*;

const FUNCTION_NAME: ParamSpec = ParamSpec::path(
    "FunctionName",
    "function-name",
    "The name, ARN or partial ARN of the Lambda function",
);

pub(super) static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name:            "PutFunctionConcurrency",
        command:         "put-function-concurrency",
        about:           "Reserves concurrent executions for a function",
        method:          Method::Put,
        path:            "/2017-10-31/functions/{FunctionName}/concurrency",
        params:          &[
            FUNCTION_NAME,
            ParamSpec::body(
                "ReservedConcurrentExecution",
                "reserved-concurrent-execution",
                ParamKind::Integer,
                &["ReservedConcurrentExecutions"],
                "The number of simultaneous executions to reserve",
            )
            .required(),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["ReservedConcurrentExecutions"],
        default_select:  "ReservedConcurrentExecutions",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "GetFunctionConcurrency",
        command:         "get-function-concurrency",
        about:           "Returns the reserved concurrency of a function",
        method:          Method::Get,
        path:            "/2019-09-30/functions/{FunctionName}/concurrency",
        params:          &[FUNCTION_NAME],
        response:        ResponseShape::JSON,
        response_fields: &["ReservedConcurrentExecutions"],
        default_select:  "ReservedConcurrentExecutions",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "DeleteFunctionConcurrency",
        command:         "delete-function-concurrency",
        about:           "Removes the reserved concurrency of a function",
        method:          Method::Delete,
        path:            "/2017-10-31/functions/{FunctionName}/concurrency",
        params:          &[FUNCTION_NAME],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::High,
        paging:          None,
    },
];
