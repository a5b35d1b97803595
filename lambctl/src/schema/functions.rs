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

//! Function lifecycle operations.

use super::ParamKind::*;
use super::*;

const FUNCTION_NAME: ParamSpec = ParamSpec::path(
    "FunctionName",
    "function-name",
    "The name, ARN or partial ARN of the Lambda function",
);

const QUALIFIER: ParamSpec = ParamSpec::query(
    "Qualifier",
    "qualifier",
    String,
    "A version number or alias name",
);

/// Fields of a `FunctionConfiguration` document.
pub(super) const CONFIGURATION_FIELDS: &[&str] = &[
    "FunctionName",
    "FunctionArn",
    "Runtime",
    "Role",
    "Handler",
    "CodeSize",
    "Description",
    "Timeout",
    "MemorySize",
    "LastModified",
    "CodeSha256",
    "Version",
    "VpcConfig",
    "DeadLetterConfig",
    "Environment",
    "KMSKeyArn",
    "TracingConfig",
    "MasterArn",
    "RevisionId",
    "Layers",
    "State",
    "StateReason",
    "StateReasonCode",
    "LastUpdateStatus",
    "LastUpdateStatusReason",
    "LastUpdateStatusReasonCode",
    "PackageType",
    "ImageConfigResponse",
    "Architectures",
    "EphemeralStorage",
    "DurableConfig",
];

pub(super) static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name:            "ListFunctions",
        command:         "list-functions",
        about:           "Returns the Lambda functions of the account, 50 per call",
        method:          Method::Get,
        path:            "/2015-03-31/functions/",
        params:          &[
            ParamSpec::query(
                "MasterRegion",
                "master-region",
                String,
                "For Lambda@Edge functions, the Region of the master function",
            ),
            ParamSpec::query(
                "FunctionVersion",
                "function-version",
                String,
                "Set to ALL to include every published version of each function",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["Functions", "NextMarker"],
        default_select:  "Functions",
        impact:          ConfirmImpact::None,
        paging:          Some(PagingSpec {
            marker_key:        "Marker",
            page_size_key:     "MaxItems",
            next_marker_field: "NextMarker",
            items_field:       "Functions",
            server_max:        50,
            legacy_budget:     true,
        }),
    },
    OperationSpec {
        name:            "GetFunction",
        command:         "get-function",
        about:           "Returns the function's configuration, code location and tags",
        method:          Method::Get,
        path:            "/2015-03-31/functions/{FunctionName}",
        params:          &[FUNCTION_NAME, QUALIFIER],
        response:        ResponseShape::JSON,
        response_fields: &["Configuration", "Code", "Tags", "TagsError", "Concurrency"],
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "GetFunctionConfiguration",
        command:         "get-function-configuration",
        about:           "Returns the version-specific settings of a function",
        method:          Method::Get,
        path:            "/2015-03-31/functions/{FunctionName}/configuration",
        params:          &[FUNCTION_NAME, QUALIFIER],
        response:        ResponseShape::JSON,
        response_fields: CONFIGURATION_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "DeleteFunction",
        command:         "delete-function",
        about:           "Deletes a function, or one version of it when a qualifier is given",
        method:          Method::Delete,
        path:            "/2015-03-31/functions/{FunctionName}",
        params:          &[FUNCTION_NAME, QUALIFIER],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::High,
        paging:          None,
    },
    OperationSpec {
        name:            "UpdateFunctionCode",
        command:         "update-function-code",
        about:           "Updates the code of an unpublished function",
        method:          Method::Put,
        path:            "/2015-03-31/functions/{FunctionName}/code",
        params:          &[
            FUNCTION_NAME,
            ParamSpec::body(
                "ZipFile",
                "zip-file",
                Blob,
                &["ZipFile"],
                "The deployment package, usually fileb://function.zip",
            ),
            ParamSpec::body(
                "S3Bucket",
                "s3-bucket",
                String,
                &["S3Bucket"],
                "The S3 bucket holding the deployment package",
            ),
            ParamSpec::body(
                "S3Key",
                "s3-key",
                String,
                &["S3Key"],
                "The S3 key of the deployment package",
            ),
            ParamSpec::body(
                "S3ObjectVersion",
                "s3-object-version",
                String,
                &["S3ObjectVersion"],
                "The S3 object version of the deployment package",
            ),
            ParamSpec::body(
                "ImageUri",
                "image-uri",
                String,
                &["ImageUri"],
                "The URI of a container image",
            ),
            ParamSpec::body(
                "Architecture",
                "architecture",
                StringList,
                &["Architectures"],
                "The instruction set architecture, x86_64 or arm64",
            ),
            ParamSpec::body(
                "Publish",
                "publish",
                Boolean,
                &["Publish"],
                "Publish a new version after updating the code",
            ),
            ParamSpec::body(
                "DryRun",
                "dry-run",
                Boolean,
                &["DryRun"],
                "Validate the request without updating the code",
            ),
            ParamSpec::body(
                "RevisionId",
                "revision-id",
                String,
                &["RevisionId"],
                "Only update if the function's revision id matches",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: CONFIGURATION_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "UpdateFunctionConfiguration",
        command:         "update-function-configuration",
        about:           "Modifies the version-specific settings of a function",
        method:          Method::Put,
        path:            "/2015-03-31/functions/{FunctionName}/configuration",
        params:          &[
            FUNCTION_NAME,
            ParamSpec::body(
                "Role",
                "role",
                String,
                &["Role"],
                "The ARN of the execution role",
            ),
            ParamSpec::body(
                "Handler",
                "handler",
                String,
                &["Handler"],
                "The method the runtime calls to run the function",
            ),
            ParamSpec::body(
                "Description",
                "description",
                String,
                &["Description"],
                "A description of the function",
            ),
            ParamSpec::body(
                "Timeout",
                "timeout",
                Integer,
                &["Timeout"],
                "The run time limit in seconds",
            ),
            ParamSpec::body(
                "MemorySize",
                "memory-size",
                Integer,
                &["MemorySize"],
                "The memory available to the function in MB",
            ),
            ParamSpec::body(
                "Runtime",
                "runtime",
                String,
                &["Runtime"],
                "The identifier of the function's runtime",
            ),
            ParamSpec::body(
                "Environment_Variable",
                "environment-variable",
                StringMap,
                &["Environment", "Variables"],
                "An environment variable as KEY=VALUE; pass '' to clear them all",
            ),
            ParamSpec::body(
                "DeadLetterConfig_TargetArn",
                "dead-letter-config-target-arn",
                String,
                &["DeadLetterConfig", "TargetArn"],
                "The ARN of the queue or topic receiving failed asynchronous events",
            ),
            ParamSpec::body(
                "TracingConfig_Mode",
                "tracing-config-mode",
                String,
                &["TracingConfig", "Mode"],
                "The X-Ray tracing mode, Active or PassThrough",
            ),
            ParamSpec::body(
                "KMSKeyArn",
                "kms-key-arn",
                String,
                &["KMSKeyArn"],
                "The KMS key used to encrypt environment variables",
            ),
            ParamSpec::body(
                "Layer",
                "layer",
                StringList,
                &["Layers"],
                "The ARN of a layer version to add to the execution environment",
            ),
            ParamSpec::body(
                "DurableConfig_ExecutionTimeout",
                "durable-config-execution-timeout",
                Integer,
                &["DurableConfig", "ExecutionTimeout"],
                "The run time limit of a durable execution in seconds",
            ),
            ParamSpec::body(
                "DurableConfig_RetentionPeriodInDays",
                "durable-config-retention-period-in-days",
                Integer,
                &["DurableConfig", "RetentionPeriodInDays"],
                "How long the history of a finished durable execution is kept",
            ),
            ParamSpec::body(
                "RevisionId",
                "revision-id",
                String,
                &["RevisionId"],
                "Only update if the function's revision id matches",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: CONFIGURATION_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "GetAccountSettings",
        command:         "get-account-settings",
        about:           "Returns the account's limits and usage in the current Region",
        method:          Method::Get,
        path:            "/2016-08-19/account-settings/",
        params:          &[],
        response:        ResponseShape::JSON,
        response_fields: &["AccountLimit", "AccountUsage"],
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
];
