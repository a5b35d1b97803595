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

//! Versions and aliases.
//!
//! An alias points at one version and may shift a share of the traffic to a
//! second version through its routing configuration.

use super::functions::CONFIGURATION_FIELDS;
use super::ParamKind::*;
use super::*;

const FUNCTION_NAME: ParamSpec = ParamSpec::path(
    "FunctionName",
    "function-name",
    "The name, ARN or partial ARN of the Lambda function",
);

const ALIAS_NAME: ParamSpec = ParamSpec::path("Name", "name", "The name of the alias");

const ALIAS_FIELDS: &[&str] = &[
    "AliasArn",
    "Name",
    "FunctionVersion",
    "Description",
    "RoutingConfig",
    "RevisionId",
];

const ROUTING_WEIGHTS: ParamSpec = ParamSpec::body(
    "RoutingConfig_AdditionalVersionWeight",
    "routing-config-additional-version-weight",
    DoubleMap,
    &["RoutingConfig", "AdditionalVersionWeights"],
    "A second version and the share of traffic it receives, as VERSION=WEIGHT",
);

const PAGING: PagingSpec = PagingSpec {
    marker_key:        "Marker",
    page_size_key:     "MaxItems",
    next_marker_field: "NextMarker",
    items_field:       "",
    server_max:        50,
    legacy_budget:     true,
};

pub(super) static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name:            "PublishVersion",
        command:         "publish-version",
        about:           "Creates a version from the current code and configuration",
        method:          Method::Post,
        path:            "/2015-03-31/functions/{FunctionName}/versions",
        params:          &[
            FUNCTION_NAME,
            ParamSpec::body(
                "CodeSha256",
                "code-sha256",
                String,
                &["CodeSha256"],
                "Only publish if the code hash matches",
            ),
            ParamSpec::body(
                "Description",
                "description",
                String,
                &["Description"],
                "A description of the version",
            ),
            ParamSpec::body(
                "RevisionId",
                "revision-id",
                String,
                &["RevisionId"],
                "Only publish if the function's revision id matches",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: CONFIGURATION_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "ListVersionsByFunction",
        command:         "list-versions-by-function",
        about:           "Returns the versions of a function, 50 per call",
        method:          Method::Get,
        path:            "/2015-03-31/functions/{FunctionName}/versions",
        params:          &[FUNCTION_NAME],
        response:        ResponseShape::JSON,
        response_fields: &["Versions", "NextMarker"],
        default_select:  "Versions",
        impact:          ConfirmImpact::None,
        paging:          Some(PagingSpec {
            items_field: "Versions",
            ..PAGING
        }),
    },
    OperationSpec {
        name:            "CreateAlias",
        command:         "create-alias",
        about:           "Creates an alias for a function version",
        method:          Method::Post,
        path:            "/2015-03-31/functions/{FunctionName}/aliases",
        params:          &[
            FUNCTION_NAME,
            ParamSpec::body("Name", "name", String, &["Name"], "The name of the alias")
                .required(),
            ParamSpec::body(
                "FunctionVersion",
                "function-version",
                String,
                &["FunctionVersion"],
                "The function version the alias invokes",
            )
            .required(),
            ParamSpec::body(
                "Description",
                "description",
                String,
                &["Description"],
                "A description of the alias",
            ),
            ROUTING_WEIGHTS,
        ],
        response:        ResponseShape::JSON,
        response_fields: ALIAS_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "GetAlias",
        command:         "get-alias",
        about:           "Returns the details of an alias",
        method:          Method::Get,
        path:            "/2015-03-31/functions/{FunctionName}/aliases/{Name}",
        params:          &[FUNCTION_NAME, ALIAS_NAME],
        response:        ResponseShape::JSON,
        response_fields: ALIAS_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "UpdateAlias",
        command:         "update-alias",
        about:           "Updates the version or routing configuration of an alias",
        method:          Method::Put,
        path:            "/2015-03-31/functions/{FunctionName}/aliases/{Name}",
        params:          &[
            FUNCTION_NAME,
            ALIAS_NAME,
            ParamSpec::body(
                "FunctionVersion",
                "function-version",
                String,
                &["FunctionVersion"],
                "The function version the alias invokes",
            ),
            ParamSpec::body(
                "Description",
                "description",
                String,
                &["Description"],
                "A description of the alias",
            ),
            ROUTING_WEIGHTS,
            ParamSpec::body(
                "RevisionId",
                "revision-id",
                String,
                &["RevisionId"],
                "Only update if the alias's revision id matches",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: ALIAS_FIELDS,
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "DeleteAlias",
        command:         "delete-alias",
        about:           "Deletes an alias",
        method:          Method::Delete,
        path:            "/2015-03-31/functions/{FunctionName}/aliases/{Name}",
        params:          &[FUNCTION_NAME, ALIAS_NAME],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::High,
        paging:          None,
    },
    OperationSpec {
        name:            "ListAliases",
        command:         "list-aliases",
        about:           "Returns the aliases of a function, 50 per call",
        method:          Method::Get,
        path:            "/2015-03-31/functions/{FunctionName}/aliases",
        params:          &[
            FUNCTION_NAME,
            ParamSpec::query(
                "FunctionVersion",
                "function-version",
                String,
                "Only list aliases that invoke this version",
            ),
        ],
        response:        ResponseShape::JSON,
        response_fields: &["Aliases", "NextMarker"],
        default_select:  "Aliases",
        impact:          ConfirmImpact::None,
        paging:          Some(PagingSpec {
            items_field: "Aliases",
            ..PAGING
        }),
    },
];
