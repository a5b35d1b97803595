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

use super::*;

const RESOURCE: ParamSpec = ParamSpec::path_as(
    "Resource",
    "resource",
    "ARN",
    "The ARN of the function or event source mapping",
);

pub(super) static OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        name:            "ListTags",
        command:         "list-tags",
        about:           "Returns the tags of a resource",
        method:          Method::Get,
        path:            "/2017-03-31/tags/{ARN}",
        params:          &[RESOURCE],
        response:        ResponseShape::JSON,
        response_fields: &["Tags"],
        default_select:  "Tags",
        impact:          ConfirmImpact::None,
        paging:          None,
    },
    OperationSpec {
        name:            "TagResource",
        command:         "tag-resource",
        about:           "Adds tags to a resource",
        method:          Method::Post,
        path:            "/2017-03-31/tags/{ARN}",
        params:          &[
            RESOURCE,
            ParamSpec::body(
                "Tag",
                "tag",
                ParamKind::StringMap,
                &["Tags"],
                "A tag as KEY=VALUE",
            )
            .required(),
        ],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::Medium,
        paging:          None,
    },
    OperationSpec {
        name:            "UntagResource",
        command:         "untag-resource",
        about:           "Removes tags from a resource",
        method:          Method::Delete,
        path:            "/2017-03-31/tags/{ARN}",
        params:          &[
            RESOURCE,
            ParamSpec::query_as(
                "TagKey",
                "tag-key",
                ParamKind::StringList,
                "tagKeys",
                "The key of a tag to remove",
            )
            .required(),
        ],
        response:        ResponseShape::EMPTY,
        response_fields: &[],
        default_select:  "*",
        impact:          ConfirmImpact::High,
        paging:          None,
    },
];
