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

//! Static descriptions of the AWS Lambda API operations.
//!
//! Every command exposed by lambctl is one [`OperationSpec`]: the HTTP method
//! and path template of the REST operation, where each parameter travels
//! (path, query string, header, JSON body or raw body), how the response is
//! shaped, and whether the operation is paginated. The binder, the request
//! builder, the paginator and the CLI are all driven by these tables.

mod aliases;
mod concurrency;
mod durable;
mod functions;
mod invocation;
mod tags;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// HTTP methods used by the Lambda REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Returns true if requests with this method carry a body by default.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

/// The value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Plain text.
    String,
    /// A signed 64-bit integer.
    Integer,
    /// A switch; present means `true`.
    Boolean,
    /// A floating point number.
    Double,
    /// Binary data, given literally or as `fileb://PATH`.
    Blob,
    /// A list of strings; the flag may be repeated.
    StringList,
    /// A string to string map given as repeated `KEY=VALUE` pairs.
    StringMap,
    /// A string to number map given as repeated `KEY=NUMBER` pairs.
    DoubleMap,
    /// An arbitrary JSON document.
    Json,
}

impl ParamKind {
    /// Returns true if the flag can be given more than once.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            ParamKind::StringList | ParamKind::StringMap | ParamKind::DoubleMap
        )
    }
}

/// Where a bound parameter travels in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Substituted into the `{name}` placeholder of the path template.
    Path(&'static str),
    /// Appended to the query string under the given key.
    Query(&'static str),
    /// Sent as the given HTTP header.
    Header(&'static str),
    /// Written into the JSON body at the given object path. Intermediate
    /// objects are created only when a value is written beneath them.
    Body(&'static [&'static str]),
    /// Sent as the raw request body.
    Payload,
}

/// One parameter of an operation.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// The parameter name, e.g. `RoutingConfig_AdditionalVersionWeight`.
    pub name:     &'static str,
    /// The long command-line flag, without the leading dashes.
    pub flag:     &'static str,
    /// The value type.
    pub kind:     ParamKind,
    /// The request location.
    pub binding:  Binding,
    /// Whether the operation cannot run without it.
    pub required: bool,
    /// A one-line description for `--help`.
    pub help:     &'static str,
}

impl ParamSpec {
    /// A required path parameter whose placeholder has the parameter name.
    pub const fn path(name: &'static str, flag: &'static str, help: &'static str) -> Self {
        Self::path_as(name, flag, name, help)
    }

    /// A required path parameter bound to a differently named placeholder.
    pub const fn path_as(
        name: &'static str,
        flag: &'static str,
        placeholder: &'static str,
        help: &'static str,
    ) -> Self {
        ParamSpec {
            name,
            flag,
            kind: ParamKind::String,
            binding: Binding::Path(placeholder),
            required: true,
            help,
        }
    }

    /// An optional query parameter whose key is the parameter name.
    pub const fn query(
        name: &'static str,
        flag: &'static str,
        kind: ParamKind,
        help: &'static str,
    ) -> Self {
        Self::query_as(name, flag, kind, name, help)
    }

    /// An optional query parameter sent under a different key.
    pub const fn query_as(
        name: &'static str,
        flag: &'static str,
        kind: ParamKind,
        key: &'static str,
        help: &'static str,
    ) -> Self {
        ParamSpec {
            name,
            flag,
            kind,
            binding: Binding::Query(key),
            required: false,
            help,
        }
    }

    /// An optional string header.
    pub const fn header(
        name: &'static str,
        flag: &'static str,
        header: &'static str,
        help: &'static str,
    ) -> Self {
        ParamSpec {
            name,
            flag,
            kind: ParamKind::String,
            binding: Binding::Header(header),
            required: false,
            help,
        }
    }

    /// An optional member of the JSON body.
    pub const fn body(
        name: &'static str,
        flag: &'static str,
        kind: ParamKind,
        path: &'static [&'static str],
        help: &'static str,
    ) -> Self {
        ParamSpec {
            name,
            flag,
            kind,
            binding: Binding::Body(path),
            required: false,
            help,
        }
    }

    /// An optional raw request body.
    pub const fn payload(name: &'static str, flag: &'static str, help: &'static str) -> Self {
        ParamSpec {
            name,
            flag,
            kind: ParamKind::Blob,
            binding: Binding::Payload,
            required: false,
            help,
        }
    }

    /// Marks the parameter as required.
    pub const fn required(self) -> Self {
        ParamSpec {
            required: true,
            ..self
        }
    }
}

/// How the HTTP response body maps to the response document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// The body is a JSON object whose members are the response fields.
    Json,
    /// The body is raw bytes stored under the given field.
    Blob(&'static str),
    /// The body carries nothing of interest.
    Empty,
}

/// The shape of an operation's response document.
#[derive(Debug, Clone, Copy)]
pub struct ResponseShape {
    /// How the body is read.
    pub payload:      PayloadShape,
    /// Headers copied into the document as `(header, field)`.
    pub headers:      &'static [(&'static str, &'static str)],
    /// Field receiving the HTTP status code, if any.
    pub status_field: Option<&'static str>,
}

impl ResponseShape {
    /// A plain JSON response.
    pub const JSON: ResponseShape = ResponseShape {
        payload:      PayloadShape::Json,
        headers:      &[],
        status_field: None,
    };

    /// A response without any fields.
    pub const EMPTY: ResponseShape = ResponseShape {
        payload:      PayloadShape::Empty,
        headers:      &[],
        status_field: None,
    };
}

/// Describes how a list or history operation pages through its results.
#[derive(Debug, Clone, Copy)]
pub struct PagingSpec {
    /// Query key carrying the continuation marker.
    pub marker_key:        &'static str,
    /// Query key carrying the requested page size.
    pub page_size_key:     &'static str,
    /// Response field holding the next marker.
    pub next_marker_field: &'static str,
    /// Response field holding the page's items.
    pub items_field:       &'static str,
    /// The largest page the service returns.
    pub server_max:        u32,
    /// Whether the item limit is a budget across all pages rather than a
    /// page size.
    pub legacy_budget:     bool,
}

/// How disruptive an operation is, deciding when to ask for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfirmImpact {
    /// Read-only.
    None,
    /// Small, easily reverted changes.
    Low,
    /// Changes to configuration or state.
    Medium,
    /// Destructive changes.
    High,
}

impl FromStr for ConfirmImpact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ConfirmImpact::None),
            "low" => Ok(ConfirmImpact::Low),
            "medium" => Ok(ConfirmImpact::Medium),
            "high" => Ok(ConfirmImpact::High),
            other => Err(format!("unknown confirmation impact '{}'", other)),
        }
    }
}

impl Display for ConfirmImpact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfirmImpact::None => "none",
            ConfirmImpact::Low => "low",
            ConfirmImpact::Medium => "medium",
            ConfirmImpact::High => "high",
        };
        write!(f, "{}", name)
    }
}

/// Returns true if the caller has to confirm before the operation runs.
///
/// # Arguments
/// * `impact` - The operation's impact.
/// * `threshold` - Operations at or above this impact ask for confirmation.
/// * `force` - Skips the confirmation entirely.
pub fn needs_confirmation(impact: ConfirmImpact, threshold: ConfirmImpact, force: bool) -> bool {
    !force && impact != ConfirmImpact::None && impact >= threshold
}

/// One AWS Lambda API operation.
#[derive(Debug)]
pub struct OperationSpec {
    /// The API operation name, e.g. `ListFunctions`.
    pub name:            &'static str,
    /// The CLI subcommand name, e.g. `list-functions`.
    pub command:         &'static str,
    /// A one-line description for `--help`.
    pub about:           &'static str,
    /// The HTTP method.
    pub method:          Method,
    /// The path template, API version included.
    pub path:            &'static str,
    /// The parameters.
    pub params:          &'static [ParamSpec],
    /// The response shape.
    pub response:        ResponseShape,
    /// The fields a response document may contain.
    pub response_fields: &'static [&'static str],
    /// The output selector used when the caller gives none.
    pub default_select:  &'static str,
    /// The confirmation impact.
    pub impact:          ConfirmImpact,
    /// The pagination description of list and history operations.
    pub paging:          Option<PagingSpec>,
}

impl OperationSpec {
    /// Finds a parameter by name.
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns true if the operation declares the response field.
    pub fn has_response_field(&self, field: &str) -> bool {
        self.response_fields.iter().any(|f| *f == field)
    }

    /// The parameter naming the resource the operation acts upon, used in
    /// confirmation prompts. Paths nest from the parent to the child, so
    /// this is the path parameter whose placeholder comes last.
    pub fn target_param(&self) -> Option<&'static ParamSpec> {
        self.params
            .iter()
            .filter_map(|p| match p.binding {
                Binding::Path(placeholder) => self
                    .path
                    .find(&format!("{{{}}}", placeholder))
                    .map(|position| (position, p)),
                _ => None,
            })
            .max_by_key(|(position, _)| *position)
            .map(|(_, p)| p)
    }
}

/// Returns every operation lambctl knows about, in a stable order.
pub fn operations() -> Vec<&'static OperationSpec> {
    functions::OPERATIONS
        .iter()
        .chain(invocation::OPERATIONS.iter())
        .chain(concurrency::OPERATIONS.iter())
        .chain(aliases::OPERATIONS.iter())
        .chain(tags::OPERATIONS.iter())
        .chain(durable::OPERATIONS.iter())
        .collect()
}

/// Finds an operation by API name (`ListFunctions`) or subcommand name
/// (`list-functions`).
pub fn find_operation(name: &str) -> Option<&'static OperationSpec> {
    operations()
        .into_iter()
        .find(|op| op.name == name || op.command == name)
}
