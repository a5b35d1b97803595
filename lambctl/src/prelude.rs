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

//! A "prelude" for users of the lambctl crate.
//!
//! Like the standard library's prelude, this module simplifies importing of
//! common items. Unlike the standard prelude, the contents of this module must
//! be imported manually:
//!
//! ```
//! use lambctl::prelude::*;
//! ```

pub use crate::aws::{
    LambdaClientConfig, LambdaService, SharedLambdaService, SignedLambdaClient,
};
pub use crate::binder::{BoundParams, ParamValue};
pub use crate::command::{CommandOutput, Invocation, InvocationOptions};
pub use crate::config::{Settings, LAMBCTL_CONF};
pub use crate::error::{LambctlError, Result, ServiceError, ValidationError};
pub use crate::output::OutputSelection;
pub use crate::paginator::{PagingOptions, PartialFailurePolicy};
pub use crate::request::{Body, Request};
pub use crate::schema::{find_operation, operations, ConfirmImpact, OperationSpec, ParamKind};
pub use tokio_util::sync::CancellationToken;
