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

//! The transport seam between commands and the Lambda service.

use crate::error::Result;
use crate::request::Request;
use crate::schema::OperationSpec;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Sends built requests to the Lambda service.
///
/// Implementations abstract the transport, so commands run the same against
/// the signed HTTPS client and the scripted mock used in tests.
#[async_trait]
pub trait LambdaService: Send + Sync {
    /// Sends one request of the operation.
    ///
    /// # Arguments
    /// * `operation` - The operation the request belongs to. Its response
    ///   shape decides how the HTTP response becomes a document.
    /// * `request` - The request, relative to the service endpoint.
    /// * `cancel` - Aborts the in-flight call when cancelled.
    ///
    /// # Returns
    /// The response document, `Value::Null` when the response has no fields.
    async fn send(
        &self,
        operation: &OperationSpec,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Value>;
}

/// A shared service client.
pub type SharedLambdaService = Arc<dyn LambdaService>;
