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

//! Utility functions to make testing commands easier.

use crate::aws::LambdaService;
use crate::error::{LambctlError, Result};
use crate::request::Request;
use crate::schema::OperationSpec;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// A request received by the [`MockLambdaService`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// The operation name.
    pub operation: &'static str,
    /// The request as sent.
    pub request:   Request,
}

/// A scripted service client. It records every request and replays the
/// queued responses in order; once the queue is empty it answers `Null`.
#[derive(Default)]
pub struct MockLambdaService {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests:  Mutex<Vec<RecordedRequest>>,
}

impl MockLambdaService {
    /// Creates a mock without queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn with_response(mut self, response: Result<Value>) -> Self {
        self.responses.get_mut().push_back(response);
        self
    }

    /// Queues several responses.
    pub fn with_responses(self, responses: impl IntoIterator<Item = Result<Value>>) -> Self {
        responses
            .into_iter()
            .fold(self, |mock, response| mock.with_response(response))
    }

    /// Returns the requests received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Returns the number of requests received so far.
    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl LambdaService for MockLambdaService {
    async fn send(
        &self,
        operation: &OperationSpec,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        if cancel.is_cancelled() {
            return Err(LambctlError::Cancelled);
        }
        self.requests.lock().await.push(RecordedRequest {
            operation: operation.name,
            request,
        });
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
