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

//! Translation of HTTP failures into lambctl errors.

use crate::error::{LambctlError, ServiceError};
use http::HeaderMap;
use serde::Deserialize;
use std::error::Error;

/// Messages of resolver failures across platforms.
const NAME_RESOLUTION_MESSAGES: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host is known",
    "temporary failure in name resolution",
];

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(rename = "Type", alias = "__type")]
    kind:    Option<String>,
    #[serde(rename = "message", alias = "Message")]
    message: Option<String>,
}

/// Reads the service error out of an unsuccessful response.
///
/// The code comes from the `x-amzn-ErrorType` header when present and from
/// the body's `__type` or `Type` member otherwise.
pub fn parse_service_error(status: u16, headers: &HeaderMap, body: &[u8]) -> ServiceError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let code = header("x-amzn-ErrorType")
        .map(|t| t.split(':').next().unwrap_or_default().to_string())
        .or_else(|| {
            parsed
                .kind
                .as_deref()
                .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
        })
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| format!("HttpStatus{}", status));
    let message = parsed.message.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body).trim().to_string();
        if text.is_empty() {
            format!("the service returned HTTP {}", status)
        } else {
            text
        }
    });

    ServiceError {
        code,
        message,
        status,
        request_id: header("x-amzn-RequestId"),
    }
}

/// Returns true if the error or one of its sources is a failure to resolve
/// a host name.
pub fn is_name_resolution_failure(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        let text = e.to_string().to_ascii_lowercase();
        if NAME_RESOLUTION_MESSAGES.iter().any(|m| text.contains(m)) {
            return true;
        }
        current = e.source();
    }
    false
}

/// Joins the messages of the error and all of its sources.
pub fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(e) = current {
        messages.push(e.to_string());
        current = e.source();
    }
    messages.join(": ")
}

/// Classifies a failed HTTP exchange. Name resolution failures are rewrapped
/// with the endpoint the client tried to reach; anything else is reported
/// as a transport error.
pub fn classify_transport_error(endpoint: &str, error: &reqwest::Error) -> LambctlError {
    if is_name_resolution_failure(error) {
        return LambctlError::NameResolution {
            endpoint: endpoint.to_string(),
            message:  error_chain(error),
        };
    }
    LambctlError::Transport {
        message:   error_chain(error),
        retriable: error.is_timeout() || error.is_connect(),
    }
}
