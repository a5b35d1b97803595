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

//! Lambctl error types

use std::error;
use std::fmt::{Display, Formatter};
use std::io;
use std::result;

/// Result type for operations that could result in an [LambctlError]
pub type Result<T> = result::Result<T, LambctlError>;

/// Error reported by the Lambda service in an unsuccessful HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// The error code, e.g. `ResourceNotFoundException`.
    pub code:       String,
    /// The human readable message sent by the service.
    pub message:    String,
    /// The HTTP status code of the response.
    pub status:     u16,
    /// The request id, when the service returned one.
    pub request_id: Option<String>,
}

impl ServiceError {
    /// Returns true if the service asked the caller to slow down or failed on
    /// its side.
    pub fn is_retriable(&self) -> bool {
        self.status == 429
            || self.status >= 500
            || self.code == "TooManyRequestsException"
            || self.code == "ThrottlingException"
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.message)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " [request id: {}]", request_id)?;
        }
        Ok(())
    }
}

/// Local errors raised while binding parameters or constructing a request.
/// None of them ever reaches the network.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A parameter the operation cannot run without was not bound.
    MissingRequired {
        /// The operation name.
        operation: String,
        /// The parameter name.
        param:     String,
    },
    /// A parameter name that the operation does not declare.
    UnknownParameter {
        /// The operation name.
        operation: String,
        /// The parameter name.
        param:     String,
    },
    /// A raw value could not be parsed into the parameter's type.
    InvalidValue {
        /// The parameter name.
        param:  String,
        /// The rejected raw value.
        value:  String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A blob parameter pointed at a file that could not be read.
    UnreadableBlob {
        /// The parameter name.
        param:   String,
        /// The path given by the caller.
        path:    String,
        /// The I/O error message.
        message: String,
    },
    /// The output selector does not name anything the operation produces.
    InvalidSelector {
        /// The selector as given.
        selector: String,
        /// Why the selector was rejected.
        reason:   String,
    },
    /// The operation table binds a value type to a location that cannot
    /// carry it.
    UnsupportedBinding {
        /// The parameter name.
        param: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequired { operation, param } => {
                write!(f, "{} requires parameter '{}'", operation, param)
            }
            ValidationError::UnknownParameter { operation, param } => {
                write!(f, "{} has no parameter named '{}'", operation, param)
            }
            ValidationError::InvalidValue {
                param,
                value,
                reason,
            } => write!(
                f,
                "invalid value '{}' for parameter '{}': {}",
                value, param, reason
            ),
            ValidationError::UnreadableBlob {
                param,
                path,
                message,
            } => write!(
                f,
                "cannot read '{}' for parameter '{}': {}",
                path, param, message
            ),
            ValidationError::InvalidSelector { selector, reason } => {
                write!(f, "invalid output selector '{}': {}", selector, reason)
            }
            ValidationError::UnsupportedBinding { param } => write!(
                f,
                "parameter '{}' has a type that cannot be sent in its location",
                param
            ),
        }
    }
}

impl error::Error for ValidationError {}

/// Lambctl error
#[derive(Debug)]
pub enum LambctlError {
    /// Error raised before any network call was attempted.
    Validation(ValidationError),
    /// Error returned by the Lambda service.
    Service(ServiceError),
    /// The service endpoint host name could not be resolved.
    NameResolution {
        /// The endpoint the client tried to reach.
        endpoint: String,
        /// The underlying transport message.
        message:  String,
    },
    /// Error returned when the HTTP transport fails.
    Transport {
        /// The transport error message.
        message:   String,
        /// Whether the failure is worth another attempt.
        retriable: bool,
    },
    /// Error returned when loading credentials or signing a request fails.
    Credentials(String),
    /// Error returned when the configuration is not valid.
    Config(String),
    /// The command was interrupted before the call completed.
    Cancelled,
    /// Error associated to I/O operations and associated traits.
    IoError(io::Error),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error returned as a consequence of an error in Lambctl.
    /// This error should not happen in normal usage of Lambctl.
    Internal(String),
}

impl LambctlError {
    /// Returns true if the transport client may send the request again.
    pub fn is_retriable(&self) -> bool {
        match self {
            LambctlError::Service(e) => e.is_retriable(),
            LambctlError::Transport { retriable, .. } => *retriable,
            _ => false,
        }
    }
}

impl From<ValidationError> for LambctlError {
    fn from(e: ValidationError) -> Self {
        LambctlError::Validation(e)
    }
}

impl From<ServiceError> for LambctlError {
    fn from(e: ServiceError) -> Self {
        LambctlError::Service(e)
    }
}

impl From<io::Error> for LambctlError {
    fn from(e: io::Error) -> Self {
        LambctlError::IoError(e)
    }
}

impl From<serde_json::Error> for LambctlError {
    fn from(e: serde_json::Error) -> Self {
        LambctlError::SerdeJson(e)
    }
}

impl From<&str> for LambctlError {
    fn from(e: &str) -> Self {
        LambctlError::Internal(e.to_string())
    }
}

impl Display for LambctlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            LambctlError::Validation(ref desc) => write!(f, "Validation error: {}", desc),
            LambctlError::Service(ref desc) => write!(f, "Service error: {}", desc),
            LambctlError::NameResolution {
                ref endpoint,
                ref message,
            } => write!(
                f,
                "Name resolution failure attempting to reach service endpoint {}. The \
                    region may be incorrect, the endpoint may be mistyped, or the Lambda \
                    service may not be available in that region ({})",
                endpoint, message
            ),
            LambctlError::Transport { ref message, .. } => {
                write!(f, "Transport error: {}", message)
            }
            LambctlError::Credentials(ref desc) => write!(f, "Credentials error: {}", desc),
            LambctlError::Config(ref desc) => write!(f, "Configuration error: {}", desc),
            LambctlError::Cancelled => write!(f, "The command was cancelled"),
            LambctlError::IoError(ref desc) => write!(f, "IO error: {}", desc),
            LambctlError::SerdeJson(ref desc) => write!(f, "serde_json error: {:?}", desc),
            LambctlError::Internal(ref desc) => write!(
                f,
                "Internal error: {}. This was likely caused by a bug in Lambctl's \
                    code and we would welcome that you file an bug report in our issue tracker",
                desc
            ),
        }
    }
}

impl error::Error for LambctlError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LambctlError::Validation(e) => Some(e),
            LambctlError::IoError(e) => Some(e),
            LambctlError::SerdeJson(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_error(code: &str, status: u16) -> ServiceError {
        ServiceError {
            code: code.to_string(),
            message: "boom".to_string(),
            status,
            request_id: None,
        }
    }

    #[test]
    fn throttling_and_server_errors_are_retriable() {
        assert!(service_error("TooManyRequestsException", 429).is_retriable());
        assert!(service_error("ThrottlingException", 400).is_retriable());
        assert!(service_error("ServiceException", 500).is_retriable());
        assert!(!service_error("ResourceNotFoundException", 404).is_retriable());
        assert!(!service_error("InvalidParameterValueException", 400).is_retriable());
    }

    #[test]
    fn transport_retriability_is_carried() {
        let timeout = LambctlError::Transport {
            message:   "operation timed out".to_string(),
            retriable: true,
        };
        assert!(timeout.is_retriable());
        assert!(!LambctlError::Cancelled.is_retriable());
        assert!(!LambctlError::from(ValidationError::UnsupportedBinding {
            param: "Tags".to_string(),
        })
        .is_retriable());
    }

    #[test]
    fn service_error_display_includes_request_id() {
        let mut e = service_error("ResourceNotFoundException", 404);
        e.request_id = Some("abc-123".to_string());
        assert_eq!(
            LambctlError::from(e).to_string(),
            "Service error: ResourceNotFoundException (404): boom [request id: abc-123]"
        );
    }

    #[test]
    fn name_resolution_message_names_the_endpoint() {
        let e = LambctlError::NameResolution {
            endpoint: "https://lambda.xx-nowhere-1.amazonaws.com".to_string(),
            message:  "dns error".to_string(),
        };
        let text = e.to_string();
        assert!(text.contains("https://lambda.xx-nowhere-1.amazonaws.com"));
        assert!(text.starts_with("Name resolution failure"));
    }
}
