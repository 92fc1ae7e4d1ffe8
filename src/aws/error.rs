//! AWS error classification and handling
//!
//! Provides typed error categories for EC2 network operations using the
//! SDK's `.code()` metadata instead of string matching on Debug format.
//! Teardown uses `NotFound` to treat already-deleted resources as
//! success, and `DependencyViolation` to skip the main route table.

use aws_sdk_ec2::error::ProvideErrorMetadata;
use thiserror::Error;

/// AWS error categories for retry and teardown logic
#[derive(Debug, Clone, Error)]
pub enum AwsError {
    /// Resource was not found (treated as already-deleted in teardown)
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Resource still has dependents (e.g. deleting a main route table)
    #[error("Resource has dependent objects: {message}")]
    DependencyViolation { message: String },

    /// Rate limit exceeded (retryable with backoff, never surfaced)
    #[error("Rate limit exceeded")]
    Throttled,

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Check if this is a dependency violation
    pub fn is_dependency_violation(&self) -> bool {
        matches!(self, AwsError::DependencyViolation { .. })
    }

    /// Check if this is a transient error worth retrying
    pub fn is_throttled(&self) -> bool {
        matches!(self, AwsError::Throttled)
    }
}

/// Known EC2 error codes for "not found" conditions.
///
/// `Gateway.NotAttached` is included because detaching an already-detached
/// internet gateway is equivalent to the detach having succeeded.
const NOT_FOUND_CODES: &[&str] = &[
    "InvalidVpcID.NotFound",
    "InvalidSubnetID.NotFound",
    "InvalidRouteTableID.NotFound",
    "InvalidRoute.NotFound",
    "InvalidAssociationID.NotFound",
    "InvalidInternetGatewayID.NotFound",
    "InvalidAllocationID.NotFound",
    "InvalidAddress.NotFound",
    "NatGatewayNotFound",
    "Gateway.NotAttached",
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Known AWS error codes for dependency violations (resource still in use)
const DEPENDENCY_CODES: &[&str] = &["DependencyViolation"];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound { message },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if DEPENDENCY_CODES.contains(&c) => AwsError::DependencyViolation { message },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Wrap an EC2 SDK operation error into an `anyhow::Error` whose chain
/// carries the classified `AwsError`.
///
/// Every client call site maps its `SdkError` through this, so
/// `classify_anyhow_error` never has to downcast per-operation error
/// types further up the stack.
pub(crate) fn classify_sdk<E>(err: aws_sdk_ec2::error::SdkError<E>) -> anyhow::Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let class = classify_aws_error(err.code(), err.message());
    anyhow::Error::new(err).context(class)
}

/// Classify an error from an `anyhow::Error` chain.
///
/// Looks for an `AwsError` attached by the client layer; falls back to
/// extracting a known error code from the Debug representation for
/// errors that did not pass through `classify_sdk`.
pub fn classify_anyhow_error(error: &anyhow::Error) -> AwsError {
    for cause in error.chain() {
        if let Some(aws) = cause.downcast_ref::<AwsError>() {
            return aws.clone();
        }
    }

    let debug_str = format!("{:?}", error);
    if let Some(code) = extract_error_code(&debug_str) {
        return classify_aws_error(Some(&code), Some(&debug_str));
    }

    AwsError::Sdk {
        code: None,
        message: error.to_string(),
    }
}

/// Extract a known AWS error code from a debug string representation
fn extract_error_code(debug_str: &str) -> Option<String> {
    for code in NOT_FOUND_CODES
        .iter()
        .chain(THROTTLING_CODES)
        .chain(DEPENDENCY_CODES)
    {
        if debug_str.contains(code) {
            return Some((*code).to_string());
        }
    }

    // Try to extract any code from a `code: Some("...")` pattern
    if let Some(start) = debug_str.find("code: Some(\"") {
        let rest = &debug_str[start + 12..];
        if let Some(end) = rest.find('"') {
            return Some(rest[..end].to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = classify_aws_error(Some(code), Some("some message"));
            assert!(err.is_not_found(), "Expected NotFound for code: {code}");
        }
    }

    #[test]
    fn throttling_codes() {
        for code in THROTTLING_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(err.is_throttled(), "Expected Throttled for code: {code}");
        }
    }

    #[test]
    fn dependency_violation() {
        let err = classify_aws_error(Some("DependencyViolation"), Some("rtb has dependencies"));
        assert!(err.is_dependency_violation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = classify_aws_error(Some("SomeNewError"), Some("details"));
        assert!(matches!(err, AwsError::Sdk { .. }));

        let err2 = classify_aws_error(None, Some("something failed"));
        assert!(matches!(err2, AwsError::Sdk { code: None, .. }));
    }

    #[test]
    fn classify_chain_finds_attached_aws_error() {
        let inner = AwsError::NotFound {
            message: "subnet gone".to_string(),
        };
        let err = anyhow::Error::new(inner).context("Failed to delete subnet");
        assert!(classify_anyhow_error(&err).is_not_found());
    }

    #[test]
    fn extract_known_codes_from_debug_string() {
        let debug_str = r#"SdkError { code: Some("InvalidRouteTableID.NotFound") }"#;
        assert_eq!(
            extract_error_code(debug_str).as_deref(),
            Some("InvalidRouteTableID.NotFound")
        );
    }

    #[test]
    fn extract_code_from_code_field() {
        let debug_str = r#"SdkError { code: Some("SomeRandomCode"), message: "fail" }"#;
        assert_eq!(
            extract_error_code(debug_str).as_deref(),
            Some("SomeRandomCode")
        );
    }

    #[test]
    fn extract_none_from_unrelated_string() {
        assert!(extract_error_code("connection refused").is_none());
    }

    #[test]
    fn classify_plain_error_falls_back_to_sdk() {
        let err = anyhow::anyhow!("connection refused");
        assert!(matches!(
            classify_anyhow_error(&err),
            AwsError::Sdk { code: None, .. }
        ));
    }
}
