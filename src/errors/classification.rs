use super::types::TriageError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl TriageError {
    /// Classify this error to determine its type and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Retryable errors
            TriageError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                retryable: true,
            },
            TriageError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            TriageError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            TriageError::Api(_) => ErrorClassification {
                error_type: "ApiError",
                retryable: true,
            },
            TriageError::Container(_) => ErrorClassification {
                error_type: "ContainerError",
                retryable: true,
            },
            TriageError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },
            TriageError::Docker(_) => ErrorClassification {
                error_type: "DockerError",
                retryable: true,
            },

            // Non-retryable errors
            TriageError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
            },
            TriageError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            // The backend replied; resending the same prompt would get the
            // same malformed answer. The degrade path handles it instead.
            TriageError::Parse(_) => ErrorClassification {
                error_type: "ParseError",
                retryable: false,
            },
            TriageError::Delivery(_) => ErrorClassification {
                error_type: "DeliveryError",
                retryable: false,
            },
            TriageError::UnreadableArtifact(_) => ErrorClassification {
                error_type: "UnreadableArtifactError",
                retryable: false,
            },
            TriageError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            TriageError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            TriageError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }
}
