//! Unit tests for the domain error taxonomy

#[cfg(test)]
mod tests {
    use studagent_domain::{Capability, Error, ProviderError, ProviderErrorKind};

    #[test]
    fn test_provider_error_constructors() {
        let cases = [
            (
                ProviderError::rate_limited("groq", "quota"),
                ProviderErrorKind::RateLimited,
            ),
            (
                ProviderError::timeout("groq", "slow"),
                ProviderErrorKind::Timeout,
            ),
            (
                ProviderError::invalid_response("groq", "garbage"),
                ProviderErrorKind::InvalidResponse,
            ),
            (
                ProviderError::unauthorized("groq", "bad key"),
                ProviderErrorKind::Unauthorized,
            ),
            (
                ProviderError::unavailable("groq", "down"),
                ProviderErrorKind::Unavailable,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind, kind);
            assert_eq!(err.provider, "groq");
        }
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::rate_limited("openrouter-mistral", "HTTP 429");
        assert_eq!(
            err.to_string(),
            "provider openrouter-mistral failed (rate_limited): HTTP 429"
        );
    }

    #[test]
    fn test_provider_error_converts_into_error() {
        let err: Error = ProviderError::timeout("gemini", "no reply").into();
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Timeout));
        assert!(!err.is_circuit_open());
    }

    #[test]
    fn test_exhausted_lists_providers() {
        let err = Error::AllProvidersExhausted {
            capability: Capability::Summarize,
            attempted: vec!["b".to_string()],
            skipped: vec!["a".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("summarize"));
        assert!(msg.contains("\"b\""));
        assert!(msg.contains("\"a\""));
    }

    #[test]
    fn test_helper_constructors() {
        assert!(Error::validation("empty").is_validation());
        assert!(Error::circuit_open("groq").is_circuit_open());
        assert_eq!(
            Error::not_found("profile u1").to_string(),
            "Not found: profile u1"
        );
        assert_eq!(
            Error::task_failed("t1", "exhausted").to_string(),
            "Task t1 failed: exhausted"
        );
    }

    #[test]
    fn test_configuration_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::configuration_with_source("cannot read config", io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
