// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use budget_rule_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("Amount must be a positive number (got 0)".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Amount must be a positive number (got 0)"
        );
    }

    #[test]
    fn suggestion_unavailable() {
        let err = CoreError::SuggestionUnavailable("LLM: timed out".into());
        assert_eq!(
            err.to_string(),
            "Category suggestion unavailable: LLM: timed out"
        );
    }

    #[test]
    fn no_suggestion_provider() {
        assert_eq!(
            CoreError::NoSuggestionProvider.to_string(),
            "Category suggestion unavailable: no suggestion provider configured"
        );
    }

    #[test]
    fn persistence() {
        let err = CoreError::Persistence("connection reset".into());
        assert_eq!(err.to_string(), "Persistence error: connection reset");
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "LLM".into(),
            message: "HTTP 429 Too Many Requests from completions endpoint".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (LLM): HTTP 429 Too Many Requests from completions endpoint"
        );
    }

    #[test]
    fn network() {
        let err = CoreError::Network("dns failure".into());
        assert_eq!(err.to_string(), "Network error: dns failure");
    }

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid file format: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(99);
        assert_eq!(err.to_string(), "Unsupported file version: 99");
    }

    #[test]
    fn decryption() {
        assert_eq!(
            CoreError::Decryption.to_string(),
            "Decryption failed: wrong password or corrupted file"
        );
    }

    #[test]
    fn encryption() {
        let err = CoreError::Encryption("Invalid Argon2 params".into());
        assert_eq!(err.to_string(), "Encryption failed: Invalid Argon2 params");
    }

    #[test]
    fn serialization_and_deserialization() {
        assert_eq!(
            CoreError::Serialization("x".into()).to_string(),
            "Serialization error: x"
        );
        assert_eq!(
            CoreError::Deserialization("y".into()).to_string(),
            "Deserialization error: y"
        );
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }
}

// ── Retry classification ────────────────────────────────────────────

mod retryable {
    use super::*;

    #[test]
    fn validation_is_not_retryable() {
        assert!(!CoreError::ValidationError("bad".into()).is_retryable());
    }

    #[test]
    fn persistence_is_retryable() {
        assert!(CoreError::Persistence("down".into()).is_retryable());
    }

    #[test]
    fn suggestion_failures_are_retryable() {
        assert!(CoreError::SuggestionUnavailable("x".into()).is_retryable());
        assert!(CoreError::Network("x".into()).is_retryable());
        assert!(CoreError::Api {
            provider: "LLM".into(),
            message: "timed out".into()
        }
        .is_retryable());
    }

    #[test]
    fn missing_provider_is_not_retryable() {
        assert!(!CoreError::NoSuggestionProvider.is_retryable());
    }

    #[test]
    fn file_format_errors_are_not_retryable() {
        assert!(!CoreError::Decryption.is_retryable());
        assert!(!CoreError::UnsupportedVersion(2).is_retryable());
        assert!(!CoreError::InvalidFileFormat("x".into()).is_retryable());
    }
}

// ── From conversions ────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "ledger.bgt missing");
        let err: CoreError = io.into();
        match err {
            CoreError::FileIO(msg) => assert!(msg.contains("ledger.bgt missing")),
            other => panic!("Expected FileIO, got {other:?}"),
        }
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_aes_gcm_error() {
        let err: CoreError = aes_gcm::Error.into();
        assert!(matches!(err, CoreError::Decryption));
    }

    #[test]
    fn question_mark_propagates() {
        fn parse() -> Result<serde_json::Value, CoreError> {
            Ok(serde_json::from_str("[1, 2")?)
        }
        assert!(matches!(parse(), Err(CoreError::Deserialization(_))));
    }
}

mod traits {
    use super::*;

    #[test]
    fn implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::Decryption);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoreError>();
    }
}
