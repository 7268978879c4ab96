use std::time::Duration;

use krishi_sakha::{Result, SakhaError};

#[test]
fn test_error_display() {
    let err = SakhaError::Storage("disk full".to_string());
    assert!(err.to_string().contains("disk full"));

    let err = SakhaError::QuotaExceeded {
        needed: 6000,
        limit: 5000,
    };
    let msg = err.to_string();
    assert!(msg.contains("6000"));
    assert!(msg.contains("5000"));

    let err = SakhaError::Api {
        status: 503,
        message: "overloaded".to_string(),
    };
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("overloaded"));
}

#[test]
fn test_json_error_conversion() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{ nope")?)
    }
    assert!(matches!(parse(), Err(SakhaError::Json(_))));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(SakhaError::NoBackend)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Transient error classification
// ============================================================================

#[test]
fn transient_errors() {
    assert!(SakhaError::Http("connection reset".into()).is_transient());
    assert!(SakhaError::Timeout(Duration::from_secs(30)).is_transient());
    assert!(
        SakhaError::Api {
            status: 429,
            message: "slow down".into(),
        }
        .is_transient()
    );
    assert!(
        SakhaError::Api {
            status: 500,
            message: "internal".into(),
        }
        .is_transient()
    );
    assert!(
        SakhaError::Api {
            status: 502,
            message: "bad gateway".into(),
        }
        .is_transient()
    );
}

#[test]
fn permanent_errors() {
    assert!(
        !SakhaError::Api {
            status: 400,
            message: "bad request".into(),
        }
        .is_transient()
    );
    assert!(
        !SakhaError::Api {
            status: 401,
            message: "unauthorized".into(),
        }
        .is_transient()
    );
    assert!(!SakhaError::NoBackend.is_transient());
    assert!(!SakhaError::InvalidInput("empty".into()).is_transient());
    assert!(!SakhaError::Configuration("bad".into()).is_transient());
    assert!(!SakhaError::Storage("read failed".into()).is_transient());
    assert!(!SakhaError::CorruptStorage("not json".into()).is_transient());
    assert!(!SakhaError::InvalidResponse("malformed body".into()).is_transient());
}
