use cobrowse::types::errors::*;

// === MapperError Tests ===

#[test]
fn mapper_error_invalid_surface_display() {
    let err = MapperError::InvalidSurface { width: 0.0, height: 667.0 };
    assert_eq!(err.to_string(), "Invalid surface dimensions: 0x667");
}

#[test]
fn mapper_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> =
        Box::new(MapperError::InvalidSurface { width: -1.0, height: 1.0 });
    assert!(err.source().is_none());
}

// === SessionError Tests ===

#[test]
fn session_error_not_initialized_display() {
    let err = SessionError::NotInitialized("abc".to_string());
    assert_eq!(err.to_string(), "Session not initialized: abc");
}

// === AdvisoryError Tests ===

#[test]
fn advisory_error_display_variants() {
    assert_eq!(
        AdvisoryError::MissingCredentials.to_string(),
        "Advisory service unavailable: missing API key"
    );
    assert_eq!(
        AdvisoryError::Unavailable("connection refused".to_string()).to_string(),
        "Advisory service unavailable: connection refused"
    );
    assert_eq!(
        AdvisoryError::ServiceError("timeout".to_string()).to_string(),
        "Advisory service error: timeout"
    );
}

// === ConfigError Tests ===

#[test]
fn config_error_display_variants() {
    assert_eq!(
        ConfigError::IoError("denied".to_string()).to_string(),
        "Config I/O error: denied"
    );
    assert_eq!(
        ConfigError::SerializationError("eof".to_string()).to_string(),
        "Config serialization error: eof"
    );
    assert_eq!(
        ConfigError::InvalidKey("cue.nope".to_string()).to_string(),
        "Invalid config key: cue.nope"
    );
    assert_eq!(
        ConfigError::InvalidValue("expected u64".to_string()).to_string(),
        "Invalid config value: expected u64"
    );
}

#[test]
fn errors_box_into_dyn_error() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(SessionError::NotInitialized("x".to_string())),
        Box::new(AdvisoryError::MissingCredentials),
        Box::new(ConfigError::IoError("x".to_string())),
    ];
    assert_eq!(errors.len(), 3);
}
