use clinicalthread::logging::{setup_logging, LogTarget, LOG_FILE};

#[test]
fn test_logging_setup_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let target = LogTarget::in_dir(&dir.path().join("logs"));

    setup_logging(target).unwrap();
    // A second subscriber is ignored rather than panicking
    setup_logging(LogTarget::Stderr).unwrap();

    assert!(dir.path().join("logs").join(LOG_FILE).exists());
}
