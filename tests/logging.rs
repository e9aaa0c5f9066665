use modtrack::logging::{init_logging, resolve_level};
use modtrack::types::LogLevel;

#[test]
fn log_level_resolution_prefers_explicit_then_env() {
    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), tracing::Level::TRACE);
    assert_eq!(resolve_level(None, Some("warning")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("nonsense")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}

#[test]
fn init_logging_can_be_called_twice() {
    init_logging(Some(LogLevel::Debug)).unwrap();
    init_logging(Some(LogLevel::Error)).unwrap();
}
