//! Reload pipeline behaviour against a recording sink manager.

use sink_configurator::reload::ReloadOutcome;
use sink_configurator::sink::LocalFileSink;
use sink_configurator::ApplyMode;

mod common;

use common::{Behaviour, Call, RecordingManager};

const DEFAULT_ONLY: &str = r#"{"default": {"type": "local"}}"#;

#[test]
fn test_initial_load_calls_initial_set() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    let outcome = pipeline.apply(DEFAULT_ONLY, ApplyMode::InitialLoad);
    assert_eq!(outcome, ReloadOutcome::Applied { mode: ApplyMode::InitialLoad, sinks: 1 });

    let calls = manager.calls();
    assert_eq!(calls.len(), 1);
    let (call, sinks) = &calls[0];
    assert_eq!(*call, Call::InitialSet);
    assert_eq!(sinks.keys().collect::<Vec<_>>(), vec!["default"]);
    assert!(sinks["default"].downcast_ref::<LocalFileSink>().is_some());
}

#[test]
fn test_missing_default_is_rejected() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    for mode in [ApplyMode::InitialLoad, ApplyMode::HotReload] {
        let outcome = pipeline.apply(r#"{"other": {"type": "local"}}"#, mode);
        assert_eq!(outcome, ReloadOutcome::Rejected { mode, kind: "validation" });
    }
    assert!(manager.calls().is_empty());
}

#[test]
fn test_malformed_text_is_rejected() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    let inputs = [
        "not json",
        "",
        "[]",
        "null",
        r#"{"default": {"type": "local"}"#,
        r#"{"default": "local"}"#,
        r#"{"default": {"type": "unheard-of"}}"#,
        r#"{"default": {"type": "local"}, "archive": {"type": "s3"}}"#,
        r#"{"default": {"type": "local", "maxFileSize": "huge"}}"#,
    ];
    for raw in inputs {
        for mode in [ApplyMode::InitialLoad, ApplyMode::HotReload] {
            let outcome = pipeline.apply(raw, mode);
            assert_eq!(outcome, ReloadOutcome::Rejected { mode, kind: "parse" }, "input: {raw}");
        }
    }
    assert!(manager.calls().is_empty());
}

#[test]
fn test_hot_reload_calls_set_with_every_sink() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    let raw = r#"{
        "default": {"type": "local", "outputDir": "/var/spool/sinks"},
        "kafka": {"type": "kafka", "bootstrapServers": "broker:9092", "topic": "events"}
    }"#;
    let outcome = pipeline.apply(raw, ApplyMode::HotReload);
    assert!(outcome.is_applied());

    let calls = manager.calls();
    assert_eq!(calls.len(), 1);
    let (call, sinks) = &calls[0];
    assert_eq!(*call, Call::Set);
    assert_eq!(sinks.keys().collect::<Vec<_>>(), vec!["default", "kafka"]);
    assert_eq!(sinks["kafka"].sink_type(), "kafka");
}

#[test]
fn test_identical_updates_are_forwarded_twice() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    pipeline.apply(DEFAULT_ONLY, ApplyMode::HotReload);
    pipeline.apply(DEFAULT_ONLY, ApplyMode::HotReload);

    let calls = manager.calls();
    assert_eq!(manager.call_kinds(), vec![Call::Set, Call::Set]);
    assert_eq!(calls[0].1, calls[1].1);
}

#[test]
fn test_manager_errors_are_suppressed() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    manager.behave(Behaviour::Reject);
    let outcome = pipeline.apply(DEFAULT_ONLY, ApplyMode::HotReload);
    assert_eq!(outcome, ReloadOutcome::Rejected { mode: ApplyMode::HotReload, kind: "apply" });

    manager.behave(Behaviour::Panic);
    let outcome = pipeline.apply(DEFAULT_ONLY, ApplyMode::InitialLoad);
    assert_eq!(outcome, ReloadOutcome::Rejected { mode: ApplyMode::InitialLoad, kind: "apply" });

    // Both calls reached the manager exactly once
    assert_eq!(manager.call_kinds(), vec![Call::Set, Call::InitialSet]);
}

#[test]
fn test_parse_reports_error_kind() {
    let manager = RecordingManager::new();
    let pipeline = common::pipeline(&manager);

    assert_eq!(pipeline.parse("{").unwrap_err().kind(), "parse");
    assert_eq!(pipeline.parse("{}").unwrap_err().kind(), "validation");
    assert_eq!(pipeline.parse(DEFAULT_ONLY).unwrap().len(), 1);
    assert!(manager.calls().is_empty());
}
