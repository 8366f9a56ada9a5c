//! Engine and handle lifecycles, and the latched exception.

use g2config::{DataSourceSpec, Engine, EngineError, LifecycleState};
use g2config_testkit::fixtures::memory_settings_json;
use g2config_testkit::TestFixture;

#[test]
fn engine_state_machine() {
    let engine = Engine::new();
    assert_eq!(engine.lifecycle(), LifecycleState::Uninitialized);

    engine.init("lifecycle", &memory_settings_json(), 0).unwrap();
    assert_eq!(engine.lifecycle(), LifecycleState::Initialized);
    assert_eq!(engine.module_name().as_deref(), Some("lifecycle"));

    engine.destroy().unwrap();
    assert_eq!(engine.lifecycle(), LifecycleState::Destroyed);
    assert!(matches!(engine.destroy(), Err(EngineError::Destroyed)));
    assert_eq!(engine.module_name(), None);
}

#[test]
fn closed_handle_is_rejected_everywhere() {
    let fixture = TestFixture::new();
    let engine = &fixture.engine;
    let handle = fixture.create();
    engine.close(handle).unwrap();

    assert!(matches!(engine.save(handle), Err(EngineError::InvalidHandle(_))));
    assert!(matches!(
        engine.add_data_source(handle, &DataSourceSpec::new("X")),
        Err(EngineError::InvalidHandle(_))
    ));
    assert!(matches!(
        engine.list_data_sources(handle),
        Err(EngineError::InvalidHandle(_))
    ));
    assert!(matches!(engine.close(handle), Err(EngineError::InvalidHandle(_))));
    assert_eq!(engine.open_handles(), 0);
}

#[test]
fn reused_slot_does_not_revive_old_handle() {
    let fixture = TestFixture::new();
    let old = fixture.create();
    fixture.engine.close(old).unwrap();
    let new = fixture.create();

    assert_ne!(old, new);
    assert!(fixture.engine.save(old).is_err());
    assert!(fixture.engine.save(new).is_ok());
}

#[test]
fn destroy_invalidates_open_handles() {
    let fixture = TestFixture::new();
    let handles: Vec<_> = (0..3).map(|_| fixture.create()).collect();
    fixture.engine.destroy().unwrap();

    assert_eq!(fixture.engine.open_handles(), 0);
    for handle in handles {
        assert!(matches!(
            fixture.engine.save(handle),
            Err(EngineError::Destroyed)
        ));
    }
}

#[test]
fn exception_latch_follows_failures() {
    let fixture = TestFixture::new();
    let engine = &fixture.engine;
    let handle = fixture.create();

    fixture.add(handle, "DUP");
    let err = engine
        .add_data_source(handle, &DataSourceSpec::new("dup"))
        .unwrap_err();

    assert_eq!(engine.last_exception_code(), err.code());
    assert_eq!(engine.last_exception(), err.latched_message());
    assert!(engine.last_exception().starts_with("0023E|"));

    // Success does not clear the latch.
    fixture.add(handle, "OTHER");
    assert_eq!(engine.last_exception_code(), 23);

    engine.clear_last_exception();
    assert_eq!(engine.last_exception_code(), 0);
    assert!(engine.last_exception().is_empty());
}

#[test]
fn latch_is_per_engine() {
    let a = TestFixture::new();
    let b = TestFixture::new();
    let handle = a.create();
    a.engine.close(handle).unwrap();
    assert!(a.engine.close(handle).is_err());

    assert_eq!(a.engine.last_exception_code(), 7);
    assert_eq!(b.engine.last_exception_code(), 0);
}

#[test]
fn init_with_unopenable_store_fails() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as a database file.
    let settings = g2config_testkit::fixtures::sqlite_settings_json(dir.path());
    let engine = Engine::new();

    assert!(matches!(
        engine.init("bad-store", &settings, 0),
        Err(EngineError::Initialization(_))
    ));
    assert_eq!(engine.lifecycle(), LifecycleState::Uninitialized);
    assert_eq!(engine.last_exception_code(), 48);
}
