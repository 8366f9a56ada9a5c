//! Exact outputs callers rely on.

use g2config::Engine;
use g2config_testkit::fixtures::memory_settings_json;
use g2config_testkit::vectors::{DEFAULT_DATA_SOURCES, DEFAULT_SAVE_TRUNCATED};
use g2config_testkit::{truncate, verify_all_vectors, TestFixture, DEFAULT_TRUNCATION};

#[test]
fn fresh_engine_has_no_exception() {
    let engine = Engine::new();
    assert_eq!(engine.last_exception_code(), 0);
    assert_eq!(engine.last_exception(), "");
}

#[test]
fn first_added_data_source_is_1001() -> anyhow::Result<()> {
    let engine = Engine::new();
    engine.init("golden", &memory_settings_json(), 0)?;

    let handle = engine.create()?;
    let response = engine.add_data_source_json(handle, r#"{"DSRC_CODE":"GO_TEST"}"#)?;
    assert_eq!(response, r#"{"DSRC_ID":1001}"#);

    engine.close(handle)?;
    engine.destroy()?;
    Ok(())
}

#[test]
fn default_template_listing() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let handle = fixture.create();
    assert_eq!(
        fixture.engine.list_data_sources_json(handle)?,
        DEFAULT_DATA_SOURCES
    );
    Ok(())
}

#[test]
fn default_template_save_prefix() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let handle = fixture.create();
    let saved = fixture.engine.save(handle)?;
    assert_eq!(truncate(&saved, DEFAULT_TRUNCATION), DEFAULT_SAVE_TRUNCATED);
    Ok(())
}

#[test]
fn golden_vectors() {
    let results = verify_all_vectors();
    assert!(!results.is_empty());
    for (name, ok, detail) in results {
        assert!(ok, "vector '{name}' mismatched: {detail}");
    }
}
