//! Persisting configurations and managing the default.

use g2config::store::StoreError;
use g2config::{ConfigId, EngineError};
use g2config_testkit::TestFixture;

#[test]
fn persist_and_reopen_in_memory() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let engine = &fixture.engine;
    let handle = fixture.create();
    fixture.add(handle, "CUSTOMERS");

    let id = engine.persist(handle, "customers added")?;
    let reopened = engine.open_config(id)?;
    assert_eq!(engine.save(reopened)?, engine.save(handle)?);
    assert_ne!(reopened, handle);

    let listed = engine.list_configs()?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].comment, "customers added");
    Ok(())
}

#[test]
fn persist_is_idempotent() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let handle = fixture.create();
    let first = fixture.engine.persist(handle, "one")?;
    let second = fixture.engine.persist(handle, "two")?;

    assert_eq!(first, second);
    assert_eq!(fixture.engine.list_configs()?.len(), 1);

    fixture.add(handle, "CHANGED");
    assert_ne!(fixture.engine.persist(handle, "three")?, first);
    Ok(())
}

#[test]
fn default_config_management() -> anyhow::Result<()> {
    let fixture = TestFixture::new();
    let engine = &fixture.engine;
    assert_eq!(engine.default_config_id()?, None);

    let handle = fixture.create();
    let v1 = engine.persist(handle, "v1")?;
    fixture.add(handle, "V2_SOURCE");
    let v2 = engine.persist(handle, "v2")?;

    engine.set_default_config_id(v1)?;
    assert_eq!(engine.default_config_id()?, Some(v1));

    let stale = engine.replace_default_config_id(v2, v2).unwrap_err();
    assert!(matches!(
        stale,
        EngineError::Store(StoreError::DefaultChanged { .. })
    ));
    assert_eq!(engine.last_exception_code(), 60);

    engine.replace_default_config_id(v1, v2)?;
    assert_eq!(engine.default_config_id()?, Some(v2));
    Ok(())
}

#[test]
fn unknown_config_ids() {
    let fixture = TestFixture::new();
    let missing = ConfigId(0xDEAD_BEEF);
    assert!(matches!(
        fixture.engine.set_default_config_id(missing),
        Err(EngineError::ConfigNotFound(_))
    ));
    assert!(matches!(
        fixture.engine.open_config(missing),
        Err(EngineError::ConfigNotFound(_))
    ));
}

#[test]
fn sqlite_repository_survives_restart() -> anyhow::Result<()> {
    let fixture = TestFixture::on_disk();
    let handle = fixture.create();
    fixture.add(handle, "DURABLE");
    let id = fixture.engine.persist(handle, "durable")?;
    fixture.engine.set_default_config_id(id)?;
    fixture.engine.destroy()?;

    let engine = fixture.reopen().expect("fixture is on disk");
    let default = engine.default_config_id()?.expect("default survives");
    assert_eq!(default, id);

    let reopened = engine.open_config(default)?;
    let sources = engine.list_data_sources(reopened)?;
    assert!(sources.contains("DURABLE"));
    Ok(())
}
