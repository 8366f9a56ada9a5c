//! Engine configuration parameters passed to `init`.
//!
//! ```json
//! {
//!   "PIPELINE": {"CONFIGPATH": "...", "RESOURCEPATH": "...", "SUPPORTPATH": "..."},
//!   "SQL": {"CONNECTION": "sqlite3://na:na@/var/opt/g2/G2C.db"}
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Database URL scheme understood by the engine.
pub const SQLITE_SCHEME: &str = "sqlite3://";

/// Path component that selects the in-memory store.
pub const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(rename = "PIPELINE", default)]
    pub pipeline: PipelineSettings,

    #[serde(rename = "SQL")]
    pub sql: SqlSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(rename = "CONFIGPATH", default = "default_config_path")]
    pub config_path: String,

    #[serde(rename = "RESOURCEPATH", default = "default_resource_path")]
    pub resource_path: String,

    #[serde(rename = "SUPPORTPATH", default = "default_support_path")]
    pub support_path: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            resource_path: default_resource_path(),
            support_path: default_support_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlSettings {
    #[serde(rename = "CONNECTION")]
    pub connection: String,
}

/// Where persisted configurations live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Process memory; lost on destroy.
    Memory,
    /// A SQLite database file.
    Sqlite(PathBuf),
}

impl EngineSettings {
    /// Parse settings from their JSON text.
    pub fn parse(json: &str) -> Result<Self, CoreError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidSettings(e.to_string()))?;
        settings.location()?;
        Ok(settings)
    }

    /// Minimal settings for a database URL. An empty URL selects the
    /// in-memory store.
    pub fn simple(database_url: &str) -> Self {
        let connection = if database_url.trim().is_empty() {
            format!("{SQLITE_SCHEME}na:na@{MEMORY_PATH}")
        } else {
            database_url.trim().to_string()
        };
        Self {
            pipeline: PipelineSettings::default(),
            sql: SqlSettings { connection },
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Resolve `SQL.CONNECTION` into a store location.
    ///
    /// Accepts `sqlite3://[user:password@]<path>`. Credentials end at the
    /// first `@` before any `/`; an `@` inside the path is kept.
    pub fn location(&self) -> Result<StoreLocation, CoreError> {
        let url = self.sql.connection.trim();
        let rest = url.strip_prefix(SQLITE_SCHEME).ok_or_else(|| {
            CoreError::InvalidSettings(format!("unsupported database url: {url:?}"))
        })?;

        let path = match rest.split_once('@') {
            Some((credentials, path)) if !credentials.contains('/') => path,
            _ => rest,
        };

        match path {
            "" => Err(CoreError::InvalidSettings(format!(
                "database url has no path: {url:?}"
            ))),
            MEMORY_PATH => Ok(StoreLocation::Memory),
            path => Ok(StoreLocation::Sqlite(PathBuf::from(path))),
        }
    }
}

fn default_config_path() -> String {
    "/etc/opt/g2/config".to_string()
}

fn default_resource_path() -> String {
    "/opt/g2/resources".to_string()
}

fn default_support_path() -> String {
    "/opt/g2/data".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_empty_is_memory() {
        let settings = EngineSettings::simple("");
        assert_eq!(settings.location().unwrap(), StoreLocation::Memory);
    }

    #[test]
    fn test_parse_sqlite_path() {
        let json = r#"{"SQL":{"CONNECTION":"sqlite3://na:na@/tmp/sqlite/G2C.db"}}"#;
        let settings = EngineSettings::parse(json).unwrap();
        assert_eq!(
            settings.location().unwrap(),
            StoreLocation::Sqlite(PathBuf::from("/tmp/sqlite/G2C.db"))
        );
        assert_eq!(settings.pipeline, PipelineSettings::default());
    }

    #[test]
    fn test_at_sign_in_path_without_credentials() {
        let settings = EngineSettings::simple("sqlite3:///data/a@b/G2C.db");
        assert_eq!(
            settings.location().unwrap(),
            StoreLocation::Sqlite(PathBuf::from("/data/a@b/G2C.db"))
        );

        let settings = EngineSettings::simple("sqlite3://na:na@/data/a@b/G2C.db");
        assert_eq!(
            settings.location().unwrap(),
            StoreLocation::Sqlite(PathBuf::from("/data/a@b/G2C.db"))
        );
    }

    #[test]
    fn test_simple_json_roundtrip() {
        let settings = EngineSettings::simple("sqlite3://na:na@/data/G2C.db");
        let parsed = EngineSettings::parse(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_rejects_missing_sql() {
        assert!(matches!(
            EngineSettings::parse(r#"{"PIPELINE":{}}"#),
            Err(CoreError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        let json = r#"{"SQL":{"CONNECTION":"postgresql://user:pw@host:5432/G2"}}"#;
        assert!(matches!(
            EngineSettings::parse(json),
            Err(CoreError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(EngineSettings::parse("not json").is_err());
    }
}
