//! Golden test vectors for deterministic verification.
//!
//! Each vector is a short session: optionally load a document, add data
//! sources through their JSON descriptors, then list. The expected strings
//! are the exact bytes callers of the engine see.

use g2config::{Engine, Result};

use crate::fixtures::memory_settings_json;

/// Length `truncate` cuts saved documents to in golden comparisons.
pub const DEFAULT_TRUNCATION: usize = 76;

/// Listing of a freshly created document.
pub const DEFAULT_DATA_SOURCES: &str =
    r#"{"DATA_SOURCES":[{"DSRC_ID":1,"DSRC_CODE":"TEST"},{"DSRC_ID":2,"DSRC_CODE":"SEARCH"}]}"#;

/// `truncate(save(create()), DEFAULT_TRUNCATION)`.
pub const DEFAULT_SAVE_TRUNCATED: &str =
    r#"{"G2_CONFIG":{"CFG_ATTR":[{"ATTR_ID":1001,"ATTR_CODE":"DATA_SOURCE","ATTR..."#;

/// Shorten `s` to at most `len` characters, marking the cut with `...`.
pub fn truncate(s: &str, len: usize) -> String {
    const ELLIPSIS: &str = "...";
    if s.chars().count() <= len {
        return s.to_string();
    }
    let keep = len.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Document loaded after `create`; `None` keeps the default template.
    pub document: Option<&'static str>,
    /// Data-source descriptors added in order.
    pub adds: &'static [&'static str],
    /// Response to each add.
    pub expected_assigned: &'static [&'static str],
    /// Final `list_data_sources` output.
    pub expected_list: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "first data source on the default template",
            document: None,
            adds: &[r#"{"DSRC_CODE":"GO_TEST"}"#],
            expected_assigned: &[r#"{"DSRC_ID":1001}"#],
            expected_list: r#"{"DATA_SOURCES":[{"DSRC_ID":1,"DSRC_CODE":"TEST"},{"DSRC_ID":2,"DSRC_CODE":"SEARCH"},{"DSRC_ID":1001,"DSRC_CODE":"GO_TEST"}]}"#,
        },
        GoldenVector {
            name: "codes are trimmed and upper-cased",
            document: None,
            adds: &[r#"{"DSRC_CODE":"  watch_list "}"#],
            expected_assigned: &[r#"{"DSRC_ID":1001}"#],
            expected_list: r#"{"DATA_SOURCES":[{"DSRC_ID":1,"DSRC_CODE":"TEST"},{"DSRC_ID":2,"DSRC_CODE":"SEARCH"},{"DSRC_ID":1001,"DSRC_CODE":"WATCH_LIST"}]}"#,
        },
        GoldenVector {
            name: "small loaded IDs still allocate from 1001",
            document: Some(r#"{"G2_CONFIG":{"CFG_DSRC":[{"DSRC_ID":7,"DSRC_CODE":"LEGACY"}]}}"#),
            adds: &[r#"{"DSRC_CODE":"customers"}"#],
            expected_assigned: &[r#"{"DSRC_ID":1001}"#],
            expected_list: r#"{"DATA_SOURCES":[{"DSRC_ID":7,"DSRC_CODE":"LEGACY"},{"DSRC_ID":1001,"DSRC_CODE":"CUSTOMERS"}]}"#,
        },
        GoldenVector {
            name: "allocation continues above loaded IDs; explicit IDs honoured",
            document: Some(r#"{"G2_CONFIG":{"CFG_DSRC":[{"DSRC_ID":1500,"DSRC_CODE":"BIG"}]}}"#),
            adds: &[
                r#"{"DSRC_CODE":"NEXT"}"#,
                r#"{"DSRC_CODE":"PINNED","DSRC_ID":9}"#,
            ],
            expected_assigned: &[r#"{"DSRC_ID":1501}"#, r#"{"DSRC_ID":9}"#],
            expected_list: r#"{"DATA_SOURCES":[{"DSRC_ID":1500,"DSRC_CODE":"BIG"},{"DSRC_ID":1501,"DSRC_CODE":"NEXT"},{"DSRC_ID":9,"DSRC_CODE":"PINNED"}]}"#,
        },
    ]
}

/// Outputs of running a vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorOutput {
    pub assigned: Vec<String>,
    pub list: String,
}

/// Run a vector against an initialized engine.
pub fn run_vector(engine: &Engine, vector: &GoldenVector) -> Result<VectorOutput> {
    let handle = engine.create()?;
    if let Some(document) = vector.document {
        engine.load(handle, document)?;
    }
    let assigned = vector
        .adds
        .iter()
        .map(|descriptor| engine.add_data_source_json(handle, descriptor))
        .collect::<Result<Vec<_>>>()?;
    let list = engine.list_data_sources_json(handle)?;
    engine.close(handle)?;
    Ok(VectorOutput { assigned, list })
}

/// Verify every golden vector against a fresh in-memory engine.
///
/// Returns `(name, matches, detail)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let engine = Engine::new();
    if let Err(e) = engine.init("golden-vectors", &memory_settings_json(), 0) {
        return vec![("init".to_string(), false, e.to_string())];
    }

    all_vectors()
        .iter()
        .map(|v| match run_vector(&engine, v) {
            Ok(out) => {
                let matches = out.assigned == v.expected_assigned && out.list == v.expected_list;
                (v.name.to_string(), matches, out.list)
            }
            Err(e) => (v.name.to_string(), false, e.latched_message()),
        })
        .collect()
}
