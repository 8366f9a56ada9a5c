//! Proptest generators for property-based testing.

use proptest::prelude::*;

use g2config_core::{
    AttributeSpec, ConfigDocument, DataSource, DataSourceId, DataSourceSpec, MAX_CODE_LEN,
};

/// Generate a code already in normalized form.
pub fn code() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a code that normalizes cleanly: mixed case, padded with spaces.
pub fn messy_code() -> impl Strategy<Value = String> {
    " {0,2}[a-zA-Z][a-zA-Z0-9_-]{0,15} {0,2}".prop_map(String::from)
}

/// Generate a code the engine must reject.
pub fn invalid_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[A-Z]{1,4}[ .!/][A-Z]{1,4}".prop_map(String::from),
        Just("A".repeat(MAX_CODE_LEN + 1)),
    ]
}

/// Generate a data-source descriptor, sometimes with an explicit ID.
pub fn data_source_spec() -> impl Strategy<Value = DataSourceSpec> {
    (messy_code(), prop::option::of(3i64..=5000)).prop_map(|(code, id)| DataSourceSpec {
        code,
        id: id.map(DataSourceId),
    })
}

/// Generate an attribute descriptor without an explicit ID.
pub fn attribute_spec() -> impl Strategy<Value = AttributeSpec> {
    (code(), prop_oneof![Just("OTHER"), Just("NAME"), Just("ADDRESS")]).prop_map(
        |(code, class)| {
            let mut spec = AttributeSpec::new(format!("X_{code}"));
            spec.class = class.to_string();
            spec
        },
    )
}

/// A single data-source edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Add(String),
    Delete(String),
}

/// Generate an edit over a small pool of codes so that duplicates,
/// re-adds and deletes of absent codes all occur.
pub fn edit() -> impl Strategy<Value = Edit> {
    let pool = prop::sample::select(vec!["ALPHA", "beta", "GAMMA", "delta", "EPSILON"]);
    (any::<bool>(), pool).prop_map(|(add, code)| {
        if add {
            Edit::Add(code.to_string())
        } else {
            Edit::Delete(code.to_string())
        }
    })
}

/// Generate an edit script of up to `max_len` edits.
pub fn edit_script(max_len: usize) -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(edit(), 0..=max_len)
}

/// Generate a valid document with unique data sources and an unmodelled
/// section that must survive a round-trip.
pub fn document() -> impl Strategy<Value = ConfigDocument> {
    (
        prop::collection::btree_map(code(), 1i64..=10_000, 0..8),
        "[a-z]{1,12}",
    )
        .prop_map(|(sources, note)| {
            let mut doc = ConfigDocument::empty();
            let mut next_id = 0;
            for (code, id) in sources {
                // Keep IDs unique by bumping past any already used.
                next_id = id.max(next_id + 1);
                doc.body
                    .data_sources
                    .push(DataSource::new(DataSourceId(next_id), code));
            }
            doc.body
                .extra
                .insert("CFG_NOTE".to_string(), serde_json::Value::String(note));
            doc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use g2config_core::{normalize_code, validate_document};

    #[test]
    fn test_invalid_code_covers_overlong() {
        let overlong = "A".repeat(MAX_CODE_LEN + 1);
        assert!(normalize_code(&overlong).is_err());
    }

    proptest! {
        #[test]
        fn test_messy_codes_normalize(raw in messy_code()) {
            let code = normalize_code(&raw).unwrap();
            prop_assert_eq!(code.clone(), raw.trim().to_ascii_uppercase());
            prop_assert!(code.len() <= MAX_CODE_LEN);
        }

        #[test]
        fn test_invalid_codes_rejected(raw in invalid_code()) {
            prop_assert!(normalize_code(&raw).is_err());
        }

        #[test]
        fn test_generated_documents_are_valid(doc in document()) {
            prop_assert!(validate_document(&doc).is_ok());
        }
    }
}
