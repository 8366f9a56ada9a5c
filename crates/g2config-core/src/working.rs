//! A document being edited through a handle.
//!
//! `WorkingDocument` owns the document and the data-source ID high-water
//! mark. The mark only moves forward while the document is open, so an ID
//! freed by a delete is never handed out again by the same handle.

use serde_json::Map;

use crate::descriptor::{
    AssignedAttribute, AssignedDataSource, AttributeSpec, DataSourceList, DataSourceRef,
    DataSourceSpec,
};
use crate::document::{AttributeType, ConfigDocument, DataSource};
use crate::error::{CoreError, ValidationError};
use crate::types::{AttributeId, DataSourceId};
use crate::validation::{check_id, normalize_code, validate_document};

#[derive(Debug, Clone)]
pub struct WorkingDocument {
    document: ConfigDocument,
    /// Lowest ID the allocator may return.
    first_user_dsrc_id: i64,
    /// Next engine-chosen data-source ID.
    next_dsrc_id: i64,
}

impl WorkingDocument {
    /// Wrap a document. The document is assumed valid.
    pub fn new(document: ConfigDocument, first_user_dsrc_id: i64) -> Self {
        let next_dsrc_id = next_after(&document, first_user_dsrc_id);
        Self {
            document,
            first_user_dsrc_id,
            next_dsrc_id,
        }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// The ID the next engine-chosen data source would receive.
    pub fn next_data_source_id(&self) -> DataSourceId {
        DataSourceId(self.next_dsrc_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data Sources
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a data source.
    ///
    /// The code is normalized first. An explicit ID is honoured when free;
    /// otherwise the allocator picks the next ID above everything seen so far.
    pub fn add_data_source(
        &mut self,
        spec: &DataSourceSpec,
    ) -> Result<AssignedDataSource, ValidationError> {
        let code = normalize_code(&spec.code)?;
        if self.document.data_source(&code).is_some() {
            return Err(ValidationError::DuplicateDataSourceCode(code));
        }

        let id = match spec.id {
            Some(id) => {
                check_id(id.0)?;
                if self.document.data_sources().iter().any(|ds| ds.id == id) {
                    return Err(ValidationError::DuplicateDataSourceId(id));
                }
                id
            }
            None => DataSourceId(self.next_dsrc_id),
        };

        let after = id
            .0
            .checked_add(1)
            .filter(|next| *next < i64::MAX)
            .ok_or(ValidationError::IdOutOfRange(id.0))?;
        self.next_dsrc_id = self.next_dsrc_id.max(after);
        self.document.body.data_sources.push(DataSource::new(id, code));

        Ok(AssignedDataSource { id })
    }

    /// Remove a data source by code. Returns whether anything was removed.
    pub fn delete_data_source(&mut self, spec: &DataSourceSpec) -> Result<bool, ValidationError> {
        let code = normalize_code(&spec.code)?;
        let before = self.document.body.data_sources.len();
        self.document.body.data_sources.retain(|ds| ds.code != code);
        Ok(self.document.body.data_sources.len() != before)
    }

    /// Data sources in insertion order.
    pub fn list_data_sources(&self) -> DataSourceList {
        DataSourceList {
            data_sources: self
                .document
                .data_sources()
                .iter()
                .map(|ds| DataSourceRef {
                    id: ds.id,
                    code: ds.code.clone(),
                })
                .collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute Types
    // ─────────────────────────────────────────────────────────────────────────

    pub fn attributes(&self) -> &[AttributeType] {
        self.document.attributes()
    }

    /// Add an attribute type. Without an explicit ID it gets `max + 1`.
    pub fn add_attribute(
        &mut self,
        spec: &AttributeSpec,
    ) -> Result<AssignedAttribute, ValidationError> {
        let code = normalize_code(&spec.code)?;
        if self.document.attribute(&code).is_some() {
            return Err(ValidationError::DuplicateAttributeCode(code));
        }

        let id = match spec.id {
            Some(id) => {
                check_id(id.0)?;
                if self.document.attributes().iter().any(|a| a.id == id) {
                    return Err(ValidationError::DuplicateAttributeId(id));
                }
                id
            }
            None => {
                let max = self.document.max_attribute_id().map_or(0, |m| m.0);
                let next = max.checked_add(1).ok_or(ValidationError::IdOutOfRange(max))?;
                check_id(next)?;
                AttributeId(next)
            }
        };

        self.document.body.attributes.push(AttributeType {
            id,
            code,
            class: spec.class.trim().to_ascii_uppercase(),
            feature: spec.feature.clone(),
            element: spec.element.clone(),
            required: spec.required.clone(),
            default_value: spec.default_value.clone(),
            internal: "No".to_string(),
            extra: Map::new(),
        });

        Ok(AssignedAttribute { id })
    }

    /// Remove an attribute type by code. Internal attributes are refused.
    pub fn delete_attribute(&mut self, code: &str) -> Result<bool, ValidationError> {
        let code = normalize_code(code)?;
        match self.document.attribute(&code) {
            None => Ok(false),
            Some(attr) if attr.is_internal() => Err(ValidationError::InternalAttribute(code)),
            Some(_) => {
                self.document.body.attributes.retain(|a| a.code != code);
                Ok(true)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Whole Document
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the document after checking it. The high-water mark rises to
    /// cover the new contents but never falls.
    pub fn replace(&mut self, document: ConfigDocument) -> Result<(), ValidationError> {
        validate_document(&document)?;
        self.next_dsrc_id = self
            .next_dsrc_id
            .max(next_after(&document, self.first_user_dsrc_id));
        self.document = document;
        Ok(())
    }

    /// Parse, check and install a serialized document.
    pub fn load_json(&mut self, json: &str) -> Result<(), CoreError> {
        let document = ConfigDocument::from_json(json)?;
        self.replace(document)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        self.document.to_json()
    }
}

/// First free ID above the document's data sources. Validated documents
/// never hold `i64::MAX`, so the addition only saturates on unchecked input.
fn next_after(document: &ConfigDocument, first_user_dsrc_id: i64) -> i64 {
    document
        .max_data_source_id()
        .map_or(first_user_dsrc_id, |max| {
            max.0.saturating_add(1).max(first_user_dsrc_id)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{default_document, FIRST_USER_DSRC_ID};

    fn working() -> WorkingDocument {
        WorkingDocument::new(default_document(), FIRST_USER_DSRC_ID)
    }

    #[test]
    fn test_first_add_gets_1001() {
        let mut w = working();
        let assigned = w.add_data_source(&DataSourceSpec::new("GO_TEST")).unwrap();
        assert_eq!(assigned.id, DataSourceId(1001));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut w = working();
        let a = w.add_data_source(&DataSourceSpec::new("A")).unwrap();
        assert!(w.delete_data_source(&DataSourceSpec::new("A")).unwrap());
        let b = w.add_data_source(&DataSourceSpec::new("B")).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_duplicate_code_rejected_case_insensitively() {
        let mut w = working();
        w.add_data_source(&DataSourceSpec::new("CUSTOMERS")).unwrap();
        assert_eq!(
            w.add_data_source(&DataSourceSpec::new("customers")),
            Err(ValidationError::DuplicateDataSourceCode("CUSTOMERS".to_string()))
        );
    }

    #[test]
    fn test_explicit_id_moves_high_water() {
        let mut w = working();
        w.add_data_source(&DataSourceSpec::new("X").with_id(5000)).unwrap();
        let next = w.add_data_source(&DataSourceSpec::new("Y")).unwrap();
        assert_eq!(next.id, DataSourceId(5001));
    }

    #[test]
    fn test_explicit_id_collision() {
        let mut w = working();
        assert_eq!(
            w.add_data_source(&DataSourceSpec::new("X").with_id(1)),
            Err(ValidationError::DuplicateDataSourceId(DataSourceId(1)))
        );
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut w = working();
        assert!(!w.delete_data_source(&DataSourceSpec::new("NOPE")).unwrap());
        assert_eq!(w.list_data_sources().len(), 2);
    }

    #[test]
    fn test_internal_attribute_protected() {
        let mut w = working();
        assert_eq!(
            w.delete_attribute("DATA_SOURCE"),
            Err(ValidationError::InternalAttribute("DATA_SOURCE".to_string()))
        );
    }

    #[test]
    fn test_add_attribute_takes_next_id() {
        let mut w = working();
        let max = w.document().max_attribute_id().unwrap();
        let assigned = w.add_attribute(&AttributeSpec::new("loyalty_id")).unwrap();
        assert_eq!(assigned.id, AttributeId(max.0 + 1));
        assert!(w.delete_attribute("LOYALTY_ID").unwrap());
    }

    #[test]
    fn test_load_rejects_duplicate_codes() {
        let mut w = working();
        let json = r#"{"G2_CONFIG":{"CFG_DSRC":[{"DSRC_ID":1,"DSRC_CODE":"A"},{"DSRC_ID":2,"DSRC_CODE":"A"}]}}"#;
        assert!(matches!(
            w.load_json(json),
            Err(CoreError::Inconsistent(ValidationError::DuplicateDataSourceCode(_)))
        ));
        // A rejected load leaves the document untouched.
        assert_eq!(w.list_data_sources().len(), 2);
    }

    #[test]
    fn test_load_raises_high_water() {
        let mut w = working();
        let json = r#"{"G2_CONFIG":{"CFG_DSRC":[{"DSRC_ID":2500,"DSRC_CODE":"BIG"}]}}"#;
        w.load_json(json).unwrap();
        assert_eq!(w.next_data_source_id(), DataSourceId(2501));
    }

    #[test]
    fn test_load_never_lowers_high_water() {
        let mut w = working();
        let fresh = w.to_json().unwrap();
        w.add_data_source(&DataSourceSpec::new("A")).unwrap();
        let b = w.add_data_source(&DataSourceSpec::new("B")).unwrap();

        w.load_json(&fresh).unwrap();
        let c = w.add_data_source(&DataSourceSpec::new("C")).unwrap();
        assert!(c.id > b.id);
    }

    #[test]
    fn test_explicit_max_id_rejected() {
        let mut w = working();
        assert_eq!(
            w.add_data_source(&DataSourceSpec::new("BIG").with_id(i64::MAX)),
            Err(ValidationError::IdOutOfRange(i64::MAX))
        );
        assert_eq!(
            w.add_data_source(&DataSourceSpec::new("BIG").with_id(i64::MAX - 1)),
            Err(ValidationError::IdOutOfRange(i64::MAX - 1))
        );
        assert!(w.document().data_source("BIG").is_none());
        assert_eq!(w.next_data_source_id(), DataSourceId(FIRST_USER_DSRC_ID));
    }

    #[test]
    fn test_allocation_stops_at_top_of_range() {
        let mut w = working();
        w.add_data_source(&DataSourceSpec::new("HIGH").with_id(i64::MAX - 2))
            .unwrap();
        assert_eq!(w.next_data_source_id(), DataSourceId(i64::MAX - 1));
        assert_eq!(
            w.add_data_source(&DataSourceSpec::new("NEXT")),
            Err(ValidationError::IdOutOfRange(i64::MAX - 1))
        );
        assert_eq!(w.list_data_sources().len(), 3);
    }

    #[test]
    fn test_load_max_id_rejected() {
        let mut w = working();
        let json = format!(
            r#"{{"G2_CONFIG":{{"CFG_DSRC":[{{"DSRC_ID":{},"DSRC_CODE":"BIG"}}]}}}}"#,
            i64::MAX
        );
        assert!(matches!(
            w.load_json(&json),
            Err(CoreError::Inconsistent(ValidationError::IdOutOfRange(_)))
        ));
        assert_eq!(w.list_data_sources().len(), 2);
    }

    #[test]
    fn test_attribute_max_id_rejected() {
        let mut w = working();
        let mut spec = AttributeSpec::new("BIG_ATTR");
        spec.id = Some(AttributeId(i64::MAX));
        assert_eq!(
            w.add_attribute(&spec),
            Err(ValidationError::IdOutOfRange(i64::MAX))
        );
    }
}
