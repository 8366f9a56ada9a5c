//! Strong type definitions for the configuration engine.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to a live configuration document inside an engine.
///
/// The raw value packs a registry slot index (low 32 bits, stored as
/// `index + 1` so the value is never zero) and the slot's generation
/// (high 32 bits). A closed slot bumps its generation, so a stale handle
/// never aliases the document that later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigHandle(u64);

impl ConfigHandle {
    /// Build a handle from a slot index and generation.
    pub const fn from_parts(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64 + 1))
    }

    /// Reconstruct a handle from its raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value handed to callers.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Slot index, or `None` for a value no registry could have issued.
    pub const fn index(&self) -> Option<u32> {
        let low = (self.0 & 0xffff_ffff) as u32;
        if low == 0 {
            None
        } else {
            Some(low - 1)
        }
    }

    /// Slot generation.
    pub const fn generation(&self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(index) => write!(f, "ConfigHandle({}@{})", index, self.generation()),
            None => write!(f, "ConfigHandle(invalid:{})", self.0),
        }
    }
}

impl fmt::Display for ConfigHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a persisted configuration document.
///
/// Derived from the Blake3 hash of the document's canonical bytes, so the
/// same document always maps to the same ID. Never zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(pub u32);

impl ConfigId {
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigId({})", self.0)
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric ID of a data source within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceId(pub i64);

impl fmt::Display for DataSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric ID of an attribute type within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(pub i64);

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_parts_roundtrip() {
        let handle = ConfigHandle::from_parts(7, 3);
        assert_eq!(handle.index(), Some(7));
        assert_eq!(handle.generation(), 3);
        assert_eq!(ConfigHandle::from_raw(handle.as_u64()), handle);
    }

    #[test]
    fn test_handle_is_positive() {
        assert!(ConfigHandle::from_parts(0, 0).as_u64() > 0);
    }

    #[test]
    fn test_zero_handle_has_no_index() {
        assert_eq!(ConfigHandle::from_raw(0).index(), None);
        assert_eq!(ConfigHandle::from_raw(5 << 32).index(), None);
    }

    #[test]
    fn test_generations_distinguish_handles() {
        let a = ConfigHandle::from_parts(0, 1);
        let b = ConfigHandle::from_parts(0, 2);
        assert_ne!(a, b);
        assert_eq!(a.index(), b.index());
    }

    #[test]
    fn test_handle_debug() {
        let debug = format!("{:?}", ConfigHandle::from_parts(2, 9));
        assert_eq!(debug, "ConfigHandle(2@9)");
    }
}
