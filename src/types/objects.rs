//! Object tally types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::BackendError;

/// Label -> occurrence count for one object poll.
///
/// Only positive counts are stored; an absent label means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCounts(BTreeMap<String, u32>);

impl ObjectCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the raw wire mapping. Zero counts are dropped, negative or
    /// oversized counts make the whole poll malformed.
    pub fn from_raw(raw: BTreeMap<String, i64>) -> Result<Self, BackendError> {
        let mut counts = BTreeMap::new();
        for (label, count) in raw {
            let count = u32::try_from(count).map_err(|_| {
                BackendError::decode(
                    "/object_status",
                    format!("invalid count {} for {:?}", count, label),
                )
            })?;
            if count > 0 {
                counts.insert(label, count);
            }
        }
        Ok(Self(counts))
    }

    /// Count for `label`, zero when absent
    pub fn get(&self, label: &str) -> u32 {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for ObjectCounts {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, count)| (label.into(), count))
                .filter(|(_, count)| *count > 0)
                .collect(),
        )
    }
}

/// One row of the tally list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub label: String,
    pub count: u32,
}

/// Aggregated view of one object poll: rows by descending count plus total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTally {
    pub entries: Vec<ObjectEntry>,
    pub total: u64,
}

impl ObjectTally {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in display order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }
}
