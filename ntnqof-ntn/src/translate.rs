//! Translation Tables
//!
//! Static lookups loaded once from configuration: terrestrial DSCP to
//! satellite DSCP, and satellite slice id to slice record. Every lookup
//! returns an explicit not-found error; a configured zero is a real value.

use std::collections::HashMap;

use ntnqof_common::{Dscp, QofError, QofResult, SliceConfig, SliceId};

/// Terrestrial DSCP to satellite DSCP mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QosTable {
    map: HashMap<Dscp, Dscp>,
}

impl QosTable {
    /// Builds the table from `(terrestrial, satellite)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (Dscp, Dscp)>) -> Self {
        Self {
            map: entries.into_iter().collect(),
        }
    }

    /// Satellite marking for `terrestrial`.
    pub fn translate(&self, terrestrial: Dscp) -> QofResult<Dscp> {
        self.map
            .get(&terrestrial)
            .copied()
            .ok_or_else(|| QofError::not_found("qos", terrestrial))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One traffic slice known to the satellite domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRecord {
    /// Slice id
    pub slice_id: SliceId,
    /// Satellite-side tunnel address behind the RAN classifier
    pub ran_endpoint: String,
    /// Satellite-side tunnel address behind the CN classifier
    pub cn_endpoint: String,
    /// Forward (core to RAN) throughput budget
    pub forward_budget: u64,
    /// Return (RAN to core) throughput budget
    pub return_budget: u64,
}

impl From<&SliceConfig> for SliceRecord {
    fn from(cfg: &SliceConfig) -> Self {
        Self {
            slice_id: cfg.slice_id,
            ran_endpoint: cfg.classifier_ran_endpoint.clone(),
            cn_endpoint: cfg.classifier_cn_endpoint.clone(),
            forward_budget: cfg.forward,
            return_budget: cfg.return_,
        }
    }
}

/// Ordered list of slice records.
///
/// Tables hold tens of entries, so lookups are a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceTable {
    records: Vec<SliceRecord>,
}

impl SliceTable {
    /// Builds the table, rejecting duplicate ids.
    pub fn new(records: Vec<SliceRecord>) -> QofResult<Self> {
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|r| r.slice_id == record.slice_id) {
                return Err(QofError::ConfigurationMissing(format!(
                    "slice id {} is configured more than once",
                    record.slice_id
                )));
            }
        }
        Ok(Self { records })
    }

    /// Record for `slice_id`.
    pub fn resolve(&self, slice_id: SliceId) -> QofResult<&SliceRecord> {
        self.records
            .iter()
            .find(|r| r.slice_id == slice_id)
            .ok_or_else(|| QofError::not_found("slice", slice_id))
    }

    /// All records in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &SliceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
