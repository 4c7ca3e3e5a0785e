//! QoF context
//!
//! Terrestrial slice table and 5QI marking table, loaded once and shared
//! behind an `Arc`.

use std::collections::HashMap;

use ntnqof_common::{Dscp, FiveQi, QofConfig, QofError, QofResult, QofSliceConfig, SNssai};
use tracing::info;

/// Immutable QoF state.
#[derive(Debug, Clone)]
pub struct QofContext {
    /// Instance name
    pub name: String,
    /// NTN-QoF base URI, without a trailing slash
    pub ntn_uri: String,
    qos: HashMap<FiveQi, Dscp>,
    slices: Vec<QofSliceConfig>,
}

impl QofContext {
    pub fn new(
        name: impl Into<String>,
        ntn_uri: &str,
        qos: impl IntoIterator<Item = (FiveQi, Dscp)>,
        slices: Vec<QofSliceConfig>,
    ) -> Self {
        Self {
            name: name.into(),
            ntn_uri: ntn_uri.trim_end_matches('/').to_string(),
            qos: qos.into_iter().collect(),
            slices,
        }
    }

    /// Builds the context from a loaded configuration.
    pub fn from_config(config: &QofConfig) -> QofResult<Self> {
        let c = &config.configuration;
        let ntn_uri = c
            .ntn_uri
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| QofError::ConfigurationMissing("ntnUri".to_string()))?;

        let ctx = Self::new(
            c.qof_name.clone(),
            ntn_uri,
            c.qos.iter().map(|(k, v)| (*k, *v)),
            c.slice.clone(),
        );
        info!(
            name = %ctx.name,
            ntn_uri = %ctx.ntn_uri,
            qos_entries = ctx.qos.len(),
            slices = ctx.slices.len(),
            "QoF context initialised"
        );
        Ok(ctx)
    }

    /// Slice whose S-NSSAI matches on both SST and SD.
    pub fn resolve_snssai(&self, snssai: &SNssai) -> QofResult<&QofSliceConfig> {
        self.slices
            .iter()
            .find(|s| s.snssai.matches(snssai))
            .ok_or_else(|| QofError::not_found("s-nssai", snssai))
    }

    /// DSCP marking for a 5QI.
    pub fn translate_5qi(&self, five_qi: FiveQi) -> QofResult<Dscp> {
        self.qos
            .get(&five_qi)
            .copied()
            .ok_or_else(|| QofError::not_found("5qi", five_qi))
    }

    /// Slice flagged `default`, if any.
    pub fn default_slice(&self) -> Option<&QofSliceConfig> {
        self.slices.iter().find(|s| s.default)
    }

    /// `{ntnUri}{path}`
    pub fn ntn_url(&self, path: &str) -> String {
        format!("{}{}", self.ntn_uri, path)
    }
}
