//! NTN-QoF context
//!
//! Everything the engine reads at request time, built once from the
//! configuration file and shared behind an `Arc`. Nothing in it changes after
//! start-up, so concurrent requests read it without locking.

use ntnqof_common::{NtnConfig, QofError, QofResult};
use tracing::info;

use crate::resolver::{ClassifierAgent, ClassifierSide};
use crate::translate::{QosTable, SliceRecord, SliceTable};

/// Immutable NTN-QoF state.
#[derive(Debug, Clone)]
pub struct NtnContext {
    /// Instance name
    pub name: String,
    /// Terrestrial to satellite marking
    pub qos: QosTable,
    /// Satellite slices
    pub slices: SliceTable,
    /// Whether classifiers enforce per-slice budgets
    pub slice_aware: bool,
    ran_classifier: ClassifierAgent,
    cn_classifier: ClassifierAgent,
}

impl NtnContext {
    /// Assembles the context from explicit parts.
    pub fn new(
        name: impl Into<String>,
        qos: QosTable,
        slices: SliceTable,
        slice_aware: bool,
        ran_classifier: ClassifierAgent,
        cn_classifier: ClassifierAgent,
    ) -> Self {
        Self {
            name: name.into(),
            qos,
            slices,
            slice_aware,
            ran_classifier,
            cn_classifier,
        }
    }

    /// Builds the context from a loaded configuration.
    pub fn from_config(config: &NtnConfig) -> QofResult<Self> {
        let c = &config.configuration;
        let classifiers = c
            .classifiers
            .as_ref()
            .ok_or_else(|| QofError::ConfigurationMissing("classifiers".to_string()))?;
        let ran = classifiers
            .ran
            .as_ref()
            .ok_or_else(|| QofError::ConfigurationMissing("classifiers.ran".to_string()))?;
        let cn = classifiers
            .cn
            .as_ref()
            .ok_or_else(|| QofError::ConfigurationMissing("classifiers.cn".to_string()))?;

        let ctx = Self::new(
            c.ntn_name.clone(),
            QosTable::new(c.qos.iter().map(|(k, v)| (*k, *v))),
            SliceTable::new(c.slice.iter().map(SliceRecord::from).collect())?,
            c.slice_aware,
            ClassifierAgent::from_config(ClassifierSide::Ran, ran)?,
            ClassifierAgent::from_config(ClassifierSide::Cn, cn)?,
        );

        info!(
            name = %ctx.name,
            qos_entries = ctx.qos.len(),
            slices = ctx.slices.len(),
            slice_aware = ctx.slice_aware,
            "NTN context initialised"
        );
        Ok(ctx)
    }

    /// Classifier agent on `side`.
    pub fn classifier(&self, side: ClassifierSide) -> &ClassifierAgent {
        match side {
            ClassifierSide::Ran => &self.ran_classifier,
            ClassifierSide::Cn => &self.cn_classifier,
        }
    }
}
