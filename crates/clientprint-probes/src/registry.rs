//! Probe registry for clientprint.
//!
//! The registry stores probe specs keyed by record category.
//!
//! Requirements:
//! - exactly one probe per category
//! - iteration in record order (the `Category` ordering)
//! - no global mutable state
//!
//! The registry does not run probes; `collector` does.

use std::collections::BTreeMap;

use clientprint_core::model::Category;

use crate::host::HostCapabilities;
use crate::spec::{evaluate_spec, ProbeSpec, SpecEvaluation};

/// Probe specs keyed by category.
#[derive(Debug, Clone, Default)]
pub struct ProbeRegistry {
    probes: BTreeMap<Category, ProbeSpec>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Register a probe spec. A category may only be claimed once.
    pub fn register(&mut self, spec: ProbeSpec) -> anyhow::Result<()> {
        spec.validate()?;

        if let Some(existing) = self.probes.get(&spec.category) {
            anyhow::bail!(
                "category {} already claimed by {}",
                spec.category,
                existing.id.as_str()
            );
        }

        self.probes.insert(spec.category, spec);
        Ok(())
    }

    /// Specs in record order.
    pub fn list(&self) -> Vec<&ProbeSpec> {
        self.probes.values().collect()
    }

    /// Categories with no registered probe.
    pub fn uncovered(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| !self.probes.contains_key(c))
            .collect()
    }

    /// Evaluate every spec against a host, in record order.
    pub fn plan(&self, host: &HostCapabilities) -> Vec<(&ProbeSpec, SpecEvaluation)> {
        self.probes
            .values()
            .map(|spec| (spec, evaluate_spec(spec, host)))
            .collect()
    }
}
