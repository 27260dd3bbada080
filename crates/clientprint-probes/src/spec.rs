//! Probe specification types for clientprint.
//!
//! A spec is the static declaration of one probe:
//! - identity (id, display name, version)
//! - the record category it fills
//! - the host capabilities it wants
//!
//! Specs are used for:
//! - registry metadata and listing
//! - predicting which probes will degrade on a given host
//!
//! Specs are data-only and never query the host.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use clientprint_core::model::Category;

use crate::host::HostCapabilities;

/// Stable probe identifier, e.g. `"builtin.webgl"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProbeId(pub String);

impl ProbeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Static description of a probe.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeSpec {
    pub id: ProbeId,

    /// Record slot this probe fills.
    pub category: Category,

    /// Human-readable display name.
    pub name: String,

    pub version: String,

    /// Host capabilities the probe wants. A missing wanted capability does
    /// not stop the probe; it predicts a sentinel or degraded value.
    pub wants: BTreeMap<String, bool>,

    /// Whether the probe suspends (only the audio probe does).
    pub asynchronous: bool,

    pub meta: BTreeMap<String, String>,
}

impl ProbeSpec {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: ProbeId::new(id),
            category,
            name: name.into(),
            version: version.into(),
            wants: BTreeMap::new(),
            asynchronous: false,
            meta: BTreeMap::new(),
        }
    }

    pub fn want(mut self, key: impl Into<String>, value: bool) -> Self {
        self.wants.insert(key.into(), value);
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Validate spec for basic quality constraints.
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            anyhow::bail!("probe id is empty");
        }
        if !self.id.as_str().is_ascii() {
            anyhow::bail!("probe id must be ASCII");
        }
        if self.name.trim().is_empty() {
            anyhow::bail!("probe name is empty");
        }
        if self.version.trim().is_empty() {
            anyhow::bail!("probe version is empty");
        }
        for key in self.wants.keys() {
            if !HostCapabilities::KEYS.contains(&key.as_str()) {
                anyhow::bail!("probe {} wants unknown capability: {key}", self.id.as_str());
            }
        }
        Ok(())
    }
}

/// Outcome of evaluating a spec against a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecEvaluation {
    /// True when every wanted capability is present.
    pub full: bool,

    /// Wanted capabilities the host lacks.
    pub missing: Vec<String>,
}

impl SpecEvaluation {
    pub fn full() -> Self {
        Self {
            full: true,
            missing: Vec::new(),
        }
    }

    pub fn degraded(missing: Vec<String>) -> Self {
        Self {
            full: false,
            missing,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.full {
            "full"
        } else {
            "degraded"
        }
    }
}

/// Evaluate which wanted capabilities a host lacks.
pub fn evaluate_spec(spec: &ProbeSpec, host: &HostCapabilities) -> SpecEvaluation {
    let missing: Vec<String> = spec
        .wants
        .iter()
        .filter(|(k, wants)| **wants && !host.has(k))
        .map(|(k, _)| k.clone())
        .collect();

    if missing.is_empty() {
        SpecEvaluation::full()
    } else {
        SpecEvaluation::degraded(missing)
    }
}
