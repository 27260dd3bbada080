use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use clientprint_probes::{builtin_registry, evaluate_spec, Host, HostCapabilities};

use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct ProbeInfo {
    pub id: String,
    pub category: &'static str,
    pub name: String,
    pub version: String,
    pub asynchronous: bool,
    pub wants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ProbesOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostCapabilities>,
    pub probes: Vec<ProbeInfo>,
}

pub async fn run(host_path: Option<&Path>) -> Result<()> {
    let registry = builtin_registry()?;
    let caps = match host_path {
        Some(p) => Some(input::load_host(Some(p))?.capabilities()),
        None => None,
    };

    let probes: Vec<ProbeInfo> = registry
        .list()
        .into_iter()
        .map(|spec| {
            let ev = caps.as_ref().map(|c| evaluate_spec(spec, c));
            ProbeInfo {
                id: spec.id.as_str().to_string(),
                category: spec.category.key(),
                name: spec.name.clone(),
                version: spec.version.clone(),
                asynchronous: spec.asynchronous,
                wants: spec
                    .wants
                    .iter()
                    .filter(|(_, w)| **w)
                    .map(|(k, _)| k.clone())
                    .collect(),
                status: ev.as_ref().map(|e| e.label()),
                missing: ev.map(|e| e.missing).unwrap_or_default(),
                meta: spec.meta.clone(),
            }
        })
        .collect();

    if output::is_json() {
        return output::print(&ProbesOut { host: caps, probes });
    }

    output::heading("probes")?;
    for p in &probes {
        let wants = if p.wants.is_empty() {
            "-".to_string()
        } else {
            p.wants.join(",")
        };
        let detail = format!("{} v{} wants={wants}", p.name, p.version);
        match p.status {
            Some(_) => output::status(p.missing.is_empty(), &p.id, &detail)?,
            None => output::field(&p.id, &detail)?,
        }
    }
    Ok(())
}
