use anyhow::Result;
use serde::Serialize;

use clientprint_core::config::HashAlgorithm;
use clientprint_probes::{builtin_registry, HostProfile};

use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

fn checks() -> Vec<Check> {
    let mut checks: Vec<Check> = HashAlgorithm::all()
        .into_iter()
        .map(|alg| Check {
            name: format!("hash:{}", alg.as_str()),
            ok: alg.is_available(),
            detail: if alg.is_available() {
                "compiled in".to_string()
            } else {
                "not compiled in (enable the cargo feature)".to_string()
            },
        })
        .collect();

    checks.push(match builtin_registry() {
        Ok(reg) if reg.uncovered().is_empty() => Check {
            name: "probes".to_string(),
            ok: true,
            detail: format!("{} builtin probes, every category covered", reg.len()),
        },
        Ok(reg) => Check {
            name: "probes".to_string(),
            ok: false,
            detail: format!("uncovered categories: {:?}", reg.uncovered()),
        },
        Err(e) => Check {
            name: "probes".to_string(),
            ok: false,
            detail: e.to_string(),
        },
    });

    checks.push(match HostProfile::reference() {
        Ok(_) => Check {
            name: "reference-profile".to_string(),
            ok: true,
            detail: "bundled host profile parses".to_string(),
        },
        Err(e) => Check {
            name: "reference-profile".to_string(),
            ok: false,
            detail: format!("{e:#}"),
        },
    });

    checks
}

pub async fn run() -> Result<()> {
    let checks = checks();
    // Only the default digest primitive is required.
    let ok = checks
        .iter()
        .all(|c| c.ok || c.name == format!("hash:{}", HashAlgorithm::Blake3.as_str()));

    if output::is_json() {
        return output::print(&DoctorOut { ok, checks });
    }

    output::heading("doctor")?;
    for c in &checks {
        output::status(c.ok, &c.name, &c.detail)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_passes_required_checks() {
        let checks = checks();
        let sha = checks.iter().find(|c| c.name == "hash:sha256").unwrap();
        assert!(sha.ok);
        assert!(checks.iter().filter(|c| !c.name.starts_with("hash:")).all(|c| c.ok));
    }
}
