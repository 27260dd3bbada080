//! Built-in probes, one per record category.
//!
//! Each probe module exposes:
//! - `spec()`: its static `ProbeSpec`
//! - `probe_*`: the query against a `Host`
//!
//! Probes never fail. A missing capability becomes that category's sentinel
//! value and a failed sub-read becomes an omitted field.

#![cfg(feature = "builtin")]

pub mod audio;
pub mod canvas;
pub mod fonts;
pub mod network;
pub mod plugins;
pub mod user_agent;
pub mod webgl;

use crate::registry::ProbeRegistry;
use crate::spec::ProbeSpec;

/// Built-in probe ids, in record order.
pub const BUILTIN_PROBE_IDS: [&str; 7] = [
    "builtin.user_agent",
    "builtin.fonts",
    "builtin.canvas",
    "builtin.plugins",
    "builtin.webgl",
    "builtin.audio",
    "builtin.network",
];

/// Specs for all built-in probes, in record order.
pub fn builtin_specs() -> Vec<ProbeSpec> {
    vec![
        user_agent::spec(),
        fonts::spec(),
        canvas::spec(),
        plugins::spec(),
        webgl::spec(),
        audio::spec(),
        network::spec(),
    ]
}

pub fn register_builtins(registry: &mut ProbeRegistry) -> anyhow::Result<()> {
    for spec in builtin_specs() {
        registry.register(spec)?;
    }
    Ok(())
}

/// A registry holding exactly the built-in probes.
pub fn builtin_registry() -> anyhow::Result<ProbeRegistry> {
    let mut registry = ProbeRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}
