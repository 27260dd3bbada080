//! Plugin-list probe.

use clientprint_core::model::{Category, PluginSignal};

use crate::host::{Host, PluginEntry};
use crate::spec::ProbeSpec;

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.plugins", Category::Plugins, "Plugin list", "0.1.0")
        .want("plugins", true)
}

/// `"<name> (<filename>)"`, or just the name when the filename is missing or empty.
pub fn format_plugin(entry: &PluginEntry) -> String {
    match entry.filename.as_deref() {
        Some(f) if !f.is_empty() => format!("{} ({f})", entry.name),
        _ => entry.name.clone(),
    }
}

pub fn probe_plugins(host: &dyn Host) -> PluginSignal {
    let entries = host.plugins().unwrap_or_default();
    PluginSignal(entries.iter().map(format_plugin).collect())
}
