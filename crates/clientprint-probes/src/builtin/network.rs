//! Network-hint probe.

use clientprint_core::model::{Category, NetworkSignal};

use crate::host::Host;
use crate::spec::ProbeSpec;

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.network", Category::Network, "Network hints", "0.1.0")
        .want("networkInformation", true)
}

pub fn probe_network(host: &dyn Host) -> NetworkSignal {
    let online = host.on_line();
    match host.connection() {
        Some(c) => NetworkSignal {
            downlink: c.downlink,
            effective_type: c.effective_type,
            rtt: c.rtt,
            save_data: c.save_data,
            connection_type: c.connection_type,
            online,
        },
        None => NetworkSignal::online_only(online),
    }
}
