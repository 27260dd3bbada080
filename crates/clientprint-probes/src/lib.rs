//! clientprint-probes
//!
//! Signal collection for clientprint:
//! - `host`: the traits a client environment implements
//! - `builtin`: one probe per record category
//! - `spec` / `registry`: static probe declarations and capability planning
//! - `collector`: the aggregator producing a `SignalRecord` and its digest
//! - `profile`: a JSON-described software host for running without a browser
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use clientprint_probes::{generate, HostProbes, ProfileHost, HostProfile};
//!
//! let probes = HostProbes::new(ProfileHost::new(HostProfile::reference()?));
//! let digest = generate(&probes).await?;
//! println!("{digest}");
//! # Ok(())
//! # }
//! ```

pub mod builtin;
pub mod collector;
pub mod host;
pub mod profile;
pub mod registry;
pub mod spec;

pub use crate::collector::{collect, generate, Collector, SignalSource};
pub use crate::host::{Host, HostCapabilities, HostError};
pub use crate::registry::ProbeRegistry;
pub use crate::spec::{evaluate_spec, ProbeSpec, SpecEvaluation};

#[cfg(feature = "builtin")]
pub use crate::builtin::builtin_registry;
#[cfg(feature = "builtin")]
pub use crate::collector::HostProbes;

#[cfg(feature = "profile")]
pub use crate::profile::{HostProfile, ProfileHost};
