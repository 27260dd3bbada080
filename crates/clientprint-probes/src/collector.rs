//! Aggregation of probe results into a `SignalRecord`.
//!
//! `Collector` runs the six synchronous sources first, then awaits the audio
//! source as the single suspension point. The record is assembled in
//! category order regardless. Collection itself never fails: every category
//! degrades to its sentinel instead.
//!
//! `generate` digests the awaited record, never a pending one.

use async_trait::async_trait;

use clientprint_core::config::{validate_config, CoreConfig};
use clientprint_core::model::{
    AudioSignal, CanvasSignal, FontSignal, NetworkSignal, PluginSignal, SignalRecord,
    UserAgentSignal, WebGlSignal,
};
use clientprint_core::{digest_with, ClientprintResult, Digest};

/// One query per record category.
#[async_trait]
pub trait SignalSource: Send + Sync {
    fn user_agent(&self) -> UserAgentSignal;
    fn fonts(&self) -> FontSignal;
    fn canvas(&self) -> CanvasSignal;
    fn plugins(&self) -> PluginSignal;
    fn webgl(&self) -> WebGlSignal;
    async fn audio(&self) -> AudioSignal;
    fn network(&self) -> NetworkSignal;
}

/// The built-in probes bound to a host.
#[cfg(feature = "builtin")]
pub struct HostProbes<H> {
    host: H,
}

#[cfg(feature = "builtin")]
impl<H: crate::host::Host> HostProbes<H> {
    pub fn new(host: H) -> Self {
        let probes = Self { host };
        probes.log_plan();
        probes
    }

    /// Log which probes will fall back on this host.
    fn log_plan(&self) {
        let registry = match crate::builtin::builtin_registry() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "builtin registry unavailable");
                return;
            }
        };
        for (spec, ev) in registry.plan(&self.host.capabilities()) {
            if !ev.full {
                tracing::info!(
                    probe = spec.id.as_str(),
                    missing = ?ev.missing,
                    "probe will report a fallback value"
                );
            }
        }
    }
}

#[cfg(feature = "builtin")]
#[async_trait]
impl<H: crate::host::Host> SignalSource for HostProbes<H> {
    fn user_agent(&self) -> UserAgentSignal {
        crate::builtin::user_agent::probe_user_agent(&self.host)
    }

    fn fonts(&self) -> FontSignal {
        crate::builtin::fonts::probe_fonts(&self.host)
    }

    fn canvas(&self) -> CanvasSignal {
        crate::builtin::canvas::probe_canvas(&self.host)
    }

    fn plugins(&self) -> PluginSignal {
        crate::builtin::plugins::probe_plugins(&self.host)
    }

    fn webgl(&self) -> WebGlSignal {
        crate::builtin::webgl::probe_webgl(&self.host)
    }

    async fn audio(&self) -> AudioSignal {
        crate::builtin::audio::probe_audio(&self.host).await
    }

    fn network(&self) -> NetworkSignal {
        crate::builtin::network::probe_network(&self.host)
    }
}

/// Aggregator over a signal source.
pub struct Collector<S> {
    source: S,
    config: CoreConfig,
}

impl<S: SignalSource> Collector<S> {
    /// Collector with the default configuration (sha256, unbounded audio wait).
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: CoreConfig::default(),
        }
    }

    pub fn with_config(source: S, config: CoreConfig) -> ClientprintResult<Self> {
        validate_config(&config)?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    async fn audio(&self) -> AudioSignal {
        match self.config.collection.audio_timeout {
            None => self.source.audio().await,
            Some(bound) => match tokio::time::timeout(bound, self.source.audio()).await {
                Ok(signal) => signal,
                Err(_) => {
                    tracing::warn!(timeout_ms = bound.as_millis() as u64, "audio render timed out");
                    AudioSignal::TimedOut
                }
            },
        }
    }

    /// Run every probe and assemble the record.
    pub async fn collect(&self) -> SignalRecord {
        let user_agent = self.source.user_agent();
        let fonts = self.source.fonts();
        let canvas = self.source.canvas();
        let plugins = self.source.plugins();
        let webgl = self.source.webgl();
        let network = self.source.network();
        let audio = self.audio().await;

        tracing::debug!(
            fonts = fonts.0.len(),
            plugins = plugins.0.len(),
            webgl = webgl.0.is_some(),
            audio = audio.is_supported(),
            "signals collected"
        );

        SignalRecord {
            user_agent,
            fonts,
            canvas,
            plugins,
            webgl,
            audio,
            network,
        }
    }

    /// Collect, then digest the completed record.
    pub async fn generate(&self) -> ClientprintResult<Digest> {
        let record = self.collect().await;
        let d = digest_with(&record, &self.config.hashing)?;
        tracing::info!(digest = %d, "fingerprint generated");
        Ok(d)
    }
}

/// Collect with the default configuration.
pub async fn collect<S: SignalSource + ?Sized>(source: &S) -> SignalRecord {
    Collector::new(source).collect().await
}

/// Collect and digest with the default configuration.
pub async fn generate<S: SignalSource + ?Sized>(source: &S) -> ClientprintResult<Digest> {
    Collector::new(source).generate().await
}

#[async_trait]
impl<'a, S: SignalSource + ?Sized> SignalSource for &'a S {
    fn user_agent(&self) -> UserAgentSignal {
        (**self).user_agent()
    }
    fn fonts(&self) -> FontSignal {
        (**self).fonts()
    }
    fn canvas(&self) -> CanvasSignal {
        (**self).canvas()
    }
    fn plugins(&self) -> PluginSignal {
        (**self).plugins()
    }
    fn webgl(&self) -> WebGlSignal {
        (**self).webgl()
    }
    async fn audio(&self) -> AudioSignal {
        (**self).audio().await
    }
    fn network(&self) -> NetworkSignal {
        (**self).network()
    }
}
