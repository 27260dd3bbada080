//! Collection contract tests.
//!
//! These tests exercise the aggregator end to end:
//! - every record carries all seven categories, in order, on any host
//! - capability-absent categories hold their sentinel values
//! - the audio probe suspends until the host's completion fires
//! - `generate` digests the completed record

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use clientprint_core::config::{CollectionConfig, CoreConfig};
use clientprint_core::determinism::canonical_json::to_canonical_bytes;
use clientprint_core::model::{
    AudioSignal, CanvasSignal, Category, FontSignal, NetworkSignal, PluginSignal, SignalRecord,
    UserAgentSignal, WebGlSignal,
};
use clientprint_core::digest;

use clientprint_probes::builtin::audio::COMPRESSOR;
use clientprint_probes::host::{
    AudioGraph, Canvas2d, ConnectionInfo, Host, HostCapabilities, OfflineAudioContext,
    PluginEntry, RenderCompletion, RenderedBuffer, WebGlContext,
};
use clientprint_probes::{collect, generate, Collector, HostProbes, HostProfile, ProfileHost, SignalSource};

fn keys(record: &SignalRecord) -> Vec<String> {
    record
        .to_value()
        .unwrap()
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

fn expected_keys() -> Vec<String> {
    Category::ALL.iter().map(|c| c.key().to_string()).collect()
}

#[tokio::test]
async fn headless_host_yields_every_sentinel() {
    let probes = HostProbes::new(ProfileHost::new(HostProfile::default()));
    let record = collect(&probes).await;

    let canonical = String::from_utf8(to_canonical_bytes(&record).unwrap()).unwrap();
    assert_eq!(
        canonical,
        concat!(
            r#"{"userAgent":{"browser":"","version":"","os":"","osVersion":"","platform":"","engine":"","raw":""},"#,
            r#""fonts":[],"canvas":"Canvas API not supported","plugins":[],"webgl":null,"#,
            r#""audio":{"supported":false},"network":{"online":false}}"#
        )
    );
}

#[tokio::test]
async fn every_capability_combination_keeps_all_categories() {
    let reference = HostProfile::reference().unwrap();

    for mask in 0u8..32 {
        let mut p = reference.clone();
        if mask & 1 != 0 {
            p.canvas = None;
        }
        if mask & 2 != 0 {
            p.plugins = None;
        }
        if mask & 4 != 0 {
            p.webgl = None;
        }
        if mask & 8 != 0 {
            p.audio = None;
        }
        if mask & 16 != 0 {
            p.connection = None;
        }

        let record = collect(&HostProbes::new(ProfileHost::new(p))).await;
        assert_eq!(keys(&record), expected_keys(), "mask {mask:05b}");

        assert_eq!(mask & 1 != 0, record.canvas == CanvasSignal::Unsupported);
        assert_eq!(mask & 1 != 0, record.fonts.0.is_empty());
        assert_eq!(mask & 2 != 0, record.plugins.0.is_empty());
        assert_eq!(mask & 4 != 0, record.webgl.0.is_none());
        assert_eq!(mask & 8 != 0, !record.audio.is_supported());
        assert_eq!(mask & 16 != 0, record.network == NetworkSignal::online_only(true));
    }
}

#[tokio::test]
async fn reference_host_record() {
    let record = collect(&HostProbes::new(ProfileHost::new(HostProfile::reference().unwrap()))).await;

    assert_eq!(record.user_agent.browser, "Firefox");
    assert_eq!(record.user_agent.engine, "Gecko");
    assert_eq!(
        record.fonts,
        FontSignal(vec![
            "Ubuntu".into(),
            "DejaVu Sans".into(),
            "Liberation Sans".into(),
            "Noto Sans".into(),
        ])
    );
    assert_eq!(
        record.plugins,
        PluginSignal(vec![
            "PDF Viewer (internal-pdf-viewer)".into(),
            "Chrome PDF Viewer (internal-pdf-viewer)".into(),
            "WebKit built-in PDF".into(),
        ])
    );

    let gl = record.webgl.0.as_ref().unwrap();
    assert_eq!(gl.vendor.as_deref(), Some("Mesa"));
    assert_eq!(gl.pixels_hash.as_deref(), Some("-665661440"));
    assert_eq!(gl.extensions.len(), 10);

    assert_matches!(&record.audio, AudioSignal::Rendered(a) => {
        assert_eq!(a.sample_rate, 44_100.0);
        assert_eq!(a.render_length, 44_100);
        assert_eq!(a.compressor_params, COMPRESSOR);
        assert!(a.fingerprint.parse::<f64>().unwrap() > 0.0);
    });

    assert_eq!(record.network.effective_type.as_deref(), Some("4g"));
    assert_eq!(record.network.connection_type, None);
    assert!(record.network.online);
}

#[tokio::test]
async fn readback_failure_only_drops_pixels_hash() {
    let mut p = HostProfile::reference().unwrap();
    if let Some(gl) = p.webgl.as_mut() {
        gl.readback_fails = true;
        gl.unmasked = None;
    }
    let record = collect(&HostProbes::new(ProfileHost::new(p))).await;

    let gl = record.webgl.0.as_ref().unwrap();
    assert_eq!(gl.pixels_hash, None);
    assert_eq!(gl.vendor, None);
    assert_eq!(gl.version, "WebGL 1.0");

    let v = serde_json::to_value(&record.webgl).unwrap();
    let obj = v.as_object().unwrap();
    assert!(!obj.contains_key("pixelsHash"));
    assert!(!obj.contains_key("vendor"));
}

#[tokio::test]
async fn collection_is_repeatable() {
    let probes = HostProbes::new(ProfileHost::new(HostProfile::reference().unwrap()));
    let a = collect(&probes).await;
    let b = collect(&probes).await;
    assert_eq!(a, b);

    let d = generate(&probes).await.unwrap();
    assert_eq!(d, digest(&a).unwrap());
}

/// Fixed signals, for pinning the digest of a known record.
struct FixedSource;

#[async_trait]
impl SignalSource for FixedSource {
    fn user_agent(&self) -> UserAgentSignal {
        UserAgentSignal {
            browser: "Test".into(),
            version: "1".into(),
            os: "TestOS".into(),
            os_version: "1".into(),
            platform: "desktop".into(),
            engine: "TestEngine".into(),
            raw: "ua-string".into(),
        }
    }
    fn fonts(&self) -> FontSignal {
        FontSignal(vec!["Consolas".into()])
    }
    fn canvas(&self) -> CanvasSignal {
        CanvasSignal::Rendered("data:fixed".into())
    }
    fn plugins(&self) -> PluginSignal {
        PluginSignal::default()
    }
    fn webgl(&self) -> WebGlSignal {
        WebGlSignal(None)
    }
    async fn audio(&self) -> AudioSignal {
        tokio::task::yield_now().await;
        AudioSignal::Unsupported
    }
    fn network(&self) -> NetworkSignal {
        NetworkSignal::online_only(true)
    }
}

#[tokio::test]
async fn generate_digests_the_completed_record() {
    let d = generate(&FixedSource).await.unwrap();
    assert_eq!(
        d.as_str(),
        "ca05d9317cbeb443a0764b61e5cc86acb4eea2bfeafd216039f4f01bc252028a"
    );
}

type SenderSlot = Arc<Mutex<Option<oneshot::Sender<RenderedBuffer>>>>;

/// Host whose audio render completes only when the test fires it.
struct GatedHost {
    slot: SenderSlot,
}

struct GatedAudio {
    slot: SenderSlot,
}

impl OfflineAudioContext for GatedAudio {
    fn start_rendering(self: Box<Self>, graph: AudioGraph) -> RenderCompletion {
        let _ = graph;
        let (tx, rx) = oneshot::channel();
        *self.slot.lock().unwrap() = Some(tx);
        rx
    }
}

impl Host for GatedHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            offline_audio: true,
            ..HostCapabilities::default()
        }
    }
    fn user_agent(&self) -> String {
        String::new()
    }
    fn create_canvas(&self, _: u32, _: u32) -> Option<Box<dyn Canvas2d>> {
        None
    }
    fn plugins(&self) -> Option<Vec<PluginEntry>> {
        None
    }
    fn create_webgl_context(&self, _: &str) -> Option<Box<dyn WebGlContext>> {
        None
    }
    fn create_offline_audio_context(
        &self,
        _: u32,
        _: usize,
        _: f64,
    ) -> Option<Box<dyn OfflineAudioContext>> {
        Some(Box::new(GatedAudio {
            slot: Arc::clone(&self.slot),
        }))
    }
    fn connection(&self) -> Option<ConnectionInfo> {
        None
    }
    fn on_line(&self) -> bool {
        true
    }
}

fn gated() -> (HostProbes<GatedHost>, SenderSlot) {
    let slot: SenderSlot = Arc::default();
    let host = GatedHost {
        slot: Arc::clone(&slot),
    };
    (HostProbes::new(host), slot)
}

fn buffer(samples: f32) -> RenderedBuffer {
    RenderedBuffer {
        sample_rate: 44_100.0,
        length: 44_100,
        channels: vec![vec![samples; 44_100]],
        compressor: COMPRESSOR,
    }
}

#[tokio::test]
async fn collect_suspends_until_render_completes() {
    let (probes, slot) = gated();
    let collector = Arc::new(Collector::new(probes));

    let task = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.collect().await })
    };

    while slot.lock().unwrap().is_none() {
        tokio::task::yield_now().await;
    }
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!task.is_finished(), "collect resolved before the render completed");

    let tx = slot.lock().unwrap().take().unwrap();
    tx.send(buffer(-0.5)).unwrap();

    let record = task.await.unwrap();
    assert_matches!(&record.audio, AudioSignal::Rendered(a) => {
        assert_eq!(a.fingerprint, "250");
    });
    assert_eq!(keys(&record), expected_keys());
}

#[tokio::test(start_paused = true)]
async fn bounded_wait_yields_timed_out_sentinel() {
    let (probes, slot) = gated();
    let config = CoreConfig {
        collection: CollectionConfig {
            audio_timeout: Some(Duration::from_secs(5)),
        },
        ..CoreConfig::default()
    };
    let collector = Collector::with_config(probes, config).unwrap();

    let record = collector.collect().await;
    assert_eq!(record.audio, AudioSignal::TimedOut);
    assert!(slot.lock().unwrap().is_some(), "sender must still be pending");
    assert_eq!(
        serde_json::to_string(&record.audio).unwrap(),
        r#"{"supported":false,"timedOut":true}"#
    );
}

#[tokio::test]
async fn abandoned_render_reports_unsupported() {
    let (probes, slot) = gated();
    let collector = Arc::new(Collector::new(probes));

    let task = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.collect().await })
    };
    while slot.lock().unwrap().is_none() {
        tokio::task::yield_now().await;
    }
    drop(slot.lock().unwrap().take());

    let record = task.await.unwrap();
    assert_eq!(record.audio, AudioSignal::Unsupported);
}

/// Records the order in which the collector queries each category. Audio
/// stays pending until `release` is notified.
#[derive(Default)]
struct OrderedSource {
    calls: Arc<Mutex<Vec<&'static str>>>,
    release: Arc<Notify>,
}

impl OrderedSource {
    fn log(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl SignalSource for OrderedSource {
    fn user_agent(&self) -> UserAgentSignal {
        self.log("userAgent");
        UserAgentSignal::default()
    }
    fn fonts(&self) -> FontSignal {
        self.log("fonts");
        FontSignal::default()
    }
    fn canvas(&self) -> CanvasSignal {
        self.log("canvas");
        CanvasSignal::Unsupported
    }
    fn plugins(&self) -> PluginSignal {
        self.log("plugins");
        PluginSignal::default()
    }
    fn webgl(&self) -> WebGlSignal {
        self.log("webgl");
        WebGlSignal(None)
    }
    async fn audio(&self) -> AudioSignal {
        self.log("audio");
        self.release.notified().await;
        AudioSignal::Unsupported
    }
    fn network(&self) -> NetworkSignal {
        self.log("network");
        NetworkSignal::online_only(true)
    }
}

#[tokio::test]
async fn synchronous_signals_are_read_before_audio_suspends() {
    let source = OrderedSource::default();
    let calls = Arc::clone(&source.calls);
    let release = Arc::clone(&source.release);
    let collector = Arc::new(Collector::new(source));

    let task = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.collect().await })
    };

    while !calls.lock().unwrap().contains(&"audio") {
        tokio::task::yield_now().await;
    }
    assert!(!task.is_finished());
    assert_eq!(
        *calls.lock().unwrap(),
        ["userAgent", "fonts", "canvas", "plugins", "webgl", "network", "audio"]
    );

    release.notify_one();
    let record = task.await.unwrap();
    assert_eq!(keys(&record), expected_keys());
    assert!(record.network.online);
}
