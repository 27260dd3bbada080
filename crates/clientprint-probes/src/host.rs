//! Host environment boundary for clientprint probes.
//!
//! Probes never touch a browser or OS directly. Everything they read goes
//! through the traits in this module:
//! - `Host`: identity strings, plugin list, connection hints, and factories
//!   for drawing, GPU and offline-audio contexts
//! - `Canvas2d`: text metrics and a raster export
//! - `WebGlContext`: GPU description strings, parameters and pixel readback
//! - `OfflineAudioContext`: one-shot offline rendering with a completion
//!   notification
//!
//! Absence is modelled with `Option`: a factory returning `None` means the
//! capability does not exist on this host. Probes turn absence into their
//! sentinel value; they never fail.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use clientprint_core::model::{CompressorParams, ParamValue};

/// Declared host capabilities.
///
/// Used for reporting and for evaluating probe specs. Probes still rely on
/// the factories below returning `None` rather than on these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostCapabilities {
    pub canvas_2d: bool,
    pub webgl: bool,
    pub offline_audio: bool,
    pub plugins: bool,
    pub network_information: bool,
}

impl HostCapabilities {
    /// Capability keys in reporting order.
    pub const KEYS: [&'static str; 5] = [
        "canvas2d",
        "webgl",
        "offlineAudio",
        "plugins",
        "networkInformation",
    ];

    /// Look up a capability by key. Unknown keys are never available.
    pub fn has(&self, key: &str) -> bool {
        match key {
            "canvas2d" => self.canvas_2d,
            "webgl" => self.webgl,
            "offlineAudio" => self.offline_audio,
            "plugins" => self.plugins,
            "networkInformation" => self.network_information,
            _ => false,
        }
    }

    pub fn all() -> Self {
        Self {
            canvas_2d: true,
            webgl: true,
            offline_audio: true,
            plugins: true,
            network_information: true,
        }
    }
}

/// Errors surfaced by host contexts.
///
/// Probes catch these and fall back; they never reach `collect()` callers.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("context lost")]
    ContextLost,

    #[error("readback failed: {0}")]
    ReadbackFailed(String),
}

/// One plugin as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub name: String,
    #[serde(default)]
    pub filename: Option<String>,
}

impl PluginEntry {
    pub fn new(name: impl Into<String>, filename: Option<&str>) -> Self {
        Self {
            name: name.into(),
            filename: filename.map(str::to_string),
        }
    }
}

/// Network-information hints as exposed by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(default)]
    pub downlink: Option<f64>,
    #[serde(default)]
    pub effective_type: Option<String>,
    #[serde(default)]
    pub rtt: Option<f64>,
    #[serde(default)]
    pub save_data: Option<bool>,
    #[serde(default, rename = "type")]
    pub connection_type: Option<String>,
}

/// Unmasked GPU strings from the debug-renderer-info extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmaskedRendererInfo {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub renderer: Option<String>,
}

/// A 2D drawing surface.
pub trait Canvas2d {
    fn set_text_baseline(&mut self, baseline: &str);

    /// Set the current font, CSS shorthand (e.g. `72px 'Menlo',monospace`).
    fn set_font(&mut self, font: &str);

    fn set_fill_style(&mut self, style: &str);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;

    /// Export the surface as an opaque data URL.
    fn to_data_url(&self) -> String;
}

/// A WebGL rendering context.
pub trait WebGlContext {
    /// `None` when the debug-renderer-info extension is unavailable.
    fn debug_renderer_info(&self) -> Option<UnmaskedRendererInfo>;

    fn version(&self) -> String;

    fn shading_language_version(&self) -> String;

    /// `None` when the context reports no extension list.
    fn supported_extensions(&self) -> Option<Vec<String>>;

    /// Numeric parameter by GL enum name; `None` when the context returns nothing.
    fn parameter(&self, name: &str) -> Option<ParamValue>;

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);

    fn clear_color_buffer(&mut self);

    /// Read back a `width x height` RGBA region starting at the origin.
    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, HostError>;
}

/// Oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorNode {
    pub waveform: Waveform,
    pub frequency: f64,
    /// Start time in seconds.
    pub start: f64,
}

/// The render graph: one oscillator feeding one dynamics compressor feeding
/// the destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioGraph {
    pub oscillator: OscillatorNode,
    pub compressor: CompressorParams,
}

/// Output of an offline render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBuffer {
    pub sample_rate: f64,
    pub length: usize,
    /// Sample data per channel.
    pub channels: Vec<Vec<f32>>,
    /// Compressor settings as read back after rendering.
    pub compressor: CompressorParams,
}

impl RenderedBuffer {
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }
}

/// Completion notification for an offline render.
///
/// The sender side is fired exactly once by the host when rendering ends.
/// A dropped sender means the render was abandoned.
pub type RenderCompletion = oneshot::Receiver<RenderedBuffer>;

/// An offline (faster than real time) audio context.
pub trait OfflineAudioContext: Send {
    /// Start rendering the graph. Returns immediately; the buffer arrives on
    /// the returned completion channel.
    fn start_rendering(self: Box<Self>, graph: AudioGraph) -> RenderCompletion;
}

/// The host environment seen by probes.
pub trait Host: Send + Sync {
    fn capabilities(&self) -> HostCapabilities;

    /// Raw user-agent string.
    fn user_agent(&self) -> String;

    /// Create a 2D drawing surface; `None` when no 2D context exists.
    fn create_canvas(&self, width: u32, height: u32) -> Option<Box<dyn Canvas2d>>;

    /// Installed plugins; `None` when the host exposes no plugin list.
    fn plugins(&self) -> Option<Vec<PluginEntry>>;

    /// Create a WebGL context by context id (`webgl`, `experimental-webgl`).
    fn create_webgl_context(&self, context_id: &str) -> Option<Box<dyn WebGlContext>>;

    fn create_offline_audio_context(
        &self,
        channels: u32,
        length: usize,
        sample_rate: f64,
    ) -> Option<Box<dyn OfflineAudioContext>>;

    /// Network-information hints; `None` when the capability is absent.
    fn connection(&self) -> Option<ConnectionInfo>;

    fn on_line(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_lookup_by_key() {
        let caps = HostCapabilities {
            canvas_2d: true,
            webgl: false,
            offline_audio: true,
            plugins: false,
            network_information: false,
        };
        assert!(caps.has("canvas2d"));
        assert!(!caps.has("webgl"));
        assert!(caps.has("offlineAudio"));
        assert!(!caps.has("clock"));
        assert!(HostCapabilities::KEYS.iter().all(|k| HostCapabilities::all().has(k)));
    }

    #[test]
    fn connection_info_reads_camel_case() {
        let c: ConnectionInfo = serde_json::from_str(
            r#"{"downlink":10,"effectiveType":"4g","rtt":50,"saveData":false,"type":"wifi"}"#,
        )
        .unwrap();
        assert_eq!(c.effective_type.as_deref(), Some("4g"));
        assert_eq!(c.connection_type.as_deref(), Some("wifi"));
        assert_eq!(c.save_data, Some(false));
    }
}
