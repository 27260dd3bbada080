//! Per-category signal types.
//!
//! Serialized shapes are part of the digest contract: renaming a field or
//! reordering fields here changes every digest.

use serde::{Deserialize, Serialize};

/// Literal stored in the canvas slot when no 2D context exists.
pub const CANVAS_UNSUPPORTED: &str = "Canvas API not supported";

/// Best-effort user-agent parse. Unknown parts are empty strings, never omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAgentSignal {
    pub browser: String,
    pub version: String,
    pub os: String,
    pub os_version: String,
    pub platform: String,
    pub engine: String,
    pub raw: String,
}

/// Candidate fonts detected on the host, in candidate-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSignal(pub Vec<String>);

/// Rendered canvas export, compared as an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanvasSignal {
    Rendered(String),
    Unsupported,
}

impl From<String> for CanvasSignal {
    fn from(s: String) -> Self {
        if s == CANVAS_UNSUPPORTED {
            Self::Unsupported
        } else {
            Self::Rendered(s)
        }
    }
}

impl From<CanvasSignal> for String {
    fn from(c: CanvasSignal) -> Self {
        match c {
            CanvasSignal::Rendered(s) => s,
            CanvasSignal::Unsupported => CANVAS_UNSUPPORTED.to_string(),
        }
    }
}

/// One entry per host-reported plugin: `"<name> (<filename>)"` or `"<name>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginSignal(pub Vec<String>);

/// WebGL description; `None` (serialized as `null`) when no context could be created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebGlSignal(pub Option<WebGlInfo>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebGlInfo {
    /// Unmasked vendor; only present with the debug-renderer-info extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
    pub version: String,
    pub shading_language_version: String,
    pub extensions: Vec<String>,
    pub params: WebGlParams,
    /// Rolling hash of the readback buffer; unset when readback failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels_hash: Option<String>,
}

/// A numeric WebGL parameter: a scalar limit or a `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Range([f64; 2]),
}

/// The fixed set of nine WebGL parameters. A `None` entry means the context
/// returned nothing for that name and is serialized as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebGlParams {
    #[serde(rename = "MAX_VERTEX_ATTRIBS")]
    pub max_vertex_attribs: Option<ParamValue>,
    #[serde(rename = "MAX_VERTEX_UNIFORM_VECTORS")]
    pub max_vertex_uniform_vectors: Option<ParamValue>,
    #[serde(rename = "MAX_FRAGMENT_UNIFORM_VECTORS")]
    pub max_fragment_uniform_vectors: Option<ParamValue>,
    #[serde(rename = "MAX_TEXTURE_SIZE")]
    pub max_texture_size: Option<ParamValue>,
    #[serde(rename = "MAX_CUBE_MAP_TEXTURE_SIZE")]
    pub max_cube_map_texture_size: Option<ParamValue>,
    #[serde(rename = "MAX_RENDERBUFFER_SIZE")]
    pub max_renderbuffer_size: Option<ParamValue>,
    #[serde(rename = "MAX_VIEWPORT_DIMS")]
    pub max_viewport_dims: Option<ParamValue>,
    #[serde(rename = "ALIASED_POINT_SIZE_RANGE")]
    pub aliased_point_size_range: Option<ParamValue>,
    #[serde(rename = "ALIASED_LINE_WIDTH_RANGE")]
    pub aliased_line_width_range: Option<ParamValue>,
}

impl WebGlParams {
    /// Parameter names in serialization order.
    pub const NAMES: [&'static str; 9] = [
        "MAX_VERTEX_ATTRIBS",
        "MAX_VERTEX_UNIFORM_VECTORS",
        "MAX_FRAGMENT_UNIFORM_VECTORS",
        "MAX_TEXTURE_SIZE",
        "MAX_CUBE_MAP_TEXTURE_SIZE",
        "MAX_RENDERBUFFER_SIZE",
        "MAX_VIEWPORT_DIMS",
        "ALIASED_POINT_SIZE_RANGE",
        "ALIASED_LINE_WIDTH_RANGE",
    ];

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<ParamValue>> {
        let slot = match name {
            "MAX_VERTEX_ATTRIBS" => &mut self.max_vertex_attribs,
            "MAX_VERTEX_UNIFORM_VECTORS" => &mut self.max_vertex_uniform_vectors,
            "MAX_FRAGMENT_UNIFORM_VECTORS" => &mut self.max_fragment_uniform_vectors,
            "MAX_TEXTURE_SIZE" => &mut self.max_texture_size,
            "MAX_CUBE_MAP_TEXTURE_SIZE" => &mut self.max_cube_map_texture_size,
            "MAX_RENDERBUFFER_SIZE" => &mut self.max_renderbuffer_size,
            "MAX_VIEWPORT_DIMS" => &mut self.max_viewport_dims,
            "ALIASED_POINT_SIZE_RANGE" => &mut self.aliased_point_size_range,
            "ALIASED_LINE_WIDTH_RANGE" => &mut self.aliased_line_width_range,
            _ => return None,
        };
        Some(slot)
    }

    /// Store a value by parameter name. Returns false for names outside the fixed set.
    pub fn set(&mut self, name: &str, value: Option<ParamValue>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        match name {
            "MAX_VERTEX_ATTRIBS" => self.max_vertex_attribs,
            "MAX_VERTEX_UNIFORM_VECTORS" => self.max_vertex_uniform_vectors,
            "MAX_FRAGMENT_UNIFORM_VECTORS" => self.max_fragment_uniform_vectors,
            "MAX_TEXTURE_SIZE" => self.max_texture_size,
            "MAX_CUBE_MAP_TEXTURE_SIZE" => self.max_cube_map_texture_size,
            "MAX_RENDERBUFFER_SIZE" => self.max_renderbuffer_size,
            "MAX_VIEWPORT_DIMS" => self.max_viewport_dims,
            "ALIASED_POINT_SIZE_RANGE" => self.aliased_point_size_range,
            "ALIASED_LINE_WIDTH_RANGE" => self.aliased_line_width_range,
            _ => None,
        }
    }
}

/// Compressor settings read back from the rendered audio graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressorParams {
    pub threshold: f64,
    pub knee: f64,
    pub ratio: f64,
    pub attack: f64,
    pub release: f64,
}

/// Result of a completed offline audio render.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFingerprint {
    pub sample_rate: f64,
    pub render_length: u64,
    /// Sum of absolute sample magnitudes over the fixed window, as a decimal string.
    pub fingerprint: String,
    pub compressor_params: CompressorParams,
}

/// Audio DSP signal.
///
/// Serialized shapes:
/// - `Unsupported` -> `{"supported":false}`
/// - `TimedOut` -> `{"supported":false,"timedOut":true}`
/// - `Rendered` -> `{"supported":true,"sampleRate":..,"renderLength":..,"fingerprint":"..","compressorParams":{..}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AudioWire", try_from = "AudioWire")]
pub enum AudioSignal {
    Unsupported,
    /// The render-completion notification did not arrive within the configured bound.
    TimedOut,
    Rendered(AudioFingerprint),
}

impl AudioSignal {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AudioWire {
    supported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timed_out: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sample_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compressor_params: Option<CompressorParams>,
}

impl From<AudioSignal> for AudioWire {
    fn from(a: AudioSignal) -> Self {
        let mut w = AudioWire {
            supported: false,
            timed_out: None,
            sample_rate: None,
            render_length: None,
            fingerprint: None,
            compressor_params: None,
        };
        match a {
            AudioSignal::Unsupported => {}
            AudioSignal::TimedOut => w.timed_out = Some(true),
            AudioSignal::Rendered(fp) => {
                w.supported = true;
                w.sample_rate = Some(fp.sample_rate);
                w.render_length = Some(fp.render_length);
                w.fingerprint = Some(fp.fingerprint);
                w.compressor_params = Some(fp.compressor_params);
            }
        }
        w
    }
}

impl TryFrom<AudioWire> for AudioSignal {
    type Error = String;

    fn try_from(w: AudioWire) -> Result<Self, Self::Error> {
        if !w.supported {
            return Ok(if w.timed_out == Some(true) {
                AudioSignal::TimedOut
            } else {
                AudioSignal::Unsupported
            });
        }
        match (w.sample_rate, w.render_length, w.fingerprint, w.compressor_params) {
            (Some(sample_rate), Some(render_length), Some(fingerprint), Some(compressor_params)) => {
                Ok(AudioSignal::Rendered(AudioFingerprint {
                    sample_rate,
                    render_length,
                    fingerprint,
                    compressor_params,
                }))
            }
            _ => Err("supported audio signal requires sampleRate, renderLength, fingerprint and compressorParams".to_string()),
        }
    }
}

/// Network-information hints. Every hint is unset when the host exposes no
/// network-information capability; `online` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSignal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_data: Option<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    pub online: bool,
}

impl NetworkSignal {
    /// A signal carrying only the online flag.
    pub fn online_only(online: bool) -> Self {
        Self {
            downlink: None,
            effective_type: None,
            rtt: None,
            save_data: None,
            connection_type: None,
            online,
        }
    }

    pub fn offline() -> Self {
        Self::online_only(false)
    }
}
