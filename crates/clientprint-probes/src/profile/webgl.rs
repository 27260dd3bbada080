//! Software WebGL context: declared strings and parameters, plus a one-colour
//! framebuffer for readback.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use clientprint_core::model::ParamValue;

use crate::host::{HostError, UnmaskedRendererInfo, WebGlContext};

fn default_context_ids() -> Vec<String> {
    vec!["webgl".to_string(), "experimental-webgl".to_string()]
}

/// WebGL section of a host profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WebGlProfile {
    /// Context ids the host accepts.
    #[serde(default = "default_context_ids")]
    pub context_ids: Vec<String>,

    /// Present when the debug-renderer-info extension is exposed.
    #[serde(default)]
    pub unmasked: Option<UnmaskedRendererInfo>,

    pub version: String,

    pub shading_language_version: String,

    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,

    /// Simulate a lost context at readback time.
    #[serde(default)]
    pub readback_fails: bool,
}

impl WebGlProfile {
    pub fn accepts(&self, context_id: &str) -> bool {
        self.context_ids.iter().any(|id| id == context_id)
    }
}

fn channel_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub struct SoftwareWebGl {
    profile: Arc<WebGlProfile>,
    clear_color: [f32; 4],
    framebuffer: [u8; 4],
}

impl SoftwareWebGl {
    pub fn new(profile: Arc<WebGlProfile>) -> Self {
        Self {
            profile,
            clear_color: [0.0; 4],
            framebuffer: [0; 4],
        }
    }
}

impl WebGlContext for SoftwareWebGl {
    fn debug_renderer_info(&self) -> Option<UnmaskedRendererInfo> {
        self.profile.unmasked.clone()
    }

    fn version(&self) -> String {
        self.profile.version.clone()
    }

    fn shading_language_version(&self) -> String {
        self.profile.shading_language_version.clone()
    }

    fn supported_extensions(&self) -> Option<Vec<String>> {
        self.profile.extensions.clone()
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        self.profile.params.get(name).copied()
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
    }

    fn clear_color_buffer(&mut self) {
        self.framebuffer = self.clear_color.map(channel_byte);
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Result<Vec<u8>, HostError> {
        if self.profile.readback_fails {
            return Err(HostError::ContextLost);
        }
        if width == 0 || height == 0 {
            return Err(HostError::ReadbackFailed(format!("empty region {width}x{height}")));
        }
        Ok(self.framebuffer.repeat(width as usize * height as usize))
    }
}
