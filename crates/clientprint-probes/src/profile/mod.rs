//! Profile-described reference host.
//!
//! A `HostProfile` is a JSON description of a client environment: its UA
//! string, which capabilities exist, and how they answer. `ProfileHost`
//! implements `Host` over it with software canvas, WebGL and offline-audio
//! contexts, so the whole pipeline runs without a browser.
//!
//! Every section is optional; a missing section is a missing capability.

#![cfg(feature = "profile")]

pub mod audio;
pub mod canvas;
pub mod webgl;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::host::{
    Canvas2d, ConnectionInfo, Host, HostCapabilities, OfflineAudioContext, PluginEntry,
    WebGlContext,
};

pub use self::audio::SoftwareAudioContext;
pub use self::canvas::{CanvasProfile, SoftwareCanvas};
pub use self::webgl::{SoftwareWebGl, WebGlProfile};

const REFERENCE_PROFILE: &str = include_str!("../../profiles/reference.json");

/// Audio section of a host profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AudioProfile {
    /// Rate the context actually renders at; defaults to the requested rate.
    #[serde(default)]
    pub sample_rate: Option<f64>,

    /// Extra render latency in milliseconds.
    #[serde(default)]
    pub render_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HostProfile {
    #[serde(default)]
    pub user_agent: String,

    #[serde(default)]
    pub canvas: Option<CanvasProfile>,

    #[serde(default)]
    pub plugins: Option<Vec<PluginEntry>>,

    #[serde(default)]
    pub webgl: Option<WebGlProfile>,

    #[serde(default)]
    pub audio: Option<AudioProfile>,

    #[serde(default)]
    pub connection: Option<ConnectionInfo>,

    #[serde(default)]
    pub online: bool,
}

impl HostProfile {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("invalid host profile")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read host profile: {}", path.display()))?;
        Self::from_json_str(&s).with_context(|| format!("in {}", path.display()))
    }

    /// The bundled desktop profile with every capability present.
    pub fn reference() -> anyhow::Result<Self> {
        Self::from_json_str(REFERENCE_PROFILE)
    }

    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            canvas_2d: self.canvas.is_some(),
            webgl: self.webgl.is_some(),
            offline_audio: self.audio.is_some(),
            plugins: self.plugins.is_some(),
            network_information: self.connection.is_some(),
        }
    }
}

/// `Host` implementation over a `HostProfile`.
#[derive(Debug, Clone)]
pub struct ProfileHost {
    profile: HostProfile,
    canvas: Option<Arc<CanvasProfile>>,
    webgl: Option<Arc<WebGlProfile>>,
}

impl ProfileHost {
    pub fn new(profile: HostProfile) -> Self {
        let canvas = profile.canvas.clone().map(Arc::new);
        let webgl = profile.webgl.clone().map(Arc::new);
        Self {
            profile,
            canvas,
            webgl,
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(HostProfile::load(path)?))
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }
}

impl Host for ProfileHost {
    fn capabilities(&self) -> HostCapabilities {
        self.profile.capabilities()
    }

    fn user_agent(&self) -> String {
        self.profile.user_agent.clone()
    }

    fn create_canvas(&self, width: u32, height: u32) -> Option<Box<dyn Canvas2d>> {
        let metrics = self.canvas.clone()?;
        Some(Box::new(SoftwareCanvas::new(width, height, metrics)))
    }

    fn plugins(&self) -> Option<Vec<PluginEntry>> {
        self.profile.plugins.clone()
    }

    fn create_webgl_context(&self, context_id: &str) -> Option<Box<dyn WebGlContext>> {
        let gl = self.webgl.as_ref().filter(|gl| gl.accepts(context_id))?;
        Some(Box::new(SoftwareWebGl::new(Arc::clone(gl))))
    }

    fn create_offline_audio_context(
        &self,
        channels: u32,
        length: usize,
        sample_rate: f64,
    ) -> Option<Box<dyn OfflineAudioContext>> {
        let audio = self.profile.audio.as_ref()?;
        Some(Box::new(SoftwareAudioContext {
            channels,
            length,
            sample_rate: audio.sample_rate.unwrap_or(sample_rate),
            delay: audio.render_delay_ms.map(Duration::from_millis),
        }))
    }

    fn connection(&self) -> Option<ConnectionInfo> {
        self.profile.connection.clone()
    }

    fn on_line(&self) -> bool {
        self.profile.online
    }
}
