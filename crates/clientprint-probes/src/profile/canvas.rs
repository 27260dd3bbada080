//! Software 2D canvas.
//!
//! Text metrics come from the profile: generic families have fixed widths,
//! installed fonts have their own. Widths are declared for the 13-character
//! probe string at 72px and scale linearly with size and character count.
//! Exports hash the draw-command log unless the profile pins a data URL.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use clientprint_core::config::HashAlgorithm;
use clientprint_core::determinism::canonical_json::format_number;
use clientprint_core::determinism::hashing::hash_bytes_hex;

use crate::host::Canvas2d;

const REFERENCE_SIZE_PX: f64 = 72.0;
const REFERENCE_CHARS: f64 = 13.0;
const DEFAULT_FONT: &str = "10px sans-serif";

/// Canvas section of a host profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CanvasProfile {
    /// Widths of generic families (`monospace`, `sans-serif`, `serif`).
    #[serde(default)]
    pub base_widths: BTreeMap<String, f64>,

    /// Widths of installed named fonts. Fonts not listed are not installed.
    #[serde(default)]
    pub font_widths: BTreeMap<String, f64>,

    /// Fixed export, standing in for a real raster.
    #[serde(default)]
    pub data_url: Option<String>,
}

/// Split a CSS font shorthand into pixel size and family list.
pub fn parse_font(font: &str) -> (f64, Vec<String>) {
    let font = font.trim();
    let (size, families) = match font.split_once(' ') {
        Some((first, rest)) if first.ends_with("px") => (first.trim_end_matches("px").parse().ok(), rest),
        _ => (None, font),
    };
    let families = families
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|f| !f.is_empty())
        .collect();
    (size.unwrap_or(10.0), families)
}

pub struct SoftwareCanvas {
    width: u32,
    height: u32,
    metrics: Arc<CanvasProfile>,
    font: String,
    log: Vec<String>,
}

impl SoftwareCanvas {
    pub fn new(width: u32, height: u32, metrics: Arc<CanvasProfile>) -> Self {
        Self {
            width,
            height,
            metrics,
            font: DEFAULT_FONT.to_string(),
            log: Vec::new(),
        }
    }

    /// Reference width of the first resolvable family; unresolvable lists
    /// fall back to `serif`.
    fn family_width(&self, families: &[String]) -> f64 {
        families
            .iter()
            .find_map(|f| {
                self.metrics
                    .base_widths
                    .get(f)
                    .or_else(|| self.metrics.font_widths.get(f))
            })
            .or_else(|| self.metrics.base_widths.get("serif"))
            .copied()
            .unwrap_or(0.0)
    }

    fn width_of(&self, text: &str) -> f64 {
        let (size, families) = parse_font(&self.font);
        let chars = text.chars().count() as f64;
        self.family_width(&families) * (size / REFERENCE_SIZE_PX) * (chars / REFERENCE_CHARS)
    }
}

impl Canvas2d for SoftwareCanvas {
    fn set_text_baseline(&mut self, baseline: &str) {
        self.log.push(format!("textBaseline={baseline}"));
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
        self.log.push(format!("font={font}"));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.log.push(format!("fillStyle={style}"));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.log.push(format!(
            "fillRect({},{},{},{})",
            format_number(x),
            format_number(y),
            format_number(width),
            format_number(height)
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let advance = self.width_of(text);
        self.log.push(format!(
            "fillText({text:?},{},{}) advance={}",
            format_number(x),
            format_number(y),
            format_number(advance)
        ));
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.width_of(text)
    }

    fn to_data_url(&self) -> String {
        if let Some(pinned) = &self.metrics.data_url {
            return pinned.clone();
        }
        let surface = format!("{}x{}\n{}", self.width, self.height, self.log.join("\n"));
        match hash_bytes_hex(HashAlgorithm::Sha256, surface.as_bytes()) {
            Ok(h) => format!("data:image/x-clientprint-raster;sha256,{h}"),
            Err(_) => format!("data:text/plain,{}", self.log.join(";")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Arc<CanvasProfile> {
        Arc::new(CanvasProfile {
            base_widths: BTreeMap::from([
                ("monospace".to_string(), 561.6),
                ("sans-serif".to_string(), 540.0),
                ("serif".to_string(), 520.0),
            ]),
            font_widths: BTreeMap::from([("DejaVu Sans".to_string(), 598.0)]),
            data_url: None,
        })
    }

    #[test]
    fn parse_font_handles_quotes_and_size() {
        let (size, families) = parse_font("72px 'DejaVu Sans',monospace");
        assert_eq!(size, 72.0);
        assert_eq!(families, vec!["DejaVu Sans".to_string(), "monospace".to_string()]);

        let (size, families) = parse_font("serif");
        assert_eq!(size, 10.0);
        assert_eq!(families, vec!["serif".to_string()]);
    }

    #[test]
    fn installed_font_changes_width_missing_font_falls_through() {
        let mut c = SoftwareCanvas::new(300, 150, metrics());
        c.set_font("72px monospace");
        let base = c.measure_text("mmmmmmmmmmlli");
        assert_eq!(base, 561.6);

        c.set_font("72px 'Menlo',monospace");
        assert_eq!(c.measure_text("mmmmmmmmmmlli"), base);

        c.set_font("72px 'DejaVu Sans',monospace");
        assert_eq!(c.measure_text("mmmmmmmmmmlli"), 598.0);
    }

    #[test]
    fn export_depends_on_drawing() {
        let mut a = SoftwareCanvas::new(200, 50, metrics());
        let mut b = SoftwareCanvas::new(200, 50, metrics());
        a.fill_rect(1.0, 1.0, 2.0, 2.0);
        b.fill_rect(1.0, 1.0, 2.0, 3.0);
        assert_ne!(a.to_data_url(), b.to_data_url());
        assert!(a.to_data_url().starts_with("data:image/x-clientprint-raster;sha256,"));

        let pinned = Arc::new(CanvasProfile {
            data_url: Some("data:image/png;base64,AAAA".to_string()),
            ..CanvasProfile::default()
        });
        assert_eq!(SoftwareCanvas::new(200, 50, pinned).to_data_url(), "data:image/png;base64,AAAA");
    }
}
