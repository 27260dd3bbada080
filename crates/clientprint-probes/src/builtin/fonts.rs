//! Font-availability probe.
//!
//! For each base family, measure the probe string at a fixed size. Then for
//! each candidate, measure `'<candidate>',<base>` against every base family;
//! a width differing from that base's width on any family means the
//! candidate is installed.

use clientprint_core::model::{Category, FontSignal};

use crate::host::{Canvas2d, Host};
use crate::spec::ProbeSpec;

pub const BASE_FONTS: [&str; 3] = ["monospace", "sans-serif", "serif"];

pub const CANDIDATE_FONTS: [&str; 12] = [
    // macOS
    "Arial Unicode MS",
    "Gill Sans",
    "Helvetica Neue",
    "Menlo",
    // Windows
    "Segoe UI",
    "Calibri",
    "Cambria",
    "Consolas",
    // Linux
    "Ubuntu",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
];

pub const TEST_STRING: &str = "mmmmmmmmmmlli";
pub const TEST_SIZE: &str = "72px";

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.fonts", Category::Fonts, "Font availability", "0.1.0")
        .want("canvas2d", true)
        .meta("candidates", CANDIDATE_FONTS.len().to_string())
}

/// Baseline widths, aligned with `BASE_FONTS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineWidths(pub [f64; 3]);

impl BaselineWidths {
    pub fn measure(ctx: &mut dyn Canvas2d) -> Self {
        let mut widths = [0.0; 3];
        for (slot, base) in widths.iter_mut().zip(BASE_FONTS) {
            ctx.set_font(&format!("{TEST_SIZE} {base}"));
            *slot = ctx.measure_text(TEST_STRING);
        }
        Self(widths)
    }
}

/// True when the candidate changes the width on at least one base family.
pub fn is_available(ctx: &mut dyn Canvas2d, font: &str, baseline: &BaselineWidths) -> bool {
    BASE_FONTS.iter().zip(baseline.0).any(|(base, base_width)| {
        ctx.set_font(&format!("{TEST_SIZE} '{font}',{base}"));
        ctx.measure_text(TEST_STRING) != base_width
    })
}

/// Candidates available on `ctx`, in candidate order.
pub fn detect_fonts(ctx: &mut dyn Canvas2d) -> FontSignal {
    let baseline = BaselineWidths::measure(ctx);
    let found = CANDIDATE_FONTS
        .iter()
        .filter(|font| is_available(ctx, font, &baseline))
        .map(|font| font.to_string())
        .collect();
    FontSignal(found)
}

pub fn probe_fonts(host: &dyn Host) -> FontSignal {
    match host.create_canvas(300, 150) {
        Some(mut ctx) => detect_fonts(ctx.as_mut()),
        None => {
            tracing::warn!("no 2d context for font measurement; reporting no fonts");
            FontSignal::default()
        }
    }
}
