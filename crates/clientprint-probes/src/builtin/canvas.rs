//! Canvas-rendering probe: draw a fixed scene and export it.

use clientprint_core::model::{CanvasSignal, Category};

use crate::host::{Canvas2d, Host};
use crate::spec::ProbeSpec;

pub const CANVAS_WIDTH: u32 = 200;
pub const CANVAS_HEIGHT: u32 = 50;
pub const SCENE_TEXT: &str = "mmmmmmmmmmlli";

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.canvas", Category::Canvas, "Canvas rendering", "0.1.0")
        .want("canvas2d", true)
}

/// Draw the fixed scene: an orange bar with blue text over it.
pub fn draw_scene(ctx: &mut dyn Canvas2d) {
    ctx.set_text_baseline("top");
    ctx.set_font("16px 'Arial'");
    ctx.set_fill_style("#f60");
    ctx.fill_rect(125.0, 1.0, 62.0, 20.0);
    ctx.set_fill_style("#069");
    ctx.fill_text(SCENE_TEXT, 2.0, 15.0);
}

pub fn probe_canvas(host: &dyn Host) -> CanvasSignal {
    let Some(mut ctx) = host.create_canvas(CANVAS_WIDTH, CANVAS_HEIGHT) else {
        return CanvasSignal::Unsupported;
    };
    draw_scene(ctx.as_mut());
    CanvasSignal::Rendered(ctx.to_data_url())
}
