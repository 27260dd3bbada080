//! GPU/WebGL probe.
//!
//! Collects:
//! - unmasked vendor/renderer (only with the debug-renderer-info extension)
//! - version strings and the supported extension list
//! - the nine fixed numeric parameters
//! - a rolling hash over a cleared 64x64 readback
//!
//! No context at all yields `null`. A failed readback only drops `pixelsHash`.

use clientprint_core::model::{Category, WebGlInfo, WebGlParams, WebGlSignal};

use crate::host::{Host, WebGlContext};
use crate::spec::ProbeSpec;

/// Context ids tried in order.
pub const CONTEXT_IDS: [&str; 2] = ["webgl", "experimental-webgl"];

pub const CLEAR_COLOR: [f32; 4] = [0.6, 0.2, 0.8, 1.0];
pub const READBACK_SIZE: u32 = 64;

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.webgl", Category::WebGl, "WebGL description", "0.1.0")
        .want("webgl", true)
}

/// `h = (h << 5) - h + byte` over every byte, wrapping at 32 bits.
pub fn pixel_hash(pixels: &[u8]) -> i32 {
    pixels.iter().fold(0i32, |h, &v| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(v))
    })
}

fn readback_hash(ctx: &mut dyn WebGlContext) -> Option<String> {
    let [r, g, b, a] = CLEAR_COLOR;
    ctx.clear_color(r, g, b, a);
    ctx.clear_color_buffer();
    match ctx.read_pixels(READBACK_SIZE, READBACK_SIZE) {
        Ok(pixels) => Some(pixel_hash(&pixels).to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "webgl readback failed; omitting pixelsHash");
            None
        }
    }
}

/// Describe an existing context.
pub fn describe(ctx: &mut dyn WebGlContext) -> WebGlInfo {
    let unmasked = ctx.debug_renderer_info().unwrap_or_default();

    let mut params = WebGlParams::default();
    for name in WebGlParams::NAMES {
        params.set(name, ctx.parameter(name));
    }

    WebGlInfo {
        vendor: unmasked.vendor,
        renderer: unmasked.renderer,
        version: ctx.version(),
        shading_language_version: ctx.shading_language_version(),
        extensions: ctx.supported_extensions().unwrap_or_default(),
        params,
        pixels_hash: readback_hash(ctx),
    }
}

pub fn probe_webgl(host: &dyn Host) -> WebGlSignal {
    let ctx = CONTEXT_IDS
        .iter()
        .find_map(|id| host.create_webgl_context(id));
    WebGlSignal(ctx.map(|mut ctx| describe(ctx.as_mut())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_hash_known_values() {
        assert_eq!(pixel_hash(&[]), 0);
        assert_eq!(pixel_hash(&[1, 2, 3]), 1026);
        assert_eq!(pixel_hash(&[0; 64 * 64 * 4]), 0);

        let cleared: Vec<u8> = [153u8, 51, 204, 255].repeat(64 * 64);
        assert_eq!(pixel_hash(&cleared), -665_661_440);
    }

    #[test]
    fn pixel_hash_wraps_instead_of_overflowing() {
        let h = pixel_hash(&[255; 1024]);
        assert_eq!(h, pixel_hash(&[255; 1024]));
    }
}
