//! Audio-DSP probe.
//!
//! Renders a triangle oscillator through a dynamics compressor in an offline
//! context, then sums absolute sample magnitudes over a fixed window of the
//! first channel. This is the only probe that suspends: it awaits the host's
//! one-shot render-completion notification.

use clientprint_core::determinism::canonical_json::format_number;
use clientprint_core::model::{AudioFingerprint, AudioSignal, Category, CompressorParams};

use crate::host::{AudioGraph, Host, OscillatorNode, RenderedBuffer, Waveform};
use crate::spec::ProbeSpec;

pub const CHANNELS: u32 = 1;
pub const RENDER_LENGTH: usize = 44_100;
pub const SAMPLE_RATE: f64 = 44_100.0;

pub const OSCILLATOR_FREQUENCY: f64 = 10_000.0;

pub const COMPRESSOR: CompressorParams = CompressorParams {
    threshold: -50.0,
    knee: 40.0,
    ratio: 12.0,
    attack: 0.0,
    release: 0.25,
};

/// Sample window `[start, end)` summed into the fingerprint.
pub const WINDOW: (usize, usize) = (4500, 5000);

pub fn spec() -> ProbeSpec {
    ProbeSpec::new("builtin.audio", Category::Audio, "Audio DSP", "0.1.0")
        .want("offlineAudio", true)
        .asynchronous()
}

/// The fixed oscillator -> compressor -> destination chain.
pub fn fingerprint_graph() -> AudioGraph {
    AudioGraph {
        oscillator: OscillatorNode {
            waveform: Waveform::Triangle,
            frequency: OSCILLATOR_FREQUENCY,
            start: 0.0,
        },
        compressor: COMPRESSOR,
    }
}

/// Sum of `|sample|` over the window; a short buffer contributes what it has.
pub fn window_sum(samples: &[f32]) -> f64 {
    let (start, end) = WINDOW;
    let end = end.min(samples.len());
    samples
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|s| f64::from(s.abs()))
        .sum()
}

pub fn summarize(buffer: &RenderedBuffer) -> AudioFingerprint {
    let sum = window_sum(buffer.channel(0).unwrap_or_default());
    AudioFingerprint {
        sample_rate: buffer.sample_rate,
        render_length: buffer.length as u64,
        fingerprint: format_number(sum),
        compressor_params: buffer.compressor,
    }
}

pub async fn probe_audio(host: &dyn Host) -> AudioSignal {
    let Some(ctx) = host.create_offline_audio_context(CHANNELS, RENDER_LENGTH, SAMPLE_RATE) else {
        return AudioSignal::Unsupported;
    };

    let completion = ctx.start_rendering(fingerprint_graph());
    match completion.await {
        Ok(buffer) => {
            let fp = summarize(&buffer);
            tracing::debug!(fingerprint = %fp.fingerprint, "audio render complete");
            AudioSignal::Rendered(fp)
        }
        Err(_) => {
            tracing::warn!("audio render abandoned without completing");
            AudioSignal::Unsupported
        }
    }
}
