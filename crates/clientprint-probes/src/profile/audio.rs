//! Software offline audio rendering.
//!
//! Oscillator -> soft-knee dynamics compressor -> destination, rendered
//! sample by sample on a dedicated render thread. The completion channel
//! fires once with the finished buffer.

use std::f64::consts::TAU;
use std::time::Duration;

use tokio::sync::oneshot;

use clientprint_core::model::CompressorParams;

use crate::host::{AudioGraph, OfflineAudioContext, RenderCompletion, RenderedBuffer, Waveform};

/// Level floor for silent input, in dB.
const SILENCE_DB: f64 = -120.0;

fn waveform_sample(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * (phase + 0.5).fract() - 1.0,
        Waveform::Triangle => {
            let p = (phase + 0.25).fract();
            1.0 - 4.0 * (p - 0.5).abs()
        }
    }
}

fn smoothing_coef(time: f64, sample_rate: f64) -> f64 {
    if time <= 0.0 {
        0.0
    } else {
        (-1.0 / (time * sample_rate)).exp()
    }
}

/// Feed-forward compressor with a quadratic soft knee and a one-pole
/// attack/release envelope on the gain reduction.
#[derive(Debug, Clone)]
pub struct Compressor {
    params: CompressorParams,
    attack_coef: f64,
    release_coef: f64,
    reduction_db: f64,
}

impl Compressor {
    pub fn new(params: CompressorParams, sample_rate: f64) -> Self {
        Self {
            params,
            attack_coef: smoothing_coef(params.attack, sample_rate),
            release_coef: smoothing_coef(params.release, sample_rate),
            reduction_db: 0.0,
        }
    }

    /// Static output level for an input level, both in dB.
    pub fn curve(&self, level_db: f64) -> f64 {
        let CompressorParams {
            threshold,
            knee,
            ratio,
            ..
        } = self.params;
        let over = level_db - threshold;

        if 2.0 * over < -knee {
            level_db
        } else if knee > 0.0 && 2.0 * over.abs() <= knee {
            level_db + (1.0 / ratio - 1.0) * (over + knee / 2.0).powi(2) / (2.0 * knee)
        } else {
            threshold + over / ratio
        }
    }

    pub fn process(&mut self, x: f64) -> f64 {
        let level_db = if x.abs() > 1e-6 {
            20.0 * x.abs().log10()
        } else {
            SILENCE_DB
        };
        let target = (level_db - self.curve(level_db)).max(0.0);
        let coef = if target > self.reduction_db {
            self.attack_coef
        } else {
            self.release_coef
        };
        self.reduction_db = coef * self.reduction_db + (1.0 - coef) * target;
        x * 10f64.powf(-self.reduction_db / 20.0)
    }
}

/// Render `graph` into a buffer. Every channel carries the same mono signal.
pub fn render(graph: &AudioGraph, channels: u32, length: usize, sample_rate: f64) -> RenderedBuffer {
    let osc = graph.oscillator;
    let mut compressor = Compressor::new(graph.compressor, sample_rate);

    let mono: Vec<f32> = (0..length)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let x = if t >= osc.start {
                waveform_sample(osc.waveform, (osc.frequency * (t - osc.start)).fract())
            } else {
                0.0
            };
            compressor.process(x) as f32
        })
        .collect();

    RenderedBuffer {
        sample_rate,
        length,
        channels: vec![mono; channels.max(1) as usize],
        compressor: graph.compressor,
    }
}

/// Offline context backed by `render`.
#[derive(Debug, Clone)]
pub struct SoftwareAudioContext {
    pub channels: u32,
    pub length: usize,
    pub sample_rate: f64,
    /// Extra latency before the completion fires.
    pub delay: Option<Duration>,
}

impl OfflineAudioContext for SoftwareAudioContext {
    fn start_rendering(self: Box<Self>, graph: AudioGraph) -> RenderCompletion {
        let (tx, rx) = oneshot::channel();
        let ctx = *self;

        let spawned = std::thread::Builder::new()
            .name("offline-audio".to_string())
            .spawn(move || {
                if let Some(delay) = ctx.delay {
                    std::thread::sleep(delay);
                }
                let buffer = render(&graph, ctx.channels, ctx.length, ctx.sample_rate);
                // The receiver is gone if the caller stopped waiting.
                let _ = tx.send(buffer);
            });

        if let Err(e) = spawned {
            tracing::warn!(error = %e, "could not start audio render thread");
        }
        rx
    }
}
