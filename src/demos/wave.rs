// ============================================================================
// demos/wave.rs — Demo Showcase
// Four phase-shifted layers of a two-sine wave, a pure function of time.
// ============================================================================

use super::{Demo, DemoKind, FrameContext};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::input::Action;
use crate::stats::DemoStats;

pub const TIME_STEP: f32 = 0.05;

const LAYERS: [Rgb; 4] = [
    Rgb::hex(0x3b82f6),
    Rgb::hex(0x8b5cf6),
    Rgb::hex(0xec4899),
    Rgb::hex(0xf59e0b),
];

const WIDTH: u32 = 600;
const HEIGHT: f32 = 400.0;

/// Height of `layer` at column `x` and time `t`.
pub fn wave_y(x: f32, t: f32, layer: usize, amplitude: f32, frequency: f32, center_y: f32) -> f32 {
    let phase = layer as f32;
    center_y
        + (x * frequency / 100.0 + t + phase).sin() * amplitude
        + (x * frequency / 50.0 + t * 2.0 + phase).sin() * (amplitude / 2.0)
}

pub struct WaveDemo {
    time: f32,
    frame: u64,
}

impl WaveDemo {
    pub fn new() -> Self {
        Self { time: 0.0, frame: 0 }
    }

    #[cfg(test)]
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn advance(&mut self) {
        self.time += TIME_STEP;
        self.frame += 1;
    }
}

impl Demo for WaveDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Wave
    }

    fn activate(&mut self, _now_ms: f64) {}

    fn handle_action(&mut self, _action: Action, _now_ms: f64) {}

    fn update(&mut self, _ctx: &FrameContext) {
        self.advance();
    }

    fn draw(&self, canvas: &mut Canvas, params: &DemoParams) {
        canvas.fade(Rgb::BLACK, 0.1);
        let center_y = HEIGHT / 2.0;
        for (layer, color) in LAYERS.iter().enumerate() {
            let points: Vec<(f32, f32)> = (0..WIDTH)
                .map(|x| {
                    let x = x as f32;
                    (x, wave_y(x, self.time, layer, params.wave_amplitude, params.wave_frequency, center_y))
                })
                .collect();
            canvas.polyline(&points, 3.0, *color, 1.0);
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("layers", LAYERS.len());
        stats.frame = self.frame;
        stats
    }
}
