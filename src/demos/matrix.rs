// ============================================================================
// demos/matrix.rs — Demo Showcase
// Matrix rain: one falling drop per 16 px column, throttled by the speed
// slider, over a slowly fading background.
// ============================================================================

use rand::rngs::StdRng;
use rand::Rng;

use super::{Demo, DemoKind, FrameContext};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::input::Action;
use crate::stats::DemoStats;

pub const FONT_SIZE: f32 = 16.0;
pub const RESET_CHANCE: f64 = 0.025;
const HIGHLIGHT_CHANCE: f64 = 0.02;
const FADE: f32 = 0.05;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;

/// Katakana block plus the two digits.
const GLYPH_CODES: u32 = 48;

/// Frames between rain steps for a given speed setting.
pub fn step_interval(speed: u32) -> u64 {
    10u64.saturating_sub((speed / 10) as u64).max(1)
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Glyph {
    x: f32,
    y: f32,
    code: u32,
    bright: bool,
}

pub struct MatrixDemo {
    rng: StdRng,
    /// Row counter per column; negative rows are still above the canvas.
    drops: Vec<f32>,
    /// Characters emitted by the most recent step, painted on this frame only.
    glyphs: Vec<Glyph>,
    frame: u64,
    steps: u64,
    /// Speed the current drops were seeded for.
    speed: Option<u32>,
}

fn seed_drops(rng: &mut StdRng) -> Vec<f32> {
    let columns = (WIDTH / FONT_SIZE).ceil() as usize;
    (0..columns).map(|_| -rng.gen_range(0.0..100.0)).collect()
}

impl MatrixDemo {
    pub fn new(mut rng: StdRng) -> Self {
        let drops = seed_drops(&mut rng);
        Self {
            rng,
            drops,
            glyphs: Vec::new(),
            frame: 0,
            steps: 0,
            speed: None,
        }
    }

    #[cfg(test)]
    pub fn drops(&self) -> &[f32] {
        &self.drops
    }

    #[cfg(test)]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance every drop by one row, emitting a glyph for visible ones.
    pub fn rain_step(&mut self) {
        self.glyphs.clear();
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let code = self.rng.gen_range(0..GLYPH_CODES);
            let x = i as f32 * FONT_SIZE;
            let y = *drop * FONT_SIZE;
            if y > 0.0 {
                let bright = self.rng.gen_bool(HIGHLIGHT_CHANCE);
                self.glyphs.push(Glyph { x, y, code, bright });
            }
            if y > HEIGHT && self.rng.gen_bool(RESET_CHANCE) {
                *drop = 0.0;
            }
            *drop += 1.0;
        }
        self.steps += 1;
    }
}

impl Demo for MatrixDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Matrix
    }

    fn activate(&mut self, _now_ms: f64) {}

    fn handle_action(&mut self, _action: Action, _now_ms: f64) {}

    fn update(&mut self, ctx: &FrameContext) {
        let speed = ctx.params.matrix_speed;
        if self.speed.is_some_and(|s| s != speed) {
            // A new speed restarts the rain from above the canvas.
            self.drops = seed_drops(&mut self.rng);
            self.glyphs.clear();
            log::debug!("Matrix: speed {} reseeded {} drops", speed, self.drops.len());
        }
        self.speed = Some(speed);

        self.frame += 1;
        if self.frame % step_interval(ctx.params.matrix_speed) == 0 {
            self.rain_step();
        } else {
            self.glyphs.clear();
        }
    }

    fn draw(&self, canvas: &mut Canvas, _params: &DemoParams) {
        canvas.fade(Rgb::BLACK, FADE);
        let cell = FONT_SIZE / 8.0;
        for g in &self.glyphs {
            // y is the text baseline.
            let top = g.y - 7.0 * cell;
            let color = if g.bright { Rgb::WHITE } else { Rgb::new(0, 255, 0) };
            canvas.glyph(g.x + cell, top, cell, g.code, color);
        }
    }

    fn stats(&self) -> DemoStats {
        let visible = self.drops.iter().filter(|d| **d * FONT_SIZE > 0.0).count();
        let mut stats = DemoStats::new("visible drops", visible);
        stats.frame = self.frame;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn demo(seed: u64) -> MatrixDemo {
        MatrixDemo::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn one_drop_per_column_starting_above() {
        let d = demo(1);
        assert_eq!(d.drops().len(), 38);
        assert!(d.drops().iter().all(|&y| y <= 0.0 && y > -100.0));
    }

    #[test]
    fn interval_follows_speed() {
        assert_eq!(step_interval(10), 9);
        assert_eq!(step_interval(50), 5);
        assert_eq!(step_interval(95), 1);
        assert_eq!(step_interval(100), 1);
    }

    #[test]
    fn steps_are_throttled() {
        let mut d = demo(2);
        let params = DemoParams { matrix_speed: 50, ..DemoParams::default() };
        for i in 0..20 {
            d.update(&FrameContext { now_ms: i as f64 * 16.0, running: true, params: &params });
        }
        assert_eq!(d.steps(), 4);
    }

    #[test]
    fn speed_change_reseeds_the_drops() {
        let mut d = demo(5);
        let slow = DemoParams { matrix_speed: 95, ..DemoParams::default() };
        for _ in 0..300 {
            d.update(&FrameContext { now_ms: 0.0, running: true, params: &slow });
        }
        assert!(d.drops().iter().any(|&y| y > 0.0));

        let fast = DemoParams { matrix_speed: 90, ..DemoParams::default() };
        d.update(&FrameContext { now_ms: 0.0, running: true, params: &fast });
        assert_eq!(d.drops().len(), 38);
        assert!(d.drops().iter().all(|&y| y <= 1.0));
    }

    #[test]
    fn drops_fall_one_row_per_step() {
        let mut d = demo(3);
        let before = d.drops().to_vec();
        d.rain_step();
        for (a, b) in before.iter().zip(d.drops()) {
            assert_eq!(*b, a + 1.0);
        }
    }

    #[test]
    fn drops_below_canvas_eventually_reset() {
        let mut d = demo(4);
        for _ in 0..2000 {
            d.rain_step();
        }
        // With a 2.5 % reset chance per step nothing drifts far below.
        let max_rows = HEIGHT / FONT_SIZE + 1000.0;
        assert!(d.drops().iter().all(|&y| y < max_rows));
        assert!(d.drops().iter().any(|&y| y < 200.0));
    }
}
