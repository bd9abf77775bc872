// ============================================================================
// demos/helix.rs — Demo Showcase
// DNA double helix: base pairs on two strands half a turn apart, rotating
// about the vertical axis with depth-scaled nucleotides.
// ============================================================================

use std::f32::consts::PI;

use super::{Demo, DemoKind, FrameContext, OverlayText};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::input::Action;
use crate::stats::DemoStats;

pub const RADIUS: f32 = 80.0;
pub const SPACING: f32 = 15.0;
pub const PHASE_STEP: f32 = 0.3;
pub const SPIN_PER_FRAME: f32 = 0.02;
const NUCLEOTIDE_RADIUS: f32 = 8.0;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;

const BLUE_NEAR: Rgb = Rgb::hex(0x3b82f6);
const BLUE_FAR: Rgb = Rgb::hex(0x1d4ed8);
const PINK_NEAR: Rgb = Rgb::hex(0xec4899);
const PINK_FAR: Rgb = Rgb::hex(0xbe185d);
const VIOLET: Rgb = Rgb::hex(0x8b5cf6);

/// One rung of the ladder, in screen space plus depth.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BasePair {
    pub y: f32,
    pub left: (f32, f32),
    pub right: (f32, f32),
}

impl BasePair {
    /// Perspective scale for a strand point at depth `z`.
    pub fn scale(z: f32) -> f32 {
        1.0 + z / 200.0
    }
}

/// Lay out `pairs` rungs for the given rotation, centered on (cx, cy).
pub fn base_pairs(pairs: u32, rotation: f32, cx: f32, cy: f32) -> Vec<BasePair> {
    (0..pairs)
        .map(|i| {
            let y = cy - (pairs as f32 * SPACING) / 2.0 + i as f32 * SPACING;
            let angle = rotation + i as f32 * PHASE_STEP;
            let left = (cx + angle.cos() * RADIUS, angle.sin() * RADIUS);
            let right = (cx + (angle + PI).cos() * RADIUS, (angle + PI).sin() * RADIUS);
            BasePair { y, left, right }
        })
        .collect()
}

pub struct HelixDemo {
    rotation: f32,
    pairs: u32,
    frame: u64,
}

impl HelixDemo {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            pairs: DemoParams::default().helix_pairs,
            frame: 0,
        }
    }

    #[cfg(test)]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl Demo for HelixDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Helix
    }

    fn activate(&mut self, _now_ms: f64) {}

    fn handle_action(&mut self, _action: Action, _now_ms: f64) {}

    fn update(&mut self, ctx: &FrameContext) {
        self.frame += 1;
        self.rotation += SPIN_PER_FRAME * ctx.params.helix_speed;
        self.pairs = ctx.params.helix_pairs;
    }

    fn draw(&self, canvas: &mut Canvas, _params: &DemoParams) {
        canvas.fade(Rgb::BLACK, 0.1);
        let rungs = base_pairs(self.pairs, self.rotation, WIDTH / 2.0, HEIGHT / 2.0);

        // Backbones first so the nucleotides sit on top.
        for pair in rungs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let left_near = a.left.1 > 0.0 && b.left.1 > 0.0;
            let right_near = a.right.1 > 0.0 && b.right.1 > 0.0;
            canvas.line(a.left.0, a.y, b.left.0, b.y, 3.0, if left_near { BLUE_NEAR } else { BLUE_FAR }, 0.5);
            canvas.line(a.right.0, a.y, b.right.0, b.y, 3.0, if right_near { PINK_NEAR } else { PINK_FAR }, 0.5);
        }

        for rung in &rungs {
            let (x1, z1) = rung.left;
            let (x2, z2) = rung.right;
            let mid = (x1 + x2) / 2.0;
            let left = if z1 > 0.0 { BLUE_NEAR } else { BLUE_FAR };
            let right = if z2 > 0.0 { PINK_NEAR } else { PINK_FAR };
            canvas.line(x1, rung.y, mid, rung.y, 2.0, left.lerp(VIOLET, 0.5), 1.0);
            canvas.line(mid, rung.y, x2, rung.y, 2.0, right.lerp(VIOLET, 0.5), 1.0);

            // Far strand first.
            let mut beads = [(x1, z1, BLUE_NEAR, BLUE_FAR), (x2, z2, PINK_NEAR, PINK_FAR)];
            beads.sort_by(|a, b| a.1.total_cmp(&b.1));
            for (x, z, near, far) in beads {
                let r = NUCLEOTIDE_RADIUS * BasePair::scale(z);
                let color = if z > 0.0 { near } else { far };
                canvas.fill_circle(x, rung.y, r + 1.0, Rgb::WHITE, 1.0);
                canvas.fill_circle(x, rung.y, r, color, 1.0);
            }
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("base pairs", self.pairs as usize);
        stats.frame = self.frame;
        stats
    }

    fn overlay(&self) -> Vec<OverlayText> {
        let cx = WIDTH / 2.0;
        vec![
            OverlayText::new("DNA Double Helix", cx, 16.0, 14.0, Rgb::WHITE).centered(),
            OverlayText::new("Adenine-Thymine", cx - 150.0, HEIGHT - 32.0, 12.0, BLUE_NEAR).centered(),
            OverlayText::new("Guanine-Cytosine", cx + 150.0, HEIGHT - 32.0, 12.0, PINK_NEAR).centered(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strands_are_half_a_turn_apart() {
        for rung in base_pairs(20, 0.7, 300.0, 200.0) {
            assert!((rung.left.0 - 300.0 + rung.right.0 - 300.0).abs() < 1e-3);
            assert!((rung.left.1 + rung.right.1).abs() < 1e-3);
        }
    }

    #[test]
    fn ladder_is_vertically_centered() {
        let rungs = base_pairs(20, 0.0, 300.0, 200.0);
        assert_eq!(rungs.len(), 20);
        assert_eq!(rungs[0].y, 200.0 - 150.0);
        assert_eq!(rungs[19].y - rungs[18].y, SPACING);
    }

    #[test]
    fn perspective_scales_with_depth() {
        assert_eq!(BasePair::scale(0.0), 1.0);
        assert!((BasePair::scale(RADIUS) - 1.4).abs() < 1e-6);
        assert!((BasePair::scale(-RADIUS) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn rotation_follows_speed() {
        let params = DemoParams { helix_speed: 2.0, ..DemoParams::default() };
        let mut demo = HelixDemo::new();
        for _ in 0..10 {
            demo.update(&FrameContext { now_ms: 0.0, running: true, params: &params });
        }
        assert!((demo.rotation() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn pair_count_follows_the_slider() {
        let params = DemoParams { helix_pairs: 10, ..DemoParams::default() };
        let mut demo = HelixDemo::new();
        demo.update(&FrameContext { now_ms: 0.0, running: true, params: &params });
        assert_eq!(demo.stats().entities, 10);

        // Drawn with stale params, the ladder still spans 10 rungs (y 125..260),
        // so the row of the 20-rung top (y 50) stays dark.
        let mut canvas = Canvas::new(600, 400);
        demo.draw(&mut canvas, &DemoParams::default());
        assert!((0..600).all(|x| canvas.pixel(x, 50) == Some(Rgb::BLACK)));
        assert!((0..600).any(|x| canvas.pixel(x, 125) != Some(Rgb::BLACK)));
    }
}
