// ============================================================================
// demos/gravity.rs — Demo Showcase
// N-body gravity between planets with damped wall bounces and fading trails.
// ============================================================================

use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;

use super::{Demo, DemoKind, FrameContext, OverlayText, SpawnSchedule};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::input::Action;
use crate::stats::DemoStats;

pub const G: f32 = 0.5;
/// Pairs at or below this distance exert no force on each other.
pub const MIN_DISTANCE: f32 = 5.0;
pub const WALL_DAMPING: f32 = 0.8;
pub const TRAIL_LENGTH: usize = 50;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;

const PALETTE: [Rgb; 6] = [
    Rgb::hex(0x3b82f6),
    Rgb::hex(0x8b5cf6),
    Rgb::hex(0xec4899),
    Rgb::hex(0xf59e0b),
    Rgb::hex(0x10b981),
    Rgb::hex(0x06b6d4),
];

const OPENING: [(f32, f32, f64); 3] = [
    (200.0, 200.0, 0.0),
    (400.0, 200.0, 300.0),
    (300.0, 300.0, 600.0),
];

#[derive(Clone, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub mass: f32,
    pub color: Rgb,
    /// Most recent positions, oldest first.
    pub trail: VecDeque<(f32, f32)>,
}

impl Body {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, mass: f32, color: Rgb) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            mass,
            color,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn radius(&self) -> f32 {
        self.mass.sqrt()
    }
}

pub struct GravityDemo {
    rng: StdRng,
    bodies: Vec<Body>,
    opening: SpawnSchedule,
    width: f32,
    height: f32,
    frame: u64,
}

impl GravityDemo {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            bodies: Vec::new(),
            opening: SpawnSchedule::default(),
            width: WIDTH,
            height: HEIGHT,
            frame: 0,
        }
    }

    #[cfg(test)]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[cfg(test)]
    pub fn push_body(&mut self, body: Body) {
        self.bodies.push(body);
    }

    /// New planet at (x, y) heading in a random direction.
    pub fn spawn(&mut self, x: f32, y: f32) {
        let angle = self.rng.gen_range(0.0..TAU);
        let speed = 2.0 + self.rng.gen_range(0.0..3.0);
        let mass = 10.0 + self.rng.gen_range(0.0..20.0);
        let color = PALETTE[self.rng.gen_range(0..PALETTE.len())];
        self.bodies
            .push(Body::new(x, y, angle.cos() * speed, angle.sin() * speed, mass, color));
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        log::info!("Gravity: planets cleared");
    }

    /// One integration step. Forces use the positions from the start of the
    /// step, so each pair exchanges equal and opposite impulses.
    pub fn step(&mut self) {
        let n = self.bodies.len();
        let mut accel = vec![(0.0f32, 0.0f32); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let dist_sq = dx * dx + dy * dy;
                let dist = dist_sq.sqrt();
                if dist <= MIN_DISTANCE {
                    continue;
                }
                let force = G * a.mass * b.mass / dist_sq;
                let fx = force * dx / dist;
                let fy = force * dy / dist;
                accel[i].0 += fx / a.mass;
                accel[i].1 += fy / a.mass;
                accel[j].0 -= fx / b.mass;
                accel[j].1 -= fy / b.mass;
            }
        }

        let (w, h) = (self.width, self.height);
        for (body, (ax, ay)) in self.bodies.iter_mut().zip(accel) {
            body.trail.push_back((body.x, body.y));
            if body.trail.len() > TRAIL_LENGTH {
                body.trail.pop_front();
            }

            body.vx += ax;
            body.vy += ay;
            body.x += body.vx;
            body.y += body.vy;

            if body.x < 0.0 || body.x > w {
                body.vx *= -WALL_DAMPING;
                body.x = body.x.clamp(0.0, w);
            }
            if body.y < 0.0 || body.y > h {
                body.vy *= -WALL_DAMPING;
                body.y = body.y.clamp(0.0, h);
            }
        }
        self.frame += 1;
    }

    #[cfg(test)]
    /// Σ m·v over all bodies.
    pub fn momentum(&self) -> (f32, f32) {
        self.bodies
            .iter()
            .fold((0.0, 0.0), |(px, py), b| (px + b.mass * b.vx, py + b.mass * b.vy))
    }
}

impl Demo for GravityDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Gravity
    }

    fn activate(&mut self, now_ms: f64) {
        self.opening.arm(now_ms, &OPENING);
    }

    fn handle_action(&mut self, action: Action, _now_ms: f64) {
        match action {
            Action::PointerDown { x, y } => self.spawn(x, y),
            Action::Clear => self.clear(),
            _ => {}
        }
    }

    fn update(&mut self, ctx: &FrameContext) {
        for (x, y) in self.opening.due(ctx.now_ms) {
            self.spawn(x, y);
        }
        self.step();
    }

    fn draw(&self, canvas: &mut Canvas, params: &DemoParams) {
        canvas.fade(Rgb::BLACK, 0.1);

        if params.show_trails {
            for body in &self.bodies {
                let len = body.trail.len();
                if len < 2 {
                    continue;
                }
                for (i, (a, b)) in body.trail.iter().zip(body.trail.iter().skip(1)).enumerate() {
                    let alpha = (i + 1) as f32 / len as f32;
                    canvas.line(a.0, a.1, b.0, b.1, 2.0, body.color, alpha);
                }
            }
        }

        for body in &self.bodies {
            let r = body.radius();
            canvas.glow(body.x, body.y, r * 2.0, body.color, 0.8);
            canvas.fill_circle(body.x, body.y, r + 1.0, Rgb::WHITE, 1.0);
            canvas.fill_circle(body.x, body.y, r - 1.0, body.color, 1.0);
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("planets", self.bodies.len())
            .with_motion(self.bodies.iter().map(|b| (b.mass, b.vx, b.vy)));
        stats.frame = self.frame;
        stats
    }

    fn overlay(&self) -> Vec<OverlayText> {
        vec![OverlayText::new(
            format!("Planets: {}", self.bodies.len()),
            12.0,
            12.0,
            14.0,
            Rgb::hex(0xcbd5e1),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn demo(seed: u64) -> GravityDemo {
        GravityDemo::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn two_bodies_conserve_momentum() {
        let mut d = demo(1);
        d.push_body(Body::new(250.0, 200.0, 0.0, 0.0, 10.0, Rgb::WHITE));
        d.push_body(Body::new(350.0, 200.0, 0.0, 0.0, 30.0, Rgb::WHITE));
        d.step();
        let (px, py) = d.momentum();
        assert!(px.abs() < 1e-4 && py.abs() < 1e-4);
        // Lighter body accelerates more, towards the heavier one.
        assert!(d.bodies()[0].vx > 0.0);
        assert!(d.bodies()[1].vx < 0.0);
        assert!(d.bodies()[0].vx > -d.bodies()[1].vx);
    }

    #[test]
    fn close_pairs_exert_no_force() {
        let mut d = demo(2);
        d.push_body(Body::new(100.0, 100.0, 0.0, 0.0, 20.0, Rgb::WHITE));
        d.push_body(Body::new(103.0, 104.0, 0.0, 0.0, 20.0, Rgb::WHITE));
        d.step();
        assert_eq!(d.bodies()[0].vx, 0.0);
        assert_eq!(d.bodies()[1].vy, 0.0);
    }

    #[test]
    fn wall_bounce_reverses_and_damps() {
        let mut d = demo(3);
        d.push_body(Body::new(599.0, 200.0, 5.0, 0.0, 10.0, Rgb::WHITE));
        d.step();
        let b = &d.bodies()[0];
        assert_eq!(b.x, 600.0);
        assert_eq!(b.vx, -4.0);
    }

    #[test]
    fn trail_keeps_last_fifty_positions() {
        let mut d = demo(4);
        d.push_body(Body::new(300.0, 200.0, 0.1, 0.0, 10.0, Rgb::WHITE));
        for _ in 0..80 {
            d.step();
        }
        let b = &d.bodies()[0];
        assert_eq!(b.trail.len(), TRAIL_LENGTH);
        let newest = b.trail.back().copied().unwrap();
        assert!(newest.0 < b.x);
    }

    #[test]
    fn clear_removes_everything() {
        let mut d = demo(5);
        d.spawn(10.0, 10.0);
        d.handle_action(Action::Clear, 0.0);
        assert!(d.bodies().is_empty());
    }

    #[test]
    fn spawn_ranges() {
        let mut d = demo(6);
        for _ in 0..20 {
            d.spawn(300.0, 200.0);
        }
        for b in d.bodies() {
            assert!((10.0..30.0).contains(&b.mass));
            let speed = (b.vx * b.vx + b.vy * b.vy).sqrt();
            assert!((2.0 - 1e-4..5.0 + 1e-4).contains(&speed));
        }
    }

    proptest! {
        #[test]
        fn bodies_stay_inside_walls(seed in any::<u64>(), count in 1usize..6, steps in 1usize..200) {
            let mut d = demo(seed);
            for i in 0..count {
                d.spawn(50.0 + 100.0 * i as f32, 200.0);
            }
            for _ in 0..steps {
                d.step();
                for b in d.bodies() {
                    prop_assert!(b.x >= 0.0 && b.x <= WIDTH);
                    prop_assert!(b.y >= 0.0 && b.y <= HEIGHT);
                }
            }
        }
    }
}
