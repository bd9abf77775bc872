// ============================================================================
// demos/particles.rs — Demo Showcase
// Particle explosions: rings of 50 particles under gravity and friction that
// fade out over 100 frames.
// ============================================================================

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::Rng;

use super::{Demo, DemoKind, FrameContext, SpawnSchedule};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::input::Action;
use crate::stats::DemoStats;

pub const PARTICLES_PER_EXPLOSION: usize = 50;
/// Frames a particle lives; life drops by 1/LIFETIME per frame.
pub const LIFETIME: u32 = 100;
pub const GRAVITY: f32 = 0.15;
pub const FRICTION: f32 = 0.99;

pub const PALETTE: [Rgb; 5] = [
    Rgb::hex(0x3b82f6),
    Rgb::hex(0x8b5cf6),
    Rgb::hex(0xec4899),
    Rgb::hex(0xf59e0b),
    Rgb::hex(0x10b981),
];

/// (x, y, delay_ms) of the explosions that greet a fresh run.
const OPENING: [(f32, f32, f64); 5] = [
    (150.0, 150.0, 0.0),
    (450.0, 150.0, 300.0),
    (300.0, 300.0, 600.0),
    (100.0, 300.0, 900.0),
    (500.0, 300.0, 1200.0),
];

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub size: f32,
    ticks_left: u32,
}

impl Particle {
    /// Remaining life in [0, 1].
    pub fn life(&self) -> f32 {
        self.ticks_left as f32 / LIFETIME as f32
    }

    fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.vx *= FRICTION;
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }
}

pub struct ParticleDemo {
    rng: StdRng,
    particles: Vec<Particle>,
    opening: SpawnSchedule,
    frame: u64,
}

impl ParticleDemo {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            particles: Vec::new(),
            opening: SpawnSchedule::default(),
            frame: 0,
        }
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn explode(&mut self, x: f32, y: f32) {
        self.particles.reserve(PARTICLES_PER_EXPLOSION);
        for i in 0..PARTICLES_PER_EXPLOSION {
            let angle = TAU * i as f32 / PARTICLES_PER_EXPLOSION as f32;
            let speed = 2.0 + self.rng.gen_range(0.0..4.0);
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                color: PALETTE[self.rng.gen_range(0..PALETTE.len())],
                size: 3.0 + self.rng.gen_range(0.0..4.0),
                ticks_left: LIFETIME,
            });
        }
    }

    /// Advance every particle one frame and drop the spent ones.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.step();
        }
        self.particles.retain(|p| p.ticks_left > 0);
        self.frame += 1;
    }
}

impl Demo for ParticleDemo {
    fn kind(&self) -> DemoKind {
        DemoKind::Particles
    }

    fn activate(&mut self, now_ms: f64) {
        self.opening.arm(now_ms, &OPENING);
    }

    fn handle_action(&mut self, action: Action, _now_ms: f64) {
        if let Action::PointerDown { x, y } = action {
            self.explode(x, y);
        }
    }

    fn update(&mut self, ctx: &FrameContext) {
        for (x, y) in self.opening.due(ctx.now_ms) {
            self.explode(x, y);
        }
        self.step();
    }

    fn draw(&self, canvas: &mut Canvas, _params: &DemoParams) {
        canvas.fade(Rgb::BLACK, 0.1);
        for p in &self.particles {
            let life = p.life();
            canvas.glow(p.x, p.y, p.size * life * 2.0, p.color, life * 0.5);
            canvas.fill_circle(p.x, p.y, p.size * life, p.color, life);
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("particles", self.particles.len())
            .with_motion(self.particles.iter().map(|p| (1.0, p.vx, p.vy)));
        stats.frame = self.frame;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn demo(seed: u64) -> ParticleDemo {
        ParticleDemo::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn explosion_is_a_ring_of_fifty() {
        let mut d = demo(1);
        d.explode(150.0, 150.0);
        assert_eq!(d.particles().len(), 50);
        for (i, p) in d.particles().iter().enumerate() {
            let angle = TAU * i as f32 / 50.0;
            let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
            assert!((2.0..6.0).contains(&speed));
            assert!((p.vx - angle.cos() * speed).abs() < 1e-4);
            assert!((3.0..7.0).contains(&p.size));
            assert!(PALETTE.contains(&p.color));
            assert_eq!(p.life(), 1.0);
        }
    }

    #[test]
    fn explosion_is_gone_after_one_hundred_ticks() {
        let mut d = demo(2);
        d.explode(150.0, 150.0);
        for _ in 0..99 {
            d.step();
        }
        assert_eq!(d.particles().len(), 50);
        d.step();
        assert!(d.particles().is_empty());
    }

    #[test]
    fn single_step_applies_gravity_and_friction() {
        let mut d = demo(3);
        d.explode(0.0, 0.0);
        let before = d.particles()[0].clone();
        d.step();
        let after = &d.particles()[0];
        assert_eq!(after.x, before.vx);
        assert_eq!(after.vy, before.vy + GRAVITY);
        assert_eq!(after.vx, before.vx * FRICTION);
        assert!((after.life() - 0.99).abs() < 1e-6);
    }

    #[test]
    fn opening_explosions_follow_their_delays() {
        let mut d = demo(4);
        let params = DemoParams::default();
        d.activate(0.0);
        let ctx = |now_ms| FrameContext { now_ms, running: true, params: &params };
        d.update(&ctx(0.0));
        assert_eq!(d.particles().len(), 50);
        d.update(&ctx(299.0));
        assert_eq!(d.particles().len(), 50);
        d.update(&ctx(1200.0));
        assert_eq!(d.particles().len(), 250);
    }

    #[test]
    fn click_spawns_at_pointer() {
        let mut d = demo(5);
        d.handle_action(Action::PointerDown { x: 42.0, y: 24.0 }, 0.0);
        assert!(d.particles().iter().all(|p| p.x == 42.0 && p.y == 24.0));
    }

    proptest! {
        #[test]
        fn life_is_monotonic_and_attributes_fixed(seed in any::<u64>(), steps in 1usize..120) {
            let mut d = demo(seed);
            d.explode(300.0, 200.0);
            let initial: Vec<(f32, Rgb)> = d.particles().iter().map(|p| (p.size, p.color)).collect();
            let mut last_life = 1.0;
            for _ in 0..steps {
                d.step();
                if let Some(p) = d.particles().first() {
                    prop_assert!(p.life() < last_life);
                    last_life = p.life();
                }
                for (p, (size, color)) in d.particles().iter().zip(&initial) {
                    prop_assert_eq!(p.size, *size);
                    prop_assert_eq!(p.color, *color);
                }
            }
        }
    }
}
