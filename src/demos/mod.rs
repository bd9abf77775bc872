// ============================================================================
// demos/mod.rs — Demo Showcase
// The demo catalogue, the `Demo` trait every canvas demo implements, and the
// factory used by the host to mount a fresh instance.
// ============================================================================

pub mod cube;
pub mod flappy;
pub mod gravity;
pub mod helix;
mod listings;
pub mod matrix;
pub mod particles;
pub mod platformer;
pub mod snake;
pub mod wave;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::game::GamePhase;
use crate::input::Action;
use crate::stats::DemoStats;

// ======================== Catalogue ========================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemoKind {
    Particles,
    Cube,
    Matrix,
    JumpGame,
    Gravity,
    Snake,
    Wave,
    Flappy,
    Helix,
}

impl DemoKind {
    /// Selector order.
    pub const ALL: [DemoKind; 9] = [
        DemoKind::Particles,
        DemoKind::Cube,
        DemoKind::Matrix,
        DemoKind::JumpGame,
        DemoKind::Gravity,
        DemoKind::Snake,
        DemoKind::Wave,
        DemoKind::Flappy,
        DemoKind::Helix,
    ];

    pub fn index(self) -> usize {
        DemoKind::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            DemoKind::Particles => "Particle System",
            DemoKind::Cube => "3D Cube",
            DemoKind::Matrix => "Matrix Rain",
            DemoKind::JumpGame => "Jump Game",
            DemoKind::Gravity => "Gravity Simulator",
            DemoKind::Snake => "Snake",
            DemoKind::Wave => "Wave Animation",
            DemoKind::Flappy => "Flappy Bird",
            DemoKind::Helix => "DNA Helix",
        }
    }

    /// Short name used on the command line and in run directories.
    pub fn slug(self) -> &'static str {
        match self {
            DemoKind::Particles => "particles",
            DemoKind::Cube => "cube",
            DemoKind::Matrix => "matrix",
            DemoKind::JumpGame => "jump",
            DemoKind::Gravity => "gravity",
            DemoKind::Snake => "snake",
            DemoKind::Wave => "wave",
            DemoKind::Flappy => "flappy",
            DemoKind::Helix => "helix",
        }
    }

    pub fn from_name(name: &str) -> Option<DemoKind> {
        let name = name.trim().to_ascii_lowercase();
        DemoKind::ALL
            .into_iter()
            .find(|k| k.slug() == name || k.title().to_ascii_lowercase() == name)
    }

    pub fn tagline(self) -> &'static str {
        match self {
            DemoKind::Particles => "Canvas + physics",
            DemoKind::Cube => "Rotation + perspective",
            DemoKind::Matrix => "Canvas + animation",
            DemoKind::JumpGame => "Game loop + collisions",
            DemoKind::Gravity => "N-body physics",
            DemoKind::Snake => "Grid game",
            DemoKind::Wave => "Canvas + trigonometry",
            DemoKind::Flappy => "Game loop + physics",
            DemoKind::Helix => "3D + biology",
        }
    }

    /// Message shown once the code listing has "run".
    pub fn output_message(self) -> &'static str {
        match self {
            DemoKind::Particles => "Particles with real physics!",
            DemoKind::Cube => "Interactive 3D cube is up!",
            DemoKind::Matrix => "The Matrix has you...",
            DemoKind::JumpGame => "Game on! Jump over the blocks!",
            DemoKind::Gravity => "Planets attract each other!",
            DemoKind::Snake => "The snake is alive!",
            DemoKind::Wave => "Waves in motion!",
            DemoKind::Flappy => "The bird is flying!",
            DemoKind::Helix => "DNA is spinning!",
        }
    }

    /// Short usage hint drawn below the canvas.
    pub fn hint(self) -> &'static str {
        match self {
            DemoKind::Particles => "Click to spawn an explosion",
            DemoKind::Cube => "Drag to rotate the cube",
            DemoKind::Matrix => "Tune the speed in the panel",
            DemoKind::JumpGame => "Click or press Space to jump",
            DemoKind::Gravity => "Click to add a planet · C clears · T toggles trails",
            DemoKind::Snake => "Arrows / WASD to steer · Enter restarts",
            DemoKind::Wave => "Tune amplitude and frequency in the panel",
            DemoKind::Flappy => "Click or press Space to flap · Enter restarts",
            DemoKind::Helix => "Tune speed and base pairs in the panel",
        }
    }

    pub fn listing(self) -> &'static str {
        listings::listing(self)
    }

    pub fn listing_lines(self) -> usize {
        self.listing().lines().count()
    }

    pub fn canvas_size(self) -> (u32, u32) {
        match self {
            DemoKind::Snake => (snake::CANVAS_SIZE, snake::CANVAS_SIZE),
            _ => (600, 400),
        }
    }

    pub fn is_game(self) -> bool {
        matches!(self, DemoKind::Snake | DemoKind::Flappy | DemoKind::JumpGame)
    }
}

// ======================== Demo Trait ========================

/// Inputs to one simulation step.
pub struct FrameContext<'a> {
    pub now_ms: f64,
    /// Host "running" signal.
    pub running: bool,
    pub params: &'a DemoParams,
}

/// Text painted over the canvas by the HUD renderer, in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayText {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgb,
    pub centered: bool,
}

impl OverlayText {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32, color: Rgb) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            color,
            centered: false,
        }
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

/// A self-contained canvas animation driven by the host frame loop.
///
/// The host calls, per frame and in this order: queued `handle_action`s,
/// `update`, `draw`. The canvas persists between frames, so demos that
/// want motion trails fade instead of clearing.
pub trait Demo {
    fn kind(&self) -> DemoKind;

    /// Output became visible; schedule initial content relative to `now_ms`.
    fn activate(&mut self, now_ms: f64);

    fn handle_action(&mut self, action: Action, now_ms: f64);

    fn update(&mut self, ctx: &FrameContext);

    fn draw(&self, canvas: &mut Canvas, params: &DemoParams);

    fn stats(&self) -> DemoStats;

    fn overlay(&self) -> Vec<OverlayText> {
        Vec::new()
    }

    /// Game demos expose their run state; animations return `None`.
    fn phase(&self) -> Option<GamePhase> {
        None
    }
}

/// Build an idle demo. A fixed `seed` makes every random draw reproducible.
pub fn create_demo(kind: DemoKind, seed: Option<u64>) -> Box<dyn Demo> {
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    match kind {
        DemoKind::Particles => Box::new(particles::ParticleDemo::new(rng)),
        DemoKind::Cube => Box::new(cube::CubeDemo::new()),
        DemoKind::Matrix => Box::new(matrix::MatrixDemo::new(rng)),
        DemoKind::JumpGame => Box::new(platformer::JumpGame::new(rng)),
        DemoKind::Gravity => Box::new(gravity::GravityDemo::new(rng)),
        DemoKind::Snake => Box::new(snake::SnakeGame::new(rng)),
        DemoKind::Wave => Box::new(wave::WaveDemo::new()),
        DemoKind::Flappy => Box::new(flappy::FlappyGame::new(rng)),
        DemoKind::Helix => Box::new(helix::HelixDemo::new()),
    }
}

/// Timed one-shot spawns queued on activation (e.g. staggered explosions).
#[derive(Clone, Debug, Default)]
pub(crate) struct SpawnSchedule {
    pending: Vec<(f64, f32, f32)>,
}

impl SpawnSchedule {
    /// Queue each `(x, y, delay_ms)` relative to `now_ms`.
    pub fn arm(&mut self, now_ms: f64, spawns: &[(f32, f32, f64)]) {
        self.pending = spawns
            .iter()
            .map(|&(x, y, delay)| (now_ms + delay, x, y))
            .collect();
    }

    /// Positions whose time has come, in schedule order.
    pub fn due(&mut self, now_ms: f64) -> Vec<(f32, f32)> {
        let mut fired = Vec::new();
        self.pending.retain(|&(at, x, y)| {
            if now_ms >= at {
                fired.push((x, y));
                false
            } else {
                true
            }
        });
        fired
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_kinds() {
        assert_eq!(DemoKind::from_name("snake"), Some(DemoKind::Snake));
        assert_eq!(DemoKind::from_name("DNA Helix"), Some(DemoKind::Helix));
        assert_eq!(DemoKind::from_name(" Jump "), Some(DemoKind::JumpGame));
        assert_eq!(DemoKind::from_name("tetris"), None);
    }

    #[test]
    fn catalogue_order_and_sizes() {
        assert_eq!(DemoKind::ALL.len(), 9);
        for (i, kind) in DemoKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert!(kind.listing_lines() > 5, "{:?} listing too short", kind);
        }
        assert_eq!(DemoKind::Snake.canvas_size(), (400, 400));
        assert_eq!(DemoKind::Wave.canvas_size(), (600, 400));
    }

    #[test]
    fn factory_builds_matching_kind() {
        for kind in DemoKind::ALL {
            let demo = create_demo(kind, Some(1));
            assert_eq!(demo.kind(), kind);
            assert_eq!(demo.phase().is_some(), kind.is_game());
        }
    }

    #[test]
    fn spawn_schedule_fires_in_time_order() {
        let mut schedule = SpawnSchedule::default();
        schedule.arm(1000.0, &[(1.0, 1.0, 0.0), (2.0, 2.0, 300.0)]);
        assert_eq!(schedule.due(1000.0), vec![(1.0, 1.0)]);
        assert!(schedule.due(1299.0).is_empty());
        assert_eq!(schedule.due(1300.0), vec![(2.0, 2.0)]);
        assert!(schedule.is_empty());
    }
}
