// ============================================================================
// demos/flappy.rs — Demo Showcase
// Flappy bird: gravity, flap impulse, scrolling pipe pairs with a gap.
// ============================================================================

use rand::rngs::StdRng;
use rand::Rng;

use super::{Demo, DemoKind, FrameContext, OverlayText};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::game::{GamePhase, RunState};
use crate::input::Action;
use crate::stats::DemoStats;

pub const BIRD_X: f32 = 100.0;
pub const BIRD_SIZE: f32 = 30.0;
pub const PIPE_WIDTH: f32 = 60.0;
pub const PIPE_GAP: f32 = 180.0;
pub const GRAVITY: f32 = 0.18;
pub const FLAP_VELOCITY: f32 = -5.5;
pub const PIPE_SPEED: f32 = 2.0;
pub const PIPE_INTERVAL: u64 = 120;
pub const GROUND_HEIGHT: f32 = 50.0;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;
const BIRD_START_Y: f32 = 200.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    pub x: f32,
    /// Bottom of the upper pipe.
    pub gap_top: f32,
    pub passed: bool,
}

impl Pipe {
    /// AABB test of the bird against the two solid bands of this pipe.
    pub fn hits(&self, bird_y: f32) -> bool {
        let overlaps_x = BIRD_X + BIRD_SIZE > self.x && BIRD_X < self.x + PIPE_WIDTH;
        let outside_gap = bird_y < self.gap_top || bird_y + BIRD_SIZE > self.gap_top + PIPE_GAP;
        overlaps_x && outside_gap
    }
}

pub struct FlappyGame {
    rng: StdRng,
    run: RunState,
    bird_y: f32,
    velocity: f32,
    pipes: Vec<Pipe>,
    frame: u64,
    score: u32,
}

impl FlappyGame {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            run: RunState::default(),
            bird_y: BIRD_START_Y,
            velocity: 0.0,
            pipes: Vec::new(),
            frame: 0,
            score: 0,
        }
    }

    #[cfg(test)]
    pub fn bird_y(&self) -> f32 {
        self.bird_y
    }

    #[cfg(test)]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[cfg(test)]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[cfg(test)]
    pub fn push_pipe(&mut self, pipe: Pipe) {
        self.pipes.push(pipe);
    }

    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn start(&mut self) {
        if !self.run.start() {
            return;
        }
        self.bird_y = BIRD_START_Y;
        self.velocity = 0.0;
        self.pipes.clear();
        self.frame = 0;
        self.score = 0;
        log::info!("Flappy: run started");
    }

    pub fn flap(&mut self) {
        if self.run.is_running() {
            self.velocity = FLAP_VELOCITY;
        }
    }

    fn crash(&mut self, cause: &str) {
        self.run.end();
        log::info!("Flappy: game over ({}), score {}", cause, self.score);
    }

    /// One frame of bird physics and pipe scrolling.
    pub fn step(&mut self) {
        if !self.run.is_running() {
            return;
        }

        self.velocity += GRAVITY;
        self.bird_y += self.velocity;

        if self.bird_y + BIRD_SIZE > HEIGHT - GROUND_HEIGHT {
            self.crash("ground");
            return;
        }
        if self.bird_y < 0.0 {
            self.crash("ceiling");
            return;
        }

        self.frame += 1;
        if self.frame % PIPE_INTERVAL == 0 {
            let gap_top = 100.0 + self.rng.gen_range(0.0..150.0);
            self.pipes.push(Pipe {
                x: WIDTH,
                gap_top,
                passed: false,
            });
        }

        self.pipes.retain(|p| p.x > -PIPE_WIDTH);
        let mut hit = false;
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
            if !pipe.passed && pipe.x + PIPE_WIDTH < BIRD_X {
                pipe.passed = true;
                self.score += 1;
            }
            hit |= pipe.hits(self.bird_y);
        }
        if hit {
            self.crash("pipe");
        }
    }
}

impl Demo for FlappyGame {
    fn kind(&self) -> DemoKind {
        DemoKind::Flappy
    }

    fn activate(&mut self, now_ms: f64) {
        self.run.arm_auto_start(now_ms);
    }

    fn handle_action(&mut self, action: Action, _now_ms: f64) {
        match action {
            Action::Start => self.start(),
            Action::Jump | Action::PointerDown { .. } => self.flap(),
            _ => {}
        }
    }

    fn update(&mut self, ctx: &FrameContext) {
        if self.run.auto_start_due(ctx.now_ms) {
            self.start();
        }
        self.step();
    }

    fn draw(&self, canvas: &mut Canvas, _params: &DemoParams) {
        canvas.clear(Rgb::hex(0x87ceeb));

        let cloud = Rgb::WHITE;
        canvas.fill_circle(100.0, 50.0, 30.0, cloud, 0.5);
        canvas.fill_circle(130.0, 50.0, 40.0, cloud, 0.5);
        canvas.fill_circle(160.0, 50.0, 30.0, cloud, 0.5);

        let ground_top = HEIGHT - GROUND_HEIGHT;
        for pipe in &self.pipes {
            let lower_top = pipe.gap_top + PIPE_GAP;
            let lower_h = ground_top - lower_top;
            canvas.fill_rect(pipe.x, 0.0, PIPE_WIDTH, pipe.gap_top, Rgb::hex(0x2ecc71), 1.0);
            canvas.fill_rect(pipe.x, lower_top, PIPE_WIDTH, lower_h, Rgb::hex(0x2ecc71), 1.0);
            canvas.stroke_rect(pipe.x, 0.0, PIPE_WIDTH, pipe.gap_top, 3.0, Rgb::hex(0x27ae60));
            canvas.stroke_rect(pipe.x, lower_top, PIPE_WIDTH, lower_h, 3.0, Rgb::hex(0x27ae60));
        }

        canvas.fill_rect(0.0, ground_top, WIDTH, GROUND_HEIGHT, Rgb::hex(0x8b4513), 1.0);
        canvas.fill_rect(0.0, ground_top - 5.0, WIDTH, 5.0, Rgb::hex(0x228b22), 1.0);

        let (cx, cy) = (BIRD_X + 15.0, self.bird_y + 15.0);
        canvas.fill_circle(cx, HEIGHT - 45.0, 6.0, Rgb::BLACK, 0.2);
        canvas.fill_circle(cx, cy, 15.0, Rgb::hex(0xffa500), 1.0);
        canvas.fill_circle(cx, cy, 10.0, Rgb::hex(0xffd700), 1.0);
        canvas.fill_circle(BIRD_X + 22.0, self.bird_y + 12.0, 5.0, Rgb::WHITE, 1.0);
        canvas.fill_circle(BIRD_X + 23.0, self.bird_y + 12.0, 3.0, Rgb::BLACK, 1.0);
        canvas.fill_polygon(
            &[
                (BIRD_X + 28.0, self.bird_y + 15.0),
                (BIRD_X + 35.0, self.bird_y + 15.0),
                (BIRD_X + 28.0, self.bird_y + 18.0),
            ],
            Rgb::hex(0xff6347),
            1.0,
        );
        let wing = (self.frame as f32 * 0.2).sin() * 3.0;
        canvas.fill_circle(BIRD_X + 10.0, self.bird_y + 20.0 + wing, 7.0, Rgb::hex(0xffa500), 1.0);
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("pipes", self.pipes.len())
            .with_score(self.score, self.run.phase())
            .with_motion(std::iter::once((1.0, 0.0, self.velocity)));
        stats.frame = self.frame;
        stats
    }

    fn overlay(&self) -> Vec<OverlayText> {
        let mut text = vec![OverlayText::new(self.score.to_string(), WIDTH / 2.0, 20.0, 40.0, Rgb::WHITE).centered()];
        match self.run.phase() {
            GamePhase::Idle => text.push(
                OverlayText::new("Tap or press SPACE", WIDTH / 2.0, HEIGHT / 2.0 - 20.0, 22.0, Rgb::WHITE).centered(),
            ),
            GamePhase::GameOver => text.push(
                OverlayText::new(
                    format!("Game Over! Score: {} · Enter to retry", self.score),
                    WIDTH / 2.0,
                    HEIGHT / 2.0 - 20.0,
                    22.0,
                    Rgb::WHITE,
                )
                .centered(),
            ),
            GamePhase::Running => {}
        }
        text
    }

    fn phase(&self) -> Option<GamePhase> {
        Some(self.run.phase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn running(seed: u64) -> FlappyGame {
        let mut game = FlappyGame::new(StdRng::seed_from_u64(seed));
        game.start();
        game
    }

    #[test]
    fn velocity_rises_between_flaps() {
        let mut game = running(1);
        let mut last = game.velocity();
        for _ in 0..20 {
            game.step();
            assert!(game.velocity() > last);
            last = game.velocity();
        }
    }

    #[test]
    fn flap_sets_velocity() {
        let mut game = running(2);
        for _ in 0..10 {
            game.step();
        }
        game.handle_action(Action::Jump, 0.0);
        assert_eq!(game.velocity(), FLAP_VELOCITY);
    }

    #[test]
    fn flap_ignored_when_idle() {
        let mut game = FlappyGame::new(StdRng::seed_from_u64(3));
        game.flap();
        assert_eq!(game.velocity(), 0.0);
    }

    #[test]
    fn falling_to_the_floor_ends_the_run() {
        let mut game = running(4);
        for _ in 0..200 {
            game.step();
        }
        assert_eq!(game.phase(), Some(GamePhase::GameOver));
        assert!(game.bird_y() + BIRD_SIZE > HEIGHT - GROUND_HEIGHT);
    }

    #[test]
    fn flapping_through_the_ceiling_ends_the_run() {
        let mut game = running(8);
        for _ in 0..60 {
            game.flap();
            game.step();
            if game.phase() == Some(GamePhase::GameOver) {
                break;
            }
        }
        assert_eq!(game.phase(), Some(GamePhase::GameOver));
        assert!(game.bird_y() < 0.0);
    }

    #[test]
    fn pipe_collision_ends_the_run() {
        let mut game = running(9);
        // Bird starts at 200, above a gap that opens at 250.
        game.push_pipe(Pipe { x: BIRD_X, gap_top: 250.0, passed: false });
        game.step();
        assert_eq!(game.phase(), Some(GamePhase::GameOver));
        assert!(game.bird_y() > 0.0 && game.bird_y() + BIRD_SIZE < HEIGHT - GROUND_HEIGHT);
    }

    #[test]
    fn pipes_spawn_every_interval() {
        let mut game = running(5);
        for i in 0..PIPE_INTERVAL {
            // A flap every 60 frames roughly holds altitude.
            if i % 60 == 0 {
                game.flap();
            }
            game.step();
        }
        assert_eq!(game.phase(), Some(GamePhase::Running));
        assert_eq!(game.pipes().len(), 1);
        let pipe = &game.pipes()[0];
        assert!((100.0..250.0).contains(&pipe.gap_top));
        assert_eq!(pipe.x, WIDTH - PIPE_SPEED);
    }

    #[test]
    fn hit_test_respects_the_gap() {
        let pipe = Pipe { x: BIRD_X, gap_top: 150.0, passed: false };
        assert!(!pipe.hits(200.0));
        assert!(pipe.hits(100.0));
        assert!(pipe.hits(310.0));
        let far = Pipe { x: 400.0, gap_top: 150.0, passed: false };
        assert!(!far.hits(0.0));
    }

    #[test]
    fn passing_a_pipe_scores_once() {
        let mut game = running(6);
        game.push_pipe(Pipe { x: BIRD_X - PIPE_WIDTH + 1.0, gap_top: 100.0, passed: false });
        game.flap();
        game.step();
        assert_eq!(game.score(), 1);
        game.step();
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn spent_pipes_are_removed() {
        let mut game = running(7);
        game.push_pipe(Pipe { x: -PIPE_WIDTH, gap_top: 100.0, passed: true });
        game.flap();
        game.step();
        assert!(game.pipes().is_empty());
    }
}
