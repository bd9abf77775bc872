// ============================================================================
// demos/platformer.rs — Demo Showcase
// Jump game: a runner on the ground hops over blocks that slide in from the
// right. Score counts survived frames.
// ============================================================================

use rand::rngs::StdRng;
use rand::Rng;

use super::{Demo, DemoKind, FrameContext, OverlayText};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::game::{GamePhase, RunState};
use crate::input::Action;
use crate::stats::DemoStats;

pub const PLAYER_X: f32 = 50.0;
pub const PLAYER_SIZE: f32 = 30.0;
/// Player y while standing.
pub const GROUND_Y: f32 = 250.0;
pub const JUMP_VELOCITY: f32 = -15.0;
pub const GRAVITY: f32 = 0.8;

pub const OBSTACLE_Y: f32 = 270.0;
pub const OBSTACLE_SIZE: f32 = 30.0;
pub const OBSTACLE_SPEED: f32 = 5.0;
/// A new obstacle may appear once the newest one is left of this x.
pub const SPAWN_CLEARANCE_X: f32 = 400.0;
pub const SPAWN_CHANCE: f64 = 0.02;

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 400.0;
const FLOOR_Y: f32 = 300.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
}

impl Obstacle {
    fn overlaps(&self, player_y: f32) -> bool {
        PLAYER_X < self.x + OBSTACLE_SIZE
            && PLAYER_X + PLAYER_SIZE > self.x
            && player_y < OBSTACLE_Y + OBSTACLE_SIZE
            && player_y + PLAYER_SIZE > OBSTACLE_Y
    }
}

pub struct JumpGame {
    rng: StdRng,
    run: RunState,
    player_y: f32,
    velocity_y: f32,
    airborne: bool,
    obstacles: Vec<Obstacle>,
    score: u32,
    frame: u64,
}

impl JumpGame {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            run: RunState::default(),
            player_y: GROUND_Y,
            velocity_y: 0.0,
            airborne: false,
            obstacles: Vec::new(),
            score: 0,
            frame: 0,
        }
    }

    #[cfg(test)]
    pub fn player_y(&self) -> f32 {
        self.player_y
    }

    #[cfg(test)]
    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    #[cfg(test)]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[cfg(test)]
    pub fn push_obstacle(&mut self, x: f32) {
        self.obstacles.push(Obstacle { x });
    }

    /// Raw frame score; the display divides by ten.
    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn display_score(&self) -> u32 {
        self.score / 10
    }

    pub fn start(&mut self) {
        if !self.run.start() {
            return;
        }
        self.player_y = GROUND_Y;
        self.velocity_y = 0.0;
        self.airborne = false;
        self.obstacles.clear();
        self.score = 0;
        log::info!("Jump game: run started");
    }

    /// Jump only from the ground.
    pub fn jump(&mut self) {
        if self.run.is_running() && !self.airborne {
            self.velocity_y = JUMP_VELOCITY;
            self.airborne = true;
        }
    }

    pub fn step(&mut self) {
        if !self.run.is_running() {
            return;
        }
        self.frame += 1;

        self.player_y += self.velocity_y;
        self.velocity_y += GRAVITY;
        if self.player_y >= GROUND_Y {
            self.player_y = GROUND_Y;
            self.velocity_y = 0.0;
            self.airborne = false;
        }

        for obs in &mut self.obstacles {
            obs.x -= OBSTACLE_SPEED;
        }
        self.obstacles.retain(|o| o.x > -50.0);

        let clear = self.obstacles.last().map_or(true, |o| o.x < SPAWN_CLEARANCE_X);
        if clear && self.rng.gen_bool(SPAWN_CHANCE) {
            self.obstacles.push(Obstacle { x: WIDTH });
        }

        if self.obstacles.iter().any(|o| o.overlaps(self.player_y)) {
            self.run.end();
            log::info!("Jump game: game over, score {}", self.display_score());
            return;
        }

        self.score += 1;
    }
}

impl Demo for JumpGame {
    fn kind(&self) -> DemoKind {
        DemoKind::JumpGame
    }

    fn activate(&mut self, now_ms: f64) {
        self.run.arm_auto_start(now_ms);
    }

    fn handle_action(&mut self, action: Action, _now_ms: f64) {
        match action {
            Action::Start => self.start(),
            Action::Jump | Action::PointerDown { .. } => self.jump(),
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
        canvas.clear(Rgb::hex(0x0a0a0a));

        let grid = Rgb::hex(0x3b82f6);
        for i in (0..WIDTH as u32).step_by(50) {
            canvas.line(i as f32, 0.0, i as f32, HEIGHT, 1.0, grid, 0.1);
        }
        for i in (0..HEIGHT as u32).step_by(50) {
            canvas.line(0.0, i as f32, WIDTH, i as f32, 1.0, grid, 0.1);
        }

        canvas.fill_rect(0.0, FLOOR_Y, WIDTH, HEIGHT - FLOOR_Y, Rgb::hex(0x1e293b), 1.0);

        canvas.fill_rect(PLAYER_X, self.player_y, PLAYER_SIZE, PLAYER_SIZE, Rgb::hex(0x3b82f6), 1.0);
        canvas.fill_rect(PLAYER_X + 8.0, self.player_y + 8.0, PLAYER_SIZE - 16.0, PLAYER_SIZE - 16.0, Rgb::hex(0x8b5cf6), 1.0);
        canvas.stroke_rect(PLAYER_X, self.player_y, PLAYER_SIZE, PLAYER_SIZE, 2.0, Rgb::hex(0x60a5fa));

        for obs in &self.obstacles {
            canvas.fill_rect(obs.x, OBSTACLE_Y, OBSTACLE_SIZE, OBSTACLE_SIZE, Rgb::hex(0xef4444), 1.0);
            canvas.stroke_rect(obs.x, OBSTACLE_Y, OBSTACLE_SIZE, OBSTACLE_SIZE, 2.0, Rgb::hex(0xf87171));
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("obstacles", self.obstacles.len())
            .with_score(self.display_score(), self.run.phase())
            .with_motion(std::iter::once((1.0, 0.0, self.velocity_y)));
        stats.frame = self.frame;
        stats
    }

    fn overlay(&self) -> Vec<OverlayText> {
        let mut text = vec![OverlayText::new(
            format!("Score: {}", self.display_score()),
            12.0,
            10.0,
            18.0,
            Rgb::WHITE,
        )];
        match self.run.phase() {
            GamePhase::Idle => text.push(
                OverlayText::new("Tap or press SPACE", WIDTH / 2.0, 120.0, 22.0, Rgb::WHITE).centered(),
            ),
            GamePhase::GameOver => text.push(
                OverlayText::new(
                    format!("Game Over! Score: {} · Enter to retry", self.display_score()),
                    WIDTH / 2.0,
                    120.0,
                    22.0,
                    Rgb::hex(0xef4444),
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

    fn running(seed: u64) -> JumpGame {
        let mut game = JumpGame::new(StdRng::seed_from_u64(seed));
        game.start();
        game
    }

    #[test]
    fn jump_arcs_and_lands() {
        let mut game = running(1);
        game.jump();
        assert!(game.is_airborne());
        game.step();
        assert_eq!(game.player_y(), GROUND_Y + JUMP_VELOCITY);
        for _ in 0..60 {
            game.obstacles.clear();
            game.step();
        }
        assert!(!game.is_airborne());
        assert_eq!(game.player_y(), GROUND_Y);
    }

    #[test]
    fn no_double_jump() {
        let mut game = running(2);
        game.jump();
        game.step();
        let v = game.velocity_y;
        game.jump();
        assert_eq!(game.velocity_y, v);
    }

    #[test]
    fn grounded_runner_hits_obstacle() {
        let mut game = running(3);
        game.push_obstacle(PLAYER_X + 10.0);
        game.step();
        assert_eq!(game.phase(), Some(GamePhase::GameOver));
    }

    #[test]
    fn obstacles_scroll_and_expire() {
        let mut game = running(4);
        game.push_obstacle(-46.0);
        game.push_obstacle(300.0);
        game.jump();
        game.step();
        assert_eq!(game.obstacles()[0].x, 295.0);
        assert!(game.obstacles().iter().all(|o| o.x > -50.0));
    }

    #[test]
    fn score_counts_frames() {
        let mut game = running(5);
        for _ in 0..25 {
            game.obstacles.clear();
            game.step();
        }
        assert_eq!(game.score(), 25);
        assert_eq!(game.display_score(), 2);
    }

    #[test]
    fn spawning_waits_for_clearance() {
        let mut game = running(6);
        game.push_obstacle(590.0);
        for _ in 0..20 {
            game.step();
        }
        // Newest obstacle is still right of the clearance line.
        assert_eq!(game.obstacles().len(), 1);
    }
}
