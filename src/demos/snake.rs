// ============================================================================
// demos/snake.rs — Demo Showcase
// Grid snake: one move every 100 ms, food grows the snake, walls and the
// snake's own body end the run.
// ============================================================================

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use super::{Demo, DemoKind, FrameContext, OverlayText};
use crate::canvas::{Canvas, Rgb};
use crate::config::DemoParams;
use crate::game::{GamePhase, RunState};
use crate::input::{Action, Direction};
use crate::stats::DemoStats;

pub const GRID: i32 = 20;
pub const CELL: u32 = 20;
pub const CANVAS_SIZE: u32 = GRID as u32 * CELL;
pub const TICK_MS: f64 = 100.0;
pub const FOOD_SCORE: u32 = 10;

const START: (i32, i32) = (10, 10);
const FIRST_FOOD: (i32, i32) = (15, 15);

/// Result of a single grid move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Crashed,
}

pub struct SnakeGame {
    rng: StdRng,
    run: RunState,
    /// Head first.
    body: VecDeque<(i32, i32)>,
    heading: Direction,
    /// Direction of the last completed move; reversal is judged against it.
    moved: Direction,
    food: (i32, i32),
    score: u32,
    last_tick_ms: Option<f64>,
    ticks: u64,
}

impl SnakeGame {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            run: RunState::default(),
            body: VecDeque::from([START]),
            heading: Direction::Right,
            moved: Direction::Right,
            food: FIRST_FOOD,
            score: 0,
            last_tick_ms: None,
            ticks: 0,
        }
    }

    pub fn head(&self) -> (i32, i32) {
        self.body.front().copied().unwrap_or(START)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub fn food(&self) -> (i32, i32) {
        self.food
    }

    #[cfg(test)]
    pub fn set_food(&mut self, cell: (i32, i32)) {
        self.food = cell;
    }

    #[cfg(test)]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Reset the board and begin a run. Ignored while already running.
    pub fn start(&mut self) {
        if !self.run.start() {
            return;
        }
        self.body = VecDeque::from([START]);
        self.heading = Direction::Right;
        self.moved = Direction::Right;
        self.score = 0;
        self.last_tick_ms = None;
        self.place_food();
        log::info!("Snake: run started");
    }

    /// Change heading unless it would reverse onto the neck.
    pub fn steer(&mut self, dir: Direction) {
        if self.run.is_running() && dir != self.moved.opposite() {
            self.heading = dir;
        }
    }

    // Uniform over the whole grid; the cell may lie under the snake.
    fn place_food(&mut self) {
        self.food = (self.rng.gen_range(0..GRID), self.rng.gen_range(0..GRID));
    }

    /// Move one cell in the current heading.
    pub fn tick(&mut self) -> TickOutcome {
        let (hx, hy) = self.head();
        let (dx, dy) = self.heading.delta();
        let next = (hx + dx, hy + dy);
        self.ticks += 1;

        let off_grid = next.0 < 0 || next.0 >= GRID || next.1 < 0 || next.1 >= GRID;
        if off_grid || self.body.contains(&next) {
            self.run.end();
            log::info!("Snake: game over (score {}, length {})", self.score, self.body.len());
            return TickOutcome::Crashed;
        }

        self.moved = self.heading;
        self.body.push_front(next);
        if next == self.food {
            self.score += FOOD_SCORE;
            self.place_food();
            TickOutcome::Ate
        } else {
            self.body.pop_back();
            TickOutcome::Moved
        }
    }
}

impl Demo for SnakeGame {
    fn kind(&self) -> DemoKind {
        DemoKind::Snake
    }

    fn activate(&mut self, now_ms: f64) {
        self.run.arm_auto_start(now_ms);
    }

    fn handle_action(&mut self, action: Action, _now_ms: f64) {
        match action {
            Action::Start => self.start(),
            Action::Steer(dir) => self.steer(dir),
            _ => {}
        }
    }

    fn update(&mut self, ctx: &FrameContext) {
        if self.run.auto_start_due(ctx.now_ms) {
            self.start();
        }
        if !self.run.is_running() {
            return;
        }
        let due = match self.last_tick_ms {
            None => true,
            Some(last) => ctx.now_ms - last >= TICK_MS,
        };
        if due {
            self.last_tick_ms = Some(ctx.now_ms);
            self.tick();
        }
    }

    fn draw(&self, canvas: &mut Canvas, _params: &DemoParams) {
        let cell = CELL as f32;
        let size = CANVAS_SIZE as f32;
        canvas.clear(Rgb::hex(0x0a0a0a));

        let grid = Rgb::hex(0x3b82f6);
        for i in 0..=GRID {
            let p = i as f32 * cell;
            canvas.line(p, 0.0, p, size, 1.0, grid, 0.1);
            canvas.line(0.0, p, size, p, 1.0, grid, 0.1);
        }

        let (fx, fy) = self.food;
        canvas.fill_rect(fx as f32 * cell + 2.0, fy as f32 * cell + 2.0, cell - 4.0, cell - 4.0, Rgb::hex(0xef4444), 1.0);

        for (i, &(x, y)) in self.body.iter().enumerate() {
            let color = if i == 0 { Rgb::hex(0x3b82f6) } else { Rgb::hex(0x8b5cf6) };
            canvas.fill_rect(x as f32 * cell + 1.0, y as f32 * cell + 1.0, cell - 2.0, cell - 2.0, color, 1.0);
        }
    }

    fn stats(&self) -> DemoStats {
        let mut stats = DemoStats::new("segments", self.body.len()).with_score(self.score, self.run.phase());
        stats.frame = self.ticks;
        stats
    }

    fn overlay(&self) -> Vec<OverlayText> {
        let center = CANVAS_SIZE as f32 / 2.0;
        let mut text = vec![OverlayText::new(format!("Score: {}", self.score), 10.0, 8.0, 16.0, Rgb::WHITE)];
        match self.run.phase() {
            GamePhase::Idle => text.push(
                OverlayText::new("Press Enter to start", center, center - 10.0, 20.0, Rgb::WHITE).centered(),
            ),
            GamePhase::GameOver => text.push(
                OverlayText::new(format!("Game Over! Score: {}", self.score), center, center - 10.0, 22.0, Rgb::hex(0xef4444))
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

    fn running(seed: u64) -> SnakeGame {
        let mut game = SnakeGame::new(StdRng::seed_from_u64(seed));
        game.start();
        game.set_food((0, 0));
        game
    }

    #[test]
    fn five_ticks_right_from_center() {
        let mut game = running(1);
        for _ in 0..5 {
            assert_eq!(game.tick(), TickOutcome::Moved);
        }
        assert_eq!(game.head(), (15, 10));
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn eating_grows_by_one_and_scores() {
        let mut game = running(2);
        game.set_food((11, 10));
        assert_eq!(game.tick(), TickOutcome::Ate);
        assert_eq!(game.len(), 2);
        assert_eq!(game.score(), 10);
        let food = game.food();
        assert!((0..GRID).contains(&food.0) && (0..GRID).contains(&food.1));
    }

    #[test]
    fn hitting_the_wall_ends_the_run() {
        let mut game = running(3);
        let mut outcome = TickOutcome::Moved;
        for _ in 0..10 {
            outcome = game.tick();
        }
        assert_eq!(outcome, TickOutcome::Crashed);
        assert_eq!(game.phase(), Some(GamePhase::GameOver));
        assert_eq!(game.head(), (19, 10));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut game = running(4);
        game.steer(Direction::Left);
        assert_eq!(game.heading(), Direction::Right);
        game.steer(Direction::Up);
        // Still moving right until the next tick, so Left stays illegal.
        game.steer(Direction::Left);
        assert_eq!(game.heading(), Direction::Up);
    }

    #[test]
    fn running_into_own_body_crashes() {
        let mut game = running(5);
        for cell in [(11, 10), (12, 10), (13, 10), (14, 10)] {
            game.set_food(cell);
            game.tick();
        }
        assert_eq!(game.len(), 5);
        game.set_food((0, 0));
        game.steer(Direction::Down);
        game.tick();
        game.steer(Direction::Left);
        game.tick();
        game.steer(Direction::Up);
        assert_eq!(game.tick(), TickOutcome::Crashed);
    }

    #[test]
    fn moves_every_hundred_ms_with_immediate_first_tick() {
        let mut game = SnakeGame::new(StdRng::seed_from_u64(6));
        let params = DemoParams::default();
        game.activate(0.0);
        for now in [0.0, 499.0] {
            game.update(&FrameContext { now_ms: now, running: true, params: &params });
        }
        assert_eq!(game.phase(), Some(GamePhase::Idle));

        game.set_food((0, 0));
        game.update(&FrameContext { now_ms: 500.0, running: true, params: &params });
        assert_eq!(game.phase(), Some(GamePhase::Running));
        game.set_food((0, 0));
        assert_eq!(game.head(), (11, 10));

        for now in [550.0, 599.0] {
            game.update(&FrameContext { now_ms: now, running: true, params: &params });
        }
        assert_eq!(game.head(), (11, 10));
        game.update(&FrameContext { now_ms: 600.0, running: true, params: &params });
        assert_eq!(game.head(), (12, 10));
    }

    #[test]
    fn steering_ignored_outside_a_run() {
        let mut game = SnakeGame::new(StdRng::seed_from_u64(7));
        game.handle_action(Action::Steer(Direction::Up), 0.0);
        assert_eq!(game.heading(), Direction::Right);
    }

    #[test]
    fn restart_after_game_over_resets_board() {
        let mut game = running(8);
        for _ in 0..10 {
            game.tick();
        }
        game.handle_action(Action::Start, 0.0);
        assert_eq!(game.phase(), Some(GamePhase::Running));
        assert_eq!(game.head(), (10, 10));
        assert_eq!(game.score(), 0);
    }
}
