// ============================================================================
// game.rs — Demo Showcase
// Run-state machine shared by the game-style demos (snake, flappy, jump).
// ============================================================================

use serde::Serialize;

/// Delay between demo activation and the automatic first start.
pub const AUTO_START_DELAY_MS: f64 = 500.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    #[default]
    Idle,
    Running,
    GameOver,
}

impl GamePhase {
    pub fn name(self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Running => "Running",
            GamePhase::GameOver => "Game Over",
        }
    }
}

/// Phase plus the pending auto-start. Transitions that do not apply to the
/// current phase are ignored.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    phase: GamePhase,
    auto_start_at: Option<f64>,
}

impl RunState {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Arrange an automatic start `AUTO_START_DELAY_MS` after `now_ms`.
    pub fn arm_auto_start(&mut self, now_ms: f64) {
        self.auto_start_at = Some(now_ms + AUTO_START_DELAY_MS);
    }

    /// True once the armed auto-start is due; fires at most once.
    pub fn auto_start_due(&mut self, now_ms: f64) -> bool {
        match self.auto_start_at {
            Some(at) if now_ms >= at => {
                self.auto_start_at = None;
                true
            }
            _ => false,
        }
    }

    /// `Idle | GameOver → Running`. Returns false (no-op) while running.
    pub fn start(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Running;
        self.auto_start_at = None;
        true
    }

    /// `Running → GameOver`. Returns false when not running.
    pub fn end(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::GameOver;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_idle_running_gameover_running() {
        let mut run = RunState::default();
        assert_eq!(run.phase(), GamePhase::Idle);
        assert!(run.start());
        assert!(run.end());
        assert_eq!(run.phase(), GamePhase::GameOver);
        assert!(run.start());
        assert_eq!(run.phase(), GamePhase::Running);
    }

    #[test]
    fn restart_while_running_is_ignored() {
        let mut run = RunState::default();
        run.start();
        assert!(!run.start());
        assert_eq!(run.phase(), GamePhase::Running);
    }

    #[test]
    fn end_outside_run_is_ignored() {
        let mut run = RunState::default();
        assert!(!run.end());
        assert_eq!(run.phase(), GamePhase::Idle);
    }

    #[test]
    fn auto_start_fires_once_after_delay() {
        let mut run = RunState::default();
        run.arm_auto_start(1000.0);
        assert!(!run.auto_start_due(1499.0));
        assert!(run.auto_start_due(1500.0));
        assert!(!run.auto_start_due(2000.0));
    }
}
