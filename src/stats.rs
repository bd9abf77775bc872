// ============================================================================
// stats.rs — Demo Showcase
// Per-frame demo statistics: entity counts, score, energy, and the periodic
// multi-line stats report written to the log.
// ============================================================================

use serde::Serialize;

use crate::game::GamePhase;

/// Snapshot of one demo's observable state for a single frame.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DemoStats {
    pub frame: u64,

    // Population
    pub entities: usize,
    pub entity_label: &'static str,

    // Physics (zero for non-physical demos)
    pub kinetic_energy: f32,
    pub mean_speed: f32,

    // Games
    pub score: Option<u32>,
    pub phase: Option<GamePhase>,
}

impl DemoStats {
    pub fn new(entity_label: &'static str, entities: usize) -> Self {
        Self {
            entity_label,
            entities,
            ..Self::default()
        }
    }

    pub fn with_score(mut self, score: u32, phase: GamePhase) -> Self {
        self.score = Some(score);
        self.phase = Some(phase);
        self
    }

    /// Fill energy fields from `(mass, vx, vy)` triples.
    pub fn with_motion(mut self, bodies: impl Iterator<Item = (f32, f32, f32)>) -> Self {
        let mut energy = 0.0f64;
        let mut speed = 0.0f64;
        let mut n = 0usize;
        for (m, vx, vy) in bodies {
            let v2 = (vx * vx + vy * vy) as f64;
            energy += 0.5 * m as f64 * v2;
            speed += v2.sqrt();
            n += 1;
        }
        self.kinetic_energy = energy as f32;
        self.mean_speed = if n > 0 { (speed / n as f64) as f32 } else { 0.0 };
        self
    }

    /// Log at INFO level, with deltas against the previous sample if any.
    pub fn log(&self, demo: &str, prev: Option<&DemoStats>) {
        log::info!("══════════════ {} — frame {} ══════════════", demo, self.frame);

        if let Some(p) = prev {
            log::info!(
                "TRENDS: Δ{}={:+} | Δenergy={:+.2} | Δspeed={:+.3}",
                self.entity_label,
                self.entities as i64 - p.entities as i64,
                self.kinetic_energy - p.kinetic_energy,
                self.mean_speed - p.mean_speed,
            );
        }

        log::info!(
            "STATE: {}={} | energy={:.2} | mean_speed={:.3}",
            self.entity_label,
            self.entities,
            self.kinetic_energy,
            self.mean_speed,
        );

        if let (Some(score), Some(phase)) = (self.score, self.phase) {
            log::info!("GAME: phase={} | score={}", phase.name(), score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_sums_kinetic_energy() {
        let stats = DemoStats::new("bodies", 2)
            .with_motion([(2.0, 3.0, 4.0), (1.0, 0.0, 0.0)].into_iter());
        assert!((stats.kinetic_energy - 25.0).abs() < 1e-4);
        assert!((stats.mean_speed - 2.5).abs() < 1e-4);
    }

    #[test]
    fn empty_motion_is_zero() {
        let stats = DemoStats::new("particles", 0).with_motion(std::iter::empty());
        assert_eq!(stats.kinetic_energy, 0.0);
        assert_eq!(stats.mean_speed, 0.0);
    }

    #[test]
    fn score_carries_phase() {
        let stats = DemoStats::new("segments", 3).with_score(20, GamePhase::Running);
        assert_eq!(stats.score, Some(20));
        assert_eq!(stats.phase, Some(GamePhase::Running));
    }
}
