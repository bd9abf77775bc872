// ============================================================================
// headless.rs — Demo Showcase
// Headless runner: drives one demo through the host with a synthetic 60 Hz
// clock, logging stats and optionally recording a session or a screenshot.
// ============================================================================

use std::path::PathBuf;
use std::time::Instant;

use crate::config::DemoParams;
use crate::demos::DemoKind;
use crate::host::{DemoHost, LINE_MS, OUTPUT_DELAY_MS};
use crate::scheduler::{FrameQueue, SharedScheduler};
use crate::session::{save_canvas_png, SessionState};
use crate::stats::DemoStats;

/// Synthetic refresh interval.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Clone, Debug)]
pub struct HeadlessConfig {
    pub demo: DemoKind,
    pub frames: u64,
    pub seed: Option<u64>,
    pub params: DemoParams,
    pub screenshot_path: Option<PathBuf>,
    pub stats_interval: u64,
    pub record: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::Particles,
            frames: 600,
            seed: None,
            params: DemoParams::default(),
            screenshot_path: None,
            stats_interval: 120,
            record: false,
        }
    }
}

/// What a headless run produced.
#[derive(Debug)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub refreshes: u64,
    pub final_stats: DemoStats,
    pub run_dir: Option<PathBuf>,
}

pub fn run_headless(config: &HeadlessConfig) -> Result<HeadlessSummary, String> {
    let mut params = config.params.clone();
    if let Some(seed) = config.seed {
        params.use_fixed_seed = true;
        params.fixed_seed_value = seed;
    }
    params.sanitize();

    let scheduler: SharedScheduler = FrameQueue::new().shared();
    let mut host = DemoHost::new(scheduler, params.clone(), config.demo);

    let mut session = SessionState::default();
    if config.stats_interval > 0 {
        session.sample_interval = config.stats_interval;
    }
    if config.record {
        session.start_run(&params, config.demo);
    }

    // The listing animation plays before the first demo frame.
    let warmup_ms = config.demo.listing_lines() as f64 * LINE_MS + OUTPUT_DELAY_MS;
    let max_refreshes = config.frames + (warmup_ms / FRAME_MS).ceil() as u64 + 2;

    log::info!(
        "Headless run started: {} for {} frames (seed: {:?})",
        config.demo.title(),
        config.frames,
        params.effective_seed(),
    );

    let started = Instant::now();
    let mut now_ms = 0.0;
    let mut refreshes = 0u64;
    let mut last_stats: Option<DemoStats> = None;

    host.run(now_ms);
    while host.frames() < config.frames && refreshes < max_refreshes {
        now_ms += FRAME_MS;
        refreshes += 1;
        let drawn = host.frame(now_ms);

        for event in host.drain_events() {
            log::info!("{}", event);
            session.log_event(host.frames(), "HOST", &event.to_string());
        }

        if !drawn {
            continue;
        }
        let stats = host.stats();
        if config.stats_interval > 0 && stats.frame % config.stats_interval == 0 {
            stats.log(config.demo.title(), last_stats.as_ref());
            last_stats = Some(stats.clone());
        }
        session.maybe_record(config.demo, &stats, 60.0);
    }

    if host.frames() < config.frames {
        return Err(format!(
            "Headless run stalled after {} of {} frames",
            host.frames(),
            config.frames
        ));
    }

    let elapsed = started.elapsed().as_secs_f64().max(1e-6);
    log::info!(
        "Headless run finished: {} frames in {:.2}s ({:.0} frames/s)",
        host.frames(),
        elapsed,
        host.frames() as f64 / elapsed,
    );

    if let Some(path) = &config.screenshot_path {
        let canvas = host
            .canvas()
            .ok_or_else(|| String::from("No canvas mounted at end of headless run"))?;
        save_canvas_png(canvas, path)?;
    }

    let run_dir = if config.record {
        if let Some(canvas) = host.canvas() {
            match session.save_screenshot(canvas, config.demo, host.frames()) {
                Ok(path) => session.log_event(host.frames(), "SCREENSHOT", &format!("Saved to {:?}", path)),
                Err(e) => log::error!("Screenshot failed: {}", e),
            }
        }
        session.finalize_run(host.params());
        Some(session.run_dir.clone())
    } else {
        None
    };

    Ok(HeadlessSummary {
        frames: host.frames(),
        refreshes,
        final_stats: host.stats(),
        run_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_requested_frames_after_listing() {
        let config = HeadlessConfig {
            demo: DemoKind::Wave,
            frames: 30,
            seed: Some(1),
            ..HeadlessConfig::default()
        };
        let summary = run_headless(&config).unwrap();
        assert_eq!(summary.frames, 30);
        assert!(summary.refreshes > 30);
        assert_eq!(summary.final_stats.frame, 30);
        assert!(summary.run_dir.is_none());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let config = HeadlessConfig {
            demo: DemoKind::Gravity,
            frames: 40,
            seed: Some(9),
            ..HeadlessConfig::default()
        };
        let a = run_headless(&config).unwrap().final_stats;
        let b = run_headless(&config).unwrap().final_stats;
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.kinetic_energy, b.kinetic_energy);
    }

    #[test]
    fn writes_screenshot() {
        let path = std::env::temp_dir().join(format!("demo-showcase-headless-{}.png", std::process::id()));
        let config = HeadlessConfig {
            demo: DemoKind::Snake,
            frames: 5,
            seed: Some(3),
            screenshot_path: Some(path.clone()),
            ..HeadlessConfig::default()
        };
        run_headless(&config).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (400, 400));
        let _ = std::fs::remove_file(&path);
    }
}
