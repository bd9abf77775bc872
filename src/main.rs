// ============================================================================
// main.rs — Demo Showcase
// Entry point. Parses options, initializes logging, and either starts the
// windowed showcase or runs one demo headless.
// ============================================================================

mod app;
mod canvas;
mod config;
mod demos;
mod game;
mod headless;
mod host;
mod input;
mod pipeline;
mod renderer;
mod scheduler;
mod session;
mod showcase_ui;
mod stats;
mod viewport;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use app::{App, AppConfig};
use config::DemoParams;
use demos::DemoKind;
use headless::{run_headless, HeadlessConfig};

#[derive(clap::Parser)]
#[clap(name = "demo-showcase", about = "Interactive canvas demo showcase")]
struct Opt {
    /// Run without a window and exit after `--frames` demo frames.
    #[clap(long)]
    headless: bool,
    /// Demo to open: particles, cube, matrix, jump, gravity, snake, wave, flappy, helix.
    #[clap(long)]
    demo: Option<String>,
    #[clap(long, default_value_t = 600)]
    frames: u64,
    /// Fixed seed for every random draw.
    #[clap(long)]
    seed: Option<u64>,
    /// Save the final canvas as PNG (headless only).
    #[clap(long)]
    screenshot: Option<PathBuf>,
    #[clap(long, default_value_t = 120)]
    stats_interval: u64,
    /// Record a session under runs/.
    #[clap(long)]
    record: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let opt = Opt::parse();

    let demo = match opt.demo.as_deref() {
        None => DemoKind::Particles,
        Some(name) => match DemoKind::from_name(name) {
            Some(kind) => kind,
            None => {
                log::error!("Unknown demo '{}'", name);
                eprintln!(
                    "Unknown demo '{}'. Choose one of: {}",
                    name,
                    DemoKind::ALL.map(|k| k.slug()).join(", ")
                );
                return ExitCode::FAILURE;
            }
        },
    };

    let mut params = DemoParams::default();
    if let Some(seed) = opt.seed {
        params.use_fixed_seed = true;
        params.fixed_seed_value = seed;
    }

    if opt.headless {
        let config = HeadlessConfig {
            demo,
            frames: opt.frames,
            seed: opt.seed,
            params,
            screenshot_path: opt.screenshot,
            stats_interval: opt.stats_interval,
            record: opt.record,
        };
        return match run_headless(&config) {
            Ok(summary) => {
                log::info!(
                    "{}: {} frames over {} refreshes, {} {} at the end",
                    demo.title(),
                    summary.frames,
                    summary.refreshes,
                    summary.final_stats.entities,
                    summary.final_stats.entity_label,
                );
                if let Some(dir) = summary.run_dir {
                    log::info!("Session written to {:?}", dir);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Headless run failed: {}", e);
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Failed to create event loop: {}", e);
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(AppConfig {
        initial_demo: demo,
        params,
        stats_interval: opt.stats_interval,
        record: opt.record,
    });
    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
