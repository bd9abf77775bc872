// ============================================================================
// session.rs — Demo Showcase
// Session recording: event log, sampled demo stats, run directory layout,
// CSV / markdown / JSON export, canvas screenshots and parameter presets.
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use serde::Serialize;

use crate::canvas::Canvas;
use crate::config::DemoParams;
use crate::demos::DemoKind;
use crate::stats::DemoStats;

// ======================== Stats Record ========================

#[derive(Clone, Debug, Serialize)]
pub struct StatsRecord {
    pub frame: u64,
    pub time_ms: f64,
    pub fps: f32,
    pub demo: &'static str,
    pub entities: usize,
    pub kinetic_energy: f32,
    pub mean_speed: f32,
    pub score: Option<u32>,
    pub phase: &'static str,
}

impl StatsRecord {
    pub fn new(demo: DemoKind, stats: &DemoStats, time_ms: f64, fps: f32) -> Self {
        Self {
            frame: stats.frame,
            time_ms,
            fps,
            demo: demo.slug(),
            entities: stats.entities,
            kinetic_energy: stats.kinetic_energy,
            mean_speed: stats.mean_speed,
            score: stats.score,
            phase: stats.phase.map_or("", |p| p.name()),
        }
    }

    pub fn csv_header() -> &'static str {
        "frame,time_ms,fps,demo,entities,kinetic_energy,mean_speed,score,phase"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{:.1},{:.1},{},{},{:.3},{:.4},{},{}",
            self.frame,
            self.time_ms,
            self.fps,
            self.demo,
            self.entities,
            self.kinetic_energy,
            self.mean_speed,
            self.score.map(|s| s.to_string()).unwrap_or_default(),
            self.phase,
        )
    }
}

// ======================== Session Event ========================

#[derive(Clone, Debug, Serialize)]
pub struct SessionEvent {
    pub frame: u64,
    pub time_ms: f64,
    pub event_type: String,
    pub details: String,
}

impl SessionEvent {
    pub fn to_log_line(&self) -> String {
        format!(
            "[{:.1}ms] frame={} {} — {}",
            self.time_ms, self.frame, self.event_type, self.details,
        )
    }
}

// ======================== Session State ========================

pub struct SessionState {
    // -- Run management --
    pub run_id: String,
    pub run_start: Instant,
    pub run_start_time: String,
    pub run_dir: PathBuf,
    pub run_active: bool,

    // -- Stats --
    pub stats_history: Vec<StatsRecord>,
    pub sample_interval: u64,

    // -- Events --
    pub events: Vec<SessionEvent>,

    // -- UI state --
    pub show_panel: bool,
    pub show_logs_panel: bool,
    pub show_plots: bool,

    // -- Actions --
    pub screenshot_requested: bool,

    // -- Presets --
    pub preset_name: String,

    pub status_message: Option<(String, Instant)>,
}

impl Default for SessionState {
    fn default() -> Self {
        let (run_id, run_dir, run_start_time) = new_run_identity(Path::new("runs"));
        Self {
            run_id,
            run_start: Instant::now(),
            run_start_time,
            run_dir,
            run_active: false,

            stats_history: Vec::with_capacity(10_000),
            sample_interval: 30,

            events: Vec::with_capacity(1_000),

            show_panel: true,
            show_logs_panel: true,
            show_plots: true,

            screenshot_requested: false,

            preset_name: String::from("default"),

            status_message: None,
        }
    }
}

/// `run_<stamp>` plus `<root>/<date>/<run_id>` and a readable start time.
fn new_run_identity(root: &Path) -> (String, PathBuf, String) {
    let now = Local::now();
    let run_id = format!("run_{}", now.format("%Y%m%d_%H%M%S"));
    let run_dir = root.join(now.format("%Y-%m-%d").to_string()).join(&run_id);
    (run_id, run_dir, now.format("%Y-%m-%d %H:%M:%S").to_string())
}

impl SessionState {
    /// Start recording under `runs/`.
    pub fn start_run(&mut self, params: &DemoParams, demo: DemoKind) {
        self.start_run_in(Path::new("runs"), params, demo);
    }

    /// Start recording under `root`: create the run directory and write
    /// the initial config.
    pub fn start_run_in(&mut self, root: &Path, params: &DemoParams, demo: DemoKind) {
        let (run_id, run_dir, start_time) = new_run_identity(root);
        self.run_id = run_id;
        self.run_dir = run_dir;
        self.run_start_time = start_time;
        self.run_start = Instant::now();
        self.run_active = true;
        self.stats_history.clear();
        self.events.clear();

        if let Err(e) = fs::create_dir_all(self.run_dir.join("screenshots")) {
            log::error!("Failed to create run directory {:?}: {}", self.run_dir, e);
            return;
        }

        if let Err(e) = self.save_config(params, demo) {
            log::error!("{}", e);
        }
        self.log_event(0, "RUN_START", &format!("Recording {} ({})", self.run_id, demo.title()));
        self.set_status(format!("Recording to {}", self.run_dir.display()));
    }

    /// Write config.json for the current run.
    pub fn save_config(&self, params: &DemoParams, demo: DemoKind) -> Result<PathBuf, String> {
        let (w, h) = demo.canvas_size();
        let config = serde_json::json!({
            "run_id": self.run_id,
            "timestamp": self.run_start_time,
            "app_version": env!("CARGO_PKG_VERSION"),
            "demo": demo,
            "canvas_width": w,
            "canvas_height": h,
            "params": params,
        });

        let path = self.run_dir.join("config.json");
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write config.json: {}", e))?;
        log::info!("Saved config to {:?}", path);
        Ok(path)
    }

    /// Sample stats every `sample_interval` demo frames. Samples feed the
    /// live plots and, while a run is active, the exported CSV.
    pub fn maybe_record(&mut self, demo: DemoKind, stats: &DemoStats, fps: f32) -> bool {
        if self.sample_interval == 0 || stats.frame == 0 || stats.frame % self.sample_interval != 0 {
            return false;
        }
        let time_ms = self.run_start.elapsed().as_secs_f64() * 1000.0;
        self.stats_history.push(StatsRecord::new(demo, stats, time_ms, fps));
        true
    }

    pub fn log_event(&mut self, frame: u64, event_type: &str, details: &str) {
        let time_ms = self.run_start.elapsed().as_secs_f64() * 1000.0;
        self.events.push(SessionEvent {
            frame,
            time_ms,
            event_type: event_type.to_string(),
            details: details.to_string(),
        });
    }

    pub fn export_stats_csv(&self) -> Result<PathBuf, String> {
        let path = self.run_dir.join("stats.csv");
        let mut file = fs::File::create(&path)
            .map_err(|e| format!("Failed to create stats.csv: {}", e))?;

        writeln!(file, "{}", StatsRecord::csv_header()).map_err(|e| format!("Write error: {}", e))?;
        for record in &self.stats_history {
            writeln!(file, "{}", record.to_csv_line()).map_err(|e| format!("Write error: {}", e))?;
        }

        log::info!("Exported {} stats records to {:?}", self.stats_history.len(), path);
        Ok(path)
    }

    pub fn export_events_log(&self) -> Result<PathBuf, String> {
        let path = self.run_dir.join("events.log");
        let mut file = fs::File::create(&path)
            .map_err(|e| format!("Failed to create events.log: {}", e))?;

        for event in &self.events {
            writeln!(file, "{}", event.to_log_line()).map_err(|e| format!("Write error: {}", e))?;
        }

        log::info!("Exported {} events to {:?}", self.events.len(), path);
        Ok(path)
    }

    pub fn export_report(&self, params: &DemoParams) -> Result<PathBuf, String> {
        let path = self.run_dir.join("report.md");
        let mut file = fs::File::create(&path)
            .map_err(|e| format!("Failed to create report.md: {}", e))?;

        let last = self.stats_history.last();
        let final_stats = match last {
            Some(s) => format!(
                "| Stat | Value |\n|------|-------|\n\
                 | Demo | {} |\n\
                 | Entities | {} |\n\
                 | Kinetic Energy | {:.2} |\n\
                 | Mean Speed | {:.3} |\n\
                 | Score | {} |\n\
                 | Phase | {} |\n\
                 | FPS | {:.0} |",
                s.demo,
                s.entities,
                s.kinetic_energy,
                s.mean_speed,
                s.score.map(|v| v.to_string()).unwrap_or_else(|| "—".into()),
                if s.phase.is_empty() { "—" } else { s.phase },
                s.fps,
            ),
            None => "No stats collected.".to_string(),
        };

        let report = format!(
            "# Demo Showcase Session Report\n\n\
             ## Run Info\n\
             - **Run ID**: {}\n\
             - **Start**: {}\n\
             - **Frames**: {}\n\
             - **Stats Samples**: {}\n\
             - **App Version**: {}\n\n\
             ## Parameters\n\
             ```json\n{}\n```\n\n\
             ## Final Stats\n\
             {}\n\n\
             ## Events Summary\n\
             - Total events: {}\n\
             {}\n",
            self.run_id,
            self.run_start_time,
            last.map_or(0, |s| s.frame),
            self.stats_history.len(),
            env!("CARGO_PKG_VERSION"),
            serde_json::to_string_pretty(params).unwrap_or_default(),
            final_stats,
            self.events.len(),
            self.events
                .iter()
                .rev()
                .take(10)
                .map(|e| format!("- {}", e.to_log_line()))
                .collect::<Vec<_>>()
                .join("\n"),
        );

        write!(file, "{}", report).map_err(|e| format!("Write error: {}", e))?;
        log::info!("Exported report to {:?}", path);
        Ok(path)
    }

    /// Export everything and close the run.
    pub fn finalize_run(&mut self, params: &DemoParams) {
        if !self.run_active {
            return;
        }
        let frames = self.stats_history.last().map_or(0, |s| s.frame);
        self.log_event(frames, "RUN_END", &format!("Run {} finalized", self.run_id));

        if let Err(e) = self.export_stats_csv() {
            log::error!("Failed to export stats: {}", e);
        }
        if let Err(e) = self.export_events_log() {
            log::error!("Failed to export events: {}", e);
        }
        if let Err(e) = self.export_report(params) {
            log::error!("Failed to export report: {}", e);
        }

        self.set_status(format!("Run {} finalized — data exported", self.run_id));
        self.run_active = false;
    }

    /// Save the canvas as PNG into the run's screenshots directory.
    pub fn save_screenshot(&self, canvas: &Canvas, demo: DemoKind, frame: u64) -> Result<PathBuf, String> {
        let dir = self.run_dir.join("screenshots");
        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create screenshots dir: {}", e))?;
        let path = dir.join(format!("{}_frame{:06}.png", demo.slug(), frame));
        save_canvas_png(canvas, &path)?;
        Ok(path)
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Current status message; clears itself after 5 seconds.
    pub fn current_status(&mut self) -> Option<&str> {
        let expired = matches!(
            &self.status_message,
            Some((_, when)) if when.elapsed().as_secs() >= 5
        );
        if expired {
            self.status_message = None;
        }
        self.status_message.as_ref().map(|(msg, _)| msg.as_str())
    }
}

// ======================== Files ========================

pub fn save_canvas_png(canvas: &Canvas, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create {:?}: {}", parent, e))?;
    }
    image::save_buffer(
        path,
        canvas.as_rgba_bytes(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgba8,
    )
    .map_err(|e| format!("Failed to save screenshot {:?}: {}", path, e))?;
    log::info!("Screenshot saved: {:?}", path);
    Ok(())
}

pub fn preset_path(dir: &Path, name: &str) -> PathBuf {
    let clean: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{}.json", clean))
}

pub fn save_preset(dir: &Path, name: &str, params: &DemoParams) -> Result<PathBuf, String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create {:?}: {}", dir, e))?;
    let path = preset_path(dir, name);
    let json = serde_json::to_string_pretty(params).map_err(|e| format!("Failed to serialize preset: {}", e))?;
    fs::write(&path, json).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
    log::info!("Saved preset {:?}", path);
    Ok(path)
}

pub fn load_preset(dir: &Path, name: &str) -> Result<DemoParams, String> {
    let path = preset_path(dir, name);
    let json = fs::read_to_string(&path).map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
    let mut params: DemoParams =
        serde_json::from_str(&json).map_err(|e| format!("Invalid preset {:?}: {}", path, e))?;
    params.sanitize();
    log::info!("Loaded preset {:?}", path);
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rgb;
    use crate::game::GamePhase;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("demo-showcase-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn csv_line_matches_header_width() {
        let stats = DemoStats::new("segments", 4).with_score(30, GamePhase::Running);
        let record = StatsRecord::new(DemoKind::Snake, &stats, 12.5, 60.0);
        let cols = StatsRecord::csv_header().split(',').count();
        assert_eq!(record.to_csv_line().split(',').count(), cols);
        assert!(record.to_csv_line().ends_with(",30,Running"));
    }

    #[test]
    fn sampling_respects_interval() {
        let mut session = SessionState { sample_interval: 10, ..SessionState::default() };
        let mut stats = DemoStats::new("particles", 50);
        stats.frame = 5;
        assert!(!session.maybe_record(DemoKind::Particles, &stats, 60.0));
        stats.frame = 10;
        assert!(session.maybe_record(DemoKind::Particles, &stats, 60.0));
        assert_eq!(session.stats_history.len(), 1);
    }

    #[test]
    fn run_writes_config_and_exports() {
        let root = scratch("run");
        let params = DemoParams::default();
        let mut session = SessionState::default();
        session.start_run_in(&root, &params, DemoKind::Wave);
        assert!(session.run_dir.join("config.json").exists());

        let mut stats = DemoStats::new("layers", 4);
        stats.frame = 30;
        session.maybe_record(DemoKind::Wave, &stats, 60.0);
        session.finalize_run(&params);

        for file in ["stats.csv", "events.log", "report.md"] {
            assert!(session.run_dir.join(file).exists(), "missing {}", file);
        }
        let events = fs::read_to_string(session.run_dir.join("events.log")).unwrap();
        assert!(events.contains("RUN_START") && events.contains("RUN_END"));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn screenshot_is_a_png_of_canvas_size() {
        let root = scratch("shot");
        let mut canvas = Canvas::new(8, 4);
        canvas.clear(Rgb::WHITE);
        let path = root.join("shot.png");
        save_canvas_png(&canvas, &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (8, 4));
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn presets_round_trip_and_sanitize() {
        let dir = scratch("presets");
        let params = DemoParams { helix_pairs: 12, matrix_speed: 80, ..DemoParams::default() };
        save_preset(&dir, "calm waves", &params).unwrap();
        assert!(dir.join("calm_waves.json").exists());
        let loaded = load_preset(&dir, "calm waves").unwrap();
        assert_eq!(loaded.helix_pairs, 12);
        assert_eq!(loaded.matrix_speed, 80);

        fs::write(dir.join("wild.json"), r#"{"helix_pairs": 500}"#).unwrap();
        assert_eq!(load_preset(&dir, "wild").unwrap().helix_pairs, 30);
        assert!(load_preset(&dir, "missing").is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
