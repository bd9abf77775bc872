// ============================================================================
// showcase_ui.rs — Demo Showcase UI
// egui side panel: demo selector, run controls, animated code listing,
// per-demo tuning, seeds, presets, session capture; stats plots and logs.
// ============================================================================

use std::path::Path;

use egui_plot::{Line, Plot, PlotPoints};

use crate::demos::DemoKind;
use crate::host::DemoHost;
use crate::input::Action;
use crate::session::{load_preset, save_preset, SessionState, StatsRecord};

const PRESET_DIR: &str = "presets";

/// Main entry point for rendering all showcase panels.
pub fn render_showcase_ui(
    ctx: &egui::Context,
    host: &mut DemoHost,
    session: &mut SessionState,
    now_ms: f64,
) {
    if !session.show_panel {
        return;
    }

    render_left_panel(ctx, host, session, now_ms);

    if session.show_plots {
        render_right_stats_panel(ctx, host, session);
    }

    if session.show_logs_panel {
        render_bottom_logs_panel(ctx, session);
    }

    render_status_bar(ctx, session);
}

// ======================== Left Panel ========================

fn render_left_panel(
    ctx: &egui::Context,
    host: &mut DemoHost,
    session: &mut SessionState,
    now_ms: f64,
) {
    egui::SidePanel::left("showcase_panel")
        .default_width(320.0)
        .min_width(260.0)
        .max_width(460.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("✨ Demo Showcase");
                ui.separator();

                render_selector_section(ui, host);
                ui.separator();
                render_run_section(ui, host, now_ms);
                ui.separator();
                render_listing_section(ui, host);
                ui.separator();
                render_params_section(ui, host, session);
                ui.separator();
                render_seed_section(ui, host, session);
                ui.separator();
                render_capture_section(ui, host, session);
                ui.separator();
                render_view_toggles(ui, session);

                ui.add_space(10.0);
            });
        });
}

// ======================== Selector ========================

fn render_selector_section(ui: &mut egui::Ui, host: &mut DemoHost) {
    ui.collapsing("🎛 Demos", |ui| {
        let active = host.active();
        for kind in DemoKind::ALL {
            let icon = if kind.is_game() { "🎮" } else { "🎨" };
            let label = format!("{}. {}  {}", kind.index() + 1, icon, kind.title());
            let response = ui.selectable_label(kind == active, label).on_hover_text(kind.tagline());
            if response.clicked() && kind != active {
                host.select(kind);
            }
        }
    });
}

// ======================== Run Controls ========================

fn render_run_section(ui: &mut egui::Ui, host: &mut DemoHost, now_ms: f64) {
    let kind = host.active();
    ui.label(egui::RichText::new(kind.title()).strong().size(16.0));
    ui.label(egui::RichText::new(kind.tagline()).italics());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let run_label = if host.is_running() { "⏳ Running…" } else { "▶ Run (F5)" };
        if ui.add_enabled(!host.is_running(), egui::Button::new(run_label)).clicked() {
            host.run(now_ms);
        }
        if ui.add_enabled(host.is_running(), egui::Button::new("⏹ Stop")).clicked() {
            host.stop();
        }
    });

    if host.show_output() {
        ui.label(
            egui::RichText::new(kind.output_message())
                .color(egui::Color32::from_rgb(120, 220, 140)),
        );
        ui.label(egui::RichText::new(kind.hint()).small());
    }
}

// ======================== Code Listing ========================

fn render_listing_section(ui: &mut egui::Ui, host: &DemoHost) {
    ui.collapsing("📜 Code", |ui| {
        let highlighted = host.current_line();
        egui::Frame::default()
            .fill(egui::Color32::from_rgb(16, 16, 24))
            .inner_margin(egui::Margin::same(6))
            .show(ui, |ui| {
                for (i, line) in host.active().listing().lines().enumerate() {
                    let mut text = egui::RichText::new(format!("{:>3} {}", i + 1, line))
                        .monospace()
                        .small();
                    if highlighted == Some(i) {
                        text = text
                            .background_color(egui::Color32::from_rgb(60, 60, 110))
                            .color(egui::Color32::WHITE);
                    } else {
                        text = text.color(egui::Color32::from_rgb(170, 170, 190));
                    }
                    ui.label(text);
                }
            });
    });
}

// ======================== Parameters ========================

fn render_params_section(ui: &mut egui::Ui, host: &mut DemoHost, session: &mut SessionState) {
    let kind = host.active();
    ui.collapsing("⚙ Parameters", |ui| {
        let mut changed = false;
        match kind {
            DemoKind::Wave => {
                let params = host.params_mut();
                changed |= ui
                    .add(egui::Slider::new(&mut params.wave_amplitude, 10.0..=100.0).text("Amplitude"))
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut params.wave_frequency, 1.0..=5.0)
                            .step_by(0.5)
                            .text("Frequency"),
                    )
                    .changed();
            }
            DemoKind::Matrix => {
                changed |= ui
                    .add(egui::Slider::new(&mut host.params_mut().matrix_speed, 10..=100).text("Speed"))
                    .changed();
            }
            DemoKind::Helix => {
                let params = host.params_mut();
                changed |= ui
                    .add(egui::Slider::new(&mut params.helix_speed, 0.1..=3.0).text("Rotation speed"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut params.helix_pairs, 10..=30).text("Base pairs"))
                    .changed();
            }
            DemoKind::Gravity => {
                changed |= ui
                    .checkbox(&mut host.params_mut().show_trails, "Show trails (T)")
                    .changed();
                if ui
                    .add_enabled(host.show_output(), egui::Button::new("🧹 Clear planets (C)"))
                    .clicked()
                {
                    host.push_action(Action::Clear);
                    session.log_event(host.frames(), "CONTROL", "Cleared planets");
                }
            }
            _ => {
                ui.label("No tunable parameters for this demo.");
            }
        }

        if changed {
            host.params_mut().sanitize();
            session.log_event(host.frames(), "PARAM_CHANGE", &param_summary(host, kind));
        }
    });
}

fn param_summary(host: &DemoHost, kind: DemoKind) -> String {
    let p = host.params();
    match kind {
        DemoKind::Wave => format!("amplitude={:.0} frequency={:.1}", p.wave_amplitude, p.wave_frequency),
        DemoKind::Matrix => format!("speed={}", p.matrix_speed),
        DemoKind::Helix => format!("speed={:.1} pairs={}", p.helix_speed, p.helix_pairs),
        DemoKind::Gravity => format!("trails={}", p.show_trails),
        _ => String::new(),
    }
}

// ======================== Seed & Presets ========================

fn render_seed_section(ui: &mut egui::Ui, host: &mut DemoHost, session: &mut SessionState) {
    ui.collapsing("🎲 Reproducibility", |ui| {
        let params = host.params_mut();
        ui.checkbox(&mut params.use_fixed_seed, "Fixed seed");
        ui.add_enabled(
            params.use_fixed_seed,
            egui::DragValue::new(&mut params.fixed_seed_value).prefix("seed: "),
        );
        ui.label(egui::RichText::new("Applies the next time a demo is mounted.").small());

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Preset:");
            ui.text_edit_singleline(&mut session.preset_name);
        });
        ui.horizontal(|ui| {
            if ui.button("💾 Save").clicked() {
                match save_preset(Path::new(PRESET_DIR), &session.preset_name, host.params()) {
                    Ok(path) => session.set_status(format!("Preset saved to {:?}", path)),
                    Err(e) => {
                        log::error!("{}", e);
                        session.set_status(format!("Preset save failed: {}", e));
                    }
                }
            }
            if ui.button("📂 Load").clicked() {
                match load_preset(Path::new(PRESET_DIR), &session.preset_name) {
                    Ok(params) => {
                        *host.params_mut() = params;
                        let name = session.preset_name.clone();
                        session.log_event(host.frames(), "PRESET", &format!("Loaded '{}'", name));
                        session.set_status(format!("Preset '{}' loaded", name));
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        session.set_status(format!("Preset load failed: {}", e));
                    }
                }
            }
            if ui.button("↺ Defaults").clicked() {
                *host.params_mut() = Default::default();
                session.log_event(host.frames(), "PARAM_CHANGE", "Reset to defaults");
            }
        });
    });
}

// ======================== Capture & Export ========================

fn render_capture_section(ui: &mut egui::Ui, host: &mut DemoHost, session: &mut SessionState) {
    ui.collapsing("📸 Session", |ui| {
        ui.horizontal(|ui| {
            if session.run_active {
                ui.label(egui::RichText::new(format!("● {}", session.run_id)).color(egui::Color32::from_rgb(255, 90, 90)));
                if ui.button("⏹ Finish").clicked() {
                    session.finalize_run(host.params());
                }
            } else if ui.button("⏺ Record").clicked() {
                session.start_run(host.params(), host.active());
            }
        });

        ui.horizontal(|ui| {
            ui.label("Sample every");
            ui.add(egui::DragValue::new(&mut session.sample_interval).range(1..=600));
            ui.label("frames");
        });

        if ui
            .add_enabled(host.canvas().is_some(), egui::Button::new("📷 Screenshot (F12)"))
            .clicked()
        {
            session.screenshot_requested = true;
        }

        ui.horizontal(|ui| {
            if ui.button("📊 Export CSV").clicked() {
                match session.export_stats_csv() {
                    Ok(path) => session.set_status(format!("Exported to {:?}", path)),
                    Err(e) => session.set_status(format!("Export failed: {}", e)),
                }
            }
            if ui.button("📝 Export Report").clicked() {
                match session.export_report(host.params()) {
                    Ok(path) => session.set_status(format!("Report saved to {:?}", path)),
                    Err(e) => session.set_status(format!("Report failed: {}", e)),
                }
            }
        });
        if !session.run_active {
            ui.label(egui::RichText::new("Exports go to the last run directory.").small());
        }
    });
}

// ======================== View Toggles ========================

fn render_view_toggles(ui: &mut egui::Ui, session: &mut SessionState) {
    ui.collapsing("📊 View", |ui| {
        ui.checkbox(&mut session.show_plots, "Stats panel (F9)");
        ui.checkbox(&mut session.show_logs_panel, "Logs panel");
        ui.label(egui::RichText::new("F1 hides this panel.").small());
    });
}

// ======================== Right Stats Panel ========================

fn render_right_stats_panel(ctx: &egui::Context, host: &DemoHost, session: &SessionState) {
    egui::SidePanel::right("stats_panel")
        .default_width(300.0)
        .min_width(220.0)
        .max_width(460.0)
        .show(ctx, |ui| {
            ui.heading("📈 Stats");
            ui.separator();

            let stats = host.stats();
            egui::Grid::new("live_stats")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    stat_row(ui, "Frame", &stats.frame.to_string());
                    stat_row(ui, stats.entity_label, &stats.entities.to_string());
                    if let Some(score) = stats.score {
                        stat_row(ui, "Score", &score.to_string());
                    }
                    if let Some(phase) = stats.phase {
                        stat_row(ui, "Phase", phase.name());
                    }
                    if stats.kinetic_energy > 0.0 {
                        stat_row(ui, "Kinetic Energy", &format!("{:.2}", stats.kinetic_energy));
                        stat_row(ui, "Mean Speed", &format!("{:.3}", stats.mean_speed));
                    }
                    stat_row(ui, "Frame Loop", if host.has_frame_loop() { "active" } else { "idle" });
                    stat_row(ui, "Skipped Frames", &host.skipped_frames().to_string());
                });
            ui.separator();

            let series = current_series(&session.stats_history, host.active());
            if series.is_empty() {
                ui.label("No samples yet. Run the demo to collect stats.");
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                render_plot(ui, "Entities", series, |r| r.entities as f64);
                if series.iter().any(|r| r.kinetic_energy > 0.0) {
                    render_plot(ui, "Kinetic Energy", series, |r| r.kinetic_energy as f64);
                    render_plot(ui, "Mean Speed", series, |r| r.mean_speed as f64);
                }
                if series.iter().any(|r| r.score.is_some()) {
                    render_plot(ui, "Score", series, |r| r.score.unwrap_or(0) as f64);
                }
                render_plot(ui, "FPS", series, |r| r.fps as f64);
            });
        });
}

/// Trailing samples of the mounted demo: same demo, frames strictly
/// increasing. Earlier mounts restart the frame counter and are cut off.
pub fn current_series(history: &[StatsRecord], demo: DemoKind) -> &[StatsRecord] {
    let mut start = history.len();
    while start > 0 {
        let rec = &history[start - 1];
        let continues = rec.demo == demo.slug()
            && history.get(start).map_or(true, |next| next.frame > rec.frame);
        if !continues {
            break;
        }
        start -= 1;
    }
    &history[start..]
}

fn stat_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(label);
    ui.label(egui::RichText::new(value).monospace());
    ui.end_row();
}

fn render_plot<F>(ui: &mut egui::Ui, title: &str, history: &[StatsRecord], value_fn: F)
where
    F: Fn(&StatsRecord) -> f64,
{
    let points: PlotPoints = history
        .iter()
        .map(|r| [r.frame as f64, value_fn(r)])
        .collect();

    Plot::new(format!("plot_{}", title))
        .height(100.0)
        .show_axes(true)
        .show_grid(true)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name(title));
        });
    ui.label(egui::RichText::new(title).small().strong());
    ui.add_space(4.0);
}

// ======================== Bottom Logs Panel ========================

fn render_bottom_logs_panel(ctx: &egui::Context, session: &mut SessionState) {
    egui::TopBottomPanel::bottom("logs_panel")
        .default_height(110.0)
        .min_height(60.0)
        .max_height(300.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("📋 Events Log").strong());
                ui.label(format!("({} events)", session.events.len()));
                if ui.button("Clear").clicked() {
                    session.events.clear();
                }
                if ui.button("Export").clicked() {
                    match session.export_events_log() {
                        Ok(path) => session.set_status(format!("Exported events to {:?}", path)),
                        Err(e) => session.set_status(format!("Export failed: {}", e)),
                    }
                }
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for event in session.events.iter().rev().take(100) {
                        let color = match event.event_type.as_str() {
                            "PARAM_CHANGE" | "PRESET" => egui::Color32::from_rgb(255, 200, 100),
                            "RUN_START" | "RUN_END" => egui::Color32::from_rgb(100, 255, 100),
                            "CONTROL" | "SWITCH" => egui::Color32::from_rgb(150, 200, 255),
                            "GAME" => egui::Color32::from_rgb(255, 130, 130),
                            "SCREENSHOT" => egui::Color32::from_rgb(200, 150, 255),
                            _ => egui::Color32::from_rgb(180, 180, 180),
                        };
                        ui.label(egui::RichText::new(event.to_log_line()).small().color(color).monospace());
                    }
                });
        });
}

// ======================== Status Bar ========================

fn render_status_bar(ctx: &egui::Context, session: &mut SessionState) {
    if let Some(msg) = session.current_status() {
        let msg = msg.to_string();
        // Wake up again to clear the message once it expires.
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
        egui::Area::new(egui::Id::new("status_bar"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -10.0))
            .show(ctx, |ui| {
                egui::Frame::default()
                    .fill(egui::Color32::from_rgba_premultiplied(30, 80, 30, 220))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(msg).color(egui::Color32::WHITE));
                    });
            });
    }
}
