// ============================================================================
// app.rs — Demo Showcase
// Application state and winit event-loop handler: GPU surface, canvas blit,
// overlay text, egui panels, and the input adapter feeding the demo host.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes},
};

use crate::config::DemoParams;
use crate::demos::DemoKind;
use crate::host::{DemoHost, HostEvent};
use crate::input::{action_for_key, Action};
use crate::pipeline::{create_blit_pipeline, BlitPipeline};
use crate::renderer::{build_status_text, HudRenderer};
use crate::scheduler::{FrameQueue, SharedScheduler};
use crate::session::SessionState;
use crate::showcase_ui;
use crate::stats::DemoStats;
use crate::viewport::Viewport;

// ======================== Application ========================

pub struct App {
    state: Option<AppState>,
    config: AppConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub initial_demo: DemoKind,
    pub params: DemoParams,
    pub stats_interval: u64,
    pub record: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_demo: DemoKind::Particles,
            params: DemoParams::default(),
            stats_interval: 300,
            record: false,
        }
    }
}

struct AppState {
    // GPU
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    blit: BlitPipeline,

    // Window
    window: Arc<Window>,
    viewport: Viewport,

    // Demos
    frame_queue: Rc<RefCell<FrameQueue>>,
    host: DemoHost,

    // Pointer
    cursor: (f32, f32),
    pointer_down: bool,

    // Overlay text
    hud: HudRenderer,

    // egui
    egui_ctx: egui::Context,
    egui_winit_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    next_repaint: Option<Instant>,

    // Session
    session: SessionState,

    // Timing
    clock: Instant,
    last_redraw: Instant,
    fps: f32,

    // Stats
    last_stats: Option<DemoStats>,
    stats_interval: u64,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { state: None, config }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title("Demo Showcase")
            .with_inner_size(winit::dpi::LogicalSize::new(1280u32, 800u32));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let (device, queue, surface_config) =
            pollster::block_on(init_gpu(&instance, &surface, &window));

        surface.configure(&device, &surface_config);

        // Each frame request wakes the event loop for one redraw.
        let waker_window = window.clone();
        let frame_queue = FrameQueue::with_waker(move || waker_window.request_redraw()).shared();
        let scheduler: SharedScheduler = frame_queue.clone();

        let mut params = self.config.params.clone();
        params.sanitize();
        let host = DemoHost::new(scheduler, params, self.config.initial_demo);

        let (cw, ch) = self.config.initial_demo.canvas_size();
        let blit = create_blit_pipeline(&device, surface_config.format, cw, ch);
        let hud = HudRenderer::new(&device, &queue, surface_config.format);

        // ---- Initialize egui ----
        let egui_ctx = egui::Context::default();
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(27, 27, 35, 235);
        visuals.panel_fill = egui::Color32::from_rgba_premultiplied(20, 20, 28, 230);
        egui_ctx.set_visuals(visuals);

        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            None,
            1,
            false,
        );

        let mut session = SessionState::default();
        session.sample_interval = self.config.stats_interval.clamp(1, 600);
        if self.config.record {
            session.start_run(host.params(), host.active());
        }

        let size = window.inner_size();
        let viewport = Viewport::layout(size.width, size.height, 0.0, window.scale_factor() as f32, cw, ch);

        log::info!(
            "Demo Showcase initialized: {} demos, starting with {}",
            DemoKind::ALL.len(),
            self.config.initial_demo.title(),
        );

        self.state = Some(AppState {
            device,
            queue,
            surface,
            surface_config,
            blit,
            window: window.clone(),
            viewport,
            frame_queue,
            host,
            cursor: (0.0, 0.0),
            pointer_down: false,
            hud,
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            next_repaint: None,
            session,
            clock: Instant::now(),
            last_redraw: Instant::now(),
            fps: 0.0,
            last_stats: None,
            stats_interval: self.config.stats_interval.max(1),
        });

        // Initial redraw, required on macOS with winit 0.30
        window.request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };

        // The listing animation has no frame loop yet; keep refreshing.
        if state.host.is_running() {
            state.window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        match state.next_repaint {
            Some(at) if at <= Instant::now() => {
                state.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Pass events to egui first
        let egui_response = state.egui_winit_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                state.session.finalize_run(state.host.params());
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                handle_keyboard(state, event_loop, &event, egui_response.consumed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let at = (position.x as f32, position.y as f32);
                state.cursor = at;
                if state.pointer_down {
                    pointer_action(state, at, PointerStage::Move);
                }
            }

            WindowEvent::MouseInput { state: button_state, button: MouseButton::Left, .. } => {
                let at = state.cursor;
                match button_state {
                    ElementState::Pressed if !egui_response.consumed => {
                        pointer_action(state, at, PointerStage::Down);
                    }
                    ElementState::Released => pointer_action(state, at, PointerStage::Up),
                    _ => {}
                }
            }

            WindowEvent::Touch(touch) => {
                let at = (touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started if !egui_response.consumed => {
                        pointer_action(state, at, PointerStage::Down)
                    }
                    TouchPhase::Moved => pointer_action(state, at, PointerStage::Move),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        pointer_action(state, at, PointerStage::Up)
                    }
                    _ => {}
                }
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    state.surface_config.width = new_size.width;
                    state.surface_config.height = new_size.height;
                    state.surface.configure(&state.device, &state.surface_config);
                    state.host.set_surface_available(true);
                } else {
                    log::debug!("Window minimized; demo frames paused");
                    state.host.set_surface_available(false);
                }
            }

            WindowEvent::Occluded(occluded) => {
                state.host.set_surface_available(!occluded);
            }

            WindowEvent::RedrawRequested => {
                redraw(state);
            }

            _ => {}
        }
    }
}

// ======================== GPU Initialization ========================

async fn init_gpu(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    window: &Window,
) -> (wgpu::Device, wgpu::Queue, wgpu::SurfaceConfiguration) {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .expect(
            "Failed to find a suitable GPU adapter.\n\
             Demo Showcase requires a GPU with Vulkan, Metal, DX12 or GL support.",
        );

    log::info!("GPU: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("showcase_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .expect("Failed to create device");

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    // Canvas bytes are already sRGB-encoded; write them through unchanged.
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| !f.is_srgb())
        .copied()
        .unwrap_or(surface_caps.formats[0]);

    // Demos advance one step per refresh, so pace frames to the display.
    let present_mode = if surface_caps.present_modes.contains(&wgpu::PresentMode::Fifo) {
        log::info!("Present mode: Fifo (VSync ON)");
        wgpu::PresentMode::Fifo
    } else {
        log::info!("Present mode: AutoVsync");
        wgpu::PresentMode::AutoVsync
    };

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };

    (device, queue, surface_config)
}

// ======================== Keyboard Handling ========================

fn handle_keyboard(
    state: &mut AppState,
    event_loop: &ActiveEventLoop,
    event: &winit::event::KeyEvent,
    egui_consumed: bool,
) {
    if !event.state.is_pressed() || event.repeat {
        return;
    }
    let now_ms = state.clock.elapsed().as_secs_f64() * 1000.0;

    // Global hotkeys, handled even when egui has focus
    match &event.logical_key {
        Key::Named(NamedKey::Escape) => {
            state.session.finalize_run(state.host.params());
            event_loop.exit();
            return;
        }
        Key::Named(NamedKey::F1) => {
            state.session.show_panel = !state.session.show_panel;
            log::info!("Showcase panel: {}", if state.session.show_panel { "ON" } else { "OFF" });
            return;
        }
        Key::Named(NamedKey::F5) => {
            state.host.run(now_ms);
            return;
        }
        Key::Named(NamedKey::F6) => {
            state.host.stop();
            return;
        }
        Key::Named(NamedKey::F9) => {
            state.session.show_plots = !state.session.show_plots;
            return;
        }
        Key::Named(NamedKey::F12) => {
            state.session.screenshot_requested = true;
            return;
        }
        _ => {}
    }

    // Demo controls, only if egui did not consume the event
    if egui_consumed {
        return;
    }

    if let Key::Character(c) = &event.logical_key {
        if let Some(digit) = c.chars().next().and_then(|ch| ch.to_digit(10)) {
            if let Some(kind) = (digit as usize).checked_sub(1).and_then(|i| DemoKind::ALL.get(i)) {
                state.host.select(*kind);
            }
            return;
        }
    }

    if let Some(action) = action_for_key(&event.logical_key) {
        state.host.push_action(action);
    }
}

// ======================== Pointer Handling ========================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PointerStage {
    Down,
    Move,
    Up,
}

/// Translate a window-space pointer event into a canvas-space action.
fn pointer_action(state: &mut AppState, at: (f32, f32), stage: PointerStage) {
    match stage {
        PointerStage::Down => {
            if let Some((x, y)) = state.viewport.to_canvas(at.0, at.1) {
                state.pointer_down = true;
                state.host.push_action(Action::PointerDown { x, y });
            }
        }
        PointerStage::Move => {
            if let Some((x, y)) = state.viewport.to_canvas(at.0, at.1) {
                state.host.push_action(Action::PointerMove { x, y });
            }
        }
        PointerStage::Up => {
            if state.pointer_down {
                state.pointer_down = false;
                state.host.push_action(Action::PointerUp);
            }
        }
    }
}

// ======================== Frame Rendering ========================

fn redraw(state: &mut AppState) {
    // FPS (exponential moving average)
    let now = Instant::now();
    let dt = now.duration_since(state.last_redraw).as_secs_f32().max(0.0001);
    state.last_redraw = now;
    state.fps = state.fps * 0.95 + (1.0 / dt) * 0.05;
    let now_ms = state.clock.elapsed().as_secs_f64() * 1000.0;

    // ---- egui frame ----
    let raw_input = state.egui_winit_state.take_egui_input(&state.window);
    let mut central = egui::Rect::NOTHING;
    let full_output = state.egui_ctx.run(raw_input, |ctx| {
        showcase_ui::render_showcase_ui(ctx, &mut state.host, &mut state.session, now_ms);
        central = ctx.available_rect();
    });
    state
        .egui_winit_state
        .handle_platform_output(&state.window, full_output.platform_output);
    state.next_repaint = full_output
        .viewport_output
        .get(&egui::ViewportId::ROOT)
        .and_then(|v| now.checked_add(v.repaint_delay));

    // ---- Demo frame ----
    let drawn = state.host.frame(now_ms);
    record_host_events(state);
    if drawn {
        sample_stats(state);
    }

    // ---- Layout ----
    let win_w = state.surface_config.width;
    let win_h = state.surface_config.height;
    let ppp = full_output.pixels_per_point;
    let (cw, ch) = state.host.active().canvas_size();
    state.viewport = Viewport::layout_in(
        win_w,
        win_h,
        [central.left() * ppp, central.top() * ppp, central.right() * ppp, central.bottom() * ppp],
        ppp,
        cw,
        ch,
    );

    // ---- Screenshot (canvas pixels, no UI) ----
    if state.session.screenshot_requested {
        state.session.screenshot_requested = false;
        save_screenshot(state);
    }

    let output = match state.surface.get_current_texture() {
        Ok(t) => t,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::warn!("Surface lost or outdated; reconfiguring");
            state.surface.configure(&state.device, &state.surface_config);
            return;
        }
        Err(e) => {
            log::error!("Surface error: {:?}", e);
            return;
        }
    };

    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    // ---- Upload canvas & prepare overlay text ----
    let has_canvas = match state.host.canvas() {
        Some(canvas) => {
            if !state.blit.fits(canvas) {
                state.blit = create_blit_pipeline(
                    &state.device,
                    state.surface_config.format,
                    canvas.width(),
                    canvas.height(),
                );
            }
            state.blit.upload(&state.queue, canvas, &state.viewport);
            true
        }
        None => false,
    };

    let overlay = if has_canvas { state.host.demo().overlay() } else { Vec::new() };
    let status = (!state.session.show_panel).then(|| {
        build_status_text(
            state.host.active(),
            state.host.is_running(),
            state.host.demo().phase(),
            state.host.frames(),
            state.fps,
        )
    });
    state.hud.prepare(
        &state.device,
        &state.queue,
        &overlay,
        status.as_deref(),
        &state.viewport,
        win_w,
        win_h,
    );

    // ---- Canvas pass ----
    let mut encoder = state
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("canvas_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.06,
                        g: 0.06,
                        b: 0.09,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if has_canvas {
            state.blit.draw(&mut pass);
        }
        state.hud.render(&mut pass);
    }
    state.queue.submit(std::iter::once(encoder.finish()));

    // ---- egui render pass (on top of the canvas, separate encoder) ----
    let paint_jobs = state
        .egui_ctx
        .tessellate(full_output.shapes, full_output.pixels_per_point);

    for (id, image_delta) in &full_output.textures_delta.set {
        state
            .egui_renderer
            .update_texture(&state.device, &state.queue, *id, image_delta);
    }

    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [win_w, win_h],
        pixels_per_point: full_output.pixels_per_point,
    };

    let mut egui_encoder = state
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });

    state.egui_renderer.update_buffers(
        &state.device,
        &state.queue,
        &mut egui_encoder,
        &paint_jobs,
        &screen_descriptor,
    );

    render_egui_pass(
        &state.egui_renderer,
        &mut egui_encoder,
        &view,
        &paint_jobs,
        &screen_descriptor,
    );

    state.queue.submit(std::iter::once(egui_encoder.finish()));
    output.present();

    for id in &full_output.textures_delta.free {
        state.egui_renderer.free_texture(id);
    }
    state.hud.trim();

    log::trace!(
        "frame pending={} cancelled={}",
        state.frame_queue.borrow().pending_count(),
        state.frame_queue.borrow().cancelled_count(),
    );
}

// ======================== Host Bookkeeping ========================

/// Forward host lifecycle events into the session log.
fn record_host_events(state: &mut AppState) {
    for event in state.host.drain_events() {
        let event_type = match &event {
            HostEvent::Switched(_) => {
                state.last_stats = None;
                "SWITCH"
            }
            HostEvent::RunStarted(_) | HostEvent::Stopped(_) => "CONTROL",
            HostEvent::OutputShown(_) => {
                state.last_stats = None;
                "OUTPUT"
            }
            HostEvent::Phase(..) => "GAME",
        };
        state
            .session
            .log_event(state.host.frames(), event_type, &event.to_string());
    }
}

fn sample_stats(state: &mut AppState) {
    let kind = state.host.active();
    let stats = state.host.stats();
    state.session.maybe_record(kind, &stats, state.fps);

    if stats.frame > 0 && stats.frame % state.stats_interval == 0 {
        stats.log(kind.title(), state.last_stats.as_ref());
        state.last_stats = Some(stats);
    }
}

fn save_screenshot(state: &mut AppState) {
    let kind = state.host.active();
    let frame = state.host.frames();
    let Some(canvas) = state.host.canvas() else {
        state.session.set_status("Nothing to capture: run a demo first".to_string());
        return;
    };
    match state.session.save_screenshot(canvas, kind, frame) {
        Ok(path) => {
            state.session.set_status(format!("Screenshot saved: {:?}", path));
            state
                .session
                .log_event(frame, "SCREENSHOT", &format!("Saved to {:?}", path));
        }
        Err(e) => {
            state.session.set_status(format!("Screenshot failed: {}", e));
            log::error!("Screenshot failed: {}", e);
        }
    }
}

// ======================== egui Render Helper ========================

/// Render egui paint jobs into a render pass.
/// Extracted as a free function to decouple the egui::Renderer lifetime
/// from the AppState borrow, allowing the render pass encoder to be local.
fn render_egui_pass(
    renderer: &egui_wgpu::Renderer,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    paint_jobs: &[egui::ClippedPrimitive],
    screen_descriptor: &egui_wgpu::ScreenDescriptor,
) {
    let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("egui_render_pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    // forget_lifetime converts RenderPass<'encoder> → RenderPass<'static>
    // which is required by egui_wgpu::Renderer::render in wgpu 24.
    let mut pass = pass.forget_lifetime();
    renderer.render(&mut pass, paint_jobs, screen_descriptor);
}
