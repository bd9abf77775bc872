// ============================================================================
// host.rs — Demo Showcase
// Demo selector / host: mounts exactly one demo, owns the "running" and
// "show output" signals, animates the code listing, and holds the frame
// loop guard for the active demo.
// ============================================================================

use std::fmt;

use crate::canvas::Canvas;
use crate::config::DemoParams;
use crate::demos::{create_demo, Demo, DemoKind, FrameContext};
use crate::game::GamePhase;
use crate::input::{Action, InputQueue};
use crate::scheduler::{FrameLoop, SharedScheduler};
use crate::stats::DemoStats;

/// How long each listing line stays highlighted.
pub const LINE_MS: f64 = 300.0;
/// Pause between the last line and the output appearing.
pub const OUTPUT_DELAY_MS: f64 = 500.0;

// ======================== Events ========================

/// Lifecycle notifications, drained by the window / headless drivers.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    Switched(DemoKind),
    RunStarted(DemoKind),
    OutputShown(DemoKind),
    Stopped(DemoKind),
    Phase(DemoKind, GamePhase),
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::Switched(k) => write!(f, "Switched to {}", k.title()),
            HostEvent::RunStarted(k) => write!(f, "Run started: {}", k.title()),
            HostEvent::OutputShown(k) => write!(f, "Output shown: {}", k.title()),
            HostEvent::Stopped(k) => write!(f, "Stopped: {}", k.title()),
            HostEvent::Phase(k, p) => write!(f, "{}: {}", k.title(), p.name()),
        }
    }
}

// ======================== Run Animation ========================

/// Timeline of one `run()`: line-by-line highlight, then the output delay.
#[derive(Copy, Clone, Debug)]
struct RunTimeline {
    started_ms: f64,
    lines: usize,
}

enum TimelineStep {
    Highlight(usize),
    Waiting,
    Done,
}

impl RunTimeline {
    fn at(&self, now_ms: f64) -> TimelineStep {
        let elapsed = (now_ms - self.started_ms).max(0.0);
        let listing_ms = self.lines as f64 * LINE_MS;
        if elapsed < listing_ms {
            TimelineStep::Highlight((elapsed / LINE_MS) as usize)
        } else if elapsed < listing_ms + OUTPUT_DELAY_MS {
            TimelineStep::Waiting
        } else {
            TimelineStep::Done
        }
    }
}

// ======================== DemoHost ========================

pub struct DemoHost {
    scheduler: SharedScheduler,
    params: DemoParams,

    demo: Box<dyn Demo>,

    running: bool,
    show_output: bool,
    current_line: Option<usize>,
    timeline: Option<RunTimeline>,

    frame_loop: Option<FrameLoop>,
    input: InputQueue,
    canvas: Option<Canvas>,
    surface_available: bool,

    last_phase: Option<GamePhase>,
    events: Vec<HostEvent>,
    frames: u64,
    skipped_frames: u64,
}

impl DemoHost {
    pub fn new(scheduler: SharedScheduler, params: DemoParams, initial: DemoKind) -> Self {
        let demo = create_demo(initial, params.effective_seed());
        let last_phase = demo.phase();
        Self {
            scheduler,
            params,
            demo,
            running: false,
            show_output: false,
            current_line: None,
            timeline: None,
            frame_loop: None,
            input: InputQueue::default(),
            canvas: None,
            surface_available: true,
            last_phase,
            events: Vec::new(),
            frames: 0,
            skipped_frames: 0,
        }
    }

    // ---- Signals / accessors ----

    pub fn active(&self) -> DemoKind {
        self.demo.kind()
    }

    pub fn demo(&self) -> &dyn Demo {
        self.demo.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn show_output(&self) -> bool {
        self.show_output
    }

    /// Listing line currently highlighted by the run animation.
    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn params(&self) -> &DemoParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DemoParams {
        &mut self.params
    }

    pub fn has_frame_loop(&self) -> bool {
        self.frame_loop.is_some()
    }

    /// Demo frames executed since the output was last mounted.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    pub fn stats(&self) -> DemoStats {
        let mut stats = self.demo.stats();
        stats.frame = self.frames;
        stats
    }

    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- Operations ----

    /// Switch to `kind`: reset both signals, cancel any run animation, tear
    /// down the frame loop and mount a fresh idle demo.
    pub fn select(&mut self, kind: DemoKind) {
        self.reset(kind);
        log::info!("Switched demo → {}", kind.title());
        self.events.push(HostEvent::Switched(kind));
    }

    /// Return to the idle state of the current demo.
    pub fn stop(&mut self) {
        if !self.running && !self.show_output {
            return;
        }
        let kind = self.active();
        self.reset(kind);
        log::info!("Stopped {}", kind.title());
        self.events.push(HostEvent::Stopped(kind));
    }

    /// Start the listing animation; the output appears when it completes.
    /// No-op while a run is already in progress.
    pub fn run(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.show_output = false;
        self.current_line = None;
        self.timeline = Some(RunTimeline {
            started_ms: now_ms,
            lines: self.active().listing_lines(),
        });
        self.advance_timeline(now_ms);
        let kind = self.active();
        log::info!("Running {} ({} lines)", kind.title(), kind.listing_lines());
        self.events.push(HostEvent::RunStarted(kind));
    }

    /// Queue an input action for the next frame. Input arriving while the
    /// output is hidden is dropped.
    pub fn push_action(&mut self, action: Action) {
        if !self.show_output {
            log::debug!("Dropped {:?}: output hidden", action);
            return;
        }
        match action {
            Action::ToggleTrails => {
                self.params.show_trails = !self.params.show_trails;
                log::info!("Trails {}", if self.params.show_trails { "on" } else { "off" });
            }
            _ => self.input.push(action),
        }
    }

    /// Drawing surface lost (e.g. minimized window) or regained. Frames are
    /// skipped while it is away; the loop stays scheduled.
    pub fn set_surface_available(&mut self, available: bool) {
        self.surface_available = available;
    }

    /// One display refresh: timed host events, then the demo frame if its
    /// callback is due. Returns true when the canvas was repainted.
    /// A loop acquired during this refresh first fires on the next one.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let due = self.scheduler.borrow_mut().take_due();
        self.advance_timeline(now_ms);

        let fired = match self.frame_loop.as_mut() {
            Some(frame_loop) => frame_loop.fire(&due),
            None => false,
        };
        if !fired {
            return false;
        }

        let drawn = self.run_demo_frame(now_ms);
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.reschedule();
        }
        drawn
    }

    // ---- Internals ----

    fn reset(&mut self, kind: DemoKind) {
        // Dropping the guard cancels the pending callback.
        self.frame_loop = None;
        self.timeline = None;
        self.running = false;
        self.show_output = false;
        self.current_line = None;
        self.canvas = None;
        self.input.clear();
        self.demo = create_demo(kind, self.params.effective_seed());
        self.last_phase = self.demo.phase();
        self.frames = 0;
    }

    fn advance_timeline(&mut self, now_ms: f64) {
        let Some(timeline) = self.timeline else {
            return;
        };
        match timeline.at(now_ms) {
            TimelineStep::Highlight(line) => self.current_line = Some(line),
            TimelineStep::Waiting => self.current_line = None,
            TimelineStep::Done => {
                self.current_line = None;
                self.timeline = None;
                self.mount_output(now_ms);
            }
        }
    }

    fn mount_output(&mut self, now_ms: f64) {
        let kind = self.active();
        let (w, h) = kind.canvas_size();
        self.show_output = true;
        self.canvas = Some(Canvas::new(w, h));
        self.demo.activate(now_ms);
        self.frame_loop = Some(FrameLoop::start(self.scheduler.clone()));
        self.frames = 0;
        log::info!("{} — {}", kind.title(), kind.output_message());
        self.events.push(HostEvent::OutputShown(kind));
    }

    fn run_demo_frame(&mut self, now_ms: f64) -> bool {
        if !self.surface_available {
            self.skipped_frames += 1;
            log::debug!("Surface unavailable; skipping frame");
            return false;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            self.skipped_frames += 1;
            log::debug!("No canvas mounted; skipping frame");
            return false;
        };

        for action in self.input.drain() {
            self.demo.handle_action(action, now_ms);
        }

        let ctx = FrameContext {
            now_ms,
            running: self.running,
            params: &self.params,
        };
        self.demo.update(&ctx);
        self.demo.draw(canvas, &self.params);
        self.frames += 1;

        let phase = self.demo.phase();
        if phase != self.last_phase {
            if let Some(p) = phase {
                let kind = self.active();
                self.events.push(HostEvent::Phase(kind, p));
            }
            self.last_phase = phase;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::FrameQueue;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fixed_params() -> DemoParams {
        DemoParams {
            use_fixed_seed: true,
            fixed_seed_value: 9,
            ..DemoParams::default()
        }
    }

    fn host(kind: DemoKind) -> (DemoHost, Rc<RefCell<FrameQueue>>) {
        let queue = FrameQueue::new().shared();
        let host = DemoHost::new(queue.clone(), fixed_params(), kind);
        (host, queue)
    }

    /// Time at which the output of `kind` appears after `run(0.0)`.
    fn output_at(kind: DemoKind) -> f64 {
        kind.listing_lines() as f64 * LINE_MS + OUTPUT_DELAY_MS
    }

    fn shown(kind: DemoKind) -> (DemoHost, Rc<RefCell<FrameQueue>>, f64) {
        let (mut host, queue) = host(kind);
        host.run(0.0);
        let t = output_at(kind);
        host.frame(t);
        assert!(host.show_output());
        (host, queue, t)
    }

    #[test]
    fn run_highlights_each_line_then_shows_output() {
        let (mut host, queue) = host(DemoKind::Wave);
        let lines = DemoKind::Wave.listing_lines();
        host.run(0.0);
        assert!(host.is_running());
        assert_eq!(host.current_line(), Some(0));

        host.frame(LINE_MS * 2.0 + 1.0);
        assert_eq!(host.current_line(), Some(2));

        host.frame(lines as f64 * LINE_MS);
        assert_eq!(host.current_line(), None);
        assert!(!host.show_output());

        host.frame(output_at(DemoKind::Wave) - 1.0);
        assert!(!host.show_output());
        assert_eq!(queue.borrow().pending_count(), 0);

        host.frame(output_at(DemoKind::Wave));
        assert!(host.show_output());
        assert!(host.has_frame_loop());
        assert_eq!(queue.borrow().pending_count(), 1);
    }

    #[test]
    fn run_while_running_is_ignored() {
        let (mut host, _queue) = host(DemoKind::Wave);
        host.run(0.0);
        host.frame(LINE_MS * 3.0);
        host.run(LINE_MS * 3.0);
        assert_eq!(host.current_line(), Some(3));
        assert_eq!(host.drain_events().len(), 1);
    }

    #[test]
    fn frames_update_and_draw_after_mount() {
        let (mut host, _queue, t) = shown(DemoKind::Helix);
        assert!(host.frame(t + 16.0));
        assert!(host.frame(t + 32.0));
        assert_eq!(host.frames(), 2);
        assert!(host.canvas().is_some());
    }

    #[test]
    fn switching_cancels_prior_callback() {
        let (mut host, queue, t) = shown(DemoKind::Particles);
        host.frame(t + 16.0);
        assert_eq!(queue.borrow().pending_count(), 1);

        host.select(DemoKind::Gravity);
        assert_eq!(queue.borrow().pending_count(), 0);
        assert_eq!(queue.borrow().cancelled_count(), 1);
        assert!(!host.is_running());
        assert!(!host.show_output());
        assert!(host.canvas().is_none());
        assert!(!host.frame(t + 32.0));
        assert_eq!(host.frames(), 0);
    }

    #[test]
    fn switching_mid_animation_cancels_timeline() {
        let (mut host, queue) = host(DemoKind::Snake);
        host.run(0.0);
        host.frame(600.0);
        host.select(DemoKind::Wave);
        assert_eq!(host.current_line(), None);
        host.frame(100_000.0);
        assert!(!host.show_output());
        assert_eq!(queue.borrow().pending_count(), 0);
    }

    #[test]
    fn stop_returns_to_idle_without_switching() {
        let (mut host, queue, _t) = shown(DemoKind::Cube);
        host.stop();
        assert_eq!(host.active(), DemoKind::Cube);
        assert!(!host.is_running());
        assert_eq!(queue.borrow().pending_count(), 0);
    }

    #[test]
    fn input_dropped_while_output_hidden() {
        let (mut host, _queue) = host(DemoKind::Particles);
        host.push_action(Action::PointerDown { x: 10.0, y: 10.0 });
        let (mut shown_host, _q, t) = shown(DemoKind::Particles);
        host.run(0.0);
        host.frame(output_at(DemoKind::Particles));
        host.frame(output_at(DemoKind::Particles) + 1.0);
        shown_host.frame(t + 1.0);
        // Same seed, same opening explosion; the early click left no trace.
        assert_eq!(host.stats().entities, shown_host.stats().entities);
    }

    #[test]
    fn queued_input_applies_before_update() {
        let (mut host, _queue, t) = shown(DemoKind::Particles);
        host.push_action(Action::PointerDown { x: 100.0, y: 100.0 });
        host.frame(t + 1.0);
        // Opening explosion + the click, both already stepped once.
        assert_eq!(host.stats().entities, 100);
    }

    #[test]
    fn missing_surface_skips_frame_but_keeps_loop() {
        let (mut host, queue, t) = shown(DemoKind::Wave);
        host.set_surface_available(false);
        assert!(!host.frame(t + 16.0));
        assert_eq!(host.skipped_frames(), 1);
        assert_eq!(queue.borrow().pending_count(), 1);
        host.set_surface_available(true);
        assert!(host.frame(t + 32.0));
    }

    #[test]
    fn toggle_trails_flips_param() {
        let (mut host, _queue, _t) = shown(DemoKind::Gravity);
        assert!(host.params().show_trails);
        host.push_action(Action::ToggleTrails);
        assert!(!host.params().show_trails);
    }

    #[test]
    fn game_phase_changes_are_reported() {
        let (mut host, _queue, t) = shown(DemoKind::Snake);
        host.drain_events();
        host.frame(t + 16.0);
        host.frame(t + 600.0);
        let events = host.drain_events();
        assert!(events.contains(&HostEvent::Phase(DemoKind::Snake, GamePhase::Running)));
    }
}
