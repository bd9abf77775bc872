// ============================================================================
// scheduler.rs — Demo Showcase
// Frame scheduling: an injectable "request next frame / cancel" interface,
// a queue-backed implementation shared by the window and headless drivers,
// and the scoped `FrameLoop` guard that owns one outstanding request.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

/// Opaque ticket for one requested frame callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Host-side refresh driver. Each `schedule` asks for exactly one future
/// frame; `take_due` hands back the handles that fire on this refresh.
pub trait FrameScheduler {
    fn schedule(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
    fn take_due(&mut self) -> Vec<FrameHandle>;
}

pub type SharedScheduler = Rc<RefCell<dyn FrameScheduler>>;

// ======================== FrameQueue ========================

/// Queue of outstanding frame requests. Everything pending fires on the next
/// refresh; the optional waker lets the windowed driver request a redraw.
#[derive(Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
    waker: Option<Box<dyn Fn()>>,
    cancelled: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waker(waker: impl Fn() + 'static) -> Self {
        Self {
            waker: Some(Box::new(waker)),
            ..Self::default()
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of requests cancelled before they fired.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    #[cfg(test)]
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn shared(self) -> Rc<RefCell<FrameQueue>> {
        Rc::new(RefCell::new(self))
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        if let Some(wake) = &self.waker {
            wake();
        }
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }

    fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }
}

// ======================== FrameLoop ========================

/// Scoped ownership of a recurring frame callback. At most one request is
/// outstanding at a time; dropping the guard cancels it.
pub struct FrameLoop {
    scheduler: SharedScheduler,
    handle: Option<FrameHandle>,
}

impl FrameLoop {
    /// Acquire the loop and request its first frame.
    pub fn start(scheduler: SharedScheduler) -> Self {
        let handle = scheduler.borrow_mut().schedule();
        Self {
            scheduler,
            handle: Some(handle),
        }
    }

    /// True when `due` contains this loop's outstanding request. Consumes the
    /// request; the caller re-arms with `reschedule` after running the frame.
    pub fn fire(&mut self, due: &[FrameHandle]) -> bool {
        match self.handle {
            Some(h) if due.contains(&h) => {
                self.handle = None;
                true
            }
            _ => false,
        }
    }

    pub fn reschedule(&mut self) {
        if self.handle.is_none() {
            self.handle = Some(self.scheduler.borrow_mut().schedule());
        }
    }

    #[cfg(test)]
    pub fn handle(&self) -> Option<FrameHandle> {
        self.handle
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            self.scheduler.borrow_mut().cancel(h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn due_handles_are_drained_once() {
        let mut queue = FrameQueue::new();
        let a = queue.schedule();
        let b = queue.schedule();
        assert_ne!(a, b);
        assert_eq!(queue.take_due(), vec![a, b]);
        assert!(queue.take_due().is_empty());
    }

    #[test]
    fn cancelled_handle_never_fires() {
        let mut queue = FrameQueue::new();
        let a = queue.schedule();
        queue.cancel(a);
        assert!(!queue.is_pending(a));
        assert!(queue.take_due().is_empty());
        assert_eq!(queue.cancelled_count(), 1);
    }

    #[test]
    fn waker_runs_on_schedule() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let mut queue = FrameQueue::with_waker(move || counter.set(counter.get() + 1));
        queue.schedule();
        queue.schedule();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn frame_loop_rearms_after_firing() {
        let queue = FrameQueue::new().shared();
        let mut frame_loop = FrameLoop::start(queue.clone());
        let due = queue.borrow_mut().take_due();
        assert!(frame_loop.fire(&due));
        assert!(frame_loop.handle().is_none());
        frame_loop.reschedule();
        assert_eq!(queue.borrow().pending_count(), 1);
    }

    #[test]
    fn dropping_frame_loop_cancels_pending_request() {
        let queue = FrameQueue::new().shared();
        let frame_loop = FrameLoop::start(queue.clone());
        assert_eq!(queue.borrow().pending_count(), 1);
        drop(frame_loop);
        assert_eq!(queue.borrow().pending_count(), 0);
        assert_eq!(queue.borrow().cancelled_count(), 1);
    }

    #[test]
    fn stale_handles_do_not_fire_a_new_loop() {
        let queue = FrameQueue::new().shared();
        let first = FrameLoop::start(queue.clone());
        let stale = first.handle().unwrap();
        drop(first);
        let mut second = FrameLoop::start(queue.clone());
        assert!(!second.fire(&[stale]));
    }
}
