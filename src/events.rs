//! Event dispatch and cooperative timing primitives.
//!
//! The emitter invokes handlers last-registered-first and hands each a stop
//! token; host event bubbling is never relied on. The debounce/throttle
//! types are timestamp-driven: the single-threaded event loop feeds them
//! `now` values and acts on the returned booleans, the same shape as the
//! scroll settle timer loop.

/// Delay after the last scroll event before the `is_scrolling` flag clears
/// and hit testing resumes, in milliseconds.
pub const SCROLL_SETTLE_DELAY_MS: f64 = 100.0;

/// Minimum interval between wheel snap computations, in milliseconds.
pub const WHEEL_SNAP_INTERVAL_MS: f64 = 80.0;

/// Mutable stop token passed to every handler during emission.
#[derive(Debug, Default)]
pub struct Propagation {
    stopped: bool,
}

impl Propagation {
    /// Halt emission; handlers registered earlier will not run.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Handle for unsubscribing a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

type Handler<E> = Box<dyn FnMut(&E, &mut Propagation)>;

/// Ordered handler list invoked last-registered-first.
pub struct EventEmitter<E> {
    handlers: Vec<(HandlerId, Handler<E>)>,
    next_id: u64,
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E, &mut Propagation) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: HandlerId) {
        self.handlers.retain(|(h, _)| *h != id);
    }

    /// Emit to all handlers in LIFO order, halting at the first stop.
    pub fn emit(&mut self, event: &E) {
        let mut propagation = Propagation::default();
        for (_, handler) in self.handlers.iter_mut().rev() {
            handler(event, &mut propagation);
            if propagation.is_stopped() {
                break;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Trailing-edge debounce over caller-supplied timestamps.
///
/// `record` arms (or re-arms) the deadline; `fire` reports once when the
/// delay has elapsed with no further records.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn record(&mut self, now: f64) {
        self.deadline = Some(now + self.delay);
    }

    /// True while a record is pending and the delay has not elapsed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed.
    pub fn fire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Leading-edge throttle: at most one `true` per interval.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval: f64,
    last: Option<f64>,
}

impl Throttle {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn ready(&mut self, now: f64) -> bool {
        match self.last {
            Some(last) if now - last < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emitter_lifo_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut emitter: EventEmitter<u32> = EventEmitter::new();
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            emitter.subscribe(move |_, _| order.borrow_mut().push(tag));
        }
        emitter.emit(&0);
        assert_eq!(*order.borrow(), vec!["third", "second", "first"]);
    }

    #[test]
    fn test_emitter_stop_halts_propagation() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut emitter: EventEmitter<u32> = EventEmitter::new();
        {
            let order = Rc::clone(&order);
            emitter.subscribe(move |_, _| order.borrow_mut().push("first"));
        }
        {
            let order = Rc::clone(&order);
            emitter.subscribe(move |_, p: &mut Propagation| {
                order.borrow_mut().push("second");
                p.stop();
            });
        }
        emitter.emit(&0);
        // "second" runs (registered last), stops, "first" never fires
        assert_eq!(*order.borrow(), vec!["second"]);
    }

    #[test]
    fn test_emitter_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut emitter: EventEmitter<u32> = EventEmitter::new();
        let c = Rc::clone(&count);
        let id = emitter.subscribe(move |_, _| *c.borrow_mut() += 1);
        emitter.emit(&0);
        emitter.unsubscribe(id);
        emitter.emit(&0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_debounce_rearms_while_active() {
        let mut d = Debounce::new(100.0);
        d.record(0.0);
        assert!(!d.fire(50.0));
        d.record(50.0); // keeps scrolling
        assert!(!d.fire(120.0));
        assert!(d.fire(150.0));
        // Consumed: does not fire twice
        assert!(!d.fire(200.0));
    }

    #[test]
    fn test_throttle_coalesces() {
        let mut t = Throttle::new(80.0);
        assert!(t.ready(0.0));
        assert!(!t.ready(40.0));
        assert!(!t.ready(79.0));
        assert!(t.ready(80.0));
        assert!(!t.ready(100.0));
    }
}
