//! Microtask-backed idle scheduling for the browser.
//!
//! Callbacks are parked in an `IdleQueue` and drained by one reusable flush
//! closure chained onto `Promise.resolve()`, so a burst of registrations
//! costs one microtask and no per-registration closure allocation.

use crate::idle::{IdleCallback, IdleQueue, IdleScheduler, IdleToken};
use alloc::rc::Rc;
use core::cell::Cell;
use wasm_bindgen::prelude::*;

/// Runs armed callbacks after the current JavaScript task.
pub struct MicrotaskScheduler {
    queue: Rc<IdleQueue>,
    flush_scheduled: Rc<Cell<bool>>,
    flush_closure: Closure<dyn FnMut(JsValue)>,
}

impl Default for MicrotaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrotaskScheduler {
    pub fn new() -> Self {
        let queue = Rc::new(IdleQueue::new());
        let flush_scheduled = Rc::new(Cell::new(false));

        let q = queue.clone();
        let scheduled = flush_scheduled.clone();
        let flush_closure = Closure::new(move |_: JsValue| {
            // Cleared first: callbacks armed during this flush need another one.
            scheduled.set(false);
            q.run_idle();
        });

        Self {
            queue,
            flush_scheduled,
            flush_closure,
        }
    }

    /// Returns the underlying queue, e.g. to drain it synchronously.
    pub fn queue(&self) -> &Rc<IdleQueue> {
        &self.queue
    }

    fn schedule_flush(&self) {
        if self.flush_scheduled.replace(true) {
            return;
        }
        let _ = js_sys::Promise::resolve(&JsValue::UNDEFINED).then(&self.flush_closure);
    }
}

impl IdleScheduler for MicrotaskScheduler {
    fn register_once(&self, callback: IdleCallback) -> IdleToken {
        let token = self.queue.register_once(callback);
        self.schedule_flush();
        token
    }

    fn cancel(&self, token: IdleToken) -> bool {
        self.queue.cancel(token)
    }
}
