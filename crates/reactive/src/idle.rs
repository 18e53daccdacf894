//! Cooperative idle scheduling.
//!
//! The host runs callbacks on one logical thread. Work that must not run
//! inside the current call stack (for example a re-evaluation requested from
//! a change handler that a document mutation raised) is deferred to the next
//! idle tick with `IdleScheduler::register_once`.
//!
//! - `IdleScheduler`: the host seam
//! - `IdleQueue`: a cooperative scheduler driven by explicit `run_idle` ticks
//! - `IdleSlot`: a single-arm guard over a shared scheduler, one per debouncer

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use tracing::trace;

/// Handle of an armed idle callback.
pub type IdleToken = u64;

/// One-shot callback run on an idle tick.
pub type IdleCallback = Box<dyn FnOnce()>;

/// The host's cooperative idle mechanism.
///
/// Implementations never invoke a callback from inside `register_once`; the
/// earliest it may run is the next idle tick.
pub trait IdleScheduler {
    /// Arms `callback` for the next idle tick. It runs at most once.
    fn register_once(&self, callback: IdleCallback) -> IdleToken;

    /// Disarms a callback that has not fired yet.
    ///
    /// Returns false if the token already fired, was cancelled, or is unknown.
    fn cancel(&self, token: IdleToken) -> bool;
}

impl<S: IdleScheduler + ?Sized> IdleScheduler for Rc<S> {
    fn register_once(&self, callback: IdleCallback) -> IdleToken {
        (**self).register_once(callback)
    }

    fn cancel(&self, token: IdleToken) -> bool {
        (**self).cancel(token)
    }
}

struct QueueState {
    /// Armed callbacks in registration (and therefore token) order
    armed: VecDeque<(IdleToken, IdleCallback)>,
    /// Next token to hand out
    next_token: IdleToken,
    /// Number of completed ticks
    ticks: u64,
}

/// A cooperative idle scheduler.
///
/// Nothing runs until the owner calls `run_idle`, which models one idle tick
/// of the host: every callback armed before the tick began fires, in
/// registration order. Callbacks armed while the tick is running wait for the
/// next tick, and callbacks cancelled while it is running do not fire.
pub struct IdleQueue {
    state: RefCell<QueueState>,
}

impl Default for IdleQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(QueueState {
                armed: VecDeque::new(),
                next_token: 1,
                ticks: 0,
            }),
        }
    }

    /// Runs one idle tick and returns the number of callbacks fired.
    pub fn run_idle(&self) -> usize {
        let boundary = self.state.borrow().next_token;
        let mut fired = 0;

        loop {
            // Pop one callback at a time so callbacks can register or cancel.
            let next = {
                let mut state = self.state.borrow_mut();
                match state.armed.front() {
                    Some((token, _)) if *token < boundary => state.armed.pop_front(),
                    _ => None,
                }
            };
            let Some((token, callback)) = next else {
                break;
            };
            trace!(token, "idle callback fired");
            callback();
            fired += 1;
        }

        self.state.borrow_mut().ticks += 1;
        fired
    }

    /// Runs ticks until no callback is armed, at most `max_ticks` times.
    ///
    /// Returns the total number of callbacks fired.
    pub fn run_until_idle(&self, max_ticks: usize) -> usize {
        let mut fired = 0;
        for _ in 0..max_ticks {
            if self.is_empty() {
                break;
            }
            fired += self.run_idle();
        }
        fired
    }

    /// Returns the number of armed callbacks.
    pub fn armed_count(&self) -> usize {
        self.state.borrow().armed.len()
    }

    /// Returns true if no callback is armed.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().armed.is_empty()
    }

    /// Returns the number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.state.borrow().ticks
    }
}

impl IdleScheduler for IdleQueue {
    fn register_once(&self, callback: IdleCallback) -> IdleToken {
        let mut state = self.state.borrow_mut();
        let token = state.next_token;
        state.next_token += 1;
        state.armed.push_back((token, callback));
        trace!(token, "idle callback armed");
        token
    }

    fn cancel(&self, token: IdleToken) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            let position = state.armed.iter().position(|(t, _)| *t == token);
            position.and_then(|index| state.armed.remove(index))
        };
        // Dropped outside the borrow: the callback may own things whose drop
        // touches this queue.
        let cancelled = removed.is_some();
        drop(removed);
        if cancelled {
            trace!(token, "idle callback cancelled");
        }
        cancelled
    }
}

/// Holds at most one armed callback on a shared scheduler.
///
/// Arming while armed is a no-op. The slot disarms itself when the callback
/// fires, when `disarm` is called, or when the slot is dropped.
pub struct IdleSlot {
    scheduler: Rc<dyn IdleScheduler>,
    armed: Rc<Cell<Option<IdleToken>>>,
}

impl IdleSlot {
    /// Creates an unarmed slot.
    pub fn new(scheduler: Rc<dyn IdleScheduler>) -> Self {
        Self {
            scheduler,
            armed: Rc::new(Cell::new(None)),
        }
    }

    /// Arms `callback` unless the slot is already armed.
    ///
    /// Returns true if the callback was registered.
    pub fn arm<F: FnOnce() + 'static>(&self, callback: F) -> bool {
        if self.is_armed() {
            return false;
        }
        let armed = self.armed.clone();
        let token = self.scheduler.register_once(Box::new(move || {
            armed.set(None);
            callback();
        }));
        self.armed.set(Some(token));
        true
    }

    /// Cancels the armed callback, if any.
    ///
    /// Returns true if a callback was disarmed.
    pub fn disarm(&self) -> bool {
        match self.armed.take() {
            Some(token) => self.scheduler.cancel(token),
            None => false,
        }
    }

    /// Returns true if a callback is armed and has not fired.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed.get().is_some()
    }
}

impl Drop for IdleSlot {
    fn drop(&mut self) {
        self.disarm();
    }
}
