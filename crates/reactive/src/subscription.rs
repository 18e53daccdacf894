//! Subscription management for raw host event streams.
//!
//! This module provides subscription IDs, a manager for tracking active
//! subscriptions, and `EventHub`, a publish/subscribe stream implementing the
//! `EventSource` seam the debouncer subscribes through.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use tracing::trace;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for event notifications.
pub type EventCallback<E> = Rc<dyn Fn(&E)>;

/// A stream of events that callbacks can subscribe to.
///
/// Subscribing and unsubscribing never fail. Unsubscribing an unknown or
/// already removed id returns `false`. A source may deliver events from
/// inside either call, for instance to replay its latest event.
pub trait EventSource<E> {
    /// Subscribes the callback and returns its id.
    fn subscribe(&self, callback: EventCallback<E>) -> SubscriptionId;

    /// Removes a subscription. Returns true if it was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<E, S: EventSource<E> + ?Sized> EventSource<E> for Rc<S> {
    fn subscribe(&self, callback: EventCallback<E>) -> SubscriptionId {
        (**self).subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

/// A subscription to an event stream.
pub struct Subscription<E> {
    /// Unique identifier
    id: SubscriptionId,
    /// Callback to invoke on events
    callback: EventCallback<E>,
    /// Whether this subscription is active, shared with in-flight dispatches
    active: Rc<Cell<bool>>,
}

impl<E> Clone for Subscription<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: self.callback.clone(),
            active: self.active.clone(),
        }
    }
}

impl<E> Subscription<E> {
    /// Creates a new subscription.
    pub fn new(id: SubscriptionId, callback: EventCallback<E>) -> Self {
        Self {
            id,
            callback,
            active: Rc::new(Cell::new(true)),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns whether this subscription is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Deactivates this subscription, including clones held by a dispatch
    /// that is currently running.
    #[inline]
    pub fn deactivate(&self) {
        self.active.set(false);
    }

    /// Notifies this subscription of an event.
    pub fn notify(&self, event: &E) {
        if self.is_active() {
            (self.callback)(event);
        }
    }
}

/// Manages the subscriptions of one event stream.
pub struct SubscriptionManager<E> {
    /// Active subscriptions
    subscriptions: HashMap<SubscriptionId, Subscription<E>>,
    /// Next subscription ID to assign
    next_id: SubscriptionId,
}

impl<E> Default for SubscriptionManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SubscriptionManager<E> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Subscribes with the given callback.
    ///
    /// Returns the subscription ID that can be used to unsubscribe.
    pub fn subscribe(&mut self, callback: EventCallback<E>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;

        self.subscriptions.insert(id, Subscription::new(id, callback));

        id
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.remove(&id) {
            Some(sub) => {
                sub.deactivate();
                true
            }
            None => false,
        }
    }

    /// Returns the active subscriptions in subscription order.
    pub fn snapshot(&self) -> Vec<Subscription<E>> {
        let mut subs: Vec<_> = self.subscriptions.values().cloned().collect();
        subs.sort_unstable_by_key(|sub| sub.id());
        subs
    }

    /// Returns true if the id is subscribed.
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    /// Returns the number of active subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Clears all subscriptions.
    pub fn clear(&mut self) {
        for sub in self.subscriptions.values() {
            sub.deactivate();
        }
        self.subscriptions.clear();
    }
}

/// A single-threaded publish/subscribe event stream.
///
/// Callbacks run with no internal borrow held, so a callback may subscribe or
/// unsubscribe (itself or others) while an event is being published. A
/// subscription removed mid-dispatch is not notified afterwards; one added
/// mid-dispatch first sees the next event.
pub struct EventHub<E> {
    subscriptions: RefCell<SubscriptionManager<E>>,
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventHub<E> {
    /// Creates a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(SubscriptionManager::new()),
        }
    }

    /// Delivers `event` to every active subscriber.
    ///
    /// Returns the number of subscribers notified.
    pub fn publish(&self, event: &E) -> usize {
        let subscribers = self.subscriptions.borrow().snapshot();
        let mut notified = 0;
        for sub in &subscribers {
            if sub.is_active() {
                sub.notify(event);
                notified += 1;
            }
        }
        trace!(notified, "event published");
        notified
    }

    /// Returns the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Returns true if the id is subscribed.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.borrow().contains(id)
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        self.subscriptions.borrow_mut().clear();
    }
}

impl<E> EventSource<E> for EventHub<E> {
    fn subscribe(&self, callback: EventCallback<E>) -> SubscriptionId {
        self.subscriptions.borrow_mut().subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscriptions.borrow_mut().unsubscribe(id)
    }
}
