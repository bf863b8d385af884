// Process-wide selection-change dispatch
// One signal feeds every live editor; each listener decides for itself
// whether the change concerns its own surface.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Receiver of selection-change notifications
pub trait SelectionListener {
    fn selection_changed(&mut self);
}

type ListenerId = u64;

#[derive(Default)]
struct Registry {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, Weak<RefCell<dyn SelectionListener>>)>,
}

/// Shared registry of selection listeners. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct SelectionDispatcher {
    registry: Rc<RefCell<Registry>>,
}

impl SelectionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned [`Subscription`] is dropped
    pub fn subscribe(&self, listener: Rc<RefCell<dyn SelectionListener>>) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push((id, Rc::downgrade(&listener)));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Notify every live listener in subscription order.
    ///
    /// Listeners that are already borrowed (re-entrant dispatch) are skipped.
    /// Returns the number of listeners notified.
    pub fn dispatch(&self) -> usize {
        let live: Vec<Rc<RefCell<dyn SelectionListener>>> = {
            let mut registry = self.registry.borrow_mut();
            registry.listeners.retain(|(_, l)| l.strong_count() > 0);
            registry
                .listeners
                .iter()
                .filter_map(|(_, l)| l.upgrade())
                .collect()
        };

        let mut notified = 0;
        for listener in live {
            match listener.try_borrow_mut() {
                Ok(mut listener) => {
                    listener.selection_changed();
                    notified += 1;
                }
                Err(_) => trace!("listener busy, skipping selection change"),
            }
        }
        trace!(notified, "selection change dispatched");
        notified
    }

    /// Number of registered listeners that are still alive
    pub fn listener_count(&self) -> usize {
        self.registry
            .borrow()
            .listeners
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }
}

/// Keeps a listener registered; dropping it deregisters
#[must_use = "dropping a Subscription deregisters the listener"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Deregister now
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
