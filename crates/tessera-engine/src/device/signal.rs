use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::coords::Viewport;

type Slot = Cell<Option<Viewport>>;

/// Same-thread resize notifier.
///
/// Emitting never calls back into subscribers; it only marks each live
/// subscription as pending. Subscribers drain the notification with
/// [`ResizeSubscription::take`] when they next run, so delivery cannot re-enter
/// a subscriber that is in the middle of an operation.
///
/// Cloning yields another handle to the same subscriber list.
#[derive(Debug, Clone, Default)]
pub struct ResizeSignal {
    slots: Rc<RefCell<Vec<Weak<Slot>>>>,
}

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Dropping the returned subscription disconnects it.
    pub fn connect(&self) -> ResizeSubscription {
        let slot = Rc::new(Slot::new(None));
        self.slots.borrow_mut().push(Rc::downgrade(&slot));
        ResizeSubscription { slot }
    }

    /// Notifies every live subscriber of a new size; prunes dropped ones.
    pub fn emit(&self, size: Viewport) {
        self.slots.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(slot) => {
                slot.set(Some(size));
                true
            }
            None => false,
        });
    }

    /// Number of subscriptions that are still alive.
    pub fn subscriber_count(&self) -> usize {
        let mut slots = self.slots.borrow_mut();
        slots.retain(|weak| weak.strong_count() > 0);
        slots.len()
    }
}

/// Receiving end of a [`ResizeSignal`] connection.
#[derive(Debug)]
pub struct ResizeSubscription {
    slot: Rc<Slot>,
}

impl ResizeSubscription {
    /// Returns the most recent size emitted since the last call, if any.
    pub fn take(&self) -> Option<Viewport> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_marks_all_subscribers() {
        let signal = ResizeSignal::new();
        let a = signal.connect();
        let b = signal.connect();

        signal.emit(Viewport::new(10.0, 20.0));

        assert_eq!(a.take(), Some(Viewport::new(10.0, 20.0)));
        assert_eq!(b.take(), Some(Viewport::new(10.0, 20.0)));
        assert_eq!(a.take(), None);
    }

    #[test]
    fn latest_emit_wins() {
        let signal = ResizeSignal::new();
        let sub = signal.connect();

        signal.emit(Viewport::new(1.0, 1.0));
        signal.emit(Viewport::new(2.0, 3.0));

        assert_eq!(sub.take(), Some(Viewport::new(2.0, 3.0)));
    }

    #[test]
    fn dropping_subscription_disconnects() {
        let signal = ResizeSignal::new();
        let sub = signal.connect();
        let handle = signal.clone();
        assert_eq!(handle.subscriber_count(), 1);

        drop(sub);
        signal.emit(Viewport::new(5.0, 5.0));
        assert_eq!(handle.subscriber_count(), 0);
    }
}
