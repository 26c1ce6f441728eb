//! Property notifications
//!
//! Properties notify their subscribers synchronously, in registration order, on the
//! thread that changed them. Aggregates (property groups, the settings registry) relay
//! those notifications to their own subscribers.
//!
//! Subscribers must not mutate the structure of the registry they observe.

use super::property::Property;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Notification emitted by a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyEvent {
    /// Value was replaced by a different one
    Changed,
    /// Enabled flag was switched
    Enabled(bool),
}

/// Callback invoked for every property event
pub type Observer = Rc<dyn Fn(&Property, PropertyEvent)>;

/// Ordered subscriber list
#[derive(Default)]
pub struct Subscribers {
    observers: RefCell<Vec<Observer>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: impl Fn(&Property, PropertyEvent) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    /// Invoke every subscriber in registration order
    ///
    /// Works on a snapshot: subscribers added during notification are called from the next one on.
    pub fn notify(&self, property: &Property, event: PropertyEvent) {
        let snapshot: Vec<Observer> = self.observers.borrow().clone();
        for observer in snapshot {
            observer(property, event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.len())
            .finish()
    }
}
