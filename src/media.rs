//! The operating system's "prefers dark" signal.
//!
//! A [`ColorSchemeQuery`] gives a snapshot through [`matches`] and
//! delivers change notifications to subscribers. Subscribing returns a
//! [`Subscription`] guard; the listener stays registered exactly as long
//! as the guard lives.
//!
//! [`matches`]: ColorSchemeQuery::matches

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A change notification from the OS color-scheme query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSchemeChange {
    /// `true` when the OS now prefers a dark scheme.
    pub matches: bool,
}

/// Callback invoked for each [`ColorSchemeChange`].
pub type ChangeListener = Rc<dyn Fn(ColorSchemeChange)>;

/// Source of the OS dark-preference signal.
pub trait ColorSchemeQuery {
    /// Current value of the query.
    fn matches(&self) -> bool;

    /// Registers `listener` for change notifications until the returned
    /// guard is dropped.
    fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

/// Guard that removes a registered listener when dropped.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a guard that runs `cancel` exactly once, on drop.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A guard with nothing to release, for sources that never fire.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribes now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct Slots<E> {
    next_id: u64,
    listeners: Vec<(u64, Rc<dyn Fn(E)>)>,
}

/// Listener registry shared by the query implementations and the
/// provider's theme watchers.
pub(crate) struct ListenerSet<E> {
    inner: Rc<RefCell<Slots<E>>>,
}

impl<E: Copy + 'static> ListenerSet<E> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slots {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub(crate) fn add(&self, listener: Rc<dyn Fn(E)>) -> Subscription {
        let id = {
            let mut slots = self.inner.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.listeners.push((id, listener));
            id
        };
        let slots = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }

    /// Calls every listener registered when notification starts. Listeners
    /// may subscribe or unsubscribe while being called.
    pub(crate) fn notify(&self, event: E) {
        let listeners: Vec<_> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// A query whose value is set by hand.
///
/// Stands in for the OS in tests and headless hosts: [`emit`] delivers a
/// change event the same way a real media-query change would.
///
/// [`emit`]: SimulatedColorScheme::emit
pub struct SimulatedColorScheme {
    matches: Cell<bool>,
    listeners: ListenerSet<ColorSchemeChange>,
}

impl SimulatedColorScheme {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            matches: Cell::new(prefers_dark),
            listeners: ListenerSet::new(),
        }
    }

    /// Changes the snapshot value without notifying anyone.
    pub fn set_matches(&self, prefers_dark: bool) {
        self.matches.set(prefers_dark);
    }

    /// Changes the value and notifies every live subscriber.
    pub fn emit(&self, prefers_dark: bool) {
        self.matches.set(prefers_dark);
        self.listeners.notify(ColorSchemeChange {
            matches: prefers_dark,
        });
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for SimulatedColorScheme {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for SimulatedColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedColorScheme")
            .field("matches", &self.matches.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ColorSchemeQuery for SimulatedColorScheme {
    fn matches(&self) -> bool {
        self.matches.get()
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        self.listeners.add(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, ChangeListener) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let listener: ChangeListener = Rc::new(move |change: ColorSchemeChange| {
            sink.borrow_mut().push(change.matches)
        });
        (seen, listener)
    }

    #[test]
    fn test_emit_reaches_subscribers() {
        let query = SimulatedColorScheme::new(false);
        let (seen, listener) = recorder();
        let _sub = query.subscribe(listener);

        query.emit(true);
        query.emit(false);

        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!query.matches());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let query = SimulatedColorScheme::new(false);
        let (seen, listener) = recorder();
        let sub = query.subscribe(listener);
        assert_eq!(query.listener_count(), 1);

        drop(sub);
        assert_eq!(query.listener_count(), 0);

        query.emit(true);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_only_removes_own_listener() {
        let query = SimulatedColorScheme::new(false);
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();
        let first_sub = query.subscribe(first);
        let _second_sub = query.subscribe(second);

        first_sub.unsubscribe();
        query.emit(true);

        assert!(first_seen.borrow().is_empty());
        assert_eq!(*second_seen.borrow(), vec![true]);
    }

    #[test]
    fn test_set_matches_is_silent() {
        let query = SimulatedColorScheme::new(false);
        let (seen, listener) = recorder();
        let _sub = query.subscribe(listener);

        query.set_matches(true);

        assert!(query.matches());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_subscription_outliving_source() {
        let query = SimulatedColorScheme::new(false);
        let (_seen, listener) = recorder();
        let sub = query.subscribe(listener);
        drop(query);
        drop(sub);
    }

    #[test]
    fn test_detached_subscription() {
        let sub = Subscription::detached();
        assert_eq!(format!("{:?}", sub), "Subscription { active: false }");
    }
}
