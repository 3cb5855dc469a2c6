//! The observable module holds a value that pushes every change to its listeners.
//!
//! Delivery is synchronous: by the time [`Observable::set`] returns, every listener has seen the new
//! value. A listener that subscribes late is handed the current value right away, so it never has
//! to wait for the next change to catch up.

use std::fmt;

/// A boxed callback that gets handed every new value.
type Listener<T> = Box<dyn FnMut(&T)>;

/// This struct is the handle returned when subscribing to an [`Observable`]. It is only good for
/// unsubscribing later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// This struct hands out subscription handles. An owner of several observables shares one of these
/// among them, so a handle names a single listener across all of them and can be routed back
/// without knowing which observable it came from.
#[derive(Debug, Default)]
pub struct SubscriptionIds {
    /// The handle to give out next.
    next: u64,
}

impl SubscriptionIds {
    /// Takes the next unused handle.
    pub const fn next(&mut self) -> Subscription {
        let id = Subscription(self.next);
        self.next += 1;

        id
    }
}

/// This struct holds a value and the listeners that want to hear about it.
pub struct Observable<T> {
    /// The listeners, in subscription order.
    listeners: Vec<(Subscription, Listener<T>)>,
    /// The last value set.
    value: T,
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    #[expect(
        clippy::min_ident_chars,
        reason = "Renaming the formatter would trip renamed_function_params."
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T> Observable<T> {
    /// Creates an observable holding `value` with nobody listening yet.
    pub const fn new(value: T) -> Self {
        Self {
            listeners: Vec::new(),
            value,
        }
    }

    /// Returns the last value set.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Returns how many listeners are currently subscribed. The game itself never asks; this is
    /// here for library users that want to check their subscriptions were dropped.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Stores a new value and hands it to every listener, in the order they subscribed. Listeners
    /// are notified even if the new value equals the old one.
    pub fn set(&mut self, value: T) {
        self.value = value;

        for &mut (_, ref mut listener) in &mut self.listeners {
            listener(&self.value);
        }
    }

    /// Registers a listener under a handle taken from `ids` and immediately hands it the current
    /// value.
    pub fn subscribe<F>(&mut self, ids: &mut SubscriptionIds, mut listener: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let id = ids.next();
        listener(&self.value);
        self.listeners.push((id, Box::new(listener)));

        id
    }

    /// Drops the listener registered under `id`. Returns whether such a listener was found.
    pub fn unsubscribe(&mut self, id: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&(listener_id, _)| listener_id != id);

        self.listeners.len() != before
    }
}

/// Tests for delivery order, late subscribers and handles.
#[cfg(test)]
#[expect(
    clippy::missing_assert_message,
    reason = "A bare assertion failing is the test failure itself."
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Returns a listener that records every value it is handed, along with the record.
    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
    }

    #[test]
    fn late_subscriber_gets_current_value() {
        let mut ids = SubscriptionIds::default();
        let mut score = Observable::new(0_u32);
        score.set(40);

        let (seen, listener) = recorder::<u32>();
        let _ = score.subscribe(&mut ids, listener);

        assert_eq!(*seen.borrow(), [40]);
    }

    #[test]
    fn every_set_is_delivered() {
        let mut ids = SubscriptionIds::default();
        let mut score = Observable::new(0_u32);
        let (seen, listener) = recorder::<u32>();
        let _ = score.subscribe(&mut ids, listener);

        score.set(20);
        score.set(20);
        score.set(40);

        assert_eq!(*seen.borrow(), [0, 20, 20, 40]);
        assert_eq!(*score.get(), 40);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let mut ids = SubscriptionIds::default();
        let mut word = Observable::new(String::from("tac"));
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            let _ = word.subscribe(&mut ids, move |value: &String| {
                order.borrow_mut().push(format!("{tag}:{value}"));
            });
        }
        order.borrow_mut().clear();

        word.set(String::from("god"));

        assert_eq!(*order.borrow(), ["first:god", "second:god"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut ids = SubscriptionIds::default();
        let mut round = Observable::new(1_usize);
        let (seen, listener) = recorder::<usize>();
        let id = round.subscribe(&mut ids, listener);

        assert!(round.unsubscribe(id));
        assert_eq!(round.listener_count(), 0);
        round.set(2);

        assert_eq!(*seen.borrow(), [1]);
    }

    #[test]
    fn unsubscribe_unknown_handle() {
        let mut ids = SubscriptionIds::default();
        let mut first = Observable::new(0_u32);
        let mut second = Observable::new(0_u32);
        let id = first.subscribe(&mut ids, |_: &u32| {});
        let _ = second.subscribe(&mut ids, |_: &u32| {});

        assert!(!second.unsubscribe(id));
        assert!(first.unsubscribe(id));
        assert!(!first.unsubscribe(id));
    }

    #[test]
    fn shared_ids_never_repeat() {
        let mut ids = SubscriptionIds::default();
        let mut score = Observable::new(0_u32);
        let mut round = Observable::new(0_usize);

        let first = score.subscribe(&mut ids, |_: &u32| {});
        let second = round.subscribe(&mut ids, |_: &usize| {});
        let third = score.subscribe(&mut ids, |_: &u32| {});

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
        assert!(!round.unsubscribe(first));
        assert!(round.unsubscribe(second));
    }
}
