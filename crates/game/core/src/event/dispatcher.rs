use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::ids::ObjectId;

use super::{EventArgs, EventError, Invocation, ListenerHandle, ListenerId};

/// Listener set for one event channel.
///
/// Ids come from a wrapping counter that skips ids still in use; exhausting
/// all 2^64 ids is not handled. Invocation order is kept separately from the
/// ids, so a wrapped counter never moves a newcomer ahead of older listeners.
pub struct EventDispatcher<C> {
    listeners: BTreeMap<ListenerId, ListenerHandle<C>>,
    order: Vec<ListenerId>,
    last_id: u64,
}

impl<C> EventDispatcher<C> {
    pub fn new() -> Self {
        Self {
            listeners: BTreeMap::new(),
            order: Vec::new(),
            last_id: 0,
        }
    }

    /// Registers `listener`. Returns false if it already carries an id, i.e.
    /// it is registered here or with another dispatcher.
    pub fn add(&mut self, listener: &ListenerHandle<C>) -> bool {
        if listener.is_registered() {
            return false;
        }

        let id = self.issue_id();
        listener.set_id(Some(id));
        self.listeners.insert(id, Rc::clone(listener));
        self.order.push(id);
        true
    }

    /// Unregisters `listener`. Returns false if it is not registered, or is
    /// registered with a different dispatcher.
    pub fn remove(&mut self, listener: &ListenerHandle<C>) -> bool {
        let Some(id) = listener.id() else {
            return false;
        };

        match self.listeners.get(&id) {
            Some(stored) if Rc::ptr_eq(stored, listener) => {
                self.listeners.remove(&id);
                self.order.retain(|&registered| registered != id);
                listener.set_id(None);
                true
            }
            _ => false,
        }
    }

    /// Drops every registration at once.
    pub fn remove_all(&mut self) {
        self.order.clear();
        for listener in std::mem::take(&mut self.listeners).into_values() {
            listener.set_id(None);
        }
    }

    /// Invokes every registered listener in registration order.
    ///
    /// Stops at the first failing listener and returns its error unchanged;
    /// listeners after it are not invoked. On success, returns the listeners
    /// chained by the callbacks, in the order they were requested.
    pub fn trigger(
        &self,
        context: &mut C,
        sender: Option<ObjectId>,
        args: &EventArgs,
    ) -> Result<Vec<ListenerHandle<C>>, EventError> {
        let mut chained = Vec::new();
        for (id, listener) in self.registered() {
            let mut invocation = Invocation::new(&mut *context, sender, args, id);
            listener.invoke(&mut invocation)?;
            chained.extend(invocation.into_chained());
        }
        Ok(chained)
    }

    pub fn has_listener(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn contains(&self, listener: &ListenerHandle<C>) -> bool {
        listener
            .id()
            .and_then(|id| self.listeners.get(&id))
            .is_some_and(|stored| Rc::ptr_eq(stored, listener))
    }

    /// Registered listeners in registration order.
    pub fn listeners(&self) -> impl Iterator<Item = &ListenerHandle<C>> {
        self.registered().map(|(_, listener)| listener)
    }

    fn registered(&self) -> impl Iterator<Item = (ListenerId, &ListenerHandle<C>)> {
        self.order
            .iter()
            .filter_map(|id| self.listeners.get(id).map(|listener| (*id, listener)))
    }

    fn issue_id(&mut self) -> ListenerId {
        loop {
            self.last_id = self.last_id.wrapping_add(1);
            let candidate = ListenerId(self.last_id);
            if !self.listeners.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

impl<C> Default for EventDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventDispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .field("last_id", &self.last_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventListener;

    /// Test context recording which listeners ran.
    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
    }

    fn recording(tag: &'static str) -> ListenerHandle<Log> {
        EventListener::handle(tag, move |call: &mut Invocation<'_, Log>| {
            call.context().calls.push(tag);
            Ok(())
        })
    }

    fn failing(tag: &'static str) -> ListenerHandle<Log> {
        EventListener::handle(tag, move |call: &mut Invocation<'_, Log>| {
            call.context().calls.push(tag);
            Err(EventError::rejected(tag, "boom"))
        })
    }

    #[test]
    fn add_then_remove_restores_state() {
        let mut dispatcher = EventDispatcher::new();
        let listener = recording("a");
        let before = dispatcher.len();

        assert!(dispatcher.add(&listener));
        assert!(listener.id().is_some());
        assert!(dispatcher.remove(&listener));

        assert_eq!(listener.id(), None);
        assert_eq!(dispatcher.len(), before);
        assert!(!dispatcher.has_listener());
    }

    #[test]
    fn double_add_is_rejected() {
        let mut dispatcher = EventDispatcher::new();
        let listener = recording("a");

        assert!(dispatcher.add(&listener));
        assert!(!dispatcher.add(&listener));
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn double_remove_fails_cleanly() {
        let mut dispatcher = EventDispatcher::new();
        let listener = recording("a");
        dispatcher.add(&listener);

        assert!(dispatcher.remove(&listener));
        assert!(!dispatcher.remove(&listener));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn listener_belongs_to_one_dispatcher() {
        let mut first = EventDispatcher::new();
        let mut second = EventDispatcher::new();
        let listener = recording("a");
        let other = recording("b");

        assert!(first.add(&listener));
        assert!(!second.add(&listener));

        // Same numeric id in the second dispatcher must not be evicted.
        assert!(second.add(&other));
        assert_eq!(listener.id(), other.id());
        assert!(!second.remove(&listener));
        assert!(second.contains(&other));
        assert!(first.contains(&listener));
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut dispatcher = EventDispatcher::new();
        let a = recording("a");
        let b = recording("b");
        let c = recording("c");
        dispatcher.add(&a);
        dispatcher.add(&b);
        dispatcher.remove(&a);
        dispatcher.add(&c);

        assert_eq!(b.id(), Some(ListenerId(2)));
        assert_eq!(c.id(), Some(ListenerId(3)));
    }

    #[test]
    fn issue_id_skips_ids_in_use_after_wrap() {
        let mut dispatcher = EventDispatcher::new();
        let a = recording("a");
        let b = recording("b");
        dispatcher.add(&a);
        dispatcher.last_id = u64::MAX;

        dispatcher.add(&b);
        // Counter wrapped to 0, which is free.
        assert_eq!(b.id(), Some(ListenerId(0)));

        let c = recording("c");
        dispatcher.add(&c);
        // 1 is held by `a`, so issuance probes to 2.
        assert_eq!(c.id(), Some(ListenerId(2)));
    }

    #[test]
    fn wrapped_ids_keep_registration_order() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.last_id = u64::MAX - 1;
        dispatcher.add(&recording("old"));
        dispatcher.add(&recording("new"));
        let late = recording("late");
        dispatcher.add(&late);
        assert_eq!(late.id(), Some(ListenerId(1)));

        let mut log = Log::default();
        dispatcher
            .trigger(&mut log, None, &EventArgs::new())
            .unwrap();

        assert_eq!(log.calls, vec!["old", "new", "late"]);
        let labels: Vec<_> = dispatcher.listeners().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["old", "new", "late"]);
    }

    #[test]
    fn remove_all_clears_registrations() {
        let mut dispatcher = EventDispatcher::new();
        let a = recording("a");
        let b = recording("b");
        dispatcher.add(&a);
        dispatcher.add(&b);

        dispatcher.remove_all();

        assert!(!dispatcher.has_listener());
        assert_eq!(a.id(), None);
        assert!(dispatcher.add(&a));
    }

    #[test]
    fn trigger_runs_in_registration_order() {
        let mut dispatcher = EventDispatcher::new();
        for tag in ["first", "second", "third"] {
            dispatcher.add(&recording(tag));
        }

        let mut log = Log::default();
        dispatcher
            .trigger(&mut log, None, &EventArgs::new())
            .unwrap();

        assert_eq!(log.calls, vec!["first", "second", "third"]);
    }

    #[test]
    fn trigger_stops_at_first_failure() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add(&recording("first"));
        dispatcher.add(&failing("second"));
        dispatcher.add(&recording("third"));

        let mut log = Log::default();
        let err = dispatcher
            .trigger(&mut log, None, &EventArgs::new())
            .unwrap_err();

        assert_eq!(err, EventError::rejected("second", "boom"));
        assert_eq!(log.calls, vec!["first", "second"]);
    }

    #[test]
    fn trigger_passes_sender_and_args() {
        let mut dispatcher = EventDispatcher::new();
        let seen: ListenerHandle<Option<(Option<ObjectId>, String)>> =
            EventListener::handle("inspect", |call| {
                let sender = call.sender();
                let value = call.args().param("key").unwrap_or_default().to_owned();
                *call.context() = Some((sender, value));
                Ok(())
            });
        dispatcher.add(&seen);

        let mut out = None;
        let args = EventArgs::new().with_param("key", "value");
        dispatcher.trigger(&mut out, Some(ObjectId(7)), &args).unwrap();

        assert_eq!(out, Some((Some(ObjectId(7)), "value".to_owned())));
    }

    #[test]
    fn chained_listeners_are_returned_in_request_order() {
        let mut dispatcher = EventDispatcher::new();
        let chainer = EventListener::handle("chainer", |call: &mut Invocation<'_, Log>| {
            call.chain(recording("next-a"));
            call.chain(recording("next-b"));
            Ok(())
        });
        dispatcher.add(&chainer);

        let mut log = Log::default();
        let chained = dispatcher
            .trigger(&mut log, None, &EventArgs::new())
            .unwrap();

        let labels: Vec<_> = chained.iter().map(|l| l.label().to_owned()).collect();
        assert_eq!(labels, vec!["next-a", "next-b"]);
        assert!(log.calls.is_empty());
    }
}
