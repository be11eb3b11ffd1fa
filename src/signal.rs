//! Refresh notification for the rendering layer.
//!
//! Every refresh first tells observers that state has been committed. When the
//! refresh decided the view must be redrawn, a `RenderRequested` is queued and
//! only delivered by the next `tick()`. Observers registered while handling
//! `StateCommitted` therefore always see the render request.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshSignal {
    /// Title, working set and snapshot have been updated.
    StateCommitted,
    /// The rendering layer should re-read state and redraw.
    RenderRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(RefreshSignal)>;

#[derive(Default)]
struct Inner {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    // nesting depth of deliver()
    delivering: usize,
    // ids dropped while their listener was out for delivery
    removed: Vec<SubscriptionId>,
    pending: VecDeque<RefreshSignal>,
}

/// Shared observer list plus the deferred queue. Cloning yields another
/// handle to the same list.
#[derive(Clone, Default)]
pub struct RefreshNotifier {
    inner: Rc<RefCell<Inner>>,
}

impl RefreshNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(RefreshSignal) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        if inner.listeners.len() == before && inner.delivering > 0 {
            inner.removed.push(id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of render requests waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub(crate) fn commit(&self) {
        self.deliver(RefreshSignal::StateCommitted);
    }

    pub(crate) fn request_render(&self) {
        self.inner.borrow_mut().pending.push_back(RefreshSignal::RenderRequested);
    }

    /// Delivers everything queued before this call. Signals queued by
    /// listeners during delivery wait for the following tick.
    pub fn tick(&self) -> usize {
        let due: Vec<RefreshSignal> = self.inner.borrow_mut().pending.drain(..).collect();
        for signal in &due {
            self.deliver(*signal);
        }
        due.len()
    }

    fn deliver(&self, signal: RefreshSignal) {
        // Listeners run without the borrow held so they may subscribe,
        // unsubscribe or queue work.
        let mut active = {
            let mut inner = self.inner.borrow_mut();
            inner.delivering += 1;
            std::mem::take(&mut inner.listeners)
        };
        for (_, listener) in active.iter_mut() {
            listener(signal);
        }

        let mut inner = self.inner.borrow_mut();
        inner.delivering -= 1;
        let removed = &inner.removed;
        active.retain(|(id, _)| !removed.contains(id));
        if inner.delivering == 0 {
            inner.removed.clear();
        }
        let added = std::mem::take(&mut inner.listeners);
        active.extend(added);
        inner.listeners = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(notifier: &RefreshNotifier) -> Rc<RefCell<Vec<RefreshSignal>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        notifier.subscribe(move |signal| sink.borrow_mut().push(signal));
        seen
    }

    #[test]
    fn test_render_request_waits_for_tick() {
        let notifier = RefreshNotifier::new();
        let seen = recorder(&notifier);

        notifier.commit();
        notifier.request_render();
        assert_eq!(*seen.borrow(), vec![RefreshSignal::StateCommitted]);
        assert_eq!(notifier.pending(), 1);

        assert_eq!(notifier.tick(), 1);
        assert_eq!(
            *seen.borrow(),
            vec![RefreshSignal::StateCommitted, RefreshSignal::RenderRequested]
        );
        assert_eq!(notifier.tick(), 0);
    }

    #[test]
    fn test_pending_requests_are_not_deduplicated() {
        let notifier = RefreshNotifier::new();
        let seen = recorder(&notifier);
        notifier.request_render();
        notifier.request_render();
        assert_eq!(notifier.tick(), 2);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_listener_registered_on_commit_sees_render() {
        let notifier = RefreshNotifier::new();
        let late = Rc::new(RefCell::new(Vec::new()));

        let handle = notifier.clone();
        let late_sink = late.clone();
        let registered = Rc::new(RefCell::new(false));
        notifier.subscribe(move |signal| {
            if signal == RefreshSignal::StateCommitted && !*registered.borrow() {
                *registered.borrow_mut() = true;
                let sink = late_sink.clone();
                handle.subscribe(move |signal| sink.borrow_mut().push(signal));
            }
        });

        notifier.commit();
        notifier.request_render();
        notifier.tick();

        assert_eq!(notifier.subscriber_count(), 2);
        assert_eq!(*late.borrow(), vec![RefreshSignal::RenderRequested]);
    }

    #[test]
    fn test_unsubscribe() {
        let notifier = RefreshNotifier::new();
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        let id = notifier.subscribe(move |_| *sink.borrow_mut() += 1);

        notifier.commit();
        notifier.unsubscribe(id);
        notifier.commit();
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_unknown_unsubscribe_outside_delivery_is_dropped() {
        let notifier = RefreshNotifier::new();
        let id = notifier.subscribe(|_| {});
        notifier.unsubscribe(id);
        notifier.unsubscribe(id);
        assert!(notifier.inner.borrow().removed.is_empty());

        let seen = recorder(&notifier);
        notifier.commit();
        assert_eq!(*seen.borrow(), vec![RefreshSignal::StateCommitted]);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let notifier = RefreshNotifier::new();
        let handle = notifier.clone();
        let own_id: Rc<RefCell<Option<SubscriptionId>>> = Rc::new(RefCell::new(None));
        let id_slot = own_id.clone();
        let id = notifier.subscribe(move |_| {
            if let Some(id) = *id_slot.borrow() {
                handle.unsubscribe(id);
            }
        });
        *own_id.borrow_mut() = Some(id);

        notifier.commit();
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
