use std::fmt;
use std::ops::Range;
use std::sync::mpsc::{channel, Receiver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    /// Visible rows `old` (before the change) were replaced by rows `new`
    Replace { old: Range<usize>, new: Range<usize> },
}

/// Handle returned by [`EventBus::subscribe`]; pass it back to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&GraphEvent)>;

/// Delivers graph events synchronously, in subscription order
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(Subscription, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GraphEvent) + 'static) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Subscribe with a channel instead of a callback
    pub fn subscribe_channel(&mut self) -> (Subscription, Receiver<GraphEvent>) {
        let (tx, rx) = channel();
        let subscription = self.subscribe(move |event| {
            // A dropped receiver just stops listening
            let _ = tx.send(event.clone());
        });
        (subscription, rx)
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &GraphEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}
