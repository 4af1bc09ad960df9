use foldhash::{HashMap, HashMapExt};

use crate::Event;

/// Append-only sequence of the events of one session, plus their optional log messages.
///
/// The stream preallocates its capacity. A fixed stream treats running out of space as a
/// caller bug and panics; a growable stream reallocates instead.
#[derive(Debug)]
pub struct EventStream {
    events: Vec<Event>,
    logs: HashMap<usize, String>,
    capacity: usize,
    growable: bool,
}

impl EventStream {
    pub(crate) fn with_capacity(capacity: usize, growable: bool) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            logs: HashMap::new(),
            capacity,
            growable,
        }
    }

    /// Appends an event and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the stream is fixed-size and already full.
    pub(crate) fn push(&mut self, event: Event) -> usize {
        assert!(
            self.growable || self.events.len() < self.capacity,
            "event stream is full ({} events); raise Config::event_capacity or enable Config::growable_event_stream",
            self.capacity
        );

        self.events.push(event);

        self.events
            .len()
            .checked_sub(1)
            .expect("we just pushed an event")
    }

    /// Attaches a log message to the most recently appended event,
    /// replacing any message it already had.
    ///
    /// # Panics
    ///
    /// Panics if the stream is empty.
    pub(crate) fn attach_log(&mut self, message: String) {
        let index = self
            .events
            .len()
            .checked_sub(1)
            .expect("a log message needs a recorded event to attach to");

        self.logs.insert(index, message);
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Preallocated capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The event at `index`, if recorded.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// The most recently recorded event.
    #[must_use]
    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// The log message attached to the event at `index`, if any.
    #[must_use]
    pub fn log(&self, index: usize) -> Option<&str> {
        self.logs.get(&index).map(String::as_str)
    }

    /// Iterates over the recorded events in order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}
