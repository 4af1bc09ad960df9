use std::fmt::{self, Display};
use std::num::NonZero;
use std::thread::{self, ThreadId};

use foldhash::{HashMap, HashMapExt};
use new_zealand::nz;

use crate::loop_buffer::declared_capacity;
use crate::{Event, EventKind, EventStream, LoopBuffer};

/// Identifies a session by its position on the session stack when it was started.
///
/// Identifiers are reused once sessions are popped, so they are only good for comparing
/// against the value returned by the matching `start()` call.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SessionId(usize);

impl SessionId {
    pub(crate) fn new(position: usize) -> Self {
        Self(position)
    }

    /// Stack position of the session when it was started.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request to record something in a session.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Record {
    End,
    Include,
    Exclude,
    LoopStart { declared: i64 },
    LoopEnd,
    Recap,
}

/// One start-to-end measurement run.
///
/// Owns the event stream of the run, one [`LoopBuffer`] per loop (keyed by the index of the
/// event that opened it) and the stack of loops that are still open.
#[derive(Debug)]
pub struct Measure {
    id: SessionId,
    thread_id: ThreadId,
    start: u64,
    events: EventStream,
    loops: HashMap<usize, LoopBuffer>,
    open_loops: Vec<usize>,
}

impl Measure {
    /// Creates a session and records its start event.
    pub(crate) fn new(id: SessionId, start: u64, event_capacity: usize, growable: bool) -> Self {
        // The start event always needs a slot, whatever the configured capacity.
        let capacity = NonZero::new(event_capacity).unwrap_or(nz!(1));

        let mut events = EventStream::with_capacity(capacity.get(), growable);
        events.push(Event::new(start, EventKind::Start));

        Self {
            id,
            thread_id: thread::current().id(),
            start,
            events,
            loops: HashMap::new(),
            open_loops: Vec::new(),
        }
    }

    /// Records one event and returns the stream position it is associated with.
    ///
    /// Iteration markers do not take a slot in the stream; they go to the innermost open
    /// loop (or nowhere, if no loop is open) and return the next free position.
    pub(crate) fn record(&mut self, timestamp: u64, record: Record) -> usize {
        match record {
            Record::LoopStart { declared } => self.open_loop(timestamp, declared),
            Record::LoopEnd => {
                // An unmatched loop end is tolerated and pointed at the session start.
                let start_index = self.open_loops.pop().unwrap_or_default();
                self.push(timestamp, EventKind::LoopEnd { start_index })
            }
            Record::Recap => {
                if let Some(buffer) = self
                    .open_loops
                    .last()
                    .and_then(|index| self.loops.get_mut(index))
                {
                    buffer.record(timestamp);
                }

                self.events.len()
            }
            Record::End => self.push(timestamp, EventKind::End),
            Record::Include => self.push(timestamp, EventKind::Include),
            Record::Exclude => self.push(timestamp, EventKind::Exclude),
        }
    }

    fn open_loop(&mut self, timestamp: u64, declared: i64) -> usize {
        let endless = declared < 0;
        let count = if endless {
            0
        } else {
            declared_capacity(declared)
        };

        let index = self.push(timestamp, EventKind::LoopStart { count, endless });

        self.loops.insert(index, LoopBuffer::new(timestamp, declared));
        self.open_loops.push(index);

        index
    }

    fn push(&mut self, timestamp: u64, kind: EventKind) -> usize {
        self.events.push(Event::new(timestamp, kind))
    }

    pub(crate) fn attach_log(&mut self, message: String) {
        self.events.attach_log(message);
    }

    /// Identifier returned by the `start()` call that created this session.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Thread that created this session.
    #[must_use]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Timestamp of the start event.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Timestamp of the most recent event.
    #[must_use]
    pub fn last_timestamp(&self) -> u64 {
        self.events.last().map_or(self.start, Event::timestamp)
    }

    /// Nanoseconds from the start event to the most recent event.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.last_timestamp().saturating_sub(self.start)
    }

    /// The events recorded so far.
    #[must_use]
    pub fn events(&self) -> &EventStream {
        &self.events
    }

    /// The loop opened by the event at `start_index`, if that event opened one.
    #[must_use]
    pub fn loop_at(&self, start_index: usize) -> Option<&LoopBuffer> {
        self.loops.get(&start_index)
    }

    /// Number of loops opened but not yet closed.
    #[must_use]
    pub fn open_loop_count(&self) -> usize {
        self.open_loops.len()
    }

    /// Whether the session has recorded its end event.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.events
            .last()
            .is_some_and(|event| event.kind() == EventKind::End)
    }
}
