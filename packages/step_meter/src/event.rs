use crate::EventKind;

/// One recorded instant of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Event {
    timestamp: u64,
    kind: EventKind,
}

impl Event {
    #[must_use]
    pub(crate) fn new(timestamp: u64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }

    /// Clock reading at which the event was recorded, in nanoseconds.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// What the event represents.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether the interval leading up to this event is excluded from the session total.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        matches!(self.kind, EventKind::Exclude)
    }
}
