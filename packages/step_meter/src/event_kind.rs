/// What happened at one recorded instant of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum EventKind {
    /// The session started.
    Start,

    /// The session ended.
    End,

    /// A step whose preceding interval counts towards the session total.
    Include,

    /// A step whose preceding interval is excluded from the session total.
    Exclude,

    /// A loop was opened.
    LoopStart {
        /// Declared iteration count. Meaningless for endless loops.
        count: usize,

        /// Whether the iteration count was unknown when the loop was opened.
        endless: bool,
    },

    /// A loop was closed.
    LoopEnd {
        /// Index of the event that opened the loop.
        start_index: usize,
    },
}
