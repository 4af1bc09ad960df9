use std::fmt::{self, Display};
use std::time::Duration;

use crate::units::millis;

/// Number of iterations an endless loop keeps before overwriting the oldest ones.
pub const DEFAULT_ENDLESS_CAPACITY: usize = 256;

/// Ring of iteration timestamps for one tracked loop.
///
/// A loop with a declared iteration count gets exactly that many slots. A loop with an
/// unknown (endless) iteration count gets [`DEFAULT_ENDLESS_CAPACITY`] slots. Once the ring
/// is full, new iterations overwrite the oldest ones. Every recorded iteration is counted.
#[derive(Debug)]
pub struct LoopBuffer {
    start: u64,
    endless: bool,

    // Physical slot the next iteration is written to.
    cursor: usize,

    // Number of valid slots, never more than the capacity.
    stored: usize,

    // All iterations ever recorded, including overwritten ones.
    total_captured: u64,

    timestamps: Box<[u64]>,
}

impl LoopBuffer {
    /// Creates a loop buffer for a loop that started at `start`.
    ///
    /// A negative `declared_size` means the iteration count is unknown and selects endless
    /// mode. A declared size of zero is legal and yields a buffer that never holds data.
    ///
    /// # Panics
    ///
    /// Panics if the declared size is larger than `u32::MAX`.
    #[must_use]
    pub fn new(start: u64, declared_size: i64) -> Self {
        let endless = declared_size < 0;

        let capacity = if endless {
            DEFAULT_ENDLESS_CAPACITY
        } else {
            declared_capacity(declared_size)
        };

        Self {
            start,
            endless,
            cursor: 0,
            stored: 0,
            total_captured: 0,
            timestamps: vec![0; capacity].into_boxed_slice(),
        }
    }

    /// Records one iteration that ended at `timestamp`.
    ///
    /// Returns the physical slot used, or `None` if the buffer has no slots at all,
    /// in which case the iteration is only counted.
    pub fn record(&mut self, timestamp: u64) -> Option<usize> {
        self.total_captured = self.total_captured.saturating_add(1);

        let capacity = self.capacity();
        let index = self.cursor;
        let slot = self.timestamps.get_mut(index)?;
        *slot = timestamp;

        let next = index.saturating_add(1);
        self.cursor = if next >= capacity { 0 } else { next };
        self.stored = self.stored.saturating_add(1).min(capacity);

        Some(index)
    }

    /// Timestamp at which the loop started.
    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Whether the loop was opened without a known iteration count.
    #[must_use]
    pub fn is_endless(&self) -> bool {
        self.endless
    }

    /// Number of slots in the ring.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.timestamps.len()
    }

    /// Number of iterations currently held in the ring.
    #[must_use]
    pub fn stored(&self) -> usize {
        self.stored
    }

    /// Number of iterations ever recorded, including ones that have been overwritten.
    #[must_use]
    pub fn total_captured(&self) -> u64 {
        self.total_captured
    }

    /// Replays the stored iteration timestamps, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.stored).map(move |logical| {
            let physical =
                chronological_to_physical(logical, self.cursor, self.stored, self.capacity());

            *self
                .timestamps
                .get(physical)
                .expect("mapped index is always within capacity")
        })
    }

    /// Calculates iteration statistics over the stored iterations.
    ///
    /// The first stored iteration is measured from the loop start, every later one from
    /// the iteration before it. The average drops the single fastest and slowest
    /// iteration to reduce the skew from one outlier. Loops with no stored iterations
    /// report zeros.
    #[must_use]
    pub fn summary(&self) -> LoopSummary {
        if self.stored == 0 {
            return LoopSummary {
                calls: self.total_captured,
                ..LoopSummary::default()
            };
        }

        let mut min = u64::MAX;
        let mut max = 0;
        let mut sum = 0_u64;
        let mut previous = self.start;

        for timestamp in self.iter() {
            let iteration = timestamp.saturating_sub(previous);

            min = min.min(iteration);
            max = max.max(iteration);
            sum = sum.saturating_add(iteration);

            previous = timestamp;
        }

        // Both extremes are trimmed. With one or two samples nothing is left and the
        // average is zero.
        let trimmed_count = (self.stored as u64).saturating_sub(2).max(1);
        let average = sum
            .saturating_sub(min)
            .saturating_sub(max)
            .checked_div(trimmed_count)
            .unwrap_or_default();

        LoopSummary {
            average: Duration::from_nanos(average),
            min: Duration::from_nanos(min),
            max: Duration::from_nanos(max),
            total: Duration::from_nanos(previous.saturating_sub(self.start)),
            calls: self.total_captured,
        }
    }
}

/// Converts a non-negative declared loop size to a slot count.
///
/// # Panics
///
/// Panics if the size is larger than `u32::MAX`.
pub(crate) fn declared_capacity(declared_size: i64) -> usize {
    let size = u32::try_from(declared_size).unwrap_or_else(|_| {
        panic!("declared loop size {declared_size} must be between 0 and {}", u32::MAX)
    });

    usize::try_from(size).expect("u32 always fits in usize on supported targets")
}

/// Maps the chronological position of a ring element to its physical slot.
///
/// While the ring has never wrapped (`stored < capacity`), elements sit in the order they
/// were written and the mapping is the identity. Once full, the oldest element sits at
/// `cursor` and later elements follow it, wrapping at the end of the ring.
///
/// # Examples
///
/// ```
/// use step_meter::chronological_to_physical;
///
/// // Not wrapped yet.
/// assert_eq!(chronological_to_physical(2, 3, 3, 5), 2);
///
/// // Full ring of 5 whose next write goes to slot 3: oldest element is in slot 3.
/// assert_eq!(chronological_to_physical(0, 3, 5, 5), 3);
/// assert_eq!(chronological_to_physical(2, 3, 5, 5), 0);
/// ```
///
/// # Panics
///
/// Panics if `stored` exceeds `capacity`, if `logical` is not less than `stored`, or if a
/// full ring is given a cursor outside the ring.
#[must_use]
pub fn chronological_to_physical(
    logical: usize,
    cursor: usize,
    stored: usize,
    capacity: usize,
) -> usize {
    assert!(
        stored <= capacity,
        "ring cannot store {stored} elements in {capacity} slots"
    );
    assert!(
        logical < stored,
        "chronological index {logical} is out of range for {stored} stored elements"
    );

    if stored < capacity {
        return logical;
    }

    assert!(
        cursor < capacity,
        "ring cursor {cursor} is outside {capacity} slots"
    );

    // Elements from the cursor to the end of the ring are older than those before it.
    match logical.checked_sub(capacity.saturating_sub(cursor)) {
        Some(wrapped) => wrapped,
        None => cursor.saturating_add(logical),
    }
}

/// Iteration statistics of one loop.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoopSummary {
    average: Duration,
    min: Duration,
    max: Duration,
    total: Duration,
    calls: u64,
}

impl LoopSummary {
    /// Mean iteration time with the fastest and slowest iteration left out.
    #[must_use]
    pub fn average(&self) -> Duration {
        self.average
    }

    /// Fastest stored iteration.
    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Slowest stored iteration.
    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Time from the loop start to the last stored iteration.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of iterations ever recorded.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Display for LoopSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "avg/min/max/sum: {:.3}/{:.3}/{:.3}/{:.3} ms - calls:{} / ",
            millis(self.average),
            millis(self.min),
            millis(self.max),
            millis(self.total),
            self.calls
        )
    }
}
