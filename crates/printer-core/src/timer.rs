//! Virtual-time timer queue.
//!
//! Every controller of a widget schedules its delayed work here instead of
//! owning browser timers. The host advances the clock; tests fast-forward it.

use std::collections::BTreeMap;

use crate::menu::ActionPath;
use crate::sequencer::AnimationPhase;

/// Milliseconds on the scheduler's clock.
pub type Millis = u64;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    deadline: Millis,
    seq: u64,
}

impl TimerId {
    /// Returns the virtual time at which this timer fires.
    pub fn deadline(&self) -> Millis {
        self.deadline
    }
}

/// Every timer family a widget owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The dwell time of `from` has elapsed.
    PhaseElapsed { from: AnimationPhase },
    /// Eyes should close for a blink.
    BlinkStart,
    /// Eyes should reopen after a blink.
    BlinkEnd,
    /// The mouth transition has settled and can be measured.
    MouthSettled,
    /// The post-drag click suppression window is over.
    ClickGraceExpired,
    /// The "not implemented" tip for an action should disappear.
    ActionTipExpired(ActionPath),
}

/// Ordered timer queue with a virtual clock.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: Millis,
    next_seq: u64,
    pending: BTreeMap<TimerId, E>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedules `event` to fire `delay` ms from now.
    pub fn schedule(&mut self, delay: Millis, event: E) -> TimerId {
        let id = TimerId {
            deadline: self.now.saturating_add(delay),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(id, event);
        id
    }

    /// Cancels a pending timer. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Returns true if the timer is still queued.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.keys().next().map(TimerId::deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes the earliest timer due at or before `until`, moving the clock
    /// to its deadline. Handlers may schedule follow-ups that are themselves
    /// due before `until`; they are returned by later calls.
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, E)> {
        let id = *self.pending.keys().next()?;
        if id.deadline > until {
            return None;
        }
        let event = self.pending.remove(&id)?;
        self.now = self.now.max(id.deadline);
        Some((id.deadline, event))
    }

    /// Moves the clock forward. Never moves it backwards.
    pub fn advance_to(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            tracing::trace!(count = self.pending.len(), "clearing pending timers");
        }
        self.pending.clear();
    }
}
