// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Change notification debouncing for full-document rescans.
//!
//! Every change notification restarts a single quiet-interval timer. Only
//! when the timer runs out without another notification does a scan happen,
//! and it reads whatever text is current at that moment.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

/// Delay between the last change and the rescan. Tuned on tables of 65k+ lines.
pub const QUIET_INTERVAL: Duration = Duration::from_millis(300);

/// The single outstanding timer.
#[derive(Debug)]
struct PendingScan {
    deadline: Instant,
    /// Fires once at `deadline`. Dropping it cancels the timer.
    timer: Receiver<Instant>,
}

/// Single-slot cancellable timer.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<PendingScan>,
    idle: Receiver<Instant>,
    notifications: u64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(QUIET_INTERVAL)
    }
}

impl Debouncer {
    /// Creates a debouncer with the given quiet interval.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            idle: crossbeam_channel::never(),
            notifications: 0,
        }
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Signals that the input may have changed.
    ///
    /// Cancels any pending timer and starts a new one. Returns the new deadline.
    pub fn notify_change(&mut self, now: Instant) -> Instant {
        if self.pending.take().is_some() {
            tracing::trace!("pending rescan superseded");
        }

        let deadline = now + self.quiet;
        self.pending = Some(PendingScan {
            deadline,
            timer: crossbeam_channel::at(deadline),
        });
        self.notifications += 1;
        deadline
    }

    /// Drops the pending timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending timer.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Receiver that yields once when the pending timer runs out.
    ///
    /// With nothing pending this never yields, so it can sit in a `select!`
    /// unconditionally.
    pub fn timer(&self) -> &Receiver<Instant> {
        self.pending
            .as_ref()
            .map_or(&self.idle, |pending| &pending.timer)
    }

    /// Clears the slot and returns true if the pending timer is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Number of notifications received since creation.
    pub fn notifications(&self) -> u64 {
        self.notifications
    }
}
