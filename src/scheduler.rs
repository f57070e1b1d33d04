use crate::session::AdvanceTicket;
use std::time::{Duration, Instant};

/// Holds the one deferred advance waiting for its delay to pass.
/// Polled from the runtime tick, so it fires with tick granularity.
#[derive(Debug, Clone)]
pub struct Scheduler {
    delay: Duration,
    pending: Option<(Instant, AdvanceTicket)>,
}

impl Scheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Queue `ticket` to fire `delay` after `now`, replacing any earlier one
    pub fn schedule(&mut self, ticket: AdvanceTicket, now: Instant) {
        self.pending = Some((now + self.delay, ticket));
    }

    /// Hand out the ticket once its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<AdvanceTicket> {
        match self.pending {
            Some((due, ticket)) if now >= due => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
