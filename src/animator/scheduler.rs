use std::collections::VecDeque;

/// Proof of a frame request, handed back to [`crate::Animator::on_frame`] when the frame fires.
///
/// Tickets carry the animator's cycle generation; a ticket from an earlier cycle is stale and its
/// frame does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTicket {
    /// Cycle generation at request time.
    pub generation: u64,
}

/// "Call me back before the next display refresh."
///
/// Hosts keep the ticket and, on their next refresh, call [`crate::Animator::on_frame`] with it
/// and a millisecond timestamp that never decreases within a process.
pub trait FrameScheduler {
    /// Schedule one callback for `ticket`.
    fn request_frame(&mut self, ticket: FrameTicket);
}

/// Queue-backed scheduler for headless hosts and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<FrameTicket>,
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request.
    pub fn next_ticket(&mut self) -> Option<FrameTicket> {
        self.pending.pop_front()
    }

    /// Number of requests not yet delivered.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Total requests ever made.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Forget every outstanding request.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, ticket: FrameTicket) {
        self.requested = self.requested.saturating_add(1);
        self.pending.push_back(ticket);
    }
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for &mut T {
    fn request_frame(&mut self, ticket: FrameTicket) {
        (**self).request_frame(ticket)
    }
}

/// What a delivered frame did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The ticket belonged to an earlier cycle; nothing happened.
    Stale,
    /// A frame was drawn and the next one requested.
    Rendered,
    /// The cycle ended: the surface was cleared and no frame was requested.
    Finished,
}
