//! Fetch-race guard.
//!
//! Every fetch takes a ticket from a monotonic counter. When the
//! response arrives, it is applied only if its ticket is still the most
//! recently issued one; responses for superseded tickets are discarded
//! wholesale. Last-issued always wins, regardless of arrival order.

use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque fetch ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic ticket counter for one session.
#[derive(Debug, Default)]
pub struct TicketCounter {
    last_issued: AtomicU64,
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, superseding all earlier ones.
    pub fn issue(&self) -> Ticket {
        Ticket(self.last_issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the ticket is still the most recently issued one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.last_issued.load(Ordering::SeqCst) == ticket.0
    }
}
