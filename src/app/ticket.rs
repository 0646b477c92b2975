//! Ticket minting for pending fetches
//!
//! Every URL accepted by `RequestFetch` is assigned a ticket before the
//! fetch starts. Tickets are strictly monotonic and unique for the lifetime
//! of the process; 64 bits never wrap in any realistic deployment.

use std::sync::atomic::{AtomicU64, Ordering};

/// Server-generated handle identifying a pending fetch.
///
/// Monotonic but not cryptographically random; tickets are plain values
/// and may be copied freely.
pub type Ticket = u64;

/// Monotonic ticket source shared by all `RequestFetch` handlers.
///
/// The counter starts at 0 and `mint` pre-increments, so the first ticket
/// handed out is 1 and a ticket of 0 never occurs on the wire.
#[derive(Debug, Default)]
pub struct TicketMinter {
    previous: AtomicU64,
}

impl TicketMinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next ticket. Safe for arbitrary concurrent callers.
    pub fn mint(&self) -> Ticket {
        self.previous.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently minted ticket, or 0 if none were minted yet.
    pub fn last(&self) -> Ticket {
        self.previous.load(Ordering::Relaxed)
    }
}
