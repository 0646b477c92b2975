//! Result table with completion signaling
//!
//! Workers publish completed fetches keyed by ticket; `ResolveFetch`
//! handlers take them out, blocking until the matching publish arrives.
//! The original polling design (membership probe plus exponential-backoff
//! sleep) is replaced with direct signaling: a [`Notify`] broadcast on
//! every publish, with waiters re-checking their own key.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::app::models::FetchOutcome;
use crate::app::ticket::Ticket;
use crate::errors::TableError;

#[derive(Debug, Default)]
struct TableState {
    completed: HashMap<Ticket, FetchOutcome>,
    waiting: HashSet<Ticket>,
    closed: bool,
}

/// Shared ticket-to-response table.
///
/// All operations are safe under arbitrary concurrent access. The mutex
/// guards only map mutation and is never held across an await point.
#[derive(Debug, Default)]
pub struct ResultTable {
    state: Mutex<TableState>,
    published: Notify,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a completed fetch and wake any waiters.
    ///
    /// A duplicate ticket indicates a minter bug and should never happen;
    /// the new value wins and the collision is logged.
    pub fn publish(&self, ticket: Ticket, outcome: FetchOutcome) {
        {
            let mut state = self.state();
            if state.completed.insert(ticket, outcome).is_some() {
                warn!("overwriting existing completed fetch for ticket {}", ticket);
            }
        }
        self.published.notify_waiters();
    }

    /// Remove and return the result for `ticket`, waiting until it is
    /// published if necessary.
    ///
    /// Each ticket can be taken exactly once. A concurrent second take of
    /// the same ticket fails fast with [`TableError::DuplicateTake`]; a
    /// waiter still blocked when the table closes gets
    /// [`TableError::Closed`].
    pub async fn take(&self, ticket: Ticket) -> Result<FetchOutcome, TableError> {
        let _waiting = WaitGuard::register(self, ticket)?;
        loop {
            let notified = self.published.notified();
            {
                let mut state = self.state();
                if let Some(outcome) = state.completed.remove(&ticket) {
                    return Ok(outcome);
                }
                if state.closed {
                    return Err(TableError::Closed);
                }
            }
            notified.await;
        }
    }

    /// Non-blocking membership probe: has `ticket` been published and not
    /// yet taken?
    pub fn is_ready(&self, ticket: Ticket) -> bool {
        self.state().completed.contains_key(&ticket)
    }

    /// Number of published results not yet taken.
    pub fn ready_len(&self) -> usize {
        self.state().completed.len()
    }

    /// Close the table, releasing every blocked waiter with an error.
    /// Idempotent; results already published but never taken are dropped.
    pub fn close(&self) {
        let uncollected = {
            let mut state = self.state();
            if state.closed {
                debug!("result table already closed");
                return;
            }
            state.closed = true;
            state.completed.len()
        };
        if uncollected > 0 {
            info!("closing result table with {} uncollected results", uncollected);
        }
        self.published.notify_waiters();
    }

    fn state(&self) -> std::sync::MutexGuard<'_, TableState> {
        self.state.lock().expect("result table lock poisoned")
    }
}

/// Marks a ticket as having an active waiter for the duration of a `take`.
///
/// Dropping the guard (normal return or a cancelled handler) releases the
/// slot, so an abandoned wait does not poison the ticket forever.
struct WaitGuard<'a> {
    table: &'a ResultTable,
    ticket: Ticket,
}

impl<'a> WaitGuard<'a> {
    fn register(table: &'a ResultTable, ticket: Ticket) -> Result<Self, TableError> {
        let mut state = table.state();
        if !state.waiting.insert(ticket) {
            return Err(TableError::DuplicateTake { ticket });
        }
        Ok(Self { table, ticket })
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.table.state().waiting.remove(&self.ticket);
    }
}
