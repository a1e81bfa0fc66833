/// Sequence generator
///
/// Produces the next value of a named, persisted, strictly increasing
/// counter. The value lives in the store, never in process memory, so every
/// service instance sharing the store sees one sequence.
///
/// The generator is not transactional with the record that consumes the
/// value: a failed insert after a successful `next` leaves a gap, which is
/// allowed. What is not allowed is writing a record without a value, so a
/// failing `next` must abort the caller before it writes anything.

use std::sync::Arc;

use tracing::debug;

use crate::error::{RepoError, RepoResult};
use crate::store::SequenceStore;

/// Sequence that numbers notes
pub const TICKET_SEQUENCE: &str = "ticketNums";

/// First ticket number ever handed out
pub const TICKET_START: i64 = 500;

#[derive(Clone)]
pub struct SequenceGenerator {
    store: Arc<dyn SequenceStore>,
    start: i64,
}

impl SequenceGenerator {
    /// Creates a generator whose sequences begin at `start`
    pub fn new(store: Arc<dyn SequenceStore>, start: i64) -> Self {
        Self { store, start }
    }

    /// Atomically advances the named sequence and returns the new value
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `name` is empty
    /// - `StoreUnavailable` / `Timeout` if the store fails
    pub async fn next(&self, name: &str) -> RepoResult<i64> {
        if name.is_empty() {
            return Err(RepoError::InvalidInput(
                "Sequence name is required".to_string(),
            ));
        }

        let value = self.store.next_value(name, self.start).await?;
        debug!(sequence = name, value, "Advanced sequence");
        Ok(value)
    }
}
