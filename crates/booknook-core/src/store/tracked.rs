// ── Sequenced collection cell ──
//
// One manager-owned value (a list, a detail record, a snapshot) plus the
// bookkeeping that keeps late responses from clobbering newer ones.

use std::sync::Arc;

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(pub(crate) u64);

/// A fetched value with per-collection ordering.
///
/// Every fetch takes a [`Ticket`] before it is sent; on arrival the value
/// is applied only if its ticket is newer than the last one applied.
/// Readers get cheap `Arc` clones of the current value.
#[derive(Debug)]
pub struct Tracked<T> {
    value: Arc<T>,
    issued: u64,
    applied: u64,
    loaded: bool,
    stale: bool,
}

impl<T> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            issued: self.issued,
            applied: self.applied,
            loaded: self.loaded,
            stale: self.stale,
        }
    }
}

impl<T: Default> Default for Tracked<T> {
    fn default() -> Self {
        Self {
            value: Arc::new(T::default()),
            issued: 0,
            applied: 0,
            loaded: false,
            stale: false,
        }
    }
}

impl<T> Tracked<T> {
    /// Current value (cheap `Arc` clone).
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    /// Whether any fetch has landed since creation or the last reset.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Set after a mutation the server has confirmed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn needs_fetch(&self) -> bool {
        !self.loaded || self.stale
    }

    pub(crate) fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Apply a fetched value. Returns `false` (and keeps the current
    /// value) when a newer fetch has already been applied.
    pub(crate) fn apply(&mut self, ticket: Ticket, value: Arc<T>) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.value = value;
        self.applied = ticket.0;
        self.loaded = true;
        self.stale = false;
        true
    }

    pub(crate) fn invalidate(&mut self) {
        self.stale = true;
    }
}

impl<T: Default> Tracked<T> {
    /// Drop the value. Fetches already in flight are discarded on arrival.
    pub(crate) fn reset(&mut self) {
        self.value = Arc::new(T::default());
        self.applied = self.issued;
        self.loaded = false;
        self.stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_response_is_discarded() {
        let mut cell: Tracked<Vec<&str>> = Tracked::default();
        let older = cell.issue();
        let newer = cell.issue();

        assert!(cell.apply(newer, Arc::new(vec!["Dune", "Foundation"])));
        assert!(!cell.apply(older, Arc::new(vec!["Dune"])));
        assert_eq!(cell.get().len(), 2);
    }

    #[test]
    fn apply_clears_staleness() {
        let mut cell: Tracked<Vec<u8>> = Tracked::default();
        assert!(cell.needs_fetch());

        let t = cell.issue();
        cell.apply(t, Arc::new(vec![1]));
        assert!(!cell.needs_fetch());

        cell.invalidate();
        assert!(cell.is_stale());
        assert!(cell.needs_fetch());

        let t = cell.issue();
        cell.apply(t, Arc::new(vec![1, 2]));
        assert!(!cell.is_stale());
    }

    #[test]
    fn reset_discards_in_flight_fetches() {
        let mut cell: Tracked<Vec<u8>> = Tracked::default();
        let t = cell.issue();
        cell.reset();
        assert!(!cell.apply(t, Arc::new(vec![9])));
        assert!(cell.get().is_empty());
        assert!(!cell.is_loaded());
    }
}
