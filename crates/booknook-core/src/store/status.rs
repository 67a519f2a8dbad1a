// ── Busy counter and error slot ──

use tokio::sync::watch;

use crate::error::Failure;

/// In-flight and last-failure status shared by every manager.
///
/// The busy flag is a counter so overlapping calls keep it raised until
/// the last one settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    in_flight: u32,
    error: Option<Failure>,
}

impl Status {
    pub fn busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub(crate) fn set_error(&mut self, failure: Option<Failure>) {
        self.error = failure;
    }
}

/// State types that embed a [`Status`].
pub(crate) trait HasStatus {
    fn status(&self) -> &Status;
    fn status_mut(&mut self) -> &mut Status;
}

/// Raises the busy counter on creation and lowers it on drop, so the
/// flag clears on success, failure, and cancellation alike.
pub(crate) struct BusyGuard<'a, S: HasStatus> {
    tx: &'a watch::Sender<S>,
}

impl<'a, S: HasStatus> BusyGuard<'a, S> {
    pub(crate) fn new(tx: &'a watch::Sender<S>) -> Self {
        tx.send_modify(|s| s.status_mut().in_flight += 1);
        Self { tx }
    }
}

impl<S: HasStatus> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.tx.send_modify(|s| {
            let status = s.status_mut();
            status.in_flight = status.in_flight.saturating_sub(1);
        });
    }
}
