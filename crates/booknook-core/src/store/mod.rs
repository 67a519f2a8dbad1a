// ── Reactive manager state ──
//
// Each manager keeps its whole state in one `watch` channel so a
// subscriber sees collections, busy flag, and error slot change together.

mod status;
mod tracked;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{CoreError, Failure};

pub use status::Status;
pub use tracked::Tracked;

pub(crate) use status::{BusyGuard, HasStatus};

/// Single-writer, many-reader state container.
pub(crate) struct StateCell<S> {
    tx: watch::Sender<S>,
}

impl<S: HasStatus + Clone> StateCell<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub(crate) fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Mutate and notify subscribers. `send_modify` updates even with zero
    /// receivers.
    pub(crate) fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    pub(crate) fn clear_error(&self) {
        self.tx.send_if_modified(|s| {
            let had = s.status().error().is_some();
            s.status_mut().set_error(None);
            had
        });
    }

    /// Run one network operation with the busy counter raised.
    ///
    /// Success clears the error slot; failure fills it with the server's
    /// message or `fallback`. The error is returned so the caller can react
    /// to its kind.
    pub(crate) async fn track<T, F>(&self, fallback: &str, op: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        let _busy = BusyGuard::new(&self.tx);
        match op.await {
            Ok(value) => {
                self.clear_error();
                Ok(value)
            }
            Err(err) => {
                self.fail(&err, fallback);
                Err(err)
            }
        }
    }

    /// Record a failure that never reached the network (gating, validation).
    pub(crate) fn fail(&self, err: &CoreError, fallback: &str) {
        let failure = Failure::new(err, fallback);
        warn!(kind = %failure.kind, error = %err, "{fallback}");
        self.tx
            .send_modify(|s| s.status_mut().set_error(Some(failure)));
    }

    /// Fetch into one [`Tracked`] cell. The result is not applied if a
    /// newer fetch of the same cell landed first, but is still returned to
    /// the caller that asked for it.
    pub(crate) async fn refresh<T, Sel, F>(
        &self,
        fallback: &str,
        select: Sel,
        op: F,
    ) -> Result<Arc<T>, CoreError>
    where
        Sel: Fn(&mut S) -> &mut Tracked<T>,
        F: Future<Output = Result<T, CoreError>>,
    {
        let mut ticket = tracked::Ticket::default();
        self.tx.send_if_modified(|s| {
            ticket = select(s).issue();
            false
        });

        let value = Arc::new(self.track(fallback, op).await?);

        let applied = self
            .tx
            .send_if_modified(|s| select(s).apply(ticket, Arc::clone(&value)));
        if applied {
            debug!(seq = ticket.0, "applied fetch");
        } else {
            warn!(seq = ticket.0, "discarding stale response");
        }
        Ok(value)
    }
}
