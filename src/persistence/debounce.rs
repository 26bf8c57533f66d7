//! Cancellable debounce timer
//!
//! `schedule` (re)starts the timer with a job; when the timer fires the job is
//! handed to its own task so a later `schedule` can never cancel a write that
//! has already been dispatched. Dispatched jobs run one after another in the
//! order they fired.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type JobSlot = Arc<Mutex<Option<Job>>>;

struct Pending {
    timer: JoinHandle<()>,
    job: JobSlot,
}

pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<Pending>>,
    in_flight: Arc<Mutex<Option<JoinHandle<()>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// Run `job` once the delay passes without another `schedule` call.
    /// Replaces (and cancels) any job still waiting on the timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let job: Job = Box::pin(job);
        let slot: JobSlot = Arc::new(Mutex::new(Some(job)));
        let delay = self.delay;
        let fired = slot.clone();
        let in_flight = self.in_flight.clone();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Slot stays locked until the job is registered as in flight, so
            // `flush` always finds it in one place or the other.
            let mut slot = lock(&fired);
            if let Some(job) = slot.take() {
                enqueue(&in_flight, job);
            }
        });

        let replaced = lock(&self.pending).replace(Pending { timer, job: slot });
        if let Some(replaced) = replaced {
            replaced.timer.abort();
            if lock(&replaced.job).take().is_some() {
                tracing::trace!("Debounced job superseded");
            }
        }
    }

    /// Drop the waiting job, if any. Jobs already dispatched keep running.
    /// Returns whether a job was dropped.
    pub fn cancel(&self) -> bool {
        let Some(pending) = lock(&self.pending).take() else {
            return false;
        };
        pending.timer.abort();
        let dropped = lock(&pending.job).take().is_some();
        dropped
    }

    /// Whether a job is waiting on the timer
    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .map(|p| lock(&p.job).is_some())
            .unwrap_or(false)
    }

    /// Fire the waiting job now, then wait for every dispatched job to finish.
    ///
    /// The waiting job joins the same queue the timer feeds, so anything that
    /// fires afterwards still runs after it.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        {
            // Held until the job is queued; no newer `schedule` can slip in between
            let mut pending = lock(&self.pending);
            let waiting = pending.take().and_then(|p| {
                p.timer.abort();
                let job = lock(&p.job).take();
                job
            });
            enqueue(
                &self.in_flight,
                Box::pin(async move {
                    if let Some(job) = waiting {
                        job.await;
                    }
                    let _ = done_tx.send(());
                }),
            );
        }
        let _ = done_rx.await;
    }
}

/// Chain `job` behind whatever is already in flight
fn enqueue(in_flight: &Mutex<Option<JoinHandle<()>>>, job: Job) {
    let mut queue = lock(in_flight);
    let previous = queue.take();
    *queue = Some(tokio::spawn(async move {
        if let Some(previous) = previous {
            let _ = previous.await;
        }
        job.await;
    }));
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}
