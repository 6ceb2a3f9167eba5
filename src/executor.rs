//! Explicit execution contexts.
//!
//! Nothing in this crate reaches for an ambient scheduler. A producer that
//! must run consumer-visible work on a particular logical thread is handed
//! that thread explicitly, as an [`Executor`].

use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;

/// A unit of posted work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A logical thread that accepts posted work. Post-only: there is no way to
/// run something on an executor inline, which is what keeps marshaled
/// settlement off the timer thread.
pub trait Executor: Send + Sync {
    /// Enqueues `job` to run on this executor, after everything posted
    /// before it.
    fn post(&self, job: Job);
}

/// A single worker thread draining a FIFO queue.
///
/// Jobs run in post order, one at a time, on the one worker thread. The
/// thread exits once every handle to the executor is gone and the queue has
/// drained.
///
/// # Examples
///
/// ```
/// use promise_slot::{Executor, WorkerExecutor};
/// use std::sync::mpsc::channel;
/// let executor = WorkerExecutor::spawn();
/// let (tx, rx) = channel();
/// for n in 0..3 {
///     let tx = tx.clone();
///     executor.post(Box::new(move || tx.send(n).unwrap()));
/// }
/// assert_eq!(rx.iter().take(3).collect::<Vec<_>>(), vec![0, 1, 2]);
/// ```
pub struct WorkerExecutor {
    sender: Sender<Job>,
}

impl WorkerExecutor {
    /// Spawns the worker thread and returns the executor ready to share.
    pub fn spawn() -> Arc<Self> {
        let (sender, receiver) = channel::<Job>();
        thread::Builder::new()
            .name("promise-slot-worker".into())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
            })
            .expect("failed to spawn the executor worker thread");
        Arc::new(Self { sender })
    }
}

impl Executor for WorkerExecutor {
    fn post(&self, job: Job) {
        // The worker only exits after every sender is gone, so the queue is
        // there to take the job. A job that panics takes the worker down
        // with it.
        self.sender
            .send(job)
            .expect("the executor worker thread is gone");
    }
}
