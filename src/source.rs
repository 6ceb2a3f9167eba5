//! The completion-source state machine. Everything else in the crate is
//! either a producer driving one of these or a view observing one.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::task::Waker;

use crate::handle::FutureHandle;
use crate::Error;

/// Where a source is in its lifecycle. Once a source leaves `Pending` it
/// never moves again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Succeeded,
    /// Settled with a failure.
    Faulted,
}

/// What is parked in the continuation slot. A source holds at most one of
/// these at a time; `Task` may be replaced on every poll, `Callback` may not
/// be replaced at all.
enum Slot {
    Vacant,
    Callback(Box<dyn FnOnce() + Send>),
    Task(Waker),
    Fired,
}

struct Inner<T, E> {
    status: Status,
    outcome: Option<Result<T, E>>,
    slot: Slot,
}

/// The producer half of a completion slot.
///
/// A source starts `Pending` and is settled at most once with
/// [`try_resolve`](Self::try_resolve) or [`try_reject`](Self::try_reject);
/// the first settlement wins and everything after it is a no-op. Consumers
/// observe it through the [`FutureHandle`] returned by
/// [`handle`](Self::handle).
///
/// The source is cheap to clone; clones share the same slot, which is how
/// composite producers settle one slot from several callbacks.
///
/// # Examples
///
/// ```
/// use promise_slot::CompletionSource;
/// use futures::executor::block_on;
/// use std::thread;
/// let source = CompletionSource::<String, String>::new();
/// let waiter = source.handle().waiter();
/// let consumer = thread::spawn(move || block_on(async {
///     waiter.await
/// }));
/// source.try_resolve(String::from("🍓"));
/// assert_eq!(consumer.join().unwrap(), Ok(String::from("🍓")));
/// ```
pub struct CompletionSource<T, E> {
    inner: Arc<Mutex<Inner<T, E>>>,
}

impl<T, E> Clone for CompletionSource<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> CompletionSource<T, E> {
    /// Creates a pending source.
    pub fn new() -> Self {
        Self::with_inner(Inner {
            status: Status::Pending,
            outcome: None,
            slot: Slot::Vacant,
        })
    }

    /// A source born settled. The eager constructors use this so that no
    /// state transition happens after construction.
    pub(crate) fn settled(outcome: Result<T, E>) -> Self {
        let status = match outcome {
            Ok(_) => Status::Succeeded,
            Err(_) => Status::Faulted,
        };
        Self::with_inner(Inner {
            status,
            outcome: Some(outcome),
            slot: Slot::Vacant,
        })
    }

    fn with_inner(inner: Inner<T, E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// A cheap read-only view of this source for the consumer side.
    pub fn handle(&self) -> FutureHandle<T, E> {
        FutureHandle::new(self.clone())
    }

    /// Current status. No side effects.
    pub fn status(&self) -> Status {
        self.inner.lock().unwrap().status
    }

    /// Settles the source with `value`.
    ///
    /// Returns whether this call performed the transition. First settlement
    /// wins; on an already-settled source nothing changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_slot::{CompletionSource, Status};
    /// let source = CompletionSource::<i32, String>::new();
    /// assert!(source.try_resolve(1));
    /// assert!(!source.try_reject(String::from("late")));
    /// assert_eq!(source.status(), Status::Succeeded);
    /// ```
    pub fn try_resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settles the source with `err`. The error is stored as passed and
    /// handed back verbatim when the waiter unwraps it.
    ///
    /// Returns whether this call performed the transition, like
    /// [`try_resolve`](Self::try_resolve).
    pub fn try_reject(&self, err: E) -> bool {
        self.settle(Err(err))
    }

    fn settle(&self, outcome: Result<T, E>) -> bool {
        let fired = {
            let mut inner = self.inner.lock().unwrap();
            if inner.status != Status::Pending {
                return false;
            }
            inner.status = match outcome {
                Ok(_) => Status::Succeeded,
                Err(_) => Status::Faulted,
            };
            inner.outcome = Some(outcome);
            std::mem::replace(&mut inner.slot, Slot::Fired)
        };
        // The slot runs outside the lock so a continuation may look back at
        // the source that fired it.
        match fired {
            Slot::Callback(continuation) => continuation(),
            Slot::Task(waker) => waker.wake(),
            Slot::Vacant | Slot::Fired => {}
        }
        true
    }

    /// Stores `continuation` to run at settlement, or runs it here and now
    /// if the source has already settled. At most one continuation fits;
    /// a second registration on a pending source is reported.
    pub(crate) fn register(&self, continuation: Box<dyn FnOnce() + Send>) -> Result<(), Error> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.status == Status::Pending {
                return match inner.slot {
                    Slot::Vacant => {
                        inner.slot = Slot::Callback(continuation);
                        Ok(())
                    }
                    _ => Err(Error::ContinuationTaken),
                };
            }
        }
        // Already settled: run the continuation on the registering context
        // before returning.
        continuation();
        Ok(())
    }

    /// Poll step for the `Future` shim: yields the outcome once settled,
    /// otherwise parks `waker` in the slot. Executors may hand over a fresh
    /// waker on every poll, so a parked one is replaced, not kept.
    pub(crate) fn park(&self, waker: &Waker) -> Option<Result<T, E>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.status == Status::Pending {
            if matches!(inner.slot, Slot::Callback(_)) {
                panic!("cannot await a source that already has a registered continuation");
            }
            inner.slot = Slot::Task(waker.clone());
            None
        } else {
            match inner.outcome.take() {
                Some(outcome) => Some(outcome),
                None => panic!("polled a completion slot after its result was delivered"),
            }
        }
    }

    /// Moves the settled outcome out. Panics while pending (poll first) and
    /// on a second take.
    pub(crate) fn take_outcome(&self) -> Result<T, E> {
        let mut inner = self.inner.lock().unwrap();
        match inner.status {
            Status::Pending => {
                panic!("called `take` on a source that has not settled; check `is_ready` first")
            }
            Status::Succeeded | Status::Faulted => match inner.outcome.take() {
                Some(outcome) => outcome,
                None => panic!("completion slot result was already taken"),
            },
        }
    }

    /// Non-panicking form of [`take_outcome`](Self::take_outcome): `None`
    /// until the source settles (and again after the outcome has been
    /// taken).
    pub(crate) fn try_take_outcome(&self) -> Option<Result<T, E>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.status == Status::Pending {
            None
        } else {
            inner.outcome.take()
        }
    }

    /// A clone of the stored failure, if the source faulted and nobody has
    /// taken the outcome. The fan-in combinator reads child errors this way
    /// because children are shared, not owned.
    pub(crate) fn error(&self) -> Option<E>
    where
        E: Clone,
    {
        match &self.inner.lock().unwrap().outcome {
            Some(Err(err)) => Some(err.clone()),
            _ => None,
        }
    }
}

impl<T, E> Default for CompletionSource<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for CompletionSource<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSource")
            .field("status", &self.status())
            .finish()
    }
}
