//! Consumer-side views over a completion source: the cloneable
//! [`FutureHandle`] and the [`Waiter`] it hands out.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::source::{CompletionSource, Status};
use crate::Error;

/// A lightweight, cloneable reference to one completion source. It carries
/// no state of its own; every accessor forwards to the source.
pub struct FutureHandle<T, E> {
    source: CompletionSource<T, E>,
}

impl<T, E> Clone for FutureHandle<T, E> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T, E> FutureHandle<T, E> {
    pub(crate) fn new(source: CompletionSource<T, E>) -> Self {
        Self { source }
    }

    /// Current status of the underlying source.
    pub fn status(&self) -> Status {
        self.source.status()
    }

    /// An accessor for observing the source: poll it, attach a continuation,
    /// or unwrap the outcome.
    pub fn waiter(&self) -> Waiter<T, E> {
        Waiter {
            source: self.source.clone(),
        }
    }

    pub(crate) fn error(&self) -> Option<E>
    where
        E: Clone,
    {
        self.source.error()
    }
}

impl<T, E> fmt::Debug for FutureHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureHandle")
            .field("status", &self.status())
            .finish()
    }
}

/// The consumer triad over one source: [`is_ready`](Self::is_ready),
/// [`on_ready`](Self::on_ready), [`take`](Self::take). A waiter is also a
/// [`Future`], so `waiter.await` yields the settled `Result<T, E>` directly.
pub struct Waiter<T, E> {
    source: CompletionSource<T, E>,
}

impl<T, E> Waiter<T, E> {
    /// Whether the source has settled, either way.
    pub fn is_ready(&self) -> bool {
        self.source.status() != Status::Pending
    }

    /// Registers `continuation` to run exactly once, at settlement. If the
    /// source has already settled, it runs synchronously on the calling
    /// context before `on_ready` returns.
    ///
    /// At most one continuation may be attached to a pending source;
    /// a second attempt returns [`Error::ContinuationTaken`].
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_slot::CompletionSource;
    /// use std::sync::mpsc::channel;
    /// let source = CompletionSource::<i32, ()>::new();
    /// let (tx, rx) = channel();
    /// source
    ///     .handle()
    ///     .waiter()
    ///     .on_ready(move || tx.send("settled").unwrap())
    ///     .unwrap();
    /// source.try_resolve(5);
    /// assert_eq!(rx.recv(), Ok("settled"));
    /// ```
    pub fn on_ready(&self, continuation: impl FnOnce() + Send + 'static) -> Result<(), Error> {
        self.source.register(Box::new(continuation))
    }

    /// Unwraps the settled outcome: the stored value, or the stored failure
    /// exactly as the producer reported it, ready to propagate with `?`.
    ///
    /// # Panics
    ///
    /// Panics if the source is still pending (poll [`is_ready`](Self::is_ready)
    /// first) or if the outcome was already taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_slot::failed;
    /// let handle = failed::<(), String>(String::from("💥"));
    /// assert_eq!(handle.waiter().take(), Err(String::from("💥")));
    /// ```
    pub fn take(&self) -> Result<T, E> {
        self.source.take_outcome()
    }

    /// Non-panicking poll-then-unwrap: `None` while the source is pending.
    pub fn try_take(&self) -> Option<Result<T, E>> {
        self.source.try_take_outcome()
    }
}

/// The bridge onto the host suspension machinery. The first poll parks the
/// task's waker in the continuation slot, settlement wakes it, and the next
/// poll delivers the outcome.
impl<T, E> Future for Waiter<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.source.park(cx.waker()) {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}

impl<T, E> fmt::Debug for Waiter<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("ready", &self.is_ready())
            .finish()
    }
}
