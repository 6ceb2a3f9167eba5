//! Timer-driven sources.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::executor::Executor;
use crate::handle::FutureHandle;
use crate::source::CompletionSource;

/// Resolves after `duration` has elapsed.
///
/// The settlement fires on a one-shot timer thread: no earlier than
/// `duration`, with whatever slack the OS sleep adds on top, and the thread
/// is gone once it has fired. Continuations therefore run on the timer
/// thread; callers that need them marshaled onto a particular context use
/// [`delay_on`].
///
/// # Examples
///
/// ```
/// use promise_slot::delay;
/// use futures::executor::block_on;
/// use std::time::{Duration, Instant};
/// let started = Instant::now();
/// let handle = delay::<()>(Duration::from_millis(20));
/// block_on(handle.waiter()).unwrap();
/// assert!(started.elapsed() >= Duration::from_millis(20));
/// ```
pub fn delay<E: Send + 'static>(duration: Duration) -> FutureHandle<(), E> {
    let source = CompletionSource::new();
    let handle = source.handle();
    fire_after(duration, move || {
        source.try_resolve(());
    });
    handle
}

/// Like [`delay`], but the settlement call is posted onto `executor` instead
/// of running inline on the timer thread, so consumer-visible effects happen
/// from that executor.
pub fn delay_on<E: Send + 'static>(
    executor: Arc<dyn Executor>,
    duration: Duration,
) -> FutureHandle<(), E> {
    let source = CompletionSource::new();
    let handle = source.handle();
    fire_after(duration, move || {
        executor.post(Box::new(move || {
            source.try_resolve(());
        }));
    });
    handle
}

/// One-shot timer: sleep, fire, exit.
fn fire_after(duration: Duration, fire: impl FnOnce() + Send + 'static) {
    thread::Builder::new()
        .name("promise-slot-timer".into())
        .spawn(move || {
            thread::sleep(duration);
            fire();
        })
        .expect("failed to spawn the timer thread");
}
