//! Predicate-driven sources.

use std::sync::Arc;

use crate::executor::Executor;
use crate::handle::FutureHandle;
use crate::source::CompletionSource;

/// Resolves once `predicate` first returns `Ok(true)`; rejects with the
/// predicate's error if it ever returns one, after which the predicate is
/// never called again.
///
/// The first check is posted onto `executor` before this returns, and every
/// `Ok(false)` re-posts the next check onto the same executor, so the polling
/// cadence is whatever that executor's queue allows. There is no timer here,
/// and no settling before the predicate has actually been seen to hold.
///
/// # Examples
///
/// ```
/// use promise_slot::{wait_until, WorkerExecutor};
/// use futures::executor::block_on;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// let calls = Arc::new(AtomicUsize::new(0));
/// let seen = calls.clone();
/// let handle = wait_until::<String, _>(WorkerExecutor::spawn(), move || {
///     Ok(seen.fetch_add(1, Ordering::SeqCst) >= 2)
/// });
/// block_on(handle.waiter()).unwrap();
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// ```
pub fn wait_until<E, P>(executor: Arc<dyn Executor>, predicate: P) -> FutureHandle<(), E>
where
    E: Send + 'static,
    P: FnMut() -> Result<bool, E> + Send + 'static,
{
    let source = CompletionSource::new();
    let handle = source.handle();
    post_check(executor, source, predicate);
    handle
}

fn post_check<E, P>(executor: Arc<dyn Executor>, source: CompletionSource<(), E>, mut predicate: P)
where
    E: Send + 'static,
    P: FnMut() -> Result<bool, E> + Send + 'static,
{
    let next = executor.clone();
    executor.post(Box::new(move || match predicate() {
        Err(err) => {
            source.try_reject(err);
        }
        Ok(true) => {
            source.try_resolve(());
        }
        Ok(false) => post_check(next, source, predicate),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::WorkerExecutor;
    use crate::source::Status;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn resolves_once_the_predicate_holds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let handle = wait_until::<String, _>(WorkerExecutor::spawn(), move || {
            Ok(seen.fetch_add(1, Ordering::SeqCst) + 1 == 4)
        });
        assert_eq!(block_on(handle.waiter()), Ok(()));
        assert_eq!(handle.status(), Status::Succeeded);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn a_predicate_error_settles_and_stops_the_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let handle = wait_until::<String, _>(WorkerExecutor::spawn(), move || {
            if seen.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                Err(String::from("boom"))
            } else {
                Ok(false)
            }
        });
        assert_eq!(block_on(handle.waiter()), Err(String::from("boom")));
        assert_eq!(handle.status(), Status::Faulted);
        // Let any stray re-post (there must be none) get its chance.
        thread::sleep(Duration::from_millis(30));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
