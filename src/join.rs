//! Fan-in composition.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::handle::FutureHandle;
use crate::source::{CompletionSource, Status};
use crate::Error;

/// Joins `children` into one source that succeeds when every child has
/// succeeded, or fails with the first child failure.
///
/// An empty slice is vacuous success: the returned handle is already
/// settled. Children are observed, never owned: the join registers one
/// continuation on each at construction and otherwise leaves them alone, so
/// a failing child's error is propagated by clone and siblings keep running
/// to their own completion with no further effect on the join. A successful
/// join settles when the slowest child does, not after the sum of them.
///
/// Returns [`Error::ContinuationTaken`] if some child already has a waiter
/// attached; continuations already placed on earlier children stay put and
/// settle a join nobody observes.
///
/// # Examples
///
/// ```
/// use promise_slot::{delay, join_all, ready};
/// use futures::executor::block_on;
/// use std::time::Duration;
/// let children = [ready::<String>(), delay(Duration::from_millis(20))];
/// let joined = join_all(&children).unwrap();
/// assert_eq!(block_on(joined.waiter()), Ok(()));
/// ```
pub fn join_all<T, E>(children: &[FutureHandle<T, E>]) -> Result<FutureHandle<(), E>, Error>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
{
    let source = CompletionSource::new();
    if children.is_empty() {
        source.try_resolve(());
        return Ok(source.handle());
    }

    let total = children.len();
    let completed = Arc::new(AtomicUsize::new(0));
    for child in children {
        let watched = child.clone();
        let join = source.clone();
        let completed = Arc::clone(&completed);
        // A continuation only runs once its child has settled, so the status
        // read below is terminal.
        child.waiter().on_ready(move || {
            if watched.status() == Status::Faulted {
                if let Some(err) = watched.error() {
                    join.try_reject(err);
                }
            } else if completed.fetch_add(1, Ordering::AcqRel) + 1 == total {
                join.try_resolve(());
            }
        })?;
    }
    Ok(source.handle())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eager::{failed, ready};
    use crate::source::CompletionSource;

    #[test]
    fn an_empty_join_is_already_settled() {
        let joined = join_all::<(), String>(&[]).unwrap();
        assert_eq!(joined.status(), Status::Succeeded);
    }

    #[test]
    fn succeeds_only_after_every_child() {
        let sources: Vec<CompletionSource<i32, String>> =
            (0..3).map(|_| CompletionSource::new()).collect();
        let children: Vec<_> = sources.iter().map(|s| s.handle()).collect();
        let joined = join_all(&children).unwrap();

        sources[0].try_resolve(1);
        sources[2].try_resolve(3);
        assert_eq!(joined.status(), Status::Pending);
        sources[1].try_resolve(2);
        assert_eq!(joined.status(), Status::Succeeded);
    }

    #[test]
    fn the_first_failure_wins() {
        let sources: Vec<CompletionSource<(), String>> =
            (0..3).map(|_| CompletionSource::new()).collect();
        let children: Vec<_> = sources.iter().map(|s| s.handle()).collect();
        let joined = join_all(&children).unwrap();

        sources[1].try_reject(String::from("first"));
        assert_eq!(joined.status(), Status::Faulted);

        // Sibling outcomes arriving afterwards change nothing.
        sources[0].try_resolve(());
        sources[2].try_reject(String::from("second"));
        assert_eq!(joined.waiter().take(), Err(String::from("first")));
    }

    #[test]
    fn already_settled_children_join_synchronously() {
        let children = [ready::<String>(), ready::<String>()];
        let joined = join_all(&children).unwrap();
        assert_eq!(joined.status(), Status::Succeeded);
    }

    #[test]
    fn a_failing_child_needs_no_waiting_siblings() {
        let pending = CompletionSource::<(), String>::new();
        let children = [failed::<(), String>(String::from("early")), pending.handle()];
        let joined = join_all(&children).unwrap();
        assert_eq!(joined.status(), Status::Faulted);
        assert_eq!(joined.waiter().take(), Err(String::from("early")));
    }

    #[test]
    fn a_child_with_a_waiter_already_attached_is_reported() {
        let source = CompletionSource::<(), String>::new();
        let handle = source.handle();
        handle.waiter().on_ready(|| {}).unwrap();
        assert!(matches!(
            join_all(&[handle]),
            Err(Error::ContinuationTaken)
        ));
    }
}
