//! Pre-settled sources. Nothing here arms a timer or posts work: the source
//! is born settled, so `on_ready` on these always takes the synchronous fast
//! path.

use crate::handle::FutureHandle;
use crate::source::CompletionSource;

/// An already-succeeded source with no value.
pub fn ready<E>() -> FutureHandle<(), E> {
    CompletionSource::settled(Ok(())).handle()
}

/// An already-succeeded source yielding `value`.
///
/// # Examples
///
/// ```
/// use promise_slot::ready_with;
/// let handle = ready_with::<_, ()>(7);
/// assert_eq!(handle.waiter().take(), Ok(7));
/// ```
pub fn ready_with<T, E>(value: T) -> FutureHandle<T, E> {
    CompletionSource::settled(Ok(value)).handle()
}

/// An already-failed source carrying `err`. The failure is handed back
/// verbatim when a waiter unwraps it.
///
/// # Examples
///
/// ```
/// use promise_slot::failed;
/// let handle = failed::<(), String>(String::from("💥"));
/// assert_eq!(handle.waiter().take(), Err(String::from("💥")));
/// ```
pub fn failed<T, E>(err: E) -> FutureHandle<T, E> {
    CompletionSource::settled(Err(err)).handle()
}
