//! A single-assignment completion slot.
//!
//! A [`CompletionSource`] is settled exactly once, with a value or with a
//! failure, and observed from the other side through a [`FutureHandle`]:
//! poll it, register a continuation on it, or `.await` it. Four producers
//! are built in: the eager constructors ([`ready`], [`ready_with`],
//! [`failed`]), the timer-driven [`delay`], the polling [`wait_until`], and
//! the fan-in [`join_all`].
//!
//! # Examples
//!
//! ```
//! use promise_slot::CompletionSource;
//! use futures::executor::block_on;
//! use std::thread;
//! let source = CompletionSource::<String, String>::new();
//! let waiter = source.handle().waiter();
//! let consumer = thread::spawn(move || block_on(async {
//!     waiter.await
//! }));
//! source.try_resolve(String::from("🍓"));
//! assert_eq!(consumer.join().unwrap(), Ok(String::from("🍓")));
//! ```

use thiserror::Error;

pub mod delay;
pub mod eager;
pub mod executor;
pub mod handle;
pub mod join;
pub mod source;
pub mod wait;

pub use crate::delay::{delay, delay_on};
pub use crate::eager::{failed, ready, ready_with};
pub use crate::executor::{Executor, Job, WorkerExecutor};
pub use crate::handle::{FutureHandle, Waiter};
pub use crate::join::join_all;
pub use crate::source::{CompletionSource, Status};
pub use crate::wait::wait_until;

/// Contract violations the type system cannot rule out on its own.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A continuation is already registered on this source. At most one
    /// waiter may attach to a pending source; a second attempt is reported,
    /// never silently swapped in.
    #[error("a continuation is already registered on this source")]
    ContinuationTaken,
}
