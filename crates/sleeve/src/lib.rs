// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "logs"), expect(rustdoc::broken_intra_doc_links))]

//! # Sleeve
//!
//! Wrap units of work with before/after logic while keeping their return type and error
//! behavior intact.
//!
//! An *action* is a zero-argument unit of work. Actions come in four shapes, formed by two
//! independent axes: whether they can fail (return a [`Result`]) and whether they suspend
//! (return a [`Future`]). A [`Wrapper`] runs cross-cutting logic such as logging or timing
//! around an action and hands the action's own output back to the caller, untouched.
//!
//! ## Quick Start
//!
//! The split form runs `before`, then the action, then `after` with whatever `before` produced:
//!
//! ```
//! use std::time::Instant;
//!
//! use sleeve::Wrapper;
//!
//! let timed = Wrapper::before_after(Instant::now, |started: Instant| {
//!     println!("took {:?}", started.elapsed());
//! });
//!
//! let answer = timed.call(|| 6 * 7);
//! let greeting = timed.call(|| "hello".to_string());
//!
//! assert_eq!(answer, 42);
//! assert_eq!(greeting, "hello");
//! ```
//!
//! The same split wrapper accepts every action shape. If a fallible action fails, `after` is
//! skipped and the error is returned as-is:
//!
//! ```
//! # use sleeve::Wrapper;
//! let wrapper = Wrapper::before_after(|| (), |()| println!("done"));
//!
//! let result: Result<u8, String> = wrapper.try_call(|| Err("boom".to_string()));
//! assert_eq!(result, Err("boom".to_string()));
//! ```
//!
//! ## Unified Logic
//!
//! When the logic needs to control when the action runs, implement one of the logic
//! traits. Each trait has a single method that is generic over the action's output type, so one
//! logic value serves every call site:
//!
//! ```
//! use sleeve::{Around, Wrapper};
//!
//! struct Announce;
//!
//! impl Around for Announce {
//!     fn around<T, A>(&self, action: A) -> T
//!     where
//!         A: FnOnce() -> T,
//!     {
//!         println!("start");
//!         let output = action();
//!         println!("end");
//!         output
//!     }
//! }
//!
//! let wrapper = Wrapper::new(Announce);
//! assert_eq!(wrapper.call(|| 1), 1);
//! assert_eq!(wrapper.call(|| "one"), "one");
//! ```
//!
//! Closures cannot be generic over a type, so closure-based unified logic receives an opaque
//! handle instead of the action itself. Running the handle yields a token that the closure
//! must return, which proves the action ran and lets the wrapper hand back the typed output:
//!
//! ```
//! use sleeve::Wrapper;
//!
//! let wrapper = Wrapper::around(|proceed| {
//!     println!("start");
//!     let completed = proceed.run();
//!     println!("end");
//!     completed
//! });
//!
//! assert_eq!(wrapper.call(|| vec![1, 2, 3]), vec![1, 2, 3]);
//! ```
//!
//! Generic logic cannot build a value of the caller's output or error type, so it always runs
//! the action. Logic that has to decide whether the action runs at all implements [`Gate`] or
//! [`AsyncGate`]. A gate declines by returning its own rejection, which the caller receives
//! converted into the action's error type:
//!
//! ```
//! use sleeve::Wrapper;
//!
//! let disabled = Wrapper::admit(|| Err("feature disabled"));
//!
//! let result: Result<u32, String> = disabled.call_gated(|| Ok(1));
//! assert_eq!(result, Err("feature disabled".to_string()));
//! ```
//!
//! ## Configurations
//!
//! | Constructor | Logic | Call with |
//! |-------------|-------|-----------|
//! | [`Wrapper::new`] | any type implementing the logic traits | whatever the logic implements |
//! | [`Wrapper::around`] | closure over a [`Proceed`] handle | [`call`][Wrapper::call] |
//! | [`Wrapper::try_around`] | closure over a [`TryProceed`] handle | [`try_call`][Wrapper::try_call] |
//! | [`Wrapper::around_async`] | closure over an [`AsyncProceed`] handle | [`call_async`][Wrapper::call_async] |
//! | [`Wrapper::try_around_async`] | closure over an [`AsyncTryProceed`] handle | [`try_call_async`][Wrapper::try_call_async] |
//! | [`Wrapper::before_after`], [`Wrapper::before`], [`Wrapper::after`] | [`Split`] | all four |
//! | [`Wrapper::guarded`] | [`Guarded`] | all four |
//! | [`Wrapper::admit`] | [`Admit`] | [`call_gated`][Wrapper::call_gated], [`call_gated_async`][Wrapper::call_gated_async] |
//!
//! ## Ordering and Failures
//!
//! Before-logic always completes before the action starts and after-logic only starts once the
//! action has finished. Nothing runs concurrently. Failures are the action's own: the wrapper
//! never transforms or swallows them. The only errors a wrapper produces itself are gate
//! rejections, and only callers of a gated wrapper can receive them. In the split form, a failed action skips the after-logic.
//! Use [`Wrapper::guarded`] when release logic must run no matter how the action ends.
//!
//! ## Thread Safety
//!
//! All logic is [`Send`] and [`Sync`], and the futures returned by the async call methods are
//! [`Send`], so a single wrapper can be shared between tasks and threads. Wrappers never
//! synchronize state captured by the logic; that remains the caller's responsibility.
//!
//! ## Features
//!
//! - **`logs`**: Enables the [`Logged`] logic and debug events emitted by the split form.

mod erased;
pub use erased::{
    AsyncAroundFn, AsyncProceed, AsyncTryAroundFn, AsyncTryProceed, AroundFn, BoxFuture, Completed, Failed, Proceed, TryAroundFn,
    TryProceed,
};

mod gate;
pub use gate::{Admit, AsyncGate, Gate};

mod guarded;
pub use guarded::Guarded;

mod logic;
pub use logic::{AsyncAround, AsyncTryAround, Around, TryAround};

#[cfg(any(feature = "logs", test))]
mod logged;
#[cfg(any(feature = "logs", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "logs")))]
pub use logged::Logged;

pub mod prelude;

mod split;
pub use split::Split;

mod timed;
pub use timed::Timed;

mod wrapper;
pub use wrapper::Wrapper;
