// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Closure-based logic for the unified configurations.
//!
//! A closure cannot be generic over the action's output type, so it never sees the typed action.
//! Instead the wrapper erases the action into a *proceed handle* that stores the output in a
//! slot owned by the current call. Running the handle mints a token branded with a lifetime that
//! is unique to that call. The closure has to return such a token, and the only way to obtain
//! one is to run the handle it was given, so the slot is always filled once the closure returns
//! and the wrapper can move the typed output out of it without any runtime type check.

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::pin::Pin;

mod async_fn;
pub use async_fn::{AsyncAroundFn, AsyncProceed, AsyncTryAroundFn, AsyncTryProceed};

mod sync_fn;
pub use sync_fn::{AroundFn, Proceed, TryAroundFn, TryProceed};

/// An owned, boxed future that is [`Send`] and may borrow for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Invariant in `'id`, so a token from one call never coerces into a token of another.
type Brand<'id> = PhantomData<fn(&'id ()) -> &'id ()>;

/// Proof that the action of the current call ran to completion.
///
/// Obtained from [`Proceed::run`], [`TryProceed::run`], [`AsyncProceed::run`] or
/// [`AsyncTryProceed::run`] and returned by the closure to hand the output back to the caller.
#[must_use = "the wrapping closure must return this token"]
pub struct Completed<'id> {
    _brand: Brand<'id>,
}

impl Completed<'_> {
    const fn mint() -> Self {
        Self { _brand: PhantomData }
    }
}

impl Debug for Completed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completed").finish()
    }
}

/// Proof that the fallible action of the current call ran and returned an error.
///
/// The error itself stays with the wrapper and reaches the caller unchanged; the closure only
/// learns that the action failed.
#[must_use = "the wrapping closure must return this token"]
pub struct Failed<'id> {
    _brand: Brand<'id>,
}

impl Failed<'_> {
    const fn mint() -> Self {
        Self { _brand: PhantomData }
    }
}

impl Debug for Failed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Failed").finish()
    }
}

/// Moves the typed output out of a call's slot after the closure returned its token.
fn restore<T>(slot: Option<T>) -> T {
    match slot {
        Some(output) => output,
        None => unreachable!("a token is only minted after the action stored its output"),
    }
}
