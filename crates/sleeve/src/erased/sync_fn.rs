// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use super::{Brand, Completed, Failed, restore};
use crate::{Around, TryAround};

/// Erased synchronous action handed to closures built with [`Wrapper::around`][crate::Wrapper::around].
pub struct Proceed<'id> {
    action: &'id mut (dyn FnMut() + 'id),
    _brand: Brand<'id>,
}

impl<'id> Proceed<'id> {
    fn new(action: &'id mut (dyn FnMut() + 'id)) -> Self {
        Self {
            action,
            _brand: PhantomData,
        }
    }

    /// Runs the action and returns the token the closure must hand back.
    ///
    /// Consuming `self` guarantees the action runs at most once per call.
    pub fn run(self) -> Completed<'id> {
        (self.action)();
        Completed::mint()
    }
}

impl Debug for Proceed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proceed").finish_non_exhaustive()
    }
}

/// Erased fallible action handed to closures built with [`Wrapper::try_around`][crate::Wrapper::try_around].
pub struct TryProceed<'id> {
    action: &'id mut (dyn FnMut() -> bool + 'id),
    _brand: Brand<'id>,
}

impl<'id> TryProceed<'id> {
    fn new(action: &'id mut (dyn FnMut() -> bool + 'id)) -> Self {
        Self {
            action,
            _brand: PhantomData,
        }
    }

    /// Runs the action and reports whether it succeeded.
    ///
    /// # Errors
    ///
    /// Returns a [`Failed`] token when the action returned an error. Propagating it with `?`
    /// makes the wrapper return the action's error to the caller.
    pub fn run(self) -> Result<Completed<'id>, Failed<'id>> {
        if (self.action)() {
            Ok(Completed::mint())
        } else {
            Err(Failed::mint())
        }
    }
}

impl Debug for TryProceed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryProceed").finish_non_exhaustive()
    }
}

/// Unified synchronous logic expressed as a closure.
///
/// Created by [`Wrapper::around`][crate::Wrapper::around].
#[derive(Clone, Copy)]
pub struct AroundFn<F>(F);

impl<F> AroundFn<F> {
    pub(crate) fn new(logic: F) -> Self
    where
        F: for<'id> Fn(Proceed<'id>) -> Completed<'id> + Send + Sync,
    {
        Self(logic)
    }
}

impl<F> Around for AroundFn<F>
where
    F: for<'id> Fn(Proceed<'id>) -> Completed<'id> + Send + Sync,
{
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        let mut slot = None;

        {
            let mut action = Some(action);
            let mut run = || {
                if let Some(action) = action.take() {
                    slot = Some(action());
                }
            };

            let _completed = (self.0)(Proceed::new(&mut run));
        }

        restore(slot)
    }
}

impl<F> Debug for AroundFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AroundFn").finish_non_exhaustive()
    }
}

/// Unified fallible logic expressed as a closure.
///
/// Created by [`Wrapper::try_around`][crate::Wrapper::try_around].
#[derive(Clone, Copy)]
pub struct TryAroundFn<F>(F);

impl<F> TryAroundFn<F> {
    pub(crate) fn new(logic: F) -> Self
    where
        F: for<'id> Fn(TryProceed<'id>) -> Result<Completed<'id>, Failed<'id>> + Send + Sync,
    {
        Self(logic)
    }
}

impl<F> TryAround for TryAroundFn<F>
where
    F: for<'id> Fn(TryProceed<'id>) -> Result<Completed<'id>, Failed<'id>> + Send + Sync,
{
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        let mut slot = None;

        {
            let mut action = Some(action);
            let mut run = || {
                let Some(action) = action.take() else {
                    return false;
                };

                let result = action();
                let succeeded = result.is_ok();
                slot = Some(result);
                succeeded
            };

            let _outcome = (self.0)(TryProceed::new(&mut run));
        }

        restore(slot)
    }
}

impl<F> Debug for TryAroundFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryAroundFn").finish_non_exhaustive()
    }
}
