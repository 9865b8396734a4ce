// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use super::{Brand, BoxFuture, Completed, Failed, restore};
use crate::{AsyncAround, AsyncTryAround};

/// Erased asynchronous action handed to closures built with
/// [`Wrapper::around_async`][crate::Wrapper::around_async].
pub struct AsyncProceed<'id> {
    action: BoxFuture<'id, ()>,
    _brand: Brand<'id>,
}

impl<'id> AsyncProceed<'id> {
    fn new(action: BoxFuture<'id, ()>) -> Self {
        Self {
            action,
            _brand: PhantomData,
        }
    }

    /// Runs the action to completion and returns the token the closure must hand back.
    pub async fn run(self) -> Completed<'id> {
        self.action.await;
        Completed::mint()
    }
}

impl Debug for AsyncProceed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncProceed").finish_non_exhaustive()
    }
}

/// Erased fallible asynchronous action handed to closures built with
/// [`Wrapper::try_around_async`][crate::Wrapper::try_around_async].
pub struct AsyncTryProceed<'id> {
    action: BoxFuture<'id, bool>,
    _brand: Brand<'id>,
}

impl<'id> AsyncTryProceed<'id> {
    fn new(action: BoxFuture<'id, bool>) -> Self {
        Self {
            action,
            _brand: PhantomData,
        }
    }

    /// Runs the action to completion and reports whether it succeeded.
    ///
    /// # Errors
    ///
    /// Returns a [`Failed`] token when the action returned an error.
    pub async fn run(self) -> Result<Completed<'id>, Failed<'id>> {
        if self.action.await {
            Ok(Completed::mint())
        } else {
            Err(Failed::mint())
        }
    }
}

impl Debug for AsyncTryProceed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTryProceed").finish_non_exhaustive()
    }
}

/// Unified asynchronous logic expressed as a closure.
///
/// Created by [`Wrapper::around_async`][crate::Wrapper::around_async].
#[derive(Clone, Copy)]
pub struct AsyncAroundFn<F>(F);

impl<F> AsyncAroundFn<F> {
    pub(crate) fn new(logic: F) -> Self
    where
        F: for<'id> Fn(AsyncProceed<'id>) -> BoxFuture<'id, Completed<'id>> + Send + Sync,
    {
        Self(logic)
    }
}

impl<F> AsyncAround for AsyncAroundFn<F>
where
    F: for<'id> Fn(AsyncProceed<'id>) -> BoxFuture<'id, Completed<'id>> + Send + Sync,
{
    async fn around_async<T, A, Fut>(&self, action: A) -> T
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        let mut slot = None;

        {
            let output = &mut slot;
            let erased: BoxFuture<'_, ()> = Box::pin(async move {
                *output = Some(action().await);
            });

            let _completed = (self.0)(AsyncProceed::new(erased)).await;
        }

        restore(slot)
    }
}

impl<F> Debug for AsyncAroundFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncAroundFn").finish_non_exhaustive()
    }
}

/// Unified fallible asynchronous logic expressed as a closure.
///
/// Created by [`Wrapper::try_around_async`][crate::Wrapper::try_around_async].
#[derive(Clone, Copy)]
pub struct AsyncTryAroundFn<F>(F);

impl<F> AsyncTryAroundFn<F> {
    pub(crate) fn new(logic: F) -> Self
    where
        F: for<'id> Fn(AsyncTryProceed<'id>) -> BoxFuture<'id, Result<Completed<'id>, Failed<'id>>> + Send + Sync,
    {
        Self(logic)
    }
}

impl<F> AsyncTryAround for AsyncTryAroundFn<F>
where
    F: for<'id> Fn(AsyncTryProceed<'id>) -> BoxFuture<'id, Result<Completed<'id>, Failed<'id>>> + Send + Sync,
{
    async fn try_around_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        let mut slot = None;

        {
            let output = &mut slot;
            let erased: BoxFuture<'_, bool> = Box::pin(async move {
                let result = action().await;
                let succeeded = result.is_ok();
                *output = Some(result);
                succeeded
            });

            let _outcome = (self.0)(AsyncTryProceed::new(erased)).await;
        }

        restore(slot)
    }
}

impl<F> Debug for AsyncTryAroundFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTryAroundFn").finish_non_exhaustive()
    }
}
