// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Fallible logic that decides whether the action runs at all.
///
/// [`TryAround`][crate::TryAround] logic cannot build a `T` or an `E` of its own, so it always
/// runs the action. A gate can decline instead: it returns its own
/// [`Rejection`][Gate::Rejection], which reaches the caller converted into the action's error
/// type through [`From`]. Only callers whose error type absorbs the rejection can call a gated
/// wrapper, so a rejection is never silently turned into a value.
///
/// Errors of an action the gate admitted are returned unchanged.
///
/// # Examples
///
/// ```
/// use sleeve::{Gate, Wrapper};
///
/// #[derive(Debug, PartialEq)]
/// struct Maintenance;
///
/// #[derive(Debug, PartialEq)]
/// enum CallError {
///     Maintenance,
///     Invalid,
/// }
///
/// impl From<Maintenance> for CallError {
///     fn from(_: Maintenance) -> Self {
///         Self::Maintenance
///     }
/// }
///
/// struct Closed;
///
/// impl Gate for Closed {
///     type Rejection = Maintenance;
///
///     fn gate<T, E, A>(&self, _action: A) -> Result<T, E>
///     where
///         A: FnOnce() -> Result<T, E>,
///         E: From<Maintenance>,
///     {
///         Err(Maintenance.into())
///     }
/// }
///
/// let wrapper = Wrapper::new(Closed);
/// let result: Result<u8, CallError> = wrapper.call_gated(|| Err(CallError::Invalid));
/// assert_eq!(result, Err(CallError::Maintenance));
/// ```
pub trait Gate: Send + Sync {
    /// What the gate returns when it declines to run the action.
    type Rejection;

    /// Runs `action` if the gate admits it.
    ///
    /// # Errors
    ///
    /// Returns the rejection converted into `E` when the gate declines, otherwise the action's
    /// own error unchanged.
    fn gate<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
        E: From<Self::Rejection>;
}

/// Asynchronous counterpart of [`Gate`].
pub trait AsyncGate: Send + Sync {
    /// What the gate returns when it declines to run the action.
    type Rejection;

    /// Runs the asynchronous `action` if the gate admits it.
    ///
    /// The error of the returned future is the rejection converted into `E` when the gate
    /// declines, otherwise the action's own error unchanged.
    fn gate_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<Self::Rejection> + Send;
}

impl<G: Gate> Gate for Arc<G> {
    type Rejection = G::Rejection;

    fn gate<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
        E: From<Self::Rejection>,
    {
        (**self).gate(action)
    }
}

impl<G: AsyncGate> AsyncGate for Arc<G> {
    type Rejection = G::Rejection;

    fn gate_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<Self::Rejection> + Send,
    {
        (**self).gate_async(action)
    }
}

/// Gate that runs the action only when its check returns `Ok(())`.
///
/// The check runs before every call. When it returns `Err(rejection)` the action is not run and
/// the caller receives `E::from(rejection)`.
///
/// Created by [`Wrapper::admit`][crate::Wrapper::admit].
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// use sleeve::Wrapper;
///
/// let open = AtomicBool::new(false);
/// let wrapper = Wrapper::admit(|| if open.load(Ordering::Relaxed) { Ok(()) } else { Err("closed") });
///
/// let declined: Result<u8, String> = wrapper.call_gated(|| Ok(1));
/// assert_eq!(declined, Err("closed".to_string()));
///
/// open.store(true, Ordering::Relaxed);
/// let admitted: Result<u8, String> = wrapper.call_gated(|| Ok(1));
/// assert_eq!(admitted, Ok(1));
/// ```
#[derive(Clone, Copy)]
pub struct Admit<C> {
    check: C,
}

impl<C> Admit<C> {
    pub(crate) fn new(check: C) -> Self {
        Self { check }
    }

    fn check<R>(&self) -> Result<(), R>
    where
        C: Fn() -> Result<(), R>,
    {
        let admitted = (self.check)();

        #[cfg(any(feature = "logs", test))]
        if admitted.is_err() {
            tracing::event!(
                name: "sleeve.rejected",
                tracing::Level::DEBUG,
                "check declined, action not run"
            );
        }

        admitted
    }
}

impl<C, R> Gate for Admit<C>
where
    C: Fn() -> Result<(), R> + Send + Sync,
{
    type Rejection = R;

    fn gate<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
        E: From<R>,
    {
        self.check()?;
        action()
    }
}

impl<C, R> AsyncGate for Admit<C>
where
    C: Fn() -> Result<(), R> + Send + Sync,
    R: Send,
{
    type Rejection = R;

    async fn gate_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<R> + Send,
    {
        self.check()?;
        action().await
    }
}

impl<C> Debug for Admit<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admit").finish_non_exhaustive()
    }
}
