// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::erased::{AsyncAroundFn, AsyncTryAroundFn, AroundFn, TryAroundFn};
use crate::{
    Admit, AsyncAround, AsyncGate, AsyncProceed, AsyncTryAround, AsyncTryProceed, Around, BoxFuture, Completed, Failed, Gate, Guarded,
    Proceed, Split, TryAround, TryProceed,
};

/// A callable that runs wrapping logic around the actions it is called with.
///
/// The configuration is fixed when the wrapper is built; the output type of each call is chosen
/// by the action passed at the call site. One wrapper can therefore be called any number of
/// times with actions of different output types.
///
/// Which call methods are available depends on the logic:
///
/// | Logic implements | Call method | Action |
/// |------------------|-------------|--------|
/// | [`Around`] | [`call`][Self::call] | `FnOnce() -> T` |
/// | [`TryAround`] | [`try_call`][Self::try_call] | `FnOnce() -> Result<T, E>` |
/// | [`AsyncAround`] | [`call_async`][Self::call_async] | `FnOnce() -> impl Future<Output = T>` |
/// | [`AsyncTryAround`] | [`try_call_async`][Self::try_call_async] | `FnOnce() -> impl Future<Output = Result<T, E>>` |
/// | [`Gate`] | [`call_gated`][Self::call_gated] | `FnOnce() -> Result<T, E>` with `E: From<Rejection>` |
/// | [`AsyncGate`] | [`call_gated_async`][Self::call_gated_async] | `FnOnce() -> impl Future<Output = Result<T, E>>` with `E: From<Rejection>` |
///
/// Wrappers hold nothing but their logic. They are [`Clone`], [`Copy`] and [`Debug`] whenever the
/// logic is, and cloned wrappers share no state beyond what the logic itself captured.
///
/// # Examples
///
/// ```
/// use sleeve::Wrapper;
///
/// # async fn example() {
/// let wrapper = Wrapper::before(|| println!("before"));
///
/// let number = wrapper.call(|| 1);
/// let text = wrapper.call_async(|| async { "two" }).await;
/// let parsed: Result<u8, _> = wrapper.try_call(|| "3".parse::<u8>());
///
/// assert_eq!(number, 1);
/// assert_eq!(text, "two");
/// assert_eq!(parsed, Ok(3));
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Wrapper<L> {
    logic: L,
}

impl<L> Wrapper<L> {
    /// Creates a wrapper from logic implementing one or more of the logic traits.
    ///
    /// # Examples
    ///
    /// ```
    /// use sleeve::{Timed, Wrapper};
    ///
    /// let wrapper = Wrapper::new(Timed::new(|elapsed| println!("{elapsed:?}")));
    /// assert_eq!(wrapper.call(|| 'x'), 'x');
    /// ```
    #[must_use]
    pub fn new(logic: L) -> Self {
        Self { logic }
    }

    /// Returns a reference to the wrapping logic.
    #[must_use]
    pub fn logic(&self) -> &L {
        &self.logic
    }

    /// Consumes the wrapper and returns the wrapping logic.
    #[must_use]
    pub fn into_logic(self) -> L {
        self.logic
    }
}

impl Wrapper<()> {
    /// Creates a wrapper for synchronous actions from closure logic.
    ///
    /// The closure receives a [`Proceed`] handle and must return the [`Completed`] token that
    /// running the handle produces. The closure decides what happens before and after.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Mutex;
    ///
    /// use sleeve::Wrapper;
    ///
    /// let log = Mutex::new(Vec::new());
    /// let wrapper = Wrapper::around(|proceed| {
    ///     log.lock().unwrap().push("start");
    ///     let completed = proceed.run();
    ///     log.lock().unwrap().push("end");
    ///     completed
    /// });
    ///
    /// assert_eq!(wrapper.call(|| 42), 42);
    /// assert_eq!(*log.lock().unwrap(), ["start", "end"]);
    /// ```
    #[must_use]
    pub fn around<F>(logic: F) -> Wrapper<AroundFn<F>>
    where
        F: for<'id> Fn(Proceed<'id>) -> Completed<'id> + Send + Sync,
    {
        Wrapper::new(AroundFn::new(logic))
    }

    /// Creates a wrapper for fallible synchronous actions from closure logic.
    ///
    /// Running the [`TryProceed`] handle yields `Err(Failed)` when the action failed, so the
    /// closure can propagate the failure with `?`. The caller then receives the action's own
    /// error value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sleeve::Wrapper;
    ///
    /// let wrapper = Wrapper::try_around(|proceed| {
    ///     let completed = proceed.run()?;
    ///     println!("succeeded");
    ///     Ok(completed)
    /// });
    ///
    /// let result: Result<u8, String> = wrapper.try_call(|| Err("bad input".to_string()));
    /// assert_eq!(result, Err("bad input".to_string()));
    /// ```
    #[must_use]
    pub fn try_around<F>(logic: F) -> Wrapper<TryAroundFn<F>>
    where
        F: for<'id> Fn(TryProceed<'id>) -> Result<Completed<'id>, Failed<'id>> + Send + Sync,
    {
        Wrapper::new(TryAroundFn::new(logic))
    }

    /// Creates a wrapper for asynchronous actions from closure logic.
    ///
    /// The closure returns a boxed future that runs the [`AsyncProceed`] handle. State captured
    /// by the closure has to be cloned into that future.
    ///
    /// # Examples
    ///
    /// ```
    /// use sleeve::Wrapper;
    ///
    /// # async fn example() {
    /// let wrapper = Wrapper::around_async(|proceed| {
    ///     Box::pin(async move {
    ///         println!("start");
    ///         let completed = proceed.run().await;
    ///         println!("end");
    ///         completed
    ///     })
    /// });
    ///
    /// assert_eq!(wrapper.call_async(|| async { 5 }).await, 5);
    /// # }
    /// ```
    #[must_use]
    pub fn around_async<F>(logic: F) -> Wrapper<AsyncAroundFn<F>>
    where
        F: for<'id> Fn(AsyncProceed<'id>) -> BoxFuture<'id, Completed<'id>> + Send + Sync,
    {
        Wrapper::new(AsyncAroundFn::new(logic))
    }

    /// Creates a wrapper for fallible asynchronous actions from closure logic.
    ///
    /// # Examples
    ///
    /// ```
    /// use sleeve::Wrapper;
    ///
    /// # async fn example() {
    /// let wrapper = Wrapper::try_around_async(|proceed| {
    ///     Box::pin(async move {
    ///         let completed = proceed.run().await?;
    ///         println!("succeeded");
    ///         Ok(completed)
    ///     })
    /// });
    ///
    /// let result: Result<(), &str> = wrapper.try_call_async(|| async { Err("offline") }).await;
    /// assert_eq!(result, Err("offline"));
    /// # }
    /// ```
    #[must_use]
    pub fn try_around_async<F>(logic: F) -> Wrapper<AsyncTryAroundFn<F>>
    where
        F: for<'id> Fn(AsyncTryProceed<'id>) -> BoxFuture<'id, Result<Completed<'id>, Failed<'id>>> + Send + Sync,
    {
        Wrapper::new(AsyncTryAroundFn::new(logic))
    }

    /// Creates a wrapper that runs `before`, the action, and then `after` with the value `before`
    /// produced.
    ///
    /// The wrapper accepts all four action shapes. `after` is skipped when the action fails.
    /// See [`Split`] for details.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Instant;
    ///
    /// use sleeve::Wrapper;
    ///
    /// let wrapper = Wrapper::before_after(Instant::now, |started: Instant| {
    ///     println!("took {:?}", started.elapsed());
    /// });
    ///
    /// assert_eq!(wrapper.call(|| 1 + 1), 2);
    /// ```
    #[must_use]
    pub fn before_after<B, A, K>(before: B, after: A) -> Wrapper<Split<B, A>>
    where
        B: Fn() -> K + Send + Sync,
        A: Fn(K) + Send + Sync,
    {
        Wrapper::new(Split::new(before, after))
    }

    /// Creates a split wrapper with only `before` logic.
    ///
    /// Whatever `before` returns is dropped once the action succeeded.
    #[must_use]
    pub fn before<B, K>(before: B) -> Wrapper<Split<B, fn(K)>>
    where
        B: Fn() -> K + Send + Sync,
    {
        Wrapper::new(Split::new(before, drop::<K> as fn(K)))
    }

    /// Creates a split wrapper with only `after` logic.
    ///
    /// `after` runs once the action succeeded and is skipped when it failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sleeve::Wrapper;
    ///
    /// let wrapper = Wrapper::after(|| println!("finished"));
    /// assert_eq!(wrapper.call(|| "value"), "value");
    /// ```
    #[must_use]
    pub fn after<A>(after: A) -> Wrapper<Split<fn(), impl Fn(()) + Send + Sync>>
    where
        A: Fn() + Send + Sync,
    {
        Wrapper::new(Split::new(nothing as fn(), move |()| {
            after();
        }))
    }

    /// Creates a wrapper that runs `before`, the action, and then always `release`.
    ///
    /// Unlike [`before_after`][Self::before_after], `release` also runs when the action fails,
    /// panics or, for async actions, when the call's future is dropped early. See [`Guarded`].
    #[must_use]
    pub fn guarded<B, R, K>(before: B, release: R) -> Wrapper<Guarded<B, R>>
    where
        B: Fn() -> K + Send + Sync,
        R: Fn(K) + Send + Sync,
    {
        Wrapper::new(Guarded::new(before, release))
    }

    /// Creates a gated wrapper that runs the action only when `check` returns `Ok(())`.
    ///
    /// When `check` returns `Err(rejection)`, the action is skipped and the caller receives
    /// the rejection converted into its own error type. See [`Admit`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sleeve::Wrapper;
    ///
    /// let read_only = Wrapper::admit(|| Err("store is read-only"));
    ///
    /// let result: Result<(), String> = read_only.call_gated(|| Ok(()));
    /// assert_eq!(result, Err("store is read-only".to_string()));
    /// ```
    #[must_use]
    pub fn admit<C, R>(check: C) -> Wrapper<Admit<C>>
    where
        C: Fn() -> Result<(), R> + Send + Sync,
    {
        Wrapper::new(Admit::new(check))
    }
}

impl<L: Around> Wrapper<L> {
    /// Runs a synchronous action through the wrapping logic and returns its output.
    pub fn call<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        self.logic.around(action)
    }
}

impl<L: TryAround> Wrapper<L> {
    /// Runs a fallible synchronous action through the wrapping logic.
    ///
    /// # Errors
    ///
    /// Returns the action's error unchanged.
    pub fn try_call<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        self.logic.try_around(action)
    }
}

impl<L: AsyncAround> Wrapper<L> {
    /// Runs an asynchronous action through the wrapping logic and returns its output.
    pub fn call_async<T, A, Fut>(&self, action: A) -> impl Future<Output = T> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        self.logic.around_async(action)
    }
}

impl<L: AsyncTryAround> Wrapper<L> {
    /// Runs a fallible asynchronous action through the wrapping logic.
    ///
    /// The error of a failed action is returned unchanged.
    pub fn try_call_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        self.logic.try_around_async(action)
    }
}

impl<L: Gate> Wrapper<L> {
    /// Runs a fallible synchronous action if the gate admits it.
    ///
    /// # Errors
    ///
    /// Returns the gate's rejection converted into `E` when the action was not run, otherwise
    /// the action's error unchanged.
    pub fn call_gated<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
        E: From<L::Rejection>,
    {
        self.logic.gate(action)
    }
}

impl<L: AsyncGate> Wrapper<L> {
    /// Runs a fallible asynchronous action if the gate admits it.
    ///
    /// The future resolves to the gate's rejection converted into `E` when the action was not
    /// run, otherwise to the action's result unchanged.
    pub fn call_gated_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: From<L::Rejection> + Send,
    {
        self.logic.gate_async(action)
    }
}

fn nothing() {}
