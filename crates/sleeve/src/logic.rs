// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

/// Logic that runs around a synchronous action that cannot fail.
///
/// The method is generic over the action's output, so the output type is chosen by each call
/// site rather than when the logic is built. Implementations decide what happens before and after
/// the action. They cannot build a `T` of their own, so the action always runs and its output is
/// returned, unless the logic panics. Use [`Gate`][crate::Gate] for logic that may decline.
///
/// # Examples
///
/// ```
/// use sleeve::{Around, Wrapper};
///
/// struct Chatty;
///
/// impl Around for Chatty {
///     fn around<T, A>(&self, action: A) -> T
///     where
///         A: FnOnce() -> T,
///     {
///         println!("about to run");
///         let output = action();
///         println!("finished");
///         output
///     }
/// }
///
/// let wrapper = Wrapper::new(Chatty);
/// assert_eq!(wrapper.call(|| 21 * 2), 42);
/// ```
pub trait Around: Send + Sync {
    /// Runs `action` surrounded by this logic and returns the action's output.
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T;
}

/// Logic that runs around a synchronous action that can fail.
///
/// Implementations typically run the action and propagate its error with `?`, which keeps the
/// error value identical to what the action produced.
///
/// # Examples
///
/// ```
/// use sleeve::{TryAround, Wrapper};
///
/// struct ReportFailures;
///
/// impl TryAround for ReportFailures {
///     fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
///     where
///         A: FnOnce() -> Result<T, E>,
///     {
///         let result = action();
///         if result.is_err() {
///             println!("action failed");
///         }
///         result
///     }
/// }
///
/// let wrapper = Wrapper::new(ReportFailures);
/// let result: Result<(), &str> = wrapper.try_call(|| Err("nope"));
/// assert_eq!(result, Err("nope"));
/// ```
pub trait TryAround: Send + Sync {
    /// Runs the fallible `action` surrounded by this logic.
    ///
    /// # Errors
    ///
    /// Returns whatever error the action returned. Implementations cannot build an `E` of
    /// their own; logic that may decline the action implements [`Gate`][crate::Gate] instead.
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>;
}

/// Logic that runs around an asynchronous action that cannot fail.
///
/// The action is a closure producing the future, so nothing of the action executes before the
/// logic calls it.
///
/// # Examples
///
/// ```
/// use sleeve::{AsyncAround, Wrapper};
///
/// struct Announce;
///
/// impl AsyncAround for Announce {
///     async fn around_async<T, A, Fut>(&self, action: A) -> T
///     where
///         A: FnOnce() -> Fut + Send,
///         Fut: Future<Output = T> + Send,
///         T: Send,
///     {
///         println!("start");
///         let output = action().await;
///         println!("end");
///         output
///     }
/// }
///
/// # async fn example() {
/// let wrapper = Wrapper::new(Announce);
/// assert_eq!(wrapper.call_async(|| async { 7 }).await, 7);
/// # }
/// ```
pub trait AsyncAround: Send + Sync {
    /// Runs the asynchronous `action` surrounded by this logic.
    ///
    /// The returned future must be [`Send`] for compatibility with multi-threaded
    /// async runtimes.
    fn around_async<T, A, Fut>(&self, action: A) -> impl Future<Output = T> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send;
}

/// Logic that runs around an asynchronous action that can fail.
///
/// # Examples
///
/// ```
/// use sleeve::{AsyncTryAround, Wrapper};
///
/// struct Passthrough;
///
/// impl AsyncTryAround for Passthrough {
///     async fn try_around_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
///     where
///         A: FnOnce() -> Fut + Send,
///         Fut: Future<Output = Result<T, E>> + Send,
///         T: Send,
///         E: Send,
///     {
///         let output = action().await?;
///         Ok(output)
///     }
/// }
///
/// # async fn example() {
/// let wrapper = Wrapper::new(Passthrough);
/// let result: Result<u32, String> = wrapper.try_call_async(|| async { Ok(3) }).await;
/// assert_eq!(result, Ok(3));
/// # }
/// ```
pub trait AsyncTryAround: Send + Sync {
    /// Runs the fallible asynchronous `action` surrounded by this logic.
    ///
    /// # Errors
    ///
    /// Returns whatever error the action returned. Logic that may decline the action
    /// implements [`AsyncGate`][crate::AsyncGate] instead.
    fn try_around_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send;
}

impl<L: Around> Around for Box<L> {
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        (**self).around(action)
    }
}

impl<L: Around> Around for Arc<L> {
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        (**self).around(action)
    }
}

impl<L: TryAround> TryAround for Box<L> {
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        (**self).try_around(action)
    }
}

impl<L: TryAround> TryAround for Arc<L> {
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        (**self).try_around(action)
    }
}

impl<L: AsyncAround> AsyncAround for Box<L> {
    fn around_async<T, A, Fut>(&self, action: A) -> impl Future<Output = T> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        (**self).around_async(action)
    }
}

impl<L: AsyncAround> AsyncAround for Arc<L> {
    fn around_async<T, A, Fut>(&self, action: A) -> impl Future<Output = T> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        (**self).around_async(action)
    }
}

impl<L: AsyncTryAround> AsyncTryAround for Box<L> {
    fn try_around_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        (**self).try_around_async(action)
    }
}

impl<L: AsyncTryAround> AsyncTryAround for Arc<L> {
    fn try_around_async<T, E, A, Fut>(&self, action: A) -> impl Future<Output = Result<T, E>> + Send
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        (**self).try_around_async(action)
    }
}
