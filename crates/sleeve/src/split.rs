// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};

use crate::{AsyncAround, AsyncTryAround, Around, TryAround};

/// Logic split into independent `before` and `after` closures.
///
/// `before` runs first and produces a value of type `K`, the action runs next and `after`
/// receives the value `before` produced. The same split logic serves all four action shapes:
///
/// - sync: `before`, action, `after`
/// - fallible: `before`, action, then `after` only if the action returned `Ok`
/// - async: `before`, action awaited, `after`
/// - async fallible: `before`, action awaited, then `after` only if the action returned `Ok`
///
/// A failed action skips `after` and its error is returned unchanged. Anything `before` already
/// did is not rolled back. When release logic has to run regardless of the outcome, use
/// [`Guarded`][crate::Guarded] instead.
///
/// `before` and `after` are synchronous even when the action is asynchronous.
///
/// Created by [`Wrapper::before_after`][crate::Wrapper::before_after],
/// [`Wrapper::before`][crate::Wrapper::before] and [`Wrapper::after`][crate::Wrapper::after].
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
///
/// use sleeve::Wrapper;
///
/// let log = Mutex::new(Vec::new());
/// let wrapper = Wrapper::before_after(
///     || log.lock().unwrap().push("start"),
///     |()| log.lock().unwrap().push("end"),
/// );
///
/// let result: Result<(), &str> = wrapper.try_call(|| Err("failed"));
///
/// assert_eq!(result, Err("failed"));
/// assert_eq!(*log.lock().unwrap(), ["start"]);
/// ```
#[derive(Clone, Copy)]
pub struct Split<B, A> {
    before: B,
    after: A,
}

impl<B, A> Split<B, A> {
    pub(crate) fn new(before: B, after: A) -> Self {
        Self { before, after }
    }
}

impl<B, A, K> Around for Split<B, A>
where
    B: Fn() -> K + Send + Sync,
    A: Fn(K) + Send + Sync,
{
    fn around<T, F>(&self, action: F) -> T
    where
        F: FnOnce() -> T,
    {
        let state = (self.before)();
        let output = action();
        (self.after)(state);
        output
    }
}

impl<B, A, K> TryAround for Split<B, A>
where
    B: Fn() -> K + Send + Sync,
    A: Fn(K) + Send + Sync,
{
    fn try_around<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let state = (self.before)();
        let output = action();
        self.finish(state, output)
    }
}

impl<B, A, K> AsyncAround for Split<B, A>
where
    B: Fn() -> K + Send + Sync,
    A: Fn(K) + Send + Sync,
    K: Send,
{
    async fn around_async<T, F, Fut>(&self, action: F) -> T
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        let state = (self.before)();
        let output = action().await;
        (self.after)(state);
        output
    }
}

impl<B, A, K> AsyncTryAround for Split<B, A>
where
    B: Fn() -> K + Send + Sync,
    A: Fn(K) + Send + Sync,
    K: Send,
{
    async fn try_around_async<T, E, F, Fut>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        let state = (self.before)();
        let output = action().await;
        self.finish(state, output)
    }
}

impl<B, A> Split<B, A> {
    #[inline]
    fn finish<K, T, E>(&self, state: K, output: Result<T, E>) -> Result<T, E>
    where
        A: Fn(K),
    {
        if output.is_ok() {
            (self.after)(state);
        } else {
            #[cfg(any(feature = "logs", test))]
            tracing::event!(
                name: "sleeve.after_skipped",
                tracing::Level::DEBUG,
                "action failed, skipping after logic"
            );
        }

        output
    }
}

impl<B, A> Debug for Split<B, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Split").finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use futures::executor::block_on;
    use testing_aids::{Journal, LogCapture};
    use tracing_subscriber::util::SubscriberInitExt;

    use super::*;

    fn journaled(journal: &Journal) -> Split<impl Fn() -> u32 + Send + Sync, impl Fn(u32) + Send + Sync> {
        let before = journal.clone();
        let after = journal.clone();

        Split::new(
            move || {
                before.record("start");
                7
            },
            move |state| after.record(format!("end {state}")),
        )
    }

    #[test]
    fn ensure_types() {
        static_assertions::assert_impl_all!(Split<fn(), fn(())>: Debug, Clone, Copy, Send, Sync);
    }

    #[test]
    fn after_receives_before_state() {
        let journal = Journal::new();
        let split = journaled(&journal);

        assert_eq!(split.around(|| "value"), "value");
        assert_eq!(journal.entries(), ["start", "end 7"]);
    }

    #[test]
    fn fallible_success_runs_after() {
        let journal = Journal::new();
        let split = journaled(&journal);

        assert_eq!(split.try_around(|| Ok::<_, ()>(1)), Ok(1));
        assert_eq!(journal.entries(), ["start", "end 7"]);
    }

    #[test]
    fn fallible_failure_skips_after() {
        let journal = Journal::new();
        let split = journaled(&journal);

        assert_eq!(split.try_around(|| Err::<(), _>("oops")), Err("oops"));
        assert_eq!(journal.entries(), ["start"]);
    }

    #[test]
    fn async_shapes_follow_sync_semantics() {
        let journal = Journal::new();
        let split = journaled(&journal);

        assert_eq!(block_on(split.around_async(|| async { 1 })), 1);
        assert_eq!(block_on(split.try_around_async(|| async { Err::<(), _>(2) })), Err(2));
        assert_eq!(block_on(split.try_around_async(|| async { Ok::<_, ()>(3) })), Ok(3));

        assert_eq!(journal.entries(), ["start", "end 7", "start", "start", "end 7"]);
    }

    #[test]
    fn panicking_action_skips_after() {
        let after_ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&after_ran);
        let split = Split::new(|| (), move |()| *flag.lock().unwrap() = true);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            split.around::<(), _>(|| panic!("action panicked"));
        }));

        assert!(result.is_err());
        assert!(!*after_ran.lock().unwrap());
    }

    #[test]
    fn skipped_after_is_logged() {
        let log_capture = LogCapture::new();
        let _guard = log_capture.subscriber().set_default();

        let split = Split::new(|| (), |()| {});
        let _ = split.try_around(|| Err::<(), _>(()));

        log_capture.assert_contains("sleeve::split");
        log_capture.assert_contains("action failed, skipping after logic");
    }

    #[test]
    fn debug_impl() {
        let split = Split::new(|| (), |()| {});
        assert_eq!(format!("{split:?}"), "Split { .. }");
    }
}
