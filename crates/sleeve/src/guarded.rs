// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};

use crate::{AsyncAround, AsyncTryAround, Around, TryAround};

/// Logic that acquires with `before` and always releases with `release`.
///
/// Unlike [`Split`][crate::Split], `release` runs however the action ends: on success, when a
/// fallible action returns an error, when the action panics, and when the future of an async
/// call is dropped before it completes. The action's value or error still passes through
/// unchanged.
///
/// `release` runs from a drop guard. If it panics while the action is already unwinding from a
/// panic, the process aborts.
///
/// Created by [`Wrapper::guarded`][crate::Wrapper::guarded].
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use sleeve::Wrapper;
///
/// let in_flight = AtomicUsize::new(0);
/// let wrapper = Wrapper::guarded(
///     || in_flight.fetch_add(1, Ordering::SeqCst),
///     |_previous| {
///         in_flight.fetch_sub(1, Ordering::SeqCst);
///     },
/// );
///
/// let result: Result<(), &str> = wrapper.try_call(|| Err("failed"));
///
/// assert_eq!(result, Err("failed"));
/// assert_eq!(in_flight.load(Ordering::SeqCst), 0);
/// ```
#[derive(Clone, Copy)]
pub struct Guarded<B, R> {
    before: B,
    release: R,
}

impl<B, R> Guarded<B, R> {
    pub(crate) fn new(before: B, release: R) -> Self {
        Self { before, release }
    }

    fn acquire<K>(&self) -> ReleaseOnDrop<'_, R, K>
    where
        B: Fn() -> K,
        R: Fn(K),
    {
        ReleaseOnDrop {
            release: &self.release,
            state: Some((self.before)()),
        }
    }
}

struct ReleaseOnDrop<'a, R: Fn(K), K> {
    release: &'a R,
    state: Option<K>,
}

impl<R: Fn(K), K> Drop for ReleaseOnDrop<'_, R, K> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            (self.release)(state);
        }
    }
}

impl<B, R, K> Around for Guarded<B, R>
where
    B: Fn() -> K + Send + Sync,
    R: Fn(K) + Send + Sync,
{
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        let guard = self.acquire();
        let output = action();
        drop(guard);
        output
    }
}

impl<B, R, K> TryAround for Guarded<B, R>
where
    B: Fn() -> K + Send + Sync,
    R: Fn(K) + Send + Sync,
{
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        let guard = self.acquire();
        let output = action();
        drop(guard);
        output
    }
}

impl<B, R, K> AsyncAround for Guarded<B, R>
where
    B: Fn() -> K + Send + Sync,
    R: Fn(K) + Send + Sync,
    K: Send,
{
    async fn around_async<T, A, Fut>(&self, action: A) -> T
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        let guard = self.acquire();
        let output = action().await;
        drop(guard);
        output
    }
}

impl<B, R, K> AsyncTryAround for Guarded<B, R>
where
    B: Fn() -> K + Send + Sync,
    R: Fn(K) + Send + Sync,
    K: Send,
{
    async fn try_around_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        let guard = self.acquire();
        let output = action().await;
        drop(guard);
        output
    }
}

impl<B, R> Debug for Guarded<B, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guarded").finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::pin::pin;
    use std::task::{Context, Poll};

    use futures::executor::block_on;
    use testing_aids::{Journal, YieldOnce};

    use super::*;

    fn journaled(journal: &Journal) -> Guarded<impl Fn() -> &'static str + Send + Sync, impl Fn(&'static str) + Send + Sync> {
        let acquire = journal.clone();
        let release = journal.clone();

        Guarded::new(
            move || {
                acquire.record("acquire");
                "lease"
            },
            move |lease| release.record(format!("release {lease}")),
        )
    }

    #[test]
    fn ensure_types() {
        static_assertions::assert_impl_all!(Guarded<fn(), fn(())>: Debug, Clone, Copy, Send, Sync);
    }

    #[test]
    fn releases_after_success() {
        let journal = Journal::new();
        let guarded = journaled(&journal);

        assert_eq!(
            guarded.around(|| {
                journal.record("action");
                3
            }),
            3
        );

        assert_eq!(journal.entries(), ["acquire", "action", "release lease"]);
    }

    #[test]
    fn releases_after_failure() {
        let journal = Journal::new();
        let guarded = journaled(&journal);

        assert_eq!(guarded.try_around(|| Err::<(), _>("denied")), Err("denied"));
        assert_eq!(journal.entries(), ["acquire", "release lease"]);
    }

    #[test]
    fn releases_after_panic() {
        let journal = Journal::new();
        let guarded = journaled(&journal);

        let result = catch_unwind(AssertUnwindSafe(|| {
            guarded.around::<(), _>(|| panic!("action panicked"));
        }));

        assert!(result.is_err());
        assert_eq!(journal.entries(), ["acquire", "release lease"]);
    }

    #[test]
    fn async_shapes_release() {
        let journal = Journal::new();
        let guarded = journaled(&journal);

        assert_eq!(block_on(guarded.around_async(|| async { 'x' })), 'x');
        assert_eq!(block_on(guarded.try_around_async(|| async { Err::<(), _>(5) })), Err(5));

        assert_eq!(
            journal.entries(),
            ["acquire", "release lease", "acquire", "release lease"]
        );
    }

    #[test]
    fn releases_when_future_is_dropped() {
        let journal = Journal::new();
        let guarded = journaled(&journal);

        {
            let mut future = pin!(guarded.around_async(|| async {
                YieldOnce::default().await;
                1
            }));

            let waker = futures::task::noop_waker();
            let mut cx = Context::from_waker(&waker);
            assert!(matches!(future.as_mut().poll(&mut cx), Poll::Pending));
            assert_eq!(journal.entries(), ["acquire"]);
        }

        assert_eq!(journal.entries(), ["acquire", "release lease"]);
    }

    #[test]
    fn debug_impl() {
        let guarded = Guarded::new(|| (), |()| {});
        assert_eq!(format!("{guarded:?}"), "Guarded { .. }");
    }
}
