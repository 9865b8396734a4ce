// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{Debug, Formatter};
use std::time::{Duration, Instant};

use crate::{AsyncAround, AsyncTryAround, Around, TryAround};

/// Logic that measures how long the action takes.
///
/// The elapsed wall-clock time is handed to the reporting closure once the action finishes,
/// whether it succeeded or failed. The action's value or error is returned unchanged. For async
/// actions the measurement includes the time the action spent suspended.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use sleeve::{Timed, Wrapper};
///
/// let wrapper = Wrapper::new(Timed::new(|elapsed: Duration| {
///     println!("action took {elapsed:?}");
/// }));
///
/// assert_eq!(wrapper.call(|| "done"), "done");
/// ```
#[derive(Clone, Copy)]
pub struct Timed<R> {
    report: R,
}

impl<R> Timed<R>
where
    R: Fn(Duration) + Send + Sync,
{
    /// Creates timing logic that reports each measurement to `report`.
    #[must_use]
    pub fn new(report: R) -> Self {
        Self { report }
    }
}

impl<R> Around for Timed<R>
where
    R: Fn(Duration) + Send + Sync,
{
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        let started = Instant::now();
        let output = action();
        (self.report)(started.elapsed());
        output
    }
}

impl<R> TryAround for Timed<R>
where
    R: Fn(Duration) + Send + Sync,
{
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        let started = Instant::now();
        let output = action();
        (self.report)(started.elapsed());
        output
    }
}

impl<R> AsyncAround for Timed<R>
where
    R: Fn(Duration) + Send + Sync,
{
    async fn around_async<T, A, Fut>(&self, action: A) -> T
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        let started = Instant::now();
        let output = action().await;
        (self.report)(started.elapsed());
        output
    }
}

impl<R> AsyncTryAround for Timed<R>
where
    R: Fn(Duration) + Send + Sync,
{
    async fn try_around_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        let started = Instant::now();
        let output = action().await;
        (self.report)(started.elapsed());
        output
    }
}

impl<R> Debug for Timed<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timed").finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use futures::executor::block_on;

    use super::*;

    fn recording() -> (Timed<impl Fn(Duration) + Send + Sync>, Arc<Mutex<Vec<Duration>>>) {
        let measurements = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&measurements);

        (Timed::new(move |elapsed| sink.lock().unwrap().push(elapsed)), measurements)
    }

    #[test]
    fn reports_once_per_call() {
        let (timed, measurements) = recording();

        assert_eq!(timed.around(|| 1), 1);
        assert_eq!(timed.try_around(|| Ok::<_, ()>(2)), Ok(2));
        assert_eq!(block_on(timed.around_async(|| async { 3 })), 3);
        assert_eq!(block_on(timed.try_around_async(|| async { Ok::<_, ()>(4) })), Ok(4));

        assert_eq!(measurements.lock().unwrap().len(), 4);
    }

    #[test]
    fn reports_failures_too() {
        let (timed, measurements) = recording();

        assert_eq!(timed.try_around(|| Err::<(), _>("sync")), Err("sync"));
        assert_eq!(block_on(timed.try_around_async(|| async { Err::<(), _>("async") })), Err("async"));

        assert_eq!(measurements.lock().unwrap().len(), 2);
    }

    #[test]
    fn measurement_covers_the_action() {
        let (timed, measurements) = recording();

        timed.around(|| thread::sleep(Duration::from_millis(5)));

        let measured = measurements.lock().unwrap()[0];
        assert!(measured >= Duration::from_millis(5), "measured {measured:?}");
    }

    #[test]
    fn debug_impl() {
        let timed = Timed::new(|_| {});
        assert_eq!(format!("{timed:?}"), "Timed { .. }");
    }
}
