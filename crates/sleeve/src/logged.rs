// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::time::Instant;

use crate::{AsyncAround, AsyncTryAround, Around, TryAround};

/// Logic that records the start and end of each action with [`tracing`] events.
///
/// | Event | Level | When |
/// |-------|-------|------|
/// | `sleeve.start` | `DEBUG` | before the action runs |
/// | `sleeve.end` | `DEBUG` | after the action succeeded, with the elapsed time |
/// | `sleeve.failed` | `WARN` | after a fallible action returned an error, with the elapsed time |
///
/// Every event carries the logic's name under `wrapper.name`. Values and errors pass through
/// unchanged; errors are not formatted into the log, so `E` needs no `Debug` bound.
///
/// # Examples
///
/// ```
/// use sleeve::{Logged, Wrapper};
///
/// let wrapper = Wrapper::new(Logged::new("load_profile"));
/// let profile = wrapper.call(|| "alice".to_string());
/// assert_eq!(profile, "alice");
/// ```
#[derive(Clone, Debug)]
pub struct Logged {
    name: Cow<'static, str>,
}

impl Logged {
    /// Creates logging logic that identifies its events with `name`.
    ///
    /// Use short `snake_case` names such as `load_profile` or `flush_cache`.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name recorded in every event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn started(&self) -> Instant {
        tracing::event!(
            name: "sleeve.start",
            tracing::Level::DEBUG,
            wrapper.name = %self.name,
            "action started"
        );

        Instant::now()
    }

    fn ended(&self, started: Instant) {
        tracing::event!(
            name: "sleeve.end",
            tracing::Level::DEBUG,
            wrapper.name = %self.name,
            elapsed = ?started.elapsed(),
            "action completed"
        );
    }

    fn finished<T, E>(&self, started: Instant, output: Result<T, E>) -> Result<T, E> {
        if output.is_ok() {
            self.ended(started);
        } else {
            tracing::event!(
                name: "sleeve.failed",
                tracing::Level::WARN,
                wrapper.name = %self.name,
                elapsed = ?started.elapsed(),
                "action failed"
            );
        }

        output
    }
}

impl Around for Logged {
    fn around<T, A>(&self, action: A) -> T
    where
        A: FnOnce() -> T,
    {
        let started = self.started();
        let output = action();
        self.ended(started);
        output
    }
}

impl TryAround for Logged {
    fn try_around<T, E, A>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Result<T, E>,
    {
        let started = self.started();
        let output = action();
        self.finished(started, output)
    }
}

impl AsyncAround for Logged {
    async fn around_async<T, A, Fut>(&self, action: A) -> T
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        let started = self.started();
        let output = action().await;
        self.ended(started);
        output
    }
}

impl AsyncTryAround for Logged {
    async fn try_around_async<T, E, A, Fut>(&self, action: A) -> Result<T, E>
    where
        A: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
        T: Send,
        E: Send,
    {
        let started = self.started();
        let output = action().await;
        self.finished(started, output)
    }
}
