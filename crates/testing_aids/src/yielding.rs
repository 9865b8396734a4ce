// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::pin::Pin;
use std::task;

/// Suspends the awaiting task exactly once before completing.
///
/// Lets tests place a suspension point in the middle of an async action, so they can verify
/// that nothing around the action runs while it is suspended.
#[derive(Debug, Default)]
pub struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> task::Poll<Self::Output> {
        if self.yielded {
            return task::Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();
        task::Poll::Pending
    }
}

/// Returns a future that suspends the current task once.
#[must_use]
pub fn yield_once() -> YieldOnce {
    YieldOnce::default()
}
