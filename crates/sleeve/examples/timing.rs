// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Measures how long work takes using the split form.
//!
//! `before` captures the start time and `after` receives it once the work completed. Failed
//! work skips `after`, so only successful runs are reported.

use std::num::ParseIntError;
use std::time::{Duration, Instant};

use sleeve::Wrapper;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ParseIntError> {
    let timed = Wrapper::before_after(Instant::now, |started: Instant| {
        println!("finished in {:?}", started.elapsed());
    });

    // The same wrapper works for values of any type...
    let sum = timed.call(|| (1..=1_000_u64).sum::<u64>());
    let label = timed.call(|| format!("sum is {sum}"));
    println!("{label}");

    // ...for fallible work...
    let port: u16 = timed.try_call(|| "8080".parse())?;
    println!("port: {port}");

    // ...and for async work.
    let slept = timed
        .call_async(|| async {
            tokio::task::yield_now().await;
            Duration::from_millis(1)
        })
        .await;
    println!("slept: {slept:?}");

    // Failures pass through untouched and nothing is reported.
    let invalid = timed.try_call(|| "not a number".parse::<u16>());
    println!("invalid input: {invalid:?}");

    Ok(())
}
