// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Unified wrapping logic written as closures.
//!
//! The closure receives a handle to the action and returns the token that running the handle
//! produced. Anything before `run()` happens before the action, anything after happens once it
//! completed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use sleeve::Wrapper;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let calls = Arc::new(AtomicU32::new(0));

    let counted = Wrapper::around({
        let calls = Arc::clone(&calls);
        move |proceed| {
            let call = calls.fetch_add(1, Ordering::Relaxed) + 1;
            println!("call #{call} starting");
            let completed = proceed.run();
            println!("call #{call} done");
            completed
        }
    });

    let total: u32 = counted.call(|| [1, 2, 3].iter().sum());
    let name = counted.call(|| "sleeve".to_uppercase());
    println!("total = {total}, name = {name}");

    // Fallible closures propagate the failure with `?` and skip the rest.
    let checked = Wrapper::try_around(|proceed| {
        let completed = proceed.run()?;
        println!("validation passed");
        Ok(completed)
    });

    let valid: Result<u8, String> = checked.try_call(|| Ok(200));
    let invalid: Result<u8, String> = checked.try_call(|| Err("out of range".to_string()));
    println!("valid = {valid:?}, invalid = {invalid:?}");

    // Async closures return a boxed future; captured state is cloned into it.
    let announced = Wrapper::around_async(move |proceed| {
        let calls = Arc::clone(&calls);
        Box::pin(async move {
            println!("async call starting");
            let completed = proceed.run().await;
            println!("async call done, {} sync calls so far", calls.load(Ordering::Relaxed));
            completed
        })
    });

    let doubled = announced.call_async(|| async { total * 2 }).await;
    println!("doubled = {doubled}");
}
