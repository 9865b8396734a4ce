// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Logs the start and end of work with `tracing`.
//!
//! Run with `cargo run --example logging --features logs`.

use sleeve::{Logged, Wrapper};
use tracing::Level;

#[derive(Debug)]
struct Offline;

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let wrapper = Wrapper::new(Logged::new("fetch_user"));

    let user = wrapper.call(|| "alice");
    tracing::info!(user, "fetched");

    // Failed work is logged at WARN level and the error is handed back unchanged.
    let failed: Result<&str, Offline> = wrapper.try_call(|| Err(Offline));
    tracing::info!(?failed, "fetch attempted");
}
