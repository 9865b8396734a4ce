// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Common imports for working with wrappers.
//!
//! Re-exports the [`Wrapper`], the logic traits and the gate traits from [`sleeve`][crate].

pub use crate::{AsyncAround, AsyncGate, AsyncTryAround, Around, Gate, TryAround, Wrapper};
