// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An unpublished crate containing testing utilities for use within this repo.

use std::sync::{Arc, Mutex};

mod log;
mod yielding;

pub use log::*;
pub use yielding::*;

/// An ordered, shareable record of what happened during a test.
///
/// Clones append to the same record, so a clone can be moved into `before`/`after` closures
/// while the test keeps another to inspect the sequence afterwards.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// # Panics
    ///
    /// Panics if another thread panicked while recording.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Returns a snapshot of all entries in recording order.
    ///
    /// # Panics
    ///
    /// Panics if another thread panicked while recording.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Removes all entries.
    ///
    /// # Panics
    ///
    /// Panics if another thread panicked while recording.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// An error whose identity survives moves, for checking that errors pass through untouched.
///
/// The message lives on the heap and is never cloned, so [`identity`][Self::identity] of the
/// error a caller receives equals the identity of the error the action returned only if it is
/// the very same value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("test failure: {message}")]
pub struct TestError {
    message: Box<str>,
}

impl TestError {
    /// Creates an error with a freshly allocated copy of `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self { message: message.into() }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Address of the heap allocation backing this error.
    #[must_use]
    pub fn identity(&self) -> usize {
        self.message.as_ptr().addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_clones_share_entries() {
        let journal = Journal::new();
        let clone = journal.clone();

        journal.record("first");
        clone.record(String::from("second"));

        assert_eq!(journal.entries(), ["first", "second"]);

        clone.clear();
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn test_error_identity_follows_the_value() {
        let error = TestError::new("boom");
        let identity = error.identity();
        let moved = error;

        assert_eq!(moved.identity(), identity);
        assert_ne!(TestError::new("boom").identity(), identity);
        assert_eq!(moved.to_string(), "test failure: boom");
        assert_eq!(moved.message(), "boom");
    }
}
