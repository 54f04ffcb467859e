//! Common test utilities for TermRank integration tests
//!
//! Stopword fixtures on disk, sample texts, and log output setup.

#![allow(dead_code)]

pub mod corpus;

pub use corpus::{StopwordFixture, ENGLISH_STOPWORDS, ENGLISH_TEXT, SPANISH_STOPWORDS, SPANISH_TEXT};

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
