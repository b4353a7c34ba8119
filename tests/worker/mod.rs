//! Tests for the background task worker.

mod pool;
