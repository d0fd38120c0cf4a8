//! Shared helpers for the harness integration tests.
