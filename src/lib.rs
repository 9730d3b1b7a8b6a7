//! Workspace-level integration tests for stepwise.
//!
//! The tests live in `tests/`; this crate exists only to host them.
