//! Property-based tests for package coordinate types.
