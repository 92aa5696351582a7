//! Property-based tests for the configuration validator.
