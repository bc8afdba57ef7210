//! Integration and property tests for seedgen.
//!
//! The tests in `tests/` drive the public `seedgen-core` API end to end and
//! check codec, derivation and WIF invariants under randomized inputs.

pub mod helpers;
