//! Shared utilities for the flexlayout workspace
//!
//! Currently this is the process-level tracing setup used by binaries and
//! test harnesses that load the JNI bridge.

pub mod tracing;
