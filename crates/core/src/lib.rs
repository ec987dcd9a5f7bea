//! Core errors and constants for the flexlayout JNI layer.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing the failure modes of the bridge around the JVM.
//! - **`constants`**: Shared environment variable names and JNI operation
//!   names used in error reports.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
};
