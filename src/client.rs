//! Client handle and the shared execution engine.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod execution;
mod policy;

pub use builder::ClientBuilder;
pub use core::Client;
pub use execution::{execute, Executable};
pub use policy::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF};
