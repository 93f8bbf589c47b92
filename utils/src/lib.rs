//! Shared infrastructure utilities for Lawyerify.
//!
//! - **`atomic_write`**: Crash-safe document replacement (temp + rename)

pub mod atomic_write;

pub use atomic_write::{FileSyncPolicy, WriteOptions, replace_file, replace_file_with_options};
