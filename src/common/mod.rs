//! Common module
//!
//! This module contains shared errors, logging and file system access used throughout the crate.

pub mod error;
pub mod fs;
pub mod log;

// Re-export commonly used types and functions
pub use error::{ConfError, Result};
pub use fs::{LocalFs, Storage};
pub use self::log::init_logger;
