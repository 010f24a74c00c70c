//! Foundation types shared by all zipsh crates.

pub mod error;

pub use error::{Result, ZipshError};
