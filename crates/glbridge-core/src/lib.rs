//! glbridge Core
//!
//! Value types, configuration, logging and profiling shared by every glbridge crate.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod profiling;
