//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the mesher:
//! - Math types and operations
//! - Stage timing
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
