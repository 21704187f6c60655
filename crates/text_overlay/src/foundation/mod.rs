//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the overlay:
//! - Math types shared by layout and parameter encoding
//! - Logging initialization

pub mod math;
pub mod logging;
