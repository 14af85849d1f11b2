//! Tests for template engine
//!
//! Split into focused submodules: scanning, balancing, expressions,
//! rendering per directive family, and failure modes.

use super::*;

// Test helper functions
mod helpers;


// Balancer and expression tests
mod blocks;

mod render_loops;

mod timeouts;
