//! API Routes
//!
//! Route handlers organized by functionality.

pub mod chart;
pub mod fields;
pub mod health;
