//! Request and response bodies
//!
//! All bodies use camelCase field names.

pub mod claims;
pub mod food;
