//! Request handlers

pub mod claims;
pub mod food;
pub mod health;
