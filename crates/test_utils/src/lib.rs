//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the food-share
//! claim service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Predictable values for common entities
//! - `builders`: Builder patterns for test data construction
//! - `database`: Database test helpers and container management
//! - `assertions`: Assertion helpers for claims and listings
//! - `generators`: Property-based test data generators
//! - `tokens`: Signed bearer tokens for API tests

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod tokens;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
pub use tokens::*;
