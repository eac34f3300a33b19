//! Core Kernel - Foundational types and utilities for the food sharing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers for foods, claims, and users
//! - Port infrastructure shared by every storage adapter
//! - Error categories shared by every domain error type
//! - A clock abstraction so time-dependent rules can be tested deterministically

pub mod identifiers;
pub mod error;
pub mod ports;
pub mod temporal;

pub use identifiers::{FoodId, ClaimId, UserId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::ErrorKind;
pub use temporal::{Clock, SystemClock, ManualClock};
