//! Food Registry Domain
//!
//! This crate owns surplus food listings and their availability status.
//!
//! # Listing Lifecycle
//!
//! ```text
//! Available -> Claimed   (a claim against it is approved)
//! Available -> Expired   (expiry sweep after expires_at)
//! ```
//!
//! Claimed and Expired are terminal.

pub mod food;
pub mod error;
pub mod ports;
pub mod registry;

pub use food::{Food, FoodStatus, GeoLocation, NewFood};
pub use error::FoodError;
pub use ports::FoodRegistryPort;
pub use registry::FoodRegistry;
