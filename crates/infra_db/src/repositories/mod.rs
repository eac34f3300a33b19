//! Repository implementations for domain entities
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! plain row types. Queries are built at runtime with `query_as` and
//! `FromRow`, so building the crate needs no live database.

pub mod food;
pub mod claims;

pub use food::FoodRepository;
pub use claims::ClaimsRepository;
