//! Infrastructure Database Layer
//!
//! PostgreSQL storage for food listings and claims using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! work on row types, and adapters implement the domain ports on top of
//! them, translating rows and errors.
//!
//! # Consistency
//!
//! - `claims (food_id, receiver_id)` is unique, so concurrent duplicate
//!   submissions cannot both succeed.
//! - Claim decisions run in one transaction that locks the claim row and
//!   conditionally updates the food, so at most one approval per food commits.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::{PostgresClaimLedger, PostgresFoodRegistry};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/foodshare")).await?;
//! run_migrations(&pool).await?;
//! let foods = PostgresFoodRegistry::new(pool.clone());
//! let claims = PostgresClaimLedger::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::{PostgresClaimLedger, PostgresFoodRegistry};
