//! Claims Domain
//!
//! This crate implements the claim lifecycle for surplus food listings and
//! the workflow engine that keeps claims and food availability consistent.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending -> Approved   (food becomes Claimed atomically)
//! Pending -> Rejected
//! ```
//!
//! Approved and Rejected are terminal.

pub mod claim;
pub mod error;
pub mod authorization;
pub mod ports;
pub mod workflow;

pub use claim::{Claim, ClaimStatus, ClaimWithFood};
pub use error::ClaimError;
pub use authorization::{Actor, AuthorizationError, Role};
pub use ports::{ClaimDecision, ClaimLedgerPort, DecisionOutcome, InsertOutcome};
pub use workflow::ClaimWorkflowEngine;
