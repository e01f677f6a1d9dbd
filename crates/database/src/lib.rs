//! # Bank Registry Database Crate
//!
//! This crate is the only place that knows SQL. It exposes one repository per
//! entity and hides the store behind them.
//!
//! ## Architectural Principles
//!
//! - **Store constraints are authoritative:** primary and foreign keys live in the
//!   schema. The repositories pre-check them only to produce descriptive errors, and
//!   map constraint violations raised by the write itself onto the same errors.
//! - **Join view as read model:** branches are always read through the
//!   `bank_branches` view so `bank_name` reflects the bank's current name.
//! - **Driver-agnostic pool:** an `AnyPool` runs PostgreSQL in production and an
//!   in-memory SQLite database in tests, over identical SQL.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations` / `disconnect`: pool lifecycle.
//! - `BankRepository`, `BranchRepository`: the data access operations.
//! - `DbError`: the error taxonomy of this crate.

// Declare the modules that constitute this crate.
pub mod bank_repository;
pub mod branch_repository;
pub mod connection;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use bank_repository::BankRepository;
pub use branch_repository::BranchRepository;
pub use connection::{PoolConfig, connect, disconnect, run_migrations};
pub use error::DbError;
pub use sqlx::AnyPool;
