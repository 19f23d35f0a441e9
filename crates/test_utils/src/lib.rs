//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the blog
//! test suite.
//!
//! # Modules
//!
//! - `fixtures`: A seeded blog service over any store
//! - `builders`: Builders for users and forms with generated defaults
//! - `database`: PostgreSQL container management
//! - `assertions`: Assertion helpers for feeds and form errors
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
