//! Infrastructure Database Layer
//!
//! This crate provides PostgreSQL storage for the blog using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! row types, and [`adapters::PostgresBlogStore`] implements the domain's
//! ports on top of them.
//!
//! # Schema
//!
//! The schema lives in the workspace `migrations/` directory and is embedded
//! at compile time; [`run_migrations`] applies it.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBlogStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/blog")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresBlogStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::PostgresBlogStore;
