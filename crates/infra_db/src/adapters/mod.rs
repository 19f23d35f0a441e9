//! Domain Adapters
//!
//! Implementations of the blog ports on top of the repository layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBlogStore;
//! use domain_blog::{BlogService, BlogStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BlogStore> = Arc::new(PostgresBlogStore::new(pool));
//! let service = BlogService::new(store);
//! ```

pub mod postgres;

pub use postgres::PostgresBlogStore;
