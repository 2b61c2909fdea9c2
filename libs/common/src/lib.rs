//! Common library for the film catalogue
//!
//! This crate provides the database plumbing shared by the services:
//! connection acquisition with retries, schema initialisation, error types and
//! resolution of the two generations of record identifiers.
//!
//! ```rust,no_run
//! use common::{Database, DatabaseConfig, schema};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let database = Database::connect_lazy(&DatabaseConfig::default())?;
//!     schema::initialize(&database).await?;
//!     println!("Database health check: {}", database.health_check().await);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod identity;
pub mod schema;

pub use database::{Database, DatabaseConfig, RetryPolicy};
pub use error::{DatabaseError, DatabaseResult, IdentityError};
pub use identity::Identifier;
